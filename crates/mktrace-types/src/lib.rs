pub mod entry;
pub mod error;

pub use entry::{CompileDatabase, CompileEntry};
pub use error::{Error, Result};
