// Engine module - build-trace scanning (classification, directory
// tracking, shell expansion, macro probing, entry assembly)

pub mod classify;
pub mod dirstack;
pub mod expand;
pub mod probe;
pub mod scanner;
pub mod tokens;
pub mod trace;

pub use classify::{CompilerFamily, DirectoryAction, DirectoryNotice, LineKind, classify_line};
pub use dirstack::DirectoryStack;
pub use scanner::{ScanOptions, ScanReport, ScanWarning, scan};
pub use trace::{BuildTrace, make_command};

pub use mktrace_types::{CompileDatabase, CompileEntry, Error, Result};
