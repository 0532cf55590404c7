mod args;
mod commands;
pub mod config;
pub mod output;

pub use args::Cli;
pub use commands::run;
