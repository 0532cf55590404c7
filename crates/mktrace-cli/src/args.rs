use clap::Parser;

#[derive(Parser)]
#[command(name = "mktrace")]
#[command(
    about = "Generate a JSON compilation database from a make build trace",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Output each compilation as a single command string instead of an
    /// argument list
    #[arg(short = 'c', long)]
    pub command: bool,

    /// Run the build in DIR instead of the current directory
    #[arg(short = 'd', long, value_name = "DIR")]
    pub directory: Option<String>,

    /// Expand the compiler executable to its full path
    #[arg(short = 'f', long)]
    pub full_path: bool,

    /// Indentation used for the JSON output
    #[arg(short = 'i', long, value_name = "STRING")]
    pub indent: Option<String>,

    /// Add the compiler's predefined macros to the argument list
    #[arg(short = 'm', long)]
    pub macros: bool,

    /// Write compile_commands.json instead of printing to stdout
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Scan a saved trace FILE instead of running the build tool; pass -
    /// to read the trace from stdin
    #[arg(short = 'p', long, value_name = "FILE")]
    pub parse: Option<String>,

    /// Report scan progress on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Extra arguments passed to the build tool after its fixed flags
    #[arg(last = true, value_name = "MAKE_ARGS")]
    pub make_args: Vec<String>,
}
