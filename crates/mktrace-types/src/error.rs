use std::fmt;
use std::path::PathBuf;

/// Result type for mktrace operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning a build trace into a compilation database
#[derive(Debug)]
pub enum Error {
    /// Reading the build trace stream failed
    Io(std::io::Error),

    /// The build tool could not be spawned or its output pipe attached
    StreamSetup {
        tool: String,
        source: std::io::Error,
    },

    /// A directory leave notice arrived with no matching enter frame
    StackUnderflow,

    /// A command substitution subprocess could not run or exited non-zero
    Substitution { command: String, detail: String },

    /// A macro dump subprocess could not run or exited with failure
    Probe { compiler: String, detail: String },

    /// The trace yielded no entries and the directory holds no makefile
    NoBuildDescription { dir: PathBuf },

    /// The trace yielded no entries despite a makefile being present
    EmptyScanResult,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::StreamSetup { tool, source } => {
                write!(f, "failed to start {}: {}", tool, source)
            }
            Error::StackUnderflow => {
                write!(f, "directory leave notice without a matching enter")
            }
            Error::Substitution { command, detail } => {
                write!(f, "command substitution `{}` failed: {}", command, detail)
            }
            Error::Probe { compiler, detail } => {
                write!(f, "macro probe of `{}` failed: {}", compiler, detail)
            }
            Error::NoBuildDescription { dir } => {
                write!(f, "no makefile found in {}", dir.display())
            }
            Error::EmptyScanResult => {
                write!(f, "build trace contained no compiler invocations")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::StreamSetup { source, .. } => Some(source),
            Error::StackUnderflow
            | Error::Substitution { .. }
            | Error::Probe { .. }
            | Error::NoBuildDescription { .. }
            | Error::EmptyScanResult => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
