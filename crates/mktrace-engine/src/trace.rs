use std::io::BufReader;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use mktrace_types::{Error, Result};

/// Flags handed to the build tool as one token: unconditional rebuild,
/// keep going past errors, dry run, and directory change notices.
const MAKE_FLAGS: &str = "-Bknw";

/// Name of the build tool traced on this platform.
pub fn make_command() -> &'static str {
    if cfg!(target_os = "openbsd") {
        "gmake"
    } else {
        "make"
    }
}

/// A running build tool whose stdout is being traced. Stderr is
/// discarded so diagnostics from failing rules do not pollute the
/// trace.
pub struct BuildTrace {
    child: Child,
    stdout: Option<ChildStdout>,
}

impl BuildTrace {
    /// Spawns the build tool in `base_dir` with trace output enabled,
    /// appending `extra_args` after the fixed flags.
    pub fn spawn(base_dir: &Path, extra_args: &[String]) -> Result<Self> {
        let tool = make_command();
        let mut child = Command::new(tool)
            .arg(MAKE_FLAGS)
            .args(extra_args)
            .current_dir(base_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|err| Error::StreamSetup {
                tool: tool.to_string(),
                source: err,
            })?;
        let stdout = child.stdout.take().ok_or_else(|| Error::StreamSetup {
            tool: tool.to_string(),
            source: std::io::Error::other("stdout pipe was not attached"),
        })?;
        Ok(Self {
            child,
            stdout: Some(stdout),
        })
    }

    /// Takes the piped stdout for scanning. Yields the stream only on
    /// the first call.
    pub fn take_stdout(&mut self) -> Option<BufReader<ChildStdout>> {
        self.stdout.take().map(BufReader::new)
    }

    /// Waits for the build tool to exit, reaping the child. The exit
    /// status is ignored: in keep-going mode a failing rule still
    /// yields a usable trace.
    pub fn wait(mut self) -> Result<()> {
        self.child.wait()?;
        Ok(())
    }
}
