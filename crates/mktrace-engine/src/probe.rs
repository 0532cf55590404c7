use std::process::Command;

use mktrace_types::{Error, Result};

/// Argument sequence asking a compiler to dump its predefined macros
/// while preprocessing an empty translation unit from stdin.
pub const MACRO_DUMP_ARGS: [&str; 5] = ["-x", "-c", "-dM", "-E", "-"];

/// Queries `compiler` for its predefined macros, returned as
/// `-DNAME=VALUE` argument tokens in the order the compiler printed
/// them.
pub fn probe_macros(compiler: &str) -> Result<Vec<String>> {
    let output = Command::new(compiler)
        .args(MACRO_DUMP_ARGS)
        .output()
        .map_err(|err| Error::Probe {
            compiler: compiler.to_string(),
            detail: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(Error::Probe {
            compiler: compiler.to_string(),
            detail: format!("exited with {}", output.status),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(parse_macro_dump(&stdout))
}

/// Turns `#define NAME VALUE` dump lines into `-DNAME=VALUE` tokens.
/// VALUE keeps its spacing verbatim and is empty for bare defines;
/// lines not in dump form are skipped.
fn parse_macro_dump(dump: &str) -> Vec<String> {
    let mut defines = Vec::new();
    for line in dump.lines() {
        let Some(rest) = line.strip_prefix("#define ") else {
            continue;
        };
        let (name, value) = match rest.split_once(' ') {
            Some((name, value)) => (name, value),
            None => (rest, ""),
        };
        if name.is_empty() {
            continue;
        }
        defines.push(format!("-D{}={}", name, value));
    }
    defines
}
