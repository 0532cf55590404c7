use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use mktrace_types::{Error, Result};

static SUBSTITUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\(([^)]+)\)|`([^`]+)`").unwrap());

/// At most this many substitution fragments are expanded per line.
pub const MAX_FRAGMENTS_PER_LINE: usize = 2;

/// Whether the line contains a dollar-paren or back-tick substitution.
pub fn contains_substitution(line: &str) -> bool {
    SUBSTITUTION.is_match(line)
}

/// Replaces command-substitution fragments with the stdout of the
/// fragment's command, left to right, up to the per-line cap. Every
/// occurrence of a replaced fragment is rewritten, delimiters included.
pub fn expand_substitutions(line: &str) -> Result<String> {
    let mut expanded = line.to_string();
    for captures in SUBSTITUTION
        .captures_iter(line)
        .take(MAX_FRAGMENTS_PER_LINE)
    {
        let fragment = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|inner| inner.as_str())
            .unwrap_or_default();
        let output = run_fragment(fragment)?;
        expanded = expanded.replace(&captures[0], &output);
    }
    Ok(expanded)
}

/// Runs a fragment's text as a command, splitting arguments on
/// whitespace, and returns its stdout with one trailing newline
/// stripped.
fn run_fragment(fragment: &str) -> Result<String> {
    let mut words = fragment.split_whitespace();
    let Some(program) = words.next() else {
        return Err(Error::Substitution {
            command: fragment.to_string(),
            detail: "empty substitution".to_string(),
        });
    };

    let output = Command::new(program)
        .args(words)
        .output()
        .map_err(|err| Error::Substitution {
            command: fragment.to_string(),
            detail: err.to_string(),
        })?;
    if !output.status.success() {
        return Err(Error::Substitution {
            command: fragment.to_string(),
            detail: format!("exited with {}", output.status),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.strip_suffix('\n').unwrap_or(&stdout);
    Ok(stdout.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_substitution() {
        assert!(contains_substitution("gcc $(pkg-config --cflags x) -c a.c"));
        assert!(contains_substitution("gcc `uname` -c a.c"));
        assert!(!contains_substitution("gcc -c a.c"));
        assert!(!contains_substitution("gcc $(unterminated -c a.c"));
    }

    #[test]
    fn test_expands_dollar_paren_fragment() {
        let line = "gcc -c $(echo -DVERSION=1) main.c";
        let expanded = expand_substitutions(line).unwrap();
        assert_eq!(expanded, "gcc -c -DVERSION=1 main.c");
    }

    #[test]
    fn test_expands_backtick_fragment() {
        let line = "gcc `echo -I. -Iinclude` -c main.c";
        let expanded = expand_substitutions(line).unwrap();
        assert_eq!(expanded, "gcc -I. -Iinclude -c main.c");
    }

    #[test]
    fn test_expands_at_most_two_fragments() {
        let line = "a $(echo 1) b $(echo 2) c $(echo 3)";
        let expanded = expand_substitutions(line).unwrap();
        assert_eq!(expanded, "a 1 b 2 c $(echo 3)");
    }

    #[test]
    fn test_line_without_fragments_is_unchanged() {
        let line = "gcc -c main.c";
        assert_eq!(expand_substitutions(line).unwrap(), line);
    }

    #[test]
    fn test_failing_fragment_reports_substitution_error() {
        let err = expand_substitutions("gcc $(false) -c main.c").unwrap_err();
        assert!(matches!(err, Error::Substitution { .. }));
    }

    #[test]
    fn test_unspawnable_fragment_reports_substitution_error() {
        let err = expand_substitutions("gcc $(no-such-tool-mktrace) -c a.c").unwrap_err();
        match err {
            Error::Substitution { command, .. } => {
                assert_eq!(command, "no-such-tool-mktrace");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
