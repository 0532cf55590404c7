use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use mktrace_types::{CompileDatabase, CompileEntry, Error, Result};

use crate::classify::{DirectoryAction, LineKind, classify_line};
use crate::dirstack::DirectoryStack;
use crate::expand::{contains_substitution, expand_substitutions};
use crate::probe::probe_macros;
use crate::tokens::{dedup_keep_first, remove_empty};

/// Build description names looked for in the scan directory, in the
/// order the build tool itself considers them.
const BUILD_DESCRIPTIONS: [&str; 3] = ["GNUmakefile", "makefile", "Makefile"];

/// Options controlling how recognized invocations become entries.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Collapse the argv list into a single `command` string.
    pub emit_command_string: bool,
    /// Resolve the compiler token to its absolute executable path.
    pub expand_compiler_path: bool,
    /// Append the compiler's predefined macros as `-D` tokens.
    pub include_predefined_macros: bool,
}

/// Outcome of one scan: the assembled database plus the per-line
/// conditions that were tolerated without stopping the scan.
#[derive(Debug)]
pub struct ScanReport {
    pub database: CompileDatabase,
    pub warnings: Vec<ScanWarning>,
}

/// A per-line condition the scan degraded around instead of aborting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanWarning {
    /// A leave notice arrived while only the base frame was open.
    StackUnderflow { line: usize },
    /// A substitution fragment failed; the line was dropped.
    SubstitutionFailed { line: usize, message: String },
    /// A macro probe failed; entries keep their plain argument list.
    ProbeFailed { line: usize, message: String },
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanWarning::StackUnderflow { line } => {
                write!(
                    f,
                    "line {}: directory leave notice without a matching enter; directory unchanged",
                    line
                )
            }
            ScanWarning::SubstitutionFailed { line, message } => {
                write!(f, "line {}: {}; line skipped", line, message)
            }
            ScanWarning::ProbeFailed { line, message } => {
                write!(f, "line {}: {}; macros omitted", line, message)
            }
        }
    }
}

/// Scans one build trace line by line, attributing recognized compiler
/// invocations to the directory announced by the trace. Entries keep
/// the order the trace reported them. Trace bytes are decoded lossily,
/// so a line that is not valid UTF-8 is still scanned.
pub fn scan<R: BufRead>(
    base_dir: &Path,
    mut reader: R,
    options: &ScanOptions,
) -> Result<ScanReport> {
    let mut stack = DirectoryStack::new(base_dir.display().to_string());
    let mut database = CompileDatabase::new();
    let mut warnings = Vec::new();
    let mut probe_cache: HashMap<String, Option<Vec<String>>> = HashMap::new();

    let mut raw_line = Vec::new();
    let mut line_number = 0;
    loop {
        raw_line.clear();
        if reader.read_until(b'\n', &mut raw_line)? == 0 {
            break;
        }
        line_number += 1;

        // Chatter from arbitrary build rules may not be UTF-8.
        let decoded = String::from_utf8_lossy(&raw_line);
        let line = decoded.strip_suffix('\n').unwrap_or(&decoded);
        let line = line.strip_suffix('\r').unwrap_or(line);

        match classify_line(line) {
            LineKind::DirectoryNotice(notice) => match notice.action {
                DirectoryAction::Enter => stack.enter(notice.path),
                DirectoryAction::Leave => {
                    if stack.leave().is_err() {
                        warnings.push(ScanWarning::StackUnderflow { line: line_number });
                    }
                }
            },
            LineKind::CompilerInvocation(_) => {
                let directory = stack.current().to_string();
                if let Some(entry) = build_entry(
                    line,
                    line_number,
                    directory,
                    options,
                    &mut probe_cache,
                    &mut warnings,
                ) {
                    database.push(entry);
                }
            }
            LineKind::Other => {}
        }
    }

    if database.is_empty() {
        return Err(empty_scan_error(base_dir));
    }

    Ok(ScanReport { database, warnings })
}

/// Builds one entry from a recognized invocation line, or `None` when
/// the line is filtered out.
fn build_entry(
    line: &str,
    line_number: usize,
    directory: String,
    options: &ScanOptions,
    probe_cache: &mut HashMap<String, Option<Vec<String>>>,
    warnings: &mut Vec<ScanWarning>,
) -> Option<CompileEntry> {
    // The file heuristic uses the raw line: substitutions never produce
    // the trailing translation-unit argument.
    let file = line.split_whitespace().next_back()?.to_string();

    let mut working_line = line.to_string();
    if contains_substitution(line) {
        match expand_substitutions(line) {
            Ok(expanded) => working_line = expanded,
            Err(err) => {
                warnings.push(ScanWarning::SubstitutionFailed {
                    line: line_number,
                    message: err.to_string(),
                });
                return None;
            }
        }
    }

    let mut tokens: Vec<String> = working_line
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if tokens.is_empty() {
        return None;
    }

    if options.expand_compiler_path {
        if let Ok(path) = which::which(&tokens[0]) {
            tokens[0] = path.display().to_string();
        }
    }

    if options.include_predefined_macros {
        let compiler = tokens[0].clone();
        if !probe_cache.contains_key(&compiler) {
            let probed = match probe_macros(&compiler) {
                Ok(defines) => Some(defines),
                Err(err) => {
                    warnings.push(ScanWarning::ProbeFailed {
                        line: line_number,
                        message: err.to_string(),
                    });
                    None
                }
            };
            probe_cache.insert(compiler.clone(), probed);
        }
        if let Some(Some(defines)) = probe_cache.get(&compiler) {
            tokens.extend(defines.iter().cloned());
        }
    }

    let arguments = dedup_keep_first(remove_empty(tokens));

    // Invocations without an existing trailing source file are linker or
    // assembler steps, not translation-unit compiles.
    if !Path::new(&directory).join(&file).exists() {
        return None;
    }

    let mut entry = CompileEntry {
        directory,
        arguments: Some(arguments),
        command: None,
        file,
        output: None,
    };
    if options.emit_command_string {
        entry = entry.into_command_form();
    }
    Some(entry)
}

/// Distinguishes "nothing to build here" from "trace held no
/// recognizable invocations" once a scan came back empty.
fn empty_scan_error(base_dir: &Path) -> Error {
    let described = BUILD_DESCRIPTIONS
        .iter()
        .any(|name| base_dir.join(name).is_file());
    if described {
        Error::EmptyScanResult
    } else {
        Error::NoBuildDescription {
            dir: base_dir.to_path_buf(),
        }
    }
}
