use std::env;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use mktrace_engine::scanner::{ScanOptions, ScanReport, scan};
use mktrace_engine::trace::BuildTrace;

use crate::args::Cli;
use crate::config::{CONFIG_FILE, Config};
use crate::output::{DEFAULT_INDENT, render_database};

/// Name of the database file created in write mode.
pub const OUTPUT_FILE: &str = "compile_commands.json";

pub fn run(cli: Cli) -> Result<()> {
    let base_dir = resolve_base_dir(cli.directory.as_deref())?;
    let config = Config::load_from(&base_dir.join(CONFIG_FILE))?;

    let options = ScanOptions {
        emit_command_string: cli.command || config.command,
        expand_compiler_path: cli.full_path || config.full_path,
        include_predefined_macros: cli.macros || config.macros,
    };
    let write = cli.write || config.write;
    let indent = cli
        .indent
        .or(config.indent)
        .unwrap_or_else(|| DEFAULT_INDENT.to_string());

    let report = match cli.parse.as_deref() {
        Some(source) => scan_saved_trace(&base_dir, source, &options)?,
        None => scan_live_build(&base_dir, &cli.make_args, &options)?,
    };

    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    if cli.verbose {
        for entry in report.database.entries() {
            eprintln!("  Recognized: {} ({})", entry.file, entry.directory);
        }
        eprintln!("Scan complete: {} entries", report.database.len());
    }

    let rendered = render_database(&report.database, &indent)?;
    if write {
        let path = base_dir.join(OUTPUT_FILE);
        fs::write(&path, &rendered)
            .with_context(|| format!("failed to write {}", path.display()))?;
        if cli.verbose {
            eprintln!("Wrote {}", path.display());
        }
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

/// An empty override is treated as absent and falls back to the
/// process working directory, so entries never carry an empty
/// `directory`.
fn resolve_base_dir(overridden: Option<&str>) -> Result<PathBuf> {
    match overridden.filter(|dir| !dir.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => env::current_dir().context("failed to determine the current directory"),
    }
}

/// Spawns the build tool and scans its stdout as it runs. The child is
/// reaped even when the scan itself fails.
fn scan_live_build(
    base_dir: &Path,
    make_args: &[String],
    options: &ScanOptions,
) -> Result<ScanReport> {
    let mut trace = BuildTrace::spawn(base_dir, make_args)?;
    let reader = trace
        .take_stdout()
        .context("build tool stdout was not captured")?;
    let scanned = scan(base_dir, reader, options);
    let waited = trace.wait();
    let report = scanned?;
    waited?;
    Ok(report)
}

/// Scans a previously captured trace from a file, or from stdin when
/// `source` is `-`.
fn scan_saved_trace(base_dir: &Path, source: &str, options: &ScanOptions) -> Result<ScanReport> {
    if source == "-" {
        let stdin = io::stdin();
        let report = scan(base_dir, stdin.lock(), options)?;
        return Ok(report);
    }

    let file = File::open(source).with_context(|| format!("failed to open trace {}", source))?;
    let report = scan(base_dir, BufReader::new(file), options)?;
    Ok(report)
}
