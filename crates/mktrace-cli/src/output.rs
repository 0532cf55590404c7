use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use mktrace_types::CompileDatabase;

/// Indentation used when no flag or configuration overrides it.
pub const DEFAULT_INDENT: &str = "  ";

/// Renders the database as a pretty-printed JSON array, with `indent`
/// repeated once per nesting level.
pub fn render_database(database: &CompileDatabase, indent: &str) -> Result<String> {
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    database.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}
