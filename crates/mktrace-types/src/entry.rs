use serde::{Deserialize, Serialize};

/// One command object of a compilation database.
///
/// A compilation database is a JSON array of command objects, each
/// describing one compiler run over one translation unit: the working
/// directory, the command itself, and the main source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileEntry {
    /// Working directory of the compilation. Relative paths inside the
    /// command are resolved against it.
    pub directory: String,

    /// The compile command as an argv list, with the compiler as the
    /// first element. Absent when the entry carries `command` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,

    /// The compile command as a single shell-quoted string. Absent when
    /// the entry carries `arguments` instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// The main translation unit processed by this step.
    pub file: String,

    /// Output file created by this step, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl CompileEntry {
    /// Collapses the argv list into the single-string `command` form.
    /// No-op when the entry already carries a command string.
    pub fn into_command_form(mut self) -> Self {
        if let Some(args) = self.arguments.take() {
            self.command = Some(args.join(" "));
        }
        self
    }
}

/// Entries collected from one build trace, in the order the trace
/// reported them. Append-only: entries are never merged or reordered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompileDatabase {
    entries: Vec<CompileEntry>,
}

impl CompileDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: CompileEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CompileEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(directory: &str, arguments: &[&str], file: &str) -> CompileEntry {
        CompileEntry {
            directory: directory.to_string(),
            arguments: Some(arguments.iter().map(|s| s.to_string()).collect()),
            command: None,
            file: file.to_string(),
            output: None,
        }
    }

    #[test]
    fn test_serializes_argv_form_without_optional_fields() {
        let entry = entry("/src/project", &["gcc", "-c", "main.c"], "main.c");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "directory": "/src/project",
                "arguments": ["gcc", "-c", "main.c"],
                "file": "main.c",
            })
        );
    }

    #[test]
    fn test_into_command_form_joins_argv() {
        let entry = entry("/src/project", &["gcc", "-g", "-c", "main.c"], "main.c");
        let entry = entry.into_command_form();
        assert_eq!(entry.arguments, None);
        assert_eq!(entry.command.as_deref(), Some("gcc -g -c main.c"));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "directory": "/src/project",
                "command": "gcc -g -c main.c",
                "file": "main.c",
            })
        );
    }

    #[test]
    fn test_database_serializes_as_plain_array() {
        let mut database = CompileDatabase::new();
        database.push(entry("/a", &["cc", "-c", "a.c"], "a.c"));
        database.push(entry("/b", &["cc", "-c", "b.c"], "b.c"));
        let value = serde_json::to_value(&database).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_deserializes_entries_with_missing_optional_fields() {
        let raw = r#"[{"directory": "/src", "command": "cc -c x.c", "file": "x.c"}]"#;
        let database: CompileDatabase = serde_json::from_str(raw).unwrap();
        assert_eq!(database.len(), 1);
        let entry = &database.entries()[0];
        assert_eq!(entry.arguments, None);
        assert_eq!(entry.command.as_deref(), Some("cc -c x.c"));
        assert_eq!(entry.output, None);
    }
}
