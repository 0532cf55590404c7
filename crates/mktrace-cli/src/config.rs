use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the optional per-project configuration file, looked up in
/// the directory being scanned.
pub const CONFIG_FILE: &str = "mktrace.toml";

/// Per-project defaults for the output flags. Command-line flags win
/// over the file: booleans are or-ed in, the indent falls back to the
/// file only when the flag is absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub command: bool,
    #[serde(default)]
    pub full_path: bool,
    #[serde(default)]
    pub macros: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub indent: Option<String>,
}

impl Config {
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}
