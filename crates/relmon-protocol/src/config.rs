//! Session configuration.
//!
//! Read from a JSON file; every field is optional.
//!
//! ```json
//! {
//!   "max_name_len": 63,
//!   "strict": false,
//!   "format": "text",
//!   "verify": false
//! }
//! ```

use crate::command::DEFAULT_MAX_NAME_LEN;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How `report` output is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// `rel holder ... count; ` per relation, or `none`.
    #[default]
    Text,
    /// One JSON object per report.
    Json,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Json => "json",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown report format: {}", other)),
        }
    }
}

/// Options for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Longest accepted name in bytes; 0 disables the check.
    pub max_name_len: usize,

    /// Abort on malformed lines instead of skipping them.
    pub strict: bool,

    pub format: ReportFormat,

    /// Check store invariants after every mutating command.
    pub verify: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
            strict: false,
            format: ReportFormat::Text,
            verify: false,
        }
    }
}

impl SessionConfig {
    /// Loads a config file, filling missing fields with defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Writes this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
