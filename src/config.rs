//! CLI configuration (`config.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{QailError, QailResult};

/// How the CLI prints a compiled statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// SQL text, then one `?N = value` line per parameter.
    #[default]
    Text,
    /// `{"sql": ..., "params": [...]}`
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Colorize terminal output.
    pub color: bool,
    /// Print the bound parameters after the SQL.
    pub show_params: bool,
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_params: true,
            format: OutputFormat::Text,
        }
    }
}

impl CliConfig {
    /// `$CONFIG_DIR/qail-sqlite/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qail-sqlite").join("config.toml"))
    }

    /// Load from an explicit path, or from [`CliConfig::default_path`].
    ///
    /// A missing default file yields the defaults; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> QailResult<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(QailError::Config(format!(
                        "{} not found",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> QailResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| QailError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text; unset keys keep their defaults.
    pub fn parse(content: &str) -> QailResult<Self> {
        toml::from_str(content).map_err(|e| QailError::Config(e.to_string()))
    }
}
