//! CLI configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Database file
    pub database: Option<PathBuf>,
    /// Player used by `record` and `check` when none is given
    pub player: Option<String>,
    /// Track used by `record` and `check` when none is given
    pub track: Option<String>,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("encore").join("config.toml"))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load an explicitly given config file, or the default one if it exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(path),
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Database path: command line, then config file, then the data directory.
    pub fn database_path(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag.or_else(|| self.database.clone()) {
            return Ok(path);
        }
        let data_dir = dirs::data_dir().context("Failed to determine data directory")?;
        Ok(data_dir.join("encore").join("database.xml"))
    }
}
