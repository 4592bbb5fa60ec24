//! Configuration for search and viewport planning.
//!
//! Configuration is a JSON document; every field is optional and falls back
//! to its default, so a file only needs the settings it changes:
//!
//! ```json
//! { "search": { "maxResults": 25 }, "viewport": { "padding": 40 } }
//! ```

use crate::search::SearchConfig;
use crate::viewport::ViewportOptions;
use lineage_core::{LineageError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Directory holding per-project settings.
pub const CONFIG_DIR: &str = ".lineage";

/// File name of the settings document inside `CONFIG_DIR`.
pub const CONFIG_FILE: &str = "config.json";

/// All tunable settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub search: SearchConfig,
    pub viewport: ViewportOptions,
}

impl LineageConfig {
    /// Parses a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| LineageError::io(path, e))?;
        debug!("Loaded config from {}", path.display());
        Self::from_json(&json)
    }

    /// Reads a configuration file, or returns the defaults if it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(LineageError::io(path, e)),
        }
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| LineageError::io(path, e))
    }
}
