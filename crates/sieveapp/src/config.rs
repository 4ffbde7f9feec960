//! # Configuration
//!
//! Sieve configuration is a [`confique`] config struct, loaded in layers.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SIEVE_TAG`, `SIEVE_DEBOUNCE_MS`, etc.
//! 2. **Project Config**: `.sieve.toml` in the working directory.
//! 3. **Global Config**: `sieve.toml` in the OS config directory (via `directories`).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `tag` | `sieve-filter` | Component name: event name and attribute prefix |
//! | `host` | none | Id of the collection the component lives in |
//! | `form` | none | Name of the form supplying field values |
//! | `targets` | none | Space-separated collection ids to filter |
//! | `include` | none | Space-separated field names to read exclusively |
//! | `exclude` | none | Space-separated field names to ignore |
//! | `index` | none | Field name under which item text gets indexed |
//! | `debounce_ms` | `50` | Quiet period before a pass runs |
//! | `rows` | `*` | Item selector used in the highlight rule |
//! | `delimiter` | `:` | Separates a field name from its flags |

use crate::error::{Result, SieveError};
use crate::fields::{ReadOptions, DEFAULT_DELIMITER};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TAG: &str = "sieve-filter";
pub const PROJECT_CONFIG_FILE: &str = ".sieve.toml";
pub const GLOBAL_CONFIG_FILE: &str = "sieve.toml";

/// Configuration of one filtering component.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Component name. Names the notification event and prefixes indexed attributes.
    #[config(default = "sieve-filter", env = "SIEVE_TAG")]
    pub tag: String,

    /// Id of the collection the component is attached to.
    #[config(env = "SIEVE_HOST")]
    pub host: Option<String>,

    #[config(env = "SIEVE_FORM")]
    pub form: Option<String>,

    /// Space-separated target collection ids. When absent, the host collection.
    #[config(env = "SIEVE_TARGETS")]
    pub targets: Option<String>,

    #[config(env = "SIEVE_INCLUDE")]
    pub include: Option<String>,

    #[config(env = "SIEVE_EXCLUDE")]
    pub exclude: Option<String>,

    /// Field name to index item text content under.
    #[config(env = "SIEVE_INDEX")]
    pub index: Option<String>,

    #[config(default = 50, env = "SIEVE_DEBOUNCE_MS")]
    pub debounce_ms: u64,

    #[config(default = "*", env = "SIEVE_ROWS")]
    pub rows: String,

    #[config(default = ":", env = "SIEVE_DELIMITER")]
    pub delimiter: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            host: None,
            form: None,
            targets: None,
            include: None,
            exclude: None,
            index: None,
            debounce_ms: 50,
            rows: "*".to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

fn split_list(value: &Option<String>) -> Option<Vec<String>> {
    value
        .as_deref()
        .map(|v| v.split_whitespace().map(str::to_string).collect())
}

impl FilterConfig {
    /// Configured target ids. Empty means "the host collection".
    pub fn target_ids(&self) -> Vec<String> {
        split_list(&self.targets).unwrap_or_default()
    }

    /// The delimiter character. Falls back to `:` when unset or longer than one char.
    pub fn delimiter(&self) -> char {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => DEFAULT_DELIMITER,
        }
    }

    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            include: split_list(&self.include),
            exclude: split_list(&self.exclude),
            delimiter: self.delimiter(),
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The active index field, ignoring blank values.
    pub fn index_field(&self) -> Option<&str> {
        self.index.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.tag.trim().is_empty() {
            return Err(SieveError::Config("tag must not be empty".to_string()));
        }
        if self.delimiter.chars().count() != 1 {
            return Err(SieveError::Config(format!(
                "delimiter must be a single character, got \"{}\"",
                self.delimiter
            )));
        }
        Ok(())
    }
}

/// Path of the global config file, if the OS has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "sieve", "sieve")
        .map(|dirs| dirs.config_dir().join(GLOBAL_CONFIG_FILE))
}

/// Loads the layered configuration for a working directory.
pub fn load_config(project_dir: &Path) -> Result<FilterConfig> {
    load_config_from(
        Some(project_dir.join(PROJECT_CONFIG_FILE)),
        global_config_path(),
    )
}

/// Loads configuration from explicit file locations. Missing files are skipped.
pub fn load_config_from(
    project_file: Option<PathBuf>,
    global_file: Option<PathBuf>,
) -> Result<FilterConfig> {
    let mut builder = FilterConfig::builder().env();
    if let Some(path) = project_file {
        builder = builder.file(path);
    }
    if let Some(path) = global_file {
        builder = builder.file(path);
    }
    let config = builder
        .load()
        .map_err(|e| SieveError::Config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}
