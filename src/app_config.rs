use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// FreeDict catalog URL
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,

    /// Language pair to convert, or "all" for every catalog dictionary
    #[serde(default = "default_dictionary")]
    pub dictionary: String,

    /// Directory the converted dictionaries are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory downloaded archives are cached in; falls back to the
    /// platform cache directory when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of language pairs converted concurrently
    #[serde(default = "default_concurrent_conversions")]
    pub concurrent_conversions: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_catalog_url() -> String {
    "https://freedict.org/freedict-database.json".to_string()
}

fn default_dictionary() -> String {
    "all".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dictionaries/freedict")
}

fn default_concurrent_conversions() -> usize {
    4
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.dictionary != "all" && !language_utils::is_language_pair(&self.dictionary) {
            return Err(anyhow!(
                "Invalid dictionary selection '{}': expected a language pair like 'eng-deu' or 'all'",
                self.dictionary
            ));
        }

        if self.concurrent_conversions == 0 {
            return Err(anyhow!("concurrent_conversions must be at least 1"));
        }

        if self.catalog_url.is_empty() {
            return Err(anyhow!("catalog_url must not be empty"));
        }

        Ok(())
    }

    /// Resolve the archive cache directory, preferring the configured path
    /// and falling back to the platform cache directory
    pub fn resolve_cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("teidict")))
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            catalog_url: default_catalog_url(),
            dictionary: default_dictionary(),
            output_dir: default_output_dir(),
            cache_dir: None,
            concurrent_conversions: default_concurrent_conversions(),
            log_level: LogLevel::default(),
        }
    }
}
