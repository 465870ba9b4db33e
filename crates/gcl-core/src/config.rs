//! Configuration management for GCL.
//!
//! This module provides configuration loading, saving, and defaults.
//! Configuration is stored in TOML format in a platform-appropriate location.

use crate::error::{GclError, Result};
use crate::index::Tokenizer;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure for GCL.
///
/// ## Example Configuration File (gcl.toml)
///
/// ```toml
/// [general]
/// log_level = "info"
///
/// [index]
/// lowercase = true
/// token_pattern = "\\w+|[^\\w\\s]"
///
/// [query]
/// max_results = 1000
/// parallel = true
/// parallel_threshold = 4
///
/// [output]
/// snippets = true
/// max_snippet_tokens = 12
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Tokenization of corpus text
    pub index: IndexConfig,

    /// Query evaluation
    pub query: QueryConfig,

    /// Result display
    pub output: OutputConfig,
}

/// General configuration options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: "info".to_string(),
        }
    }
}

/// Index construction options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Lowercase tokens before indexing
    pub lowercase: bool,

    /// Regex whose matches become tokens
    pub token_pattern: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            lowercase: true,
            token_pattern: Tokenizer::DEFAULT_PATTERN.to_string(),
        }
    }
}

impl IndexConfig {
    /// Build the tokenizer described by this section.
    pub fn tokenizer(&self) -> Result<Tokenizer> {
        Tokenizer::new(&self.token_pattern, self.lowercase)
    }
}

/// Query evaluation options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of intervals returned per search
    pub max_results: usize,

    /// Retry cap for containment operators (None = corpus length + 2)
    pub iteration_limit: Option<usize>,

    /// Run batches of queries in parallel
    pub parallel: bool,

    /// Minimum batch size for parallel execution
    pub parallel_threshold: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            max_results: 1000,
            iteration_limit: None,
            parallel: true,
            parallel_threshold: 4,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the covered tokens next to each interval
    pub snippets: bool,

    /// Snippets longer than this are elided in the middle
    pub max_snippet_tokens: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            snippets: true,
            max_snippet_tokens: 12,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default config if no config file exists.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Config::default());
        }

        info!(path = %path.display(), "Loading configuration");
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents).map_err(|e| GclError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
        })?;

        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        info!(path = %path.display(), "Saving configuration");
        let contents = toml::to_string_pretty(self).map_err(|e| GclError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "gcl").ok_or_else(|| GclError::ConfigError {
            reason: "Could not determine config directory".to_string(),
        })?;

        Ok(dirs.config_dir().join("gcl.toml"))
    }
}
