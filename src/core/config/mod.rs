//! core::config
//!
//! Configuration file loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$FORKINDEX_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/forkindex/config.toml`
//! 3. `~/.forkindex/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use forkindex::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("API: {}", config.api_base());
//! ```

pub mod schema;

pub use schema::{validate_api_base, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::github::{Credentials, DEFAULT_API_BASE};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FORKINDEX_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file
    pub file: FileConfig,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Wrap already-parsed file values.
    pub fn new(file: FileConfig) -> Self {
        Config { file, path: None }
    }

    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed,
    /// or validated.
    pub fn load() -> Result<Self, ConfigError> {
        let candidates = Self::candidate_paths(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        );

        match candidates.into_iter().find(|p| p.exists()) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let file = Self::read_config(path)?;
        file.validate()?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Config file locations in search order.
    fn candidate_paths(
        explicit: Option<PathBuf>,
        xdg_config_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(path) = explicit {
            paths.push(path);
        }
        if let Some(xdg) = xdg_config_home {
            paths.push(xdg.join("forkindex/config.toml"));
        }
        if let Some(home) = home {
            paths.push(home.join(".forkindex/config.toml"));
        }
        paths
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Path the config was loaded from, if a file was found.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// API base URL (default: `https://api.github.com`).
    pub fn api_base(&self) -> &str {
        self.file.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    /// Credentials from the `auth` key, if set.
    pub fn credentials(&self) -> Option<Credentials> {
        self.file.auth.as_deref().map(Credentials::parse)
    }

    /// Whether recursive discovery is on by default.
    pub fn recursive(&self) -> bool {
        self.file.recursive.unwrap_or(false)
    }
}
