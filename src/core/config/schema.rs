//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing so a bad file fails before any
//! request is made.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User configuration file.
///
/// # Example
///
/// ```toml
/// api_base = "https://github.example.com/api/v3"
/// auth = "octocat:ghp_xxx"
/// recursive = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// GitHub API base URL
    pub api_base: Option<String>,

    /// Basic auth, `user:password` or `user:token`
    pub auth: Option<String>,

    /// Follow forks recursively by default
    pub recursive: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(api_base) = &self.api_base {
            validate_api_base(api_base)?;
        }

        if let Some(auth) = &self.auth {
            if auth.is_empty() || auth.starts_with(':') {
                return Err(ConfigError::InvalidValue(
                    "auth must name a user, as 'user' or 'user:password'".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Check that an API base URL is an http(s) URL.
pub fn validate_api_base(api_base: &str) -> Result<(), ConfigError> {
    if !api_base.starts_with("https://") && !api_base.starts_with("http://") {
        return Err(ConfigError::InvalidValue(format!(
            "api_base '{}' must start with http:// or https://",
            api_base
        )));
    }
    Ok(())
}
