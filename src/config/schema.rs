//! config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: the URL must be http(s) and the scan
//! concurrency at least 1. Unknown keys are rejected so a typo fails loudly
//! instead of being ignored.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User-scope configuration.
///
/// # Example
///
/// ```toml
/// url = "https://gitlab.example.com/api/v4"
/// token = "glpat-xxx"
/// show_namespace = true
/// concurrency = 8
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// API base URL, including the `/api/v4` suffix.
    pub url: Option<String>,

    /// Personal access token.
    pub token: Option<String>,

    /// Whether listings show namespace-qualified paths.
    pub show_namespace: Option<bool>,

    /// Width of the concurrent commit-scan pool.
    pub concurrency: Option<usize>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidValue(format!(
                    "url '{}' must start with http:// or https://",
                    url
                )));
            }
        }

        if let Some(0) = self.concurrency {
            return Err(ConfigError::InvalidValue(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
