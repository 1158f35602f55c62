//! config
//!
//! Configuration loading and precedence.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. `GITLAB_URL` / `GITLAB_TOKEN` environment variables
//! 4. CLI flags (handled by the CLI layer, not here)
//!
//! # Config File Locations
//!
//! Searched in order, first hit wins:
//! 1. `$GLSCOPE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/glscope/config.toml`
//! 3. `~/.glscope/config.toml`
//!
//! A missing file falls back to defaults; a malformed or invalid file is a
//! startup error.

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::gitlab::rest::DEFAULT_API_BASE;
use crate::scope::DEFAULT_CONCURRENCY;

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

/// Environment-variable overrides, captured once at load time.
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// `GITLAB_URL`
    pub url: Option<String>,
    /// `GITLAB_TOKEN`
    pub token: Option<String>,
}

impl EnvOverrides {
    /// Read the overrides from the process environment.
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("GITLAB_URL").ok().filter(|v| !v.is_empty()),
            token: std::env::var("GITLAB_TOKEN").ok().filter(|v| !v.is_empty()),
        }
    }
}

/// Resolved configuration with precedence applied by the accessors.
#[derive(Debug, Clone)]
pub struct Config {
    file: GlobalConfig,
    env: EnvOverrides,
}

impl Config {
    /// Load configuration, optionally from an explicit path.
    ///
    /// An explicit path must exist; the searched locations may be absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on unreadable, unparseable, or invalid files.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) => read_config_file(path)?,
            None => match search_config_path() {
                Some(path) if path.exists() => read_config_file(&path)?,
                _ => GlobalConfig::default(),
            },
        };
        Ok(Self::from_parts(file, EnvOverrides::from_env()))
    }

    /// Assemble a config from already-loaded parts.
    pub fn from_parts(file: GlobalConfig, env: EnvOverrides) -> Self {
        Self { file, env }
    }

    /// The API base URL.
    pub fn url(&self) -> &str {
        self.env
            .url
            .as_deref()
            .or(self.file.url.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// The access token, if any is configured.
    pub fn token(&self) -> Option<&str> {
        self.env.token.as_deref().or(self.file.token.as_deref())
    }

    /// Whether listings show namespace-qualified paths.
    pub fn show_namespace(&self) -> bool {
        self.file.show_namespace.unwrap_or(true)
    }

    /// Width of the concurrent commit-scan pool.
    pub fn concurrency(&self) -> usize {
        self.file.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }
}

/// Find the first config file location that applies.
fn search_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("GLSCOPE_CONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            let path = Path::new(&xdg).join("glscope").join("config.toml");
            if path.exists() {
                return Some(path);
            }
        }
    }
    dirs::home_dir().map(|home| home.join(".glscope").join("config.toml"))
}

/// Read, parse, and validate one config file.
fn read_config_file(path: &Path) -> Result<GlobalConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GlobalConfig =
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_overrides_file() {
        let file = GlobalConfig {
            url: Some("https://file.example.com/api/v4".to_string()),
            token: Some("file-token".to_string()),
            ..GlobalConfig::default()
        };
        let env = EnvOverrides {
            url: Some("https://env.example.com/api/v4".to_string()),
            token: None,
        };
        let config = Config::from_parts(file, env);
        assert_eq!(config.url(), "https://env.example.com/api/v4");
        // Env had no token, so the file wins.
        assert_eq!(config.token(), Some("file-token"));
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_parts(GlobalConfig::default(), EnvOverrides::default());
        assert_eq!(config.url(), DEFAULT_API_BASE);
        assert_eq!(config.token(), None);
        assert!(config.show_namespace());
        assert_eq!(config.concurrency(), DEFAULT_CONCURRENCY);
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "token = \"glpat-xxx\"\nconcurrency = 2").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.concurrency(), 2);
    }

    #[test]
    fn explicit_file_must_exist() {
        let result = Config::load(Some(Path::new("/nonexistent/glscope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url = [not toml").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_values_are_rejected_at_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "concurrency = 0").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }
}
