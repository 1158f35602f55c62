//! cli
//!
//! Command-line interface layer.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and build the API client
//! - Delegate to command handlers
//!
//! The CLI layer is thin glue: all discovery and filtering logic lives in
//! [`crate::scope`], and everything remote goes through the
//! [`crate::gitlab::GitLabApi`] trait.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};

use crate::config::Config;
use crate::gitlab::rest::RestApi;
use crate::gitlab::GitLabApi;
use crate::ui::Verbosity;

/// Shared execution context for command handlers.
pub struct Context {
    /// Loaded configuration (file + environment).
    pub config: Config,
    /// Diagnostic verbosity from `--quiet`/`--debug`.
    pub verbosity: Verbosity,
    /// `--url` override.
    pub url_override: Option<String>,
    /// `--token` override.
    pub token_override: Option<String>,
}

impl Context {
    /// The API base URL with CLI-flag precedence applied.
    pub fn url(&self) -> &str {
        self.url_override.as_deref().unwrap_or_else(|| self.config.url())
    }

    /// Build the API client.
    ///
    /// # Errors
    ///
    /// Fails when no access token is configured anywhere.
    pub fn client(&self) -> Result<Arc<dyn GitLabApi>> {
        let token = match self.token_override.as_deref().or_else(|| self.config.token()) {
            Some(token) => token.to_string(),
            None => bail!(
                "no access token configured; pass --token, set GITLAB_TOKEN, \
                 or add 'token' to the config file"
            ),
        };
        Ok(Arc::new(RestApi::with_api_base(token, self.url())))
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let ctx = Context {
        config,
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
        url_override: cli.url,
        token_override: cli.token,
    };

    commands::dispatch(cli.command, &ctx)
}
