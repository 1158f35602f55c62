//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--config <path>`: load configuration from an explicit file
//! - `--url <base>`: API base URL (overrides config and `GITLAB_URL`)
//! - `--token <token>`: access token (overrides config and `GITLAB_TOKEN`)
//! - `--debug`: enable debug output
//! - `--quiet` / `-q`: errors only

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::gitlab::Visibility;

/// glscope - resolve GitLab project scopes, render listings or mrconfig checkouts
#[derive(Parser, Debug)]
#[command(name = "glscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Load configuration from this file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API base URL, e.g. https://gitlab.example.com/api/v4
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Personal access token
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the projects in a scope
    #[command(
        name = "list",
        long_about = "List the projects in a scope, one per line.\n\n\
            The scope is every project visible to you, optionally restricted \
            to a group (or, when no group matches, a user) and to projects \
            you created (--mine) or committed to (--contributed)."
    )]
    List {
        /// Group (or user) selector; empty means every visible project
        #[arg(short, long, default_value = "", value_name = "QUERY")]
        group: String,

        /// Only projects created by you
        #[arg(long, conflicts_with = "contributed")]
        mine: bool,

        /// Only projects you have committed to
        #[arg(long)]
        contributed: bool,

        /// Print bare project paths instead of namespace-qualified ones
        #[arg(long)]
        no_namespace: bool,
    },

    /// Render a scope as mrconfig checkout stanzas
    #[command(
        name = "mrconfig",
        long_about = "Render a scope as myrepos-style checkout configuration.\n\n\
            Each project becomes a stanza with a git clone command. With \
            --root, the named project is promoted to the top of the output \
            under the synthetic '.' key so the enclosing directory itself is \
            its checkout.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Checkout config for everything in a group
    glscope mrconfig --group infra > .mrconfig

    # Same, with the umbrella repository checked out at the top
    glscope mrconfig --group infra --root umbrella > .mrconfig

    # Only repositories you have committed to
    glscope mrconfig --contributed > .mrconfig"
    )]
    Mrconfig {
        /// Group (or user) selector; empty means every visible project
        #[arg(short, long, default_value = "", value_name = "QUERY")]
        group: String,

        /// Only projects created by you
        #[arg(long, conflicts_with = "contributed")]
        mine: bool,

        /// Only projects you have committed to
        #[arg(long)]
        contributed: bool,

        /// Bare path of the project to promote as the root checkout
        #[arg(long, value_name = "PATH")]
        root: Option<String>,
    },

    /// Create one or more projects
    #[command(
        name = "create",
        long_about = "Create one or more projects.\n\n\
            Projects are created in the namespace resolved from --group, or \
            in your personal namespace when no group is given. Each create is \
            independent: a name that already exists fails that create and the \
            rest proceed."
    )]
    Create {
        /// Project names
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,

        /// Namespace selector; empty means your personal namespace
        #[arg(short, long, default_value = "", value_name = "QUERY")]
        group: String,

        /// Project visibility: private, internal, or public
        #[arg(long, default_value = "private", value_name = "LEVEL")]
        visibility: Visibility,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
