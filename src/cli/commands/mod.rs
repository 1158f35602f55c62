//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Runs the scope pipeline (or the create calls) against the API client
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! Everything that talks to the remote is async. Handlers stay synchronous
//! at the signature level and `block_on` an async implementation, so `main`
//! needs no runtime of its own.

mod completion;
mod create;
mod list;
mod mrconfig;

pub use completion::completion;
pub use create::create;
pub use list::list;
pub use mrconfig::mrconfig;

use anyhow::Result;

use super::args::Command;
use super::Context;
use crate::scope::{IdentityMode, ScopeOutcome, ScopeRequest};
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List {
            group,
            mine,
            contributed,
            no_namespace,
        } => list(ctx, &group, mine, contributed, no_namespace),
        Command::Mrconfig {
            group,
            mine,
            contributed,
            root,
        } => mrconfig(ctx, &group, mine, contributed, root.as_deref()),
        Command::Create {
            names,
            group,
            visibility,
        } => create(ctx, &names, &group, visibility),
        Command::Completion { shell } => completion(shell),
    }
}

/// Map the identity flags onto a filter mode.
pub(crate) fn identity_mode(mine: bool, contributed: bool) -> IdentityMode {
    if mine {
        IdentityMode::Mine
    } else if contributed {
        IdentityMode::Contributed
    } else {
        IdentityMode::None
    }
}

/// Run the scope pipeline and surface its warnings.
pub(crate) async fn assemble_scope(
    ctx: &Context,
    api: std::sync::Arc<dyn crate::gitlab::GitLabApi>,
    group: &str,
    mine: bool,
    contributed: bool,
) -> Result<ScopeOutcome> {
    let request = ScopeRequest {
        group_query: group.to_string(),
        identity: identity_mode(mine, contributed),
        concurrency: ctx.config.concurrency(),
    };
    output::debug(
        format!(
            "assembling scope: group='{}' identity={:?} concurrency={}",
            request.group_query, request.identity, request.concurrency
        ),
        ctx.verbosity,
    );

    let outcome = crate::scope::assemble(api, &request).await?;
    for warning in &outcome.warnings {
        output::warn(warning, ctx.verbosity);
    }
    Ok(outcome)
}
