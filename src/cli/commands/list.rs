//! list command - print the projects in a scope

use anyhow::Result;

use super::assemble_scope;
use crate::cli::Context;
use crate::scope::render::{render, RenderMode, RenderOptions};

/// List the projects in a scope, one per line.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `group` - Group/user selector; empty means every visible project
/// * `mine` - Restrict to projects created by the authenticated user
/// * `contributed` - Restrict to projects the authenticated user committed to
/// * `no_namespace` - Print bare paths instead of namespace-qualified ones
pub fn list(
    ctx: &Context,
    group: &str,
    mine: bool,
    contributed: bool,
    no_namespace: bool,
) -> Result<()> {
    let api = ctx.client()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let outcome = assemble_scope(ctx, api, group, mine, contributed).await?;

        let opts = RenderOptions {
            mode: RenderMode::Listing,
            root_path: None,
            show_namespace: !no_namespace && ctx.config.show_namespace(),
        };
        for line in render(&outcome.projects, &opts) {
            println!("{}", line);
        }
        Ok(())
    })
}
