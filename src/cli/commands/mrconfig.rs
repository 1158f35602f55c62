//! mrconfig command - render a scope as checkout configuration

use anyhow::Result;

use super::assemble_scope;
use crate::cli::Context;
use crate::scope::render::{render, RenderMode, RenderOptions};

/// Render the scope as myrepos-style checkout stanzas.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `group` - Group/user selector; empty means every visible project
/// * `mine` - Restrict to projects created by the authenticated user
/// * `contributed` - Restrict to projects the authenticated user committed to
/// * `root` - Bare path of the project to promote under the `.` key
pub fn mrconfig(
    ctx: &Context,
    group: &str,
    mine: bool,
    contributed: bool,
    root: Option<&str>,
) -> Result<()> {
    let api = ctx.client()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let outcome = assemble_scope(ctx, api, group, mine, contributed).await?;

        let opts = RenderOptions {
            mode: RenderMode::CheckoutConfig,
            root_path: root.map(|r| r.to_string()),
            show_namespace: true,
        };
        for line in render(&outcome.projects, &opts) {
            println!("{}", line);
        }
        Ok(())
    })
}
