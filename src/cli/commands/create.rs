//! create command - create projects in a resolved namespace

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::gitlab::{CreateProjectRequest, Visibility};
use crate::scope::resolver;
use crate::ui::output;

/// Create one or more projects.
///
/// Each create is independent: a failed name is reported and the rest
/// proceed. The command fails only when the namespace cannot be resolved or
/// every single create failed.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `names` - Project names to create
/// * `group` - Namespace selector; empty means the personal namespace
/// * `visibility` - Visibility for all created projects
pub fn create(ctx: &Context, names: &[String], group: &str, visibility: Visibility) -> Result<()> {
    let api = ctx.client()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let namespace_id = if group.is_empty() {
            None
        } else {
            let resolution = resolver::resolve(api.as_ref(), group).await?;
            match resolution.namespaces.as_slice() {
                [] => bail!("no group or user matches '{}'", group),
                [namespace] => Some(namespace.id),
                many => bail!(
                    "'{}' matches {} namespaces ({}); narrow the query before creating",
                    group,
                    many.len(),
                    many.iter()
                        .map(|ns| ns.path())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            }
        };

        let mut failures = 0usize;
        for name in names {
            let request = CreateProjectRequest {
                name: name.clone(),
                namespace_id,
                visibility,
            };
            match api.create_project(request).await {
                Ok(project) => println!("{}", project.path_with_namespace),
                Err(e) => {
                    failures += 1;
                    output::error(format!("create '{}' failed: {}", name, e));
                }
            }
        }

        if failures == names.len() {
            bail!("all {} creates failed", names.len());
        }
        if failures > 0 {
            output::warn(
                format!("{} of {} creates failed", failures, names.len()),
                ctx.verbosity,
            );
        }
        Ok(())
    })
}
