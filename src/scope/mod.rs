//! scope
//!
//! The project discovery and filtering engine.
//!
//! # Architecture
//!
//! Four stages, each a pure function over the [`GitLabApi`] capability:
//!
//! - [`resolver`]: group selector → namespace set (user-search fallback)
//! - [`collector`]: namespace set → deduplicated project set
//! - [`filter`]: project set → subset matching a creator or committer identity
//! - [`render`]: project set → listing lines or checkout-config stanzas
//!
//! [`assemble`] chains the first three and is what command handlers call;
//! rendering stays separate because the create flow needs a resolved
//! namespace without rendering anything.
//!
//! [`GitLabApi`]: crate::gitlab::GitLabApi

pub mod collector;
pub mod filter;
pub mod render;
pub mod resolver;

use std::sync::Arc;

use thiserror::Error;

use crate::gitlab::{ApiError, GitLabApi, ProjectRecord};
use filter::{FilterOutcome, IdentityFilter};
use resolver::Resolution;

pub use filter::DEFAULT_CONCURRENCY;

/// Errors from scope assembly.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// The selector matched neither a group nor a user. Listing everything
    /// instead would silently widen the scope, so this aborts.
    #[error("no group or user matches '{0}'")]
    UnresolvedNamespace(String),

    /// The remote API failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// How the scope should be narrowed by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// No identity filtering.
    None,
    /// Projects created by the authenticated user.
    Mine,
    /// Projects the authenticated user has committed to.
    Contributed,
}

/// Parameters for scope assembly.
#[derive(Debug, Clone)]
pub struct ScopeRequest {
    /// Group selector; empty means no namespace restriction.
    pub group_query: String,
    /// Identity narrowing mode.
    pub identity: IdentityMode,
    /// Width of the concurrent commit-scan pool.
    pub concurrency: usize,
}

/// An assembled scope plus the diagnostics produced along the way.
#[derive(Debug, Clone)]
pub struct ScopeOutcome {
    /// The resolved, deduplicated, filtered projects.
    pub projects: Vec<ProjectRecord>,
    /// Warnings for the caller to surface (ambiguous selector, skipped
    /// projects). Never fatal.
    pub warnings: Vec<String>,
}

/// Run resolve → collect → filter.
///
/// # Errors
///
/// - [`ScopeError::UnresolvedNamespace`] when a non-empty selector matches
///   nothing
/// - [`ScopeError::Api`] when the remote is unusable
pub async fn assemble(
    api: Arc<dyn GitLabApi>,
    request: &ScopeRequest,
) -> Result<ScopeOutcome, ScopeError> {
    let Resolution {
        namespaces,
        mut warnings,
    } = resolver::resolve(api.as_ref(), &request.group_query).await?;

    if namespaces.is_empty() && !request.group_query.is_empty() {
        return Err(ScopeError::UnresolvedNamespace(request.group_query.clone()));
    }

    let projects = collector::collect(api.as_ref(), &namespaces).await?;

    let identity = match request.identity {
        IdentityMode::None => IdentityFilter::None,
        IdentityMode::Mine => {
            let user = api.current_user().await?;
            IdentityFilter::Mine { user_id: user.id }
        }
        IdentityMode::Contributed => {
            let emails = api.current_user_emails().await?;
            IdentityFilter::Contributed {
                emails: emails.into_iter().collect(),
            }
        }
    };

    let FilterOutcome { projects, skipped } =
        filter::filter(api, projects, &identity, request.concurrency).await?;
    for skip in skipped {
        warnings.push(format!(
            "skipping {}: {} (no readable commit history)",
            skip.path, skip.reason
        ));
    }

    Ok(ScopeOutcome { projects, warnings })
}
