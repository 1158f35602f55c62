//! scope::resolver
//!
//! Turns a free-text group selector into a concrete namespace set.
//!
//! # Design
//!
//! Groups are searched first. When nothing matches, the same query is retried
//! against users: a user's personal projects are modeled by the platform as
//! an implicit, non-listable group, so user search is the only way to reach
//! them. Multiple group matches widen the scope to all of them; that is
//! deliberate, and a warning tells the caller how to narrow the query.

use crate::gitlab::{ApiError, GitLabApi, Namespace, NamespaceKind};

/// Result of namespace resolution.
///
/// Warnings are returned rather than printed so the caller controls where
/// diagnostics go.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// The resolved namespaces. Empty means either "no restriction" (empty
    /// query) or "nothing matched" (non-empty query); the caller tells the
    /// two apart by the query it passed.
    pub namespaces: Vec<Namespace>,
    /// Diagnostics generated during resolution.
    pub warnings: Vec<String>,
}

/// Resolve a group selector into namespaces.
///
/// An empty query resolves to an empty set, meaning "search all namespaces".
///
/// # Errors
///
/// Propagates API failures unchanged; there is no retry at this layer.
pub async fn resolve(api: &dyn GitLabApi, group_query: &str) -> Result<Resolution, ApiError> {
    if group_query.is_empty() {
        return Ok(Resolution {
            namespaces: Vec::new(),
            warnings: Vec::new(),
        });
    }

    let groups = api.search_groups(group_query).await?;
    if !groups.is_empty() {
        let mut warnings = Vec::new();
        if groups.len() > 1 {
            warnings.push(format!(
                "group search for '{}' matched {} groups ({}); using all of them, \
                 narrow the query to disambiguate",
                group_query,
                groups.len(),
                groups
                    .iter()
                    .map(|g| g.path.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        let namespaces = groups
            .into_iter()
            .map(|g| Namespace {
                id: g.id,
                path: g.path,
                kind: NamespaceKind::Group,
            })
            .collect();
        return Ok(Resolution {
            namespaces,
            warnings,
        });
    }

    // No group matched; the selector may name a user.
    let users = api.search_users(group_query).await?;
    let namespaces = users
        .into_iter()
        .map(|u| Namespace {
            id: u.id,
            path: u.username,
            kind: NamespaceKind::User,
        })
        .collect();
    Ok(Resolution {
        namespaces,
        warnings: Vec::new(),
    })
}
