//! scope::collector
//!
//! Gathers the candidate project set for the resolved namespaces.
//!
//! # Design
//!
//! With no namespaces the collector lists everything visible to the
//! authenticated identity. Otherwise it unions the direct projects of each
//! namespace, deduplicating by project id: overlapping group and user search
//! results can legitimately reach the same project twice. First occurrence
//! wins and insertion order is preserved; final ordering belongs to the
//! renderer.

use std::collections::HashSet;

use crate::gitlab::{ApiError, GitLabApi, Namespace, ProjectRecord};

/// Collect the projects reachable through `namespaces`.
///
/// An empty slice means "no namespace restriction".
///
/// # Errors
///
/// Any listing failure aborts the collection; a partial union would silently
/// shrink the scope.
pub async fn collect(
    api: &dyn GitLabApi,
    namespaces: &[Namespace],
) -> Result<Vec<ProjectRecord>, ApiError> {
    if namespaces.is_empty() {
        return api.list_all_projects().await;
    }

    let mut seen: HashSet<u64> = HashSet::new();
    let mut projects = Vec::new();
    for namespace in namespaces {
        for project in api.list_namespace_projects(namespace).await? {
            if seen.insert(project.id) {
                projects.push(project);
            }
        }
    }
    Ok(projects)
}
