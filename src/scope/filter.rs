//! scope::filter
//!
//! Narrows a project set to those created by, or committed to by, a target
//! identity.
//!
//! # Design
//!
//! Each project is judged by a pure predicate, so the per-project scans are
//! independent and run concurrently on a bounded set of tasks. Every verdict
//! is stored under its input index and the surviving projects are reassembled
//! in input order, so the outcome is identical for any concurrency width.
//!
//! The committer check is the expensive path: one commit listing per project.
//! A project whose repository is missing or unreadable does not pass and does
//! not abort the run; it is reported in the outcome so the caller can warn.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinSet;

use crate::gitlab::{ApiError, GitLabApi, ProjectRecord};

/// Default width of the concurrent scan pool.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// The identity to filter by.
///
/// The supported flows supply exactly one of the two identity forms;
/// `None` is the identity function.
#[derive(Debug, Clone)]
pub enum IdentityFilter {
    /// No filtering.
    None,
    /// Keep projects created by this user.
    Mine {
        /// Numeric id of the authenticated user.
        user_id: u64,
    },
    /// Keep projects with at least one commit by any of these addresses.
    Contributed {
        /// Committer email addresses.
        emails: BTreeSet<String>,
    },
}

/// A project excluded because its history could not be read.
#[derive(Debug, Clone)]
pub struct SkippedProject {
    /// Namespace-qualified path of the project.
    pub path: String,
    /// Why the scan was impossible.
    pub reason: String,
}

/// Result of a filter run.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Projects that passed, in input order.
    pub projects: Vec<ProjectRecord>,
    /// Projects skipped because they have no readable repository.
    pub skipped: Vec<SkippedProject>,
}

/// Per-project decision.
#[derive(Debug)]
enum Verdict {
    Pass,
    Fail,
    Skip(String),
}

/// Filter `projects` by `identity`, scanning up to `concurrency` projects at
/// a time.
///
/// # Errors
///
/// Per-project `NoRepository` conditions are absorbed into the outcome. Any
/// other API failure aborts the filter: it means the remote is unusable, and
/// a partial answer would be indistinguishable from a correct one. When
/// several scans fail, the error reported is the one for the earliest input
/// project, independent of scan completion order.
pub async fn filter(
    api: Arc<dyn GitLabApi>,
    projects: Vec<ProjectRecord>,
    identity: &IdentityFilter,
    concurrency: usize,
) -> Result<FilterOutcome, ApiError> {
    if matches!(identity, IdentityFilter::None) {
        return Ok(FilterOutcome {
            projects,
            skipped: Vec::new(),
        });
    }

    let width = concurrency.max(1);
    let mut results: Vec<Option<Result<Verdict, ApiError>>> =
        (0..projects.len()).map(|_| None).collect();
    let mut tasks: JoinSet<(usize, Result<Verdict, ApiError>)> = JoinSet::new();

    for (index, project) in projects.iter().cloned().enumerate() {
        if tasks.len() >= width {
            if let Some(joined) = tasks.join_next().await {
                let (done, result) = joined.expect("commit scan task panicked");
                results[done] = Some(result);
            }
        }
        let api = Arc::clone(&api);
        let identity = identity.clone();
        tasks.spawn(async move {
            let result = verdict(api.as_ref(), &project, &identity).await;
            (index, result)
        });
    }
    while let Some(joined) = tasks.join_next().await {
        let (done, result) = joined.expect("commit scan task panicked");
        results[done] = Some(result);
    }

    let mut passed = Vec::new();
    let mut skipped = Vec::new();
    for (project, result) in projects.into_iter().zip(results) {
        match result.expect("every project receives a verdict") {
            Ok(Verdict::Pass) => passed.push(project),
            Ok(Verdict::Fail) => {}
            Ok(Verdict::Skip(reason)) => skipped.push(SkippedProject {
                path: project.path_with_namespace,
                reason,
            }),
            Err(e) => return Err(e),
        }
    }
    Ok(FilterOutcome {
        projects: passed,
        skipped,
    })
}

/// Decide whether one project passes the identity filter.
async fn verdict(
    api: &dyn GitLabApi,
    project: &ProjectRecord,
    identity: &IdentityFilter,
) -> Result<Verdict, ApiError> {
    match identity {
        IdentityFilter::None => Ok(Verdict::Pass),

        IdentityFilter::Mine { user_id } => {
            // Lightweight records from namespace listings may lack the
            // creator; the canonical record always carries it.
            let creator_id = match project.creator_id {
                Some(id) => Some(id),
                None => api.get_project(project.id).await?.creator_id,
            };
            Ok(if creator_id == Some(*user_id) {
                Verdict::Pass
            } else {
                Verdict::Fail
            })
        }

        IdentityFilter::Contributed { emails } => {
            match api.list_commits(project.id).await {
                Ok(commits) => {
                    let hit = commits
                        .iter()
                        .any(|c| emails.contains(&c.committer_email));
                    Ok(if hit { Verdict::Pass } else { Verdict::Fail })
                }
                Err(ApiError::NoRepository(reason)) => Ok(Verdict::Skip(reason)),
                Err(e) => Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gitlab::mock::{project, FailOn, MockApi, MockOperation};

    fn emails(addrs: &[&str]) -> IdentityFilter {
        IdentityFilter::Contributed {
            emails: addrs.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn api_with(projects: &[ProjectRecord]) -> (Arc<MockApi>, Vec<ProjectRecord>) {
        let api = MockApi::new();
        for p in projects {
            api.add_project(p.clone());
        }
        (Arc::new(api), projects.to_vec())
    }

    #[tokio::test]
    async fn none_is_identity() {
        let (api, projects) = api_with(&[project(1, "infra", "app"), project(2, "infra", "lib")]);

        let outcome = filter(api.clone(), projects.clone(), &IdentityFilter::None, 4)
            .await
            .unwrap();
        assert_eq!(outcome.projects, projects);
        assert!(outcome.skipped.is_empty());
        // The identity function touches nothing.
        assert!(api.operations().is_empty());
    }

    #[tokio::test]
    async fn mine_keeps_matching_creator() {
        let mut created = project(1, "infra", "app");
        created.creator_id = Some(7);
        let mut other = project(2, "infra", "lib");
        other.creator_id = Some(8);
        let (api, projects) = api_with(&[created.clone(), other]);

        let outcome = filter(
            api,
            projects,
            &IdentityFilter::Mine { user_id: 7 },
            DEFAULT_CONCURRENCY,
        )
        .await
        .unwrap();
        assert_eq!(outcome.projects, vec![created]);
    }

    #[tokio::test]
    async fn mine_refetches_lightweight_records() {
        let light = project(1, "infra", "app");
        assert_eq!(light.creator_id, None);
        let api = MockApi::new();
        api.add_project(light.clone());
        let mut canonical = light.clone();
        canonical.creator_id = Some(7);
        api.set_canonical(canonical);
        let api = Arc::new(api);

        let outcome = filter(
            api.clone(),
            vec![light],
            &IdentityFilter::Mine { user_id: 7 },
            1,
        )
        .await
        .unwrap();
        assert_eq!(outcome.projects.len(), 1);
        assert!(api
            .operations()
            .contains(&MockOperation::GetProject { id: 1 }));
    }

    #[tokio::test]
    async fn mine_skips_refetch_when_creator_present() {
        let mut full = project(1, "infra", "app");
        full.creator_id = Some(7);
        let (api, projects) = api_with(&[full]);

        filter(
            api.clone(),
            projects,
            &IdentityFilter::Mine { user_id: 7 },
            1,
        )
        .await
        .unwrap();
        assert!(!api
            .operations()
            .iter()
            .any(|op| matches!(op, MockOperation::GetProject { .. })));
    }

    #[tokio::test]
    async fn contributed_matches_committer_email() {
        let (api, projects) = api_with(&[project(1, "infra", "app"), project(2, "infra", "lib")]);
        api.set_commits(1, &["x@y.com", "other@z.com"]);
        api.set_commits(2, &["nobody@z.com"]);

        let outcome = filter(api, projects, &emails(&["x@y.com"]), DEFAULT_CONCURRENCY)
            .await
            .unwrap();
        let ids: Vec<u64> = outcome.projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[tokio::test]
    async fn missing_repository_is_skipped_not_fatal() {
        let (api, projects) = api_with(&[project(1, "infra", "app"), project(2, "infra", "fresh")]);
        api.set_commits(1, &["x@y.com"]);
        // Project 2 has no commit history at all.

        let outcome = filter(api, projects, &emails(&["x@y.com"]), DEFAULT_CONCURRENCY)
            .await
            .unwrap();
        assert_eq!(outcome.projects.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, "infra/fresh");
    }

    #[tokio::test]
    async fn other_errors_abort() {
        let (api, projects) = api_with(&[project(1, "infra", "app")]);
        api.set_fail_on(FailOn::ListCommits(ApiError::RemoteUnavailable(
            "connection reset".into(),
        )));

        let result = filter(api, projects, &emails(&["x@y.com"]), DEFAULT_CONCURRENCY).await;
        assert!(matches!(result, Err(ApiError::RemoteUnavailable(_))));
    }

    #[tokio::test]
    async fn outcome_is_independent_of_concurrency() {
        let records: Vec<ProjectRecord> =
            (1..=20).map(|i| project(i, "infra", &format!("p{}", i))).collect();
        let api = MockApi::new();
        for r in &records {
            api.add_project(r.clone());
            // Even ids contributed to, odd ids not; every third has no repo.
            if r.id % 3 == 0 {
                continue;
            }
            if r.id % 2 == 0 {
                api.set_commits(r.id, &["x@y.com"]);
            } else {
                api.set_commits(r.id, &["other@z.com"]);
            }
        }
        let api = Arc::new(api);

        let sequential = filter(api.clone(), records.clone(), &emails(&["x@y.com"]), 1)
            .await
            .unwrap();
        let concurrent = filter(api, records, &emails(&["x@y.com"]), 8)
            .await
            .unwrap();

        assert_eq!(sequential.projects, concurrent.projects);
        let seq_skipped: Vec<&str> = sequential.skipped.iter().map(|s| s.path.as_str()).collect();
        let conc_skipped: Vec<&str> = concurrent.skipped.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(seq_skipped, conc_skipped);
    }
}
