//! gitlab::mock
//!
//! Mock API implementation for deterministic testing.
//!
//! # Design
//!
//! The mock stores groups, users, projects, and commit histories in memory
//! and allows configuring failure scenarios per operation. It records every
//! call so tests can assert on interaction order (e.g. that a user search
//! only happens after an empty group search).
//!
//! # Example
//!
//! ```
//! use glscope::gitlab::mock::MockApi;
//! use glscope::gitlab::{GitLabApi, GroupRecord};
//!
//! # tokio_test::block_on(async {
//! let api = MockApi::new();
//! api.add_group(3, "infra");
//!
//! let groups = api.search_groups("infra").await.unwrap();
//! assert_eq!(groups, vec![GroupRecord { id: 3, path: "infra".into() }]);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    ApiError, CommitRecord, CreateProjectRequest, GitLabApi, GroupRecord, Namespace,
    NamespaceKind, ProjectRecord, UserRecord,
};

/// Mock API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone)]
pub struct MockApi {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockApiInner>>,
}

/// Internal mutable state.
#[derive(Debug)]
struct MockApiInner {
    /// Known groups, in search-result order.
    groups: Vec<GroupRecord>,
    /// Known users, in search-result order.
    users: Vec<UserRecord>,
    /// Projects listed per namespace (id, kind).
    namespace_projects: HashMap<(u64, NamespaceKind), Vec<ProjectRecord>>,
    /// Projects returned by the unrestricted listing.
    all_projects: Vec<ProjectRecord>,
    /// Canonical records by project id.
    projects_by_id: HashMap<u64, ProjectRecord>,
    /// Commit history per project id; a missing entry means no repository.
    commits: HashMap<u64, Vec<CommitRecord>>,
    /// The authenticated user.
    current_user: UserRecord,
    /// Registered emails of the authenticated user.
    emails: Vec<String>,
    /// Next id handed out by create_project.
    next_project_id: u64,
    /// Operation to fail (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail search_groups with the given error.
    SearchGroups(ApiError),
    /// Fail search_users with the given error.
    SearchUsers(ApiError),
    /// Fail list_namespace_projects with the given error.
    ListNamespaceProjects(ApiError),
    /// Fail list_all_projects with the given error.
    ListAllProjects(ApiError),
    /// Fail get_project with the given error.
    GetProject(ApiError),
    /// Fail list_commits with the given error.
    ListCommits(ApiError),
    /// Fail create_project with the given error.
    CreateProject(ApiError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    SearchGroups { query: String },
    SearchUsers { query: String },
    ListNamespaceProjects { id: u64, kind: NamespaceKind },
    ListAllProjects,
    GetProject { id: u64 },
    ListCommits { project_id: u64 },
    CurrentUser,
    CurrentUserEmails,
    CreateProject { name: String, namespace_id: Option<u64> },
}

/// Build a project record the way namespace listings return them.
///
/// The record is lightweight (`creator_id: None`); tests that need a creator
/// set it on the returned value.
pub fn project(id: u64, namespace: &str, path: &str) -> ProjectRecord {
    ProjectRecord {
        id,
        path: path.to_string(),
        path_with_namespace: format!("{}/{}", namespace, path),
        ssh_url: format!("git@gitlab.com:{}/{}.git", namespace, path),
        creator_id: None,
    }
}

impl MockApi {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockApiInner {
                groups: Vec::new(),
                users: Vec::new(),
                namespace_projects: HashMap::new(),
                all_projects: Vec::new(),
                projects_by_id: HashMap::new(),
                commits: HashMap::new(),
                current_user: UserRecord {
                    id: 1,
                    username: "tester".to_string(),
                },
                emails: Vec::new(),
                next_project_id: 1000,
                fail_on: None,
                operations: Vec::new(),
            })),
        }
    }

    /// Register a group visible to group search.
    pub fn add_group(&self, id: u64, path: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.groups.push(GroupRecord {
            id,
            path: path.to_string(),
        });
    }

    /// Register a user visible to user search.
    pub fn add_user(&self, id: u64, username: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.users.push(UserRecord {
            id,
            username: username.to_string(),
        });
    }

    /// Attach a project to a namespace listing (and make it fetchable by id).
    pub fn add_namespace_project(&self, ns_id: u64, kind: NamespaceKind, record: ProjectRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .projects_by_id
            .entry(record.id)
            .or_insert_with(|| record.clone());
        inner
            .namespace_projects
            .entry((ns_id, kind))
            .or_default()
            .push(record);
    }

    /// Add a project to the unrestricted listing (and by-id lookup).
    pub fn add_project(&self, record: ProjectRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.projects_by_id.insert(record.id, record.clone());
        inner.all_projects.push(record);
    }

    /// Replace the canonical record for a project id.
    ///
    /// Lets tests hand out a lightweight record from a listing while
    /// `get_project` returns the full one.
    pub fn set_canonical(&self, record: ProjectRecord) {
        let mut inner = self.inner.lock().unwrap();
        inner.projects_by_id.insert(record.id, record);
    }

    /// Give a project a commit history. Projects without one report
    /// `NoRepository` from `list_commits`.
    pub fn set_commits(&self, project_id: u64, committer_emails: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.commits.insert(
            project_id,
            committer_emails
                .iter()
                .map(|e| CommitRecord {
                    committer_email: e.to_string(),
                })
                .collect(),
        );
    }

    /// Set the authenticated user.
    pub fn set_current_user(&self, id: u64, username: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.current_user = UserRecord {
            id,
            username: username.to_string(),
        };
    }

    /// Set the authenticated user's registered emails.
    pub fn set_emails(&self, emails: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        inner.emails = emails.iter().map(|e| e.to_string()).collect();
    }

    /// Configure one operation to fail.
    pub fn set_fail_on(&self, fail_on: FailOn) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on = Some(fail_on);
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    fn record(&self, op: MockOperation) {
        self.inner.lock().unwrap().operations.push(op);
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitLabApi for MockApi {
    async fn search_groups(&self, query: &str) -> Result<Vec<GroupRecord>, ApiError> {
        self.record(MockOperation::SearchGroups {
            query: query.to_string(),
        });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::SearchGroups(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner
            .groups
            .iter()
            .filter(|g| g.path.contains(query))
            .cloned()
            .collect())
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserRecord>, ApiError> {
        self.record(MockOperation::SearchUsers {
            query: query.to_string(),
        });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::SearchUsers(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner
            .users
            .iter()
            .filter(|u| u.username.contains(query))
            .cloned()
            .collect())
    }

    async fn list_namespace_projects(
        &self,
        namespace: &Namespace,
    ) -> Result<Vec<ProjectRecord>, ApiError> {
        self.record(MockOperation::ListNamespaceProjects {
            id: namespace.id,
            kind: namespace.kind,
        });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::ListNamespaceProjects(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner
            .namespace_projects
            .get(&(namespace.id, namespace.kind))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_all_projects(&self) -> Result<Vec<ProjectRecord>, ApiError> {
        self.record(MockOperation::ListAllProjects);
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::ListAllProjects(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        Ok(inner.all_projects.clone())
    }

    async fn get_project(&self, id: u64) -> Result<ProjectRecord, ApiError> {
        self.record(MockOperation::GetProject { id });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::GetProject(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        inner
            .projects_by_id
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("project {}", id)))
    }

    async fn list_commits(&self, project_id: u64) -> Result<Vec<CommitRecord>, ApiError> {
        self.record(MockOperation::ListCommits { project_id });
        let inner = self.inner.lock().unwrap();
        if let Some(FailOn::ListCommits(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        inner
            .commits
            .get(&project_id)
            .cloned()
            .ok_or_else(|| ApiError::NoRepository(format!("project {}", project_id)))
    }

    async fn current_user(&self) -> Result<UserRecord, ApiError> {
        self.record(MockOperation::CurrentUser);
        Ok(self.inner.lock().unwrap().current_user.clone())
    }

    async fn current_user_emails(&self) -> Result<Vec<String>, ApiError> {
        self.record(MockOperation::CurrentUserEmails);
        Ok(self.inner.lock().unwrap().emails.clone())
    }

    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<ProjectRecord, ApiError> {
        self.record(MockOperation::CreateProject {
            name: request.name.clone(),
            namespace_id: request.namespace_id,
        });
        let mut inner = self.inner.lock().unwrap();
        if let Some(FailOn::CreateProject(e)) = &inner.fail_on {
            return Err(e.clone());
        }
        if inner
            .projects_by_id
            .values()
            .any(|p| p.path == request.name)
        {
            return Err(ApiError::Conflict(format!(
                "name '{}' has already been taken",
                request.name
            )));
        }
        let id = inner.next_project_id;
        inner.next_project_id += 1;
        let namespace = match request.namespace_id {
            Some(ns) => format!("ns-{}", ns),
            None => inner.current_user.username.clone(),
        };
        let record = ProjectRecord {
            id,
            path: request.name.clone(),
            path_with_namespace: format!("{}/{}", namespace, request.name),
            ssh_url: format!("git@gitlab.com:{}/{}.git", namespace, request.name),
            creator_id: Some(inner.current_user.id),
        };
        inner.projects_by_id.insert(id, record.clone());
        inner.all_projects.push(record.clone());
        Ok(record)
    }
}
