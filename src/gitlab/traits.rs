//! gitlab::traits
//!
//! The `GitLabApi` trait and the domain records it returns.
//!
//! # Design
//!
//! The trait is async because every operation involves network I/O. All
//! methods return `Result` so callers can distinguish a dead remote from a
//! per-project condition like a missing repository.
//!
//! The scope engine depends only on this trait, never on a concrete client.
//! Production uses [`RestApi`], tests use [`MockApi`].
//!
//! [`RestApi`]: crate::gitlab::rest::RestApi
//! [`MockApi`]: crate::gitlab::mock::MockApi

use async_trait::async_trait;
use thiserror::Error;

/// Errors from GitLab API operations.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The remote could not be reached at all (transport/connection failure).
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Authentication failed (missing, invalid, or insufficient token).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The project has no usable repository (empty, just created, or
    /// permission-restricted). Commit listings report this instead of
    /// `NotFound` so the contributor filter can skip the project.
    #[error("no repository: {0}")]
    NoRepository(String),

    /// Project creation clashed with an existing project or invalid name.
    /// Fatal to that single create only.
    #[error("create conflict: {0}")]
    Conflict(String),

    /// Any other API-reported failure.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },
}

/// Kind of a resolved namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// A GitLab group (including subgroups).
    Group,
    /// A user account; its personal projects form an implicit group.
    User,
}

impl std::fmt::Display for NamespaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamespaceKind::Group => write!(f, "group"),
            NamespaceKind::User => write!(f, "user"),
        }
    }
}

/// A namespace under which projects live: a group or a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Numeric id on the remote.
    pub id: u64,
    /// Path/slug of the namespace (group path or username).
    pub path: String,
    /// Whether this is a group or a user.
    pub kind: NamespaceKind,
}

impl Namespace {
    /// The namespace path, regardless of kind.
    ///
    /// Group records carry a `path`, user records a `username`; both arrive
    /// here normalized, so there is a single accessor instead of per-kind
    /// inspection at the call sites.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A group search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    /// Numeric group id.
    pub id: u64,
    /// Group path (slug).
    pub path: String,
}

/// A user search result, also the shape of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Numeric user id.
    pub id: u64,
    /// Username (login).
    pub username: String,
}

/// A project as returned by the API.
///
/// Namespace-scoped listings return lightweight records that may omit
/// `creator_id`; the canonical record from [`GitLabApi::get_project`] always
/// carries it. The scope engine treats these as immutable value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    /// Numeric project id; the dedup key across namespaces.
    pub id: u64,
    /// Bare project path (short name).
    pub path: String,
    /// Namespace-qualified path, e.g. `group/project`.
    pub path_with_namespace: String,
    /// SSH clone URL.
    pub ssh_url: String,
    /// Id of the user who created the project; absent on lightweight records.
    pub creator_id: Option<u64>,
}

/// A single commit, reduced to what the contributor filter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Committer email address.
    pub committer_email: String,
}

/// Request to create a project.
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    /// Project name (also used as the path).
    pub name: String,
    /// Namespace to create under; `None` means the authenticated user's
    /// personal namespace.
    pub namespace_id: Option<u64>,
    /// Visibility level passed straight through to the API.
    pub visibility: Visibility,
}

/// Project visibility levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Visible only to members.
    #[default]
    Private,
    /// Visible to any authenticated user.
    Internal,
    /// Visible to everyone.
    Public,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Private => write!(f, "private"),
            Visibility::Internal => write!(f, "internal"),
            Visibility::Public => write!(f, "public"),
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            "public" => Ok(Visibility::Public),
            other => Err(format!(
                "invalid visibility '{}', must be one of: private, internal, public",
                other
            )),
        }
    }
}

/// The API client capability the scope engine is built on.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the contributor filter fans
/// per-project scans out across tasks holding clones of an `Arc<dyn
/// GitLabApi>`.
///
/// # Pagination
///
/// Listing methods exhaust pagination before returning. Callers never see
/// page boundaries.
#[async_trait]
pub trait GitLabApi: Send + Sync {
    /// Search groups by name.
    ///
    /// Returns all matches; the resolver decides what multiple matches mean.
    async fn search_groups(&self, query: &str) -> Result<Vec<GroupRecord>, ApiError>;

    /// Search users by name.
    ///
    /// Used as the fallback when a group search comes back empty, because a
    /// user's personal projects are reachable only through the user itself.
    async fn search_users(&self, query: &str) -> Result<Vec<UserRecord>, ApiError>;

    /// List the direct projects of a namespace.
    ///
    /// The returned records may be lightweight (no `creator_id`).
    async fn list_namespace_projects(
        &self,
        namespace: &Namespace,
    ) -> Result<Vec<ProjectRecord>, ApiError>;

    /// List every project visible to the authenticated identity.
    async fn list_all_projects(&self) -> Result<Vec<ProjectRecord>, ApiError>;

    /// Fetch the canonical record for a project.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project does not exist
    async fn get_project(&self, id: u64) -> Result<ProjectRecord, ApiError>;

    /// List the commits of a project's default branch.
    ///
    /// # Errors
    ///
    /// - `NoRepository` if the project has no accessible repository
    async fn list_commits(&self, project_id: u64) -> Result<Vec<CommitRecord>, ApiError>;

    /// The authenticated user.
    async fn current_user(&self) -> Result<UserRecord, ApiError>;

    /// All email addresses registered for the authenticated user.
    async fn current_user_emails(&self) -> Result<Vec<String>, ApiError>;

    /// Create a project.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the name is taken or invalid
    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<ProjectRecord, ApiError>;
}
