//! gitlab::rest
//!
//! GitLab REST API (v4) implementation of [`GitLabApi`].
//!
//! # Design
//!
//! One `reqwest::Client` per instance, a static `PRIVATE-TOKEN` header, and a
//! single paginated-GET helper that every listing method goes through. Wire
//! types are private serde structs converted into the domain records from
//! [`traits`](super::traits); the rest of the crate never sees raw JSON.
//!
//! # Pagination
//!
//! GitLab paginates with `page`/`per_page` query parameters. The client
//! requests pages of [`PER_PAGE`] until a short page arrives, so callers
//! always receive the complete sequence.
//!
//! # Errors
//!
//! Transport failures map to `ApiError::RemoteUnavailable`; HTTP statuses map
//! per [`error_from_status`]. The commits endpoint additionally folds `404`
//! into `ApiError::NoRepository`, because that is what GitLab answers for a
//! project whose repository is empty or unreadable.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::traits::{
    ApiError, CommitRecord, CreateProjectRequest, GitLabApi, GroupRecord, Namespace,
    NamespaceKind, ProjectRecord, UserRecord,
};
use async_trait::async_trait;

/// Default GitLab API base URL.
pub const DEFAULT_API_BASE: &str = "https://gitlab.com/api/v4";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "glscope-cli";

/// Page size used for every listing request.
const PER_PAGE: usize = 100;

/// GitLab REST API client.
///
/// Works against gitlab.com by default; pass a custom base URL for
/// self-hosted instances.
pub struct RestApi {
    /// HTTP client for making requests
    client: Client,
    /// Personal access token
    token: String,
    /// API base URL, e.g. `https://gitlab.example.com/api/v4`
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for RestApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApi")
            .field("has_token", &!self.token.is_empty())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl RestApi {
    /// Create a client against the default gitlab.com API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Create a client with a custom API base URL.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token
    /// * `api_base` - Base URL including the `/api/v4` suffix
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        while api_base.ends_with('/') {
            api_base.pop();
        }
        Self {
            client: Client::new(),
            token: token.into(),
            api_base,
        }
    }

    /// Get the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "PRIVATE-TOKEN",
            HeaderValue::from_str(&self.token)
                .map_err(|_| ApiError::AuthFailed("token contains invalid characters".into()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    /// Build a URL under the API base.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    /// GET a single resource.
    async fn get_one<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(self.url(path))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;
        handle_response(response).await
    }

    /// GET a listing, exhausting pagination.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ApiError> {
        let mut out = Vec::new();
        let mut page = 1usize;
        loop {
            let response = self
                .client
                .get(self.url(path))
                .headers(self.headers()?)
                .query(query)
                .query(&[("page", page.to_string()), ("per_page", PER_PAGE.to_string())])
                .send()
                .await
                .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;

            let batch: Vec<T> = handle_response(response).await?;
            let len = batch.len();
            out.extend(batch);
            if len < PER_PAGE {
                return Ok(out);
            }
            page += 1;
        }
    }
}

/// Handle an API response, mapping errors appropriately.
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        response.json().await.map_err(|e| ApiError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })
    } else {
        let message = error_message(response).await;
        Err(error_from_status(status, message))
    }
}

/// Extract the error message from a failed response body.
///
/// GitLab error bodies are `{"message": ...}` or `{"error": ...}`, where the
/// payload may be a string or a structured object (field validation errors).
async fn error_message(response: Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: Option<serde_json::Value>,
        error: Option<serde_json::Value>,
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => match body.message.or(body.error) {
            Some(serde_json::Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        },
        Err(_) => "unknown error".to_string(),
    }
}

/// Map an HTTP status to the error taxonomy.
fn error_from_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::AuthFailed("invalid or expired token".into()),
        StatusCode::FORBIDDEN => ApiError::AuthFailed(format!("permission denied: {}", message)),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::CONFLICT => ApiError::Conflict(message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

// --------------------------------------------------------------------------
// Wire types
// --------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RestGroup {
    id: u64,
    path: String,
}

impl From<RestGroup> for GroupRecord {
    fn from(g: RestGroup) -> Self {
        GroupRecord {
            id: g.id,
            path: g.path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestUser {
    id: u64,
    username: String,
}

impl From<RestUser> for UserRecord {
    fn from(u: RestUser) -> Self {
        UserRecord {
            id: u.id,
            username: u.username,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestProject {
    id: u64,
    path: String,
    path_with_namespace: String,
    ssh_url_to_repo: String,
    creator_id: Option<u64>,
}

impl From<RestProject> for ProjectRecord {
    fn from(p: RestProject) -> Self {
        ProjectRecord {
            id: p.id,
            path: p.path,
            path_with_namespace: p.path_with_namespace,
            ssh_url: p.ssh_url_to_repo,
            creator_id: p.creator_id,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestCommit {
    committer_email: String,
}

impl From<RestCommit> for CommitRecord {
    fn from(c: RestCommit) -> Self {
        CommitRecord {
            committer_email: c.committer_email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RestEmail {
    email: String,
}

#[derive(Debug, Serialize)]
struct CreateProjectBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace_id: Option<u64>,
    visibility: String,
}

#[async_trait]
impl GitLabApi for RestApi {
    async fn search_groups(&self, query: &str) -> Result<Vec<GroupRecord>, ApiError> {
        let groups: Vec<RestGroup> = self
            .get_paginated("groups", &[("search", query.to_string())])
            .await?;
        Ok(groups.into_iter().map(Into::into).collect())
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserRecord>, ApiError> {
        let users: Vec<RestUser> = self
            .get_paginated("users", &[("search", query.to_string())])
            .await?;
        Ok(users.into_iter().map(Into::into).collect())
    }

    async fn list_namespace_projects(
        &self,
        namespace: &Namespace,
    ) -> Result<Vec<ProjectRecord>, ApiError> {
        let path = match namespace.kind {
            NamespaceKind::Group => format!("groups/{}/projects", namespace.id),
            NamespaceKind::User => format!("users/{}/projects", namespace.id),
        };
        let projects: Vec<RestProject> = self.get_paginated(&path, &[]).await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    async fn list_all_projects(&self) -> Result<Vec<ProjectRecord>, ApiError> {
        let projects: Vec<RestProject> = self.get_paginated("projects", &[]).await?;
        Ok(projects.into_iter().map(Into::into).collect())
    }

    async fn get_project(&self, id: u64) -> Result<ProjectRecord, ApiError> {
        let project: RestProject = self.get_one(&format!("projects/{}", id)).await?;
        Ok(project.into())
    }

    async fn list_commits(&self, project_id: u64) -> Result<Vec<CommitRecord>, ApiError> {
        let result: Result<Vec<RestCommit>, ApiError> = self
            .get_paginated(&format!("projects/{}/repository/commits", project_id), &[])
            .await;
        match result {
            Ok(commits) => Ok(commits.into_iter().map(Into::into).collect()),
            // GitLab answers 404 for empty or unreadable repositories.
            Err(ApiError::NotFound(message)) => Err(ApiError::NoRepository(message)),
            Err(e) => Err(e),
        }
    }

    async fn current_user(&self) -> Result<UserRecord, ApiError> {
        let user: RestUser = self.get_one("user").await?;
        Ok(user.into())
    }

    async fn current_user_emails(&self) -> Result<Vec<String>, ApiError> {
        let emails: Vec<RestEmail> = self.get_paginated("user/emails", &[]).await?;
        Ok(emails.into_iter().map(|e| e.email).collect())
    }

    async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> Result<ProjectRecord, ApiError> {
        let body = CreateProjectBody {
            name: &request.name,
            namespace_id: request.namespace_id,
            visibility: request.visibility.to_string(),
        };

        let response = self
            .client
            .post(self.url("projects"))
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // GitLab reports "name has already been taken" as a 400.
            let message = error_message(response).await;
            return Err(ApiError::Conflict(message));
        }

        let project: RestProject = handle_response(response).await?;
        Ok(project.into())
    }
}
