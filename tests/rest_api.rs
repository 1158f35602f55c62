//! Integration tests for the REST client against a stubbed HTTP server.
//!
//! These verify the things MockApi cannot: pagination exhaustion, request
//! headers, and the mapping from HTTP statuses to the error taxonomy.

use glscope::gitlab::rest::RestApi;
use glscope::gitlab::{ApiError, CreateProjectRequest, GitLabApi, Namespace, NamespaceKind, Visibility};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "path": name,
        "path_with_namespace": format!("infra/{}", name),
        "ssh_url_to_repo": format!("git@gitlab.example.com:infra/{}.git", name),
        "creator_id": 7,
        "web_url": format!("https://gitlab.example.com/infra/{}", name)
    })
}

fn api_for(server: &MockServer) -> RestApi {
    RestApi::with_api_base("test-token", server.uri())
}

mod pagination {
    use super::*;

    #[tokio::test]
    async fn exhausts_pages_until_a_short_one() {
        let server = MockServer::start().await;
        let page1: Vec<Value> = (0..100).map(|i| project_json(i, &format!("p{}", i))).collect();
        let page2: Vec<Value> = (100..103).map(|i| project_json(i, &format!("p{}", i))).collect();

        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
            .mount(&server)
            .await;

        let projects = api_for(&server).list_all_projects().await.unwrap();
        assert_eq!(projects.len(), 103);
        assert_eq!(projects[102].path, "p102");
    }

    #[tokio::test]
    async fn single_short_page_needs_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![project_json(1, "only")]))
            .expect(1)
            .mount(&server)
            .await;

        let projects = api_for(&server).list_all_projects().await.unwrap();
        assert_eq!(projects.len(), 1);
    }
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn sends_private_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("PRIVATE-TOKEN", "test-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": 7, "username": "alice"})),
            )
            .mount(&server)
            .await;

        let user = api_for(&server).current_user().await.unwrap();
        assert_eq!(user.username, "alice");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_auth_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "401 Unauthorized"})),
            )
            .mount(&server)
            .await;

        let result = api_for(&server).current_user().await;
        assert!(matches!(result, Err(ApiError::AuthFailed(_))));
    }
}

mod queries {
    use super::*;

    #[tokio::test]
    async fn group_search_passes_the_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups"))
            .and(query_param("search", "infra"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 3, "path": "infra"}])),
            )
            .mount(&server)
            .await;

        let groups = api_for(&server).search_groups("infra").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].path, "infra");
    }

    #[tokio::test]
    async fn namespace_kind_selects_the_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/groups/3/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![project_json(1, "app")]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/9/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![project_json(2, "dots")]))
            .mount(&server)
            .await;

        let api = api_for(&server);
        let group_ns = Namespace {
            id: 3,
            path: "infra".into(),
            kind: NamespaceKind::Group,
        };
        let user_ns = Namespace {
            id: 9,
            path: "alice".into(),
            kind: NamespaceKind::User,
        };
        assert_eq!(api.list_namespace_projects(&group_ns).await.unwrap()[0].id, 1);
        assert_eq!(api.list_namespace_projects(&user_ns).await.unwrap()[0].id, 2);
    }

    #[tokio::test]
    async fn user_emails_unwrap_to_addresses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/emails"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "email": "a@example.com"},
                {"id": 2, "email": "b@example.com"}
            ])))
            .mount(&server)
            .await;

        let emails = api_for(&server).current_user_emails().await.unwrap();
        assert_eq!(emails, vec!["a@example.com", "b@example.com"]);
    }
}

mod commits {
    use super::*;

    #[tokio::test]
    async fn lists_committer_emails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "abc", "committer_email": "x@y.com"},
                {"id": "def", "committer_email": "z@y.com"}
            ])))
            .mount(&server)
            .await;

        let commits = api_for(&server).list_commits(42).await.unwrap();
        assert_eq!(commits[0].committer_email, "x@y.com");
    }

    #[tokio::test]
    async fn missing_repository_maps_to_no_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/42/repository/commits"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"message": "404 Repository Not Found"})),
            )
            .mount(&server)
            .await;

        let result = api_for(&server).list_commits(42).await;
        assert!(matches!(result, Err(ApiError::NoRepository(_))));
    }
}

mod creation {
    use super::*;

    #[tokio::test]
    async fn posts_name_and_visibility() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .and(body_partial_json(json!({"name": "app", "visibility": "internal"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(project_json(50, "app")))
            .mount(&server)
            .await;

        let created = api_for(&server)
            .create_project(CreateProjectRequest {
                name: "app".into(),
                namespace_id: None,
                visibility: Visibility::Internal,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 50);
    }

    #[tokio::test]
    async fn taken_name_maps_to_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/projects"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"message": {"name": ["has already been taken"]}}),
            ))
            .mount(&server)
            .await;

        let result = api_for(&server)
            .create_project(CreateProjectRequest {
                name: "app".into(),
                namespace_id: Some(3),
                visibility: Visibility::Private,
            })
            .await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }
}

mod transport {
    use super::*;

    #[tokio::test]
    async fn unreachable_remote_is_remote_unavailable() {
        // Nothing listens on this port.
        let api = RestApi::with_api_base("tok", "http://127.0.0.1:9/api/v4");
        let result = api.list_all_projects().await;
        assert!(matches!(result, Err(ApiError::RemoteUnavailable(_))));
    }
}
