//! Integration tests for the HTTP client.
//!
//! A local wiremock server stands in for api.github.com, so these exercise
//! the real request, retry and decoding paths without network access.

use forkindex::core::types::RepoKey;
use forkindex::forks::Discovery;
use forkindex::github::{ApiError, Credentials, ForkApi, GitHubClient};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repo_json(owner: &str, name: &str, stars: u64, forks: u64) -> Value {
    json!({
        "id": 1,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "owner": { "login": owner, "id": 1 },
        "html_url": format!("https://github.com/{}/{}", owner, name),
        "clone_url": format!("https://github.com/{}/{}.git", owner, name),
        "git_url": format!("git://github.com/{}/{}.git", owner, name),
        "ssh_url": format!("git@github.com:{}/{}.git", owner, name),
        "stargazers_count": stars,
        "forks_count": forks,
        "fork": false
    })
}

fn rate_limit_json(remaining: u64, reset: i64) -> Value {
    json!({
        "resources": {
            "core": { "limit": 60, "remaining": remaining, "reset": reset, "used": 60 }
        },
        "rate": { "limit": 60, "remaining": remaining, "reset": reset, "used": 60 }
    })
}

fn rate_limited() -> ResponseTemplate {
    ResponseTemplate::new(403)
        .insert_header("X-RateLimit-Remaining", "0")
        .set_body_json(json!({ "message": "API rate limit exceeded" }))
}

/// Quota endpoint reporting a reset in the past, so waits are skipped.
/// The server checks on drop that it was asked exactly `times` times.
async fn mount_expired_rate_limit(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rate_limit_json(0, 0)))
        .expect(times)
        .mount(server)
        .await;
}

/// Quota endpoint with plenty left.
async fn mount_rate_limit(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rate_limit"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(rate_limit_json(4999, 1_700_000_000)),
        )
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> GitHubClient {
    GitHubClient::with_api_base(None, server.uri())
}

mod fetch {
    use super::*;

    #[tokio::test]
    async fn ok_returns_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .and(header("accept", "application/vnd.github+json"))
            .and(header("user-agent", "forkindex"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 80, 9)))
            .expect(1)
            .mount(&server)
            .await;

        let fetched = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap();

        assert_eq!(fetched.value.owner, "octocat");
        assert_eq!(fetched.value.name, "hello");
        assert_eq!(fetched.value.star_count, 80);
        assert_eq!(fetched.value.fork_count, 9);
        assert_eq!(fetched.value.web_url, "https://github.com/octocat/hello");
        assert_eq!(
            fetched.value.clone_url_http,
            "https://github.com/octocat/hello.git"
        );
        assert!(!fetched.quota_exhausted);
    }

    #[tokio::test]
    async fn retries_after_rate_limit() {
        let server = MockServer::start().await;
        mount_expired_rate_limit(&server, 1).await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(rate_limited())
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 1, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let fetched = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap();

        assert_eq!(fetched.value.name, "hello");
    }

    #[tokio::test]
    async fn gives_up_after_three_rate_limited_attempts() {
        let server = MockServer::start().await;
        mount_expired_rate_limit(&server, 3).await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(rate_limited())
            .expect(3)
            .mount(&server)
            .await;

        let err = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn plain_forbidden_is_not_retried() {
        let server = MockServer::start().await;
        mount_expired_rate_limit(&server, 0).await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(403).insert_header("X-RateLimit-Remaining", "12"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn not_found_fails_immediately() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server)
            .repository(&RepoKey::new("octocat", "missing"))
            .await
            .unwrap_err();

        match err {
            ApiError::Http { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/repos/octocat/missing"));
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Malformed { .. }));
    }

    #[tokio::test]
    async fn sends_basic_auth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .and(header("authorization", "Basic b2N0b2NhdDp0b2s="))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 1, 0)))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GitHubClient::with_api_base(Some(Credentials::parse("octocat:tok")), server.uri());
        client
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reports_exhausted_quota_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-RateLimit-Remaining", "0")
                    .set_body_json(repo_json("octocat", "hello", 1, 0)),
            )
            .mount(&server)
            .await;

        let fetched = client(&server)
            .repository(&RepoKey::new("octocat", "hello"))
            .await
            .unwrap();

        assert!(fetched.quota_exhausted);
    }
}

mod rate_limit {
    use super::*;

    #[tokio::test]
    async fn reads_core_quota() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(rate_limit_json(42, 1_700_000_000)),
            )
            .mount(&server)
            .await;

        let status = client(&server).rate_limit().await.unwrap();

        assert_eq!(status.remaining, 42);
        assert_eq!(status.reset, 1_700_000_000);
    }

    #[tokio::test]
    async fn error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client(&server).rate_limit().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
    }
}

mod discovery {
    use super::*;

    #[tokio::test]
    async fn direct_forks_are_paged_until_empty() {
        let server = MockServer::start().await;
        mount_rate_limit(&server).await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 10, 2)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("per_page", "100"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                repo_json("alice", "hello", 3, 0),
                repo_json("bob", "hello", 1, 0),
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let repos = Discovery::new(&client, RepoKey::new("octocat", "hello"), false)
            .collect_all()
            .await
            .unwrap();

        let owners: Vec<_> = repos.iter().map(|r| r.owner.as_str()).collect();
        assert_eq!(owners, vec!["octocat", "alice", "bob"]);
    }

    #[tokio::test]
    async fn exhausted_page_waits_before_next_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rate_limit_json(0, 0)))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 10, 1)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-RateLimit-Remaining", "0")
                    .set_body_json(json!([repo_json("alice", "hello", 3, 0)])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client(&server);
        let repos = Discovery::new(&client, RepoKey::new("octocat", "hello"), false)
            .collect_all()
            .await
            .unwrap();

        assert_eq!(repos.len(), 2);
    }

    #[tokio::test]
    async fn recursive_skips_leaf_forks() {
        let server = MockServer::start().await;
        mount_rate_limit(&server).await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("octocat", "hello", 10, 2)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                repo_json("alice", "hello", 3, 1),
                repo_json("bob", "hello", 1, 0),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/hello/forks"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("alice", "hello", 3, 1)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/hello/forks"))
            .and(query_param("page", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([repo_json("carol", "hello", 0, 0)])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/hello/forks"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/bob/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("bob", "hello", 1, 0)))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        let repos = Discovery::new(&client, RepoKey::new("octocat", "hello"), true)
            .collect_all()
            .await
            .unwrap();

        let mut owners: Vec<_> = repos.iter().map(|r| r.owner.clone()).collect();
        owners.sort();
        assert_eq!(owners, vec!["alice", "bob", "carol", "octocat"]);
    }
}
