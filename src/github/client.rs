//! github::client
//!
//! `ForkApi` implementation backed by the GitHub REST API.
//!
//! # Design
//!
//! Every read goes through [`GitHubClient::fetch`], which makes up to
//! [`MAX_ATTEMPTS`] GET requests:
//! - 200 returns immediately
//! - 403 with `X-RateLimit-Remaining: 0` waits for the quota to reset and
//!   tries again
//! - any other status fails right away
//!
//! Only quota exhaustion is retried. Other statuses and transport failures
//! (connection reset, timeout) surface as [`ApiError`] on the first
//! occurrence.
//!
//! The quota endpoint itself is read with a single plain request, so waiting
//! on the rate limit never recurses into another retry loop.
//!
//! # Authentication
//!
//! Optional HTTP basic auth, typically a username plus a personal access
//! token. Unauthenticated use works but has a much smaller quota.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::rate_limit::await_rate_limit;
use super::traits::{ApiError, Credentials, Fetched, ForkApi, RateLimitStatus};
use crate::core::types::{RepoKey, Repository};

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Attempts made by [`GitHubClient::fetch`] before giving up.
pub const MAX_ATTEMPTS: usize = 3;

/// Forks requested per page (GitHub's maximum).
pub const FORKS_PER_PAGE: u32 = 100;

/// Response header carrying the remaining request quota.
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "forkindex";

/// GitHub REST client.
pub struct GitHubClient {
    /// HTTP client, reused for every request
    client: Client,
    /// Basic-auth credentials, if any
    credentials: Option<Credentials>,
    /// API base URL without trailing slash
    api_base: String,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("has_credentials", &self.credentials.is_some())
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubClient {
    /// Create a client for api.github.com.
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self::with_api_base(credentials, DEFAULT_API_BASE)
    }

    /// Create a client for a custom API base URL.
    ///
    /// Use this for GitHub Enterprise (`https://github.example.com/api/v3`)
    /// or a local test server.
    pub fn with_api_base(credentials: Option<Credentials>, api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            client: Client::new(),
            credentials,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// The API base URL requests are sent to.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Whether requests carry basic auth.
    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    /// Build common headers for API requests.
    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers
    }

    /// URL of a repository's metadata.
    fn repo_url(&self, key: &RepoKey) -> String {
        format!("{}/repos/{}/{}", self.api_base, key.owner(), key.name())
    }

    /// URL of one page of a repository's forks.
    fn forks_url(&self, key: &RepoKey, page: u32) -> String {
        format!(
            "{}/forks?per_page={}&page={}",
            self.repo_url(key),
            FORKS_PER_PAGE,
            page
        )
    }

    /// URL of the quota status endpoint.
    fn rate_limit_url(&self) -> String {
        format!("{}/rate_limit", self.api_base)
    }

    /// Send one GET request.
    async fn send(&self, url: &str) -> Result<Response, ApiError> {
        tracing::debug!(url, "GET");

        let mut request = self.client.get(url).headers(Self::headers());
        if let Some(ref creds) = self.credentials {
            request = request.basic_auth(&creds.username, creds.password.as_deref());
        }

        request.send().await.map_err(|e| ApiError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET `url`, waiting out rate limits.
    ///
    /// # Errors
    ///
    /// - `ApiError::Http` for any non-200 status other than a rate-limited
    ///   403, or when every attempt was rate limited
    /// - `ApiError::Network` if a request could not be sent
    /// - whatever the quota request fails with while waiting
    pub async fn fetch(&self, url: &str) -> Result<Response, ApiError> {
        let mut last_status = StatusCode::FORBIDDEN;

        for attempt in 1..=MAX_ATTEMPTS {
            let response = self.send(url).await?;
            let status = response.status();

            if status == StatusCode::OK {
                return Ok(response);
            }

            if status == StatusCode::FORBIDDEN && is_rate_limited(response.headers()) {
                tracing::warn!(url, attempt, "request rate limited");
                last_status = status;
                await_rate_limit(self).await?;
                continue;
            }

            return Err(ApiError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Err(ApiError::Http {
            status: last_status.as_u16(),
            url: url.to_string(),
        })
    }

    /// Fetch and decode a JSON body, keeping the quota signal.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Fetched<T>, ApiError> {
        let response = self.fetch(url).await?;
        let exhausted = is_rate_limited(response.headers());
        let value = decode(url, response).await?;
        Ok(Fetched::new(value, exhausted))
    }
}

/// Whether response headers report zero remaining quota.
pub fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers
        .get(RATE_LIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        == Some("0")
}

/// Read a response body and decode it as JSON.
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::Network {
        url: url.to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Malformed {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl ForkApi for GitHubClient {
    async fn rate_limit(&self) -> Result<RateLimitStatus, ApiError> {
        let url = self.rate_limit_url();
        let response = self.send(&url).await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Http {
                status: status.as_u16(),
                url,
            });
        }

        let body: GitHubRateLimitResponse = decode(&url, response).await?;
        Ok(body.into())
    }

    async fn repository(&self, key: &RepoKey) -> Result<Fetched<Repository>, ApiError> {
        let url = self.repo_url(key);
        let fetched: Fetched<GitHubRepo> = self.get_json(&url).await?;
        Ok(Fetched::new(fetched.value.into(), fetched.quota_exhausted))
    }

    async fn forks_page(
        &self,
        key: &RepoKey,
        page: u32,
    ) -> Result<Fetched<Vec<Repository>>, ApiError> {
        let url = self.forks_url(key, page);
        let fetched: Fetched<Vec<GitHubRepo>> = self.get_json(&url).await?;
        let repos = fetched.value.into_iter().map(Into::into).collect();
        Ok(Fetched::new(repos, fetched.quota_exhausted))
    }
}

// --------------------------------------------------------------------------
// API Response Types
// --------------------------------------------------------------------------

/// GitHub repository response format (the subset fork discovery reads).
#[derive(Debug, Deserialize)]
struct GitHubRepo {
    owner: GitHubOwner,
    name: String,
    html_url: String,
    clone_url: String,
    git_url: String,
    ssh_url: String,
    stargazers_count: u64,
    forks_count: u64,
}

/// GitHub owner format.
#[derive(Debug, Deserialize)]
struct GitHubOwner {
    login: String,
}

/// `GET /rate_limit` response format.
#[derive(Debug, Deserialize)]
struct GitHubRateLimitResponse {
    resources: GitHubRateLimitResources,
}

#[derive(Debug, Deserialize)]
struct GitHubRateLimitResources {
    core: GitHubRateLimitCore,
}

#[derive(Debug, Deserialize)]
struct GitHubRateLimitCore {
    remaining: u64,
    reset: i64,
}

impl From<GitHubRepo> for Repository {
    fn from(gh: GitHubRepo) -> Self {
        Repository {
            owner: gh.owner.login,
            name: gh.name,
            web_url: gh.html_url,
            clone_url_http: gh.clone_url,
            clone_url_git: gh.git_url,
            clone_url_ssh: gh.ssh_url,
            fork_count: gh.forks_count,
            star_count: gh.stargazers_count,
        }
    }
}

impl From<GitHubRateLimitResponse> for RateLimitStatus {
    fn from(gh: GitHubRateLimitResponse) -> Self {
        RateLimitStatus {
            remaining: gh.resources.core.remaining,
            reset: gh.resources.core.reset,
        }
    }
}
