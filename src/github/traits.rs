//! github::traits
//!
//! The `ForkApi` trait and the types that cross it.
//!
//! # Design
//!
//! Fork discovery only needs three reads from the hosting API: the quota
//! status, a single repository, and one page of a repository's forks. The
//! trait is async because each of those is network I/O. Everything above it
//! (the rate limit gate, the enumerator, the traversal) is written against
//! the trait so it can run against [`MockForkApi`] in tests.
//!
//! [`MockForkApi`]: super::mock::MockForkApi

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::{RepoKey, Repository};

/// Errors from GitHub API operations.
///
/// All of these are fatal to a discovery run. Rate limiting that can be
/// waited out never surfaces as an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The API answered with a status other than 200.
    #[error("HTTP {status} from {url}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request never produced a response.
    #[error("network error requesting {url}: {message}")]
    Network {
        /// Requested URL
        url: String,
        /// Transport error description
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response from {url}: {message}")]
    Malformed {
        /// Requested URL
        url: String,
        /// Decoder error description
        message: String,
    },
}

impl ApiError {
    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// HTTP basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password or personal access token
    pub password: Option<String>,
}

impl Credentials {
    /// Create credentials from a username and optional password.
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// Parse a `user:pass` string. The password is split at the first `:`.
    ///
    /// ```
    /// use forkindex::github::Credentials;
    ///
    /// let creds = Credentials::parse("octocat:ghp_abc:def");
    /// assert_eq!(creds.username, "octocat");
    /// assert_eq!(creds.password.as_deref(), Some("ghp_abc:def"));
    ///
    /// let bare = Credentials::parse("octocat");
    /// assert!(bare.password.is_none());
    /// ```
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((user, pass)) => Self::new(user, Some(pass.to_string())),
            None => Self::new(raw, None),
        }
    }
}

// Custom Debug to avoid exposing the password
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("has_password", &self.password.is_some())
            .finish()
    }
}

/// Quota status for the core API resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests left in the current window
    pub remaining: u64,
    /// When the window resets, in seconds since the Unix epoch
    pub reset: i64,
}

impl RateLimitStatus {
    /// Whether the quota is used up.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// A decoded response body plus the quota signal from its headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    /// The decoded body
    pub value: T,
    /// True when the response reported zero remaining requests
    pub quota_exhausted: bool,
}

impl<T> Fetched<T> {
    /// Wrap a value with the given quota signal.
    pub fn new(value: T, quota_exhausted: bool) -> Self {
        Self {
            value,
            quota_exhausted,
        }
    }
}

/// Read access to repositories and their forks.
///
/// Implementations must be `Send + Sync` so a traversal can be driven from
/// any tokio runtime.
#[async_trait]
pub trait ForkApi: Send + Sync {
    /// Current quota status of the core resource class.
    async fn rate_limit(&self) -> Result<RateLimitStatus, ApiError>;

    /// Metadata of a single repository.
    async fn repository(&self, key: &RepoKey) -> Result<Fetched<Repository>, ApiError>;

    /// One page of a repository's direct forks. An empty page means there
    /// are no more.
    async fn forks_page(
        &self,
        key: &RepoKey,
        page: u32,
    ) -> Result<Fetched<Vec<Repository>>, ApiError>;

    /// Suspend for `duration`. Test doubles override this to avoid real sleeps.
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
