//! github::mock
//!
//! In-memory `ForkApi` for deterministic testing.
//!
//! # Design
//!
//! The mock holds a fork graph: a set of repositories and, per repository,
//! the ordered list of its direct forks. Fork counts are derived from the
//! graph unless explicitly overridden, so records handed out by
//! `repository` and `forks_page` always agree with each other. Every call is
//! recorded, and `pause` records the requested duration instead of sleeping.
//!
//! # Example
//!
//! ```
//! use forkindex::core::types::RepoKey;
//! use forkindex::github::mock::MockForkApi;
//! use forkindex::github::ForkApi;
//!
//! # tokio_test::block_on(async {
//! let api = MockForkApi::new()
//!     .with_repo("octocat", "spoon-knife", 10)
//!     .with_fork(("octocat", "spoon-knife"), ("alice", "spoon-knife"));
//!
//! let root = api.repository(&RepoKey::new("octocat", "spoon-knife")).await.unwrap();
//! assert_eq!(root.value.fork_count, 1);
//!
//! let page = api.forks_page(&RepoKey::new("octocat", "spoon-knife"), 1).await.unwrap();
//! assert_eq!(page.value[0].owner, "alice");
//! # });
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::traits::{ApiError, Fetched, ForkApi, RateLimitStatus};
use crate::core::types::{RepoKey, Repository};

/// Default number of forks per page, matching the real client.
const DEFAULT_PAGE_SIZE: usize = 100;

/// Mock fork API for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone)]
pub struct MockForkApi {
    inner: Arc<Mutex<MockForkApiInner>>,
}

#[derive(Debug)]
struct MockForkApiInner {
    /// Base records; `fork_count` is filled in on read.
    repos: HashMap<RepoKey, Repository>,
    /// Direct forks of each repository, in API order.
    forks: HashMap<RepoKey, Vec<RepoKey>>,
    /// Reported fork counts that differ from the graph.
    fork_count_overrides: HashMap<RepoKey, u64>,
    page_size: usize,
    rate_limit: RateLimitStatus,
    /// (repository, page) pairs whose response reports zero remaining quota.
    exhausted_pages: HashSet<(RepoKey, u32)>,
    fail_on: Vec<FailOn>,
    operations: Vec<MockOperation>,
}

/// Configuration for which call should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail every quota request.
    RateLimit(ApiError),
    /// Fail metadata requests for the given repository.
    Repository(RepoKey, ApiError),
    /// Fail the given fork page of the given repository.
    ForksPage(RepoKey, u32, ApiError),
}

/// Recorded call for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    RateLimit,
    Repository(RepoKey),
    ForksPage(RepoKey, u32),
    Pause(Duration),
}

/// Build a repository record with GitHub-shaped URLs.
pub fn sample_repository(owner: &str, name: &str, stars: u64) -> Repository {
    Repository {
        owner: owner.to_string(),
        name: name.to_string(),
        web_url: format!("https://github.com/{}/{}", owner, name),
        clone_url_http: format!("https://github.com/{}/{}.git", owner, name),
        clone_url_git: format!("git://github.com/{}/{}.git", owner, name),
        clone_url_ssh: format!("git@github.com:{}/{}.git", owner, name),
        fork_count: 0,
        star_count: stars,
    }
}

impl MockForkApi {
    /// Create an empty mock with plenty of quota.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockForkApiInner {
                repos: HashMap::new(),
                forks: HashMap::new(),
                fork_count_overrides: HashMap::new(),
                page_size: DEFAULT_PAGE_SIZE,
                rate_limit: RateLimitStatus {
                    remaining: 5000,
                    reset: 0,
                },
                exhausted_pages: HashSet::new(),
                fail_on: Vec::new(),
                operations: Vec::new(),
            })),
        }
    }

    /// Add (or replace) a repository with the given star count.
    pub fn with_repo(self, owner: &str, name: &str, stars: u64) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let repo = sample_repository(owner, name, stars);
            inner.repos.insert(repo.key(), repo);
        }
        self
    }

    /// Record `fork` as a direct fork of `parent`.
    ///
    /// Either side is created with zero stars if it does not exist yet.
    pub fn with_fork(self, parent: (&str, &str), fork: (&str, &str)) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            for (owner, name) in [parent, fork] {
                inner
                    .repos
                    .entry(RepoKey::new(owner, name))
                    .or_insert_with(|| sample_repository(owner, name, 0));
            }
            inner
                .forks
                .entry(RepoKey::new(parent.0, parent.1))
                .or_default()
                .push(RepoKey::new(fork.0, fork.1));
        }
        self
    }

    /// Report `count` forks for a repository regardless of the graph.
    pub fn with_fork_count(self, repo: (&str, &str), count: u64) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .fork_count_overrides
                .insert(RepoKey::new(repo.0, repo.1), count);
        }
        self
    }

    /// Set how many forks each page holds.
    pub fn with_page_size(self, page_size: usize) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.page_size = page_size.max(1);
        }
        self
    }

    /// Make the given fork page report an exhausted quota in its headers.
    pub fn with_exhausted_page(self, repo: (&str, &str), page: u32) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner
                .exhausted_pages
                .insert((RepoKey::new(repo.0, repo.1), page));
        }
        self
    }

    /// Configure a call to fail.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on.push(fail_on);
        }
        self
    }

    /// Replace the quota status returned by `rate_limit`.
    pub fn set_rate_limit(&self, status: RateLimitStatus) {
        let mut inner = self.inner.lock().unwrap();
        inner.rate_limit = status;
    }

    /// Make every quota request fail with `err`.
    pub fn fail_rate_limit(&self, err: ApiError) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_on.push(FailOn::RateLimit(err));
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Durations passed to `pause`, in call order.
    pub fn pauses(&self) -> Vec<Duration> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::Pause(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    /// Number of metadata requests made for a repository.
    pub fn repository_requests(&self, owner: &str, name: &str) -> usize {
        let key = RepoKey::new(owner, name);
        self.operations()
            .iter()
            .filter(|op| matches!(op, MockOperation::Repository(k) if *k == key))
            .count()
    }

    /// Fork pages requested for a repository, in call order.
    pub fn fork_page_requests(&self, owner: &str, name: &str) -> Vec<u32> {
        let key = RepoKey::new(owner, name);
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                MockOperation::ForksPage(k, page) if k == key => Some(page),
                _ => None,
            })
            .collect()
    }

    fn record(&self, op: MockOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn not_found(key: &RepoKey) -> ApiError {
        ApiError::Http {
            status: 404,
            url: format!("mock://repos/{}", key),
        }
    }
}

impl Default for MockForkApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForkApiInner {
    /// A stored record with its fork count filled in.
    fn resolve(&self, key: &RepoKey) -> Option<Repository> {
        let mut repo = self.repos.get(key)?.clone();
        repo.fork_count = match self.fork_count_overrides.get(key) {
            Some(count) => *count,
            None => self.forks.get(key).map_or(0, |f| f.len() as u64),
        };
        Some(repo)
    }
}

#[async_trait]
impl ForkApi for MockForkApi {
    async fn rate_limit(&self) -> Result<RateLimitStatus, ApiError> {
        self.record(MockOperation::RateLimit);

        let inner = self.inner.lock().unwrap();
        for fail in &inner.fail_on {
            if let FailOn::RateLimit(e) = fail {
                return Err(e.clone());
            }
        }
        Ok(inner.rate_limit)
    }

    async fn repository(&self, key: &RepoKey) -> Result<Fetched<Repository>, ApiError> {
        self.record(MockOperation::Repository(key.clone()));

        let inner = self.inner.lock().unwrap();
        for fail in &inner.fail_on {
            if let FailOn::Repository(k, e) = fail {
                if k == key {
                    return Err(e.clone());
                }
            }
        }
        let repo = inner.resolve(key).ok_or_else(|| Self::not_found(key))?;
        Ok(Fetched::new(repo, false))
    }

    async fn forks_page(
        &self,
        key: &RepoKey,
        page: u32,
    ) -> Result<Fetched<Vec<Repository>>, ApiError> {
        self.record(MockOperation::ForksPage(key.clone(), page));

        let inner = self.inner.lock().unwrap();
        for fail in &inner.fail_on {
            if let FailOn::ForksPage(k, p, e) = fail {
                if k == key && *p == page {
                    return Err(e.clone());
                }
            }
        }
        if !inner.repos.contains_key(key) {
            return Err(Self::not_found(key));
        }

        // Like GitHub, page 0 is served as page 1.
        let index = page.max(1) as usize - 1;
        let forks = inner.forks.get(key).map(Vec::as_slice).unwrap_or_default();
        let records = forks
            .chunks(inner.page_size)
            .nth(index)
            .unwrap_or_default()
            .iter()
            .filter_map(|k| inner.resolve(k))
            .collect();

        let exhausted = inner.exhausted_pages.contains(&(key.clone(), page));
        Ok(Fetched::new(records, exhausted))
    }

    async fn pause(&self, duration: Duration) {
        self.record(MockOperation::Pause(duration));
    }
}
