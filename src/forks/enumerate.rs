//! forks::enumerate
//!
//! A repository and its direct forks, one page at a time.
//!
//! # Order
//!
//! The repository's own record comes first, then the forks in the order the
//! API lists them, page by page. Pages are only requested when the consumer
//! has drained the previous one.
//!
//! # Rate limits
//!
//! The quota gate runs once before the first request. After that, a page
//! whose response reports zero remaining quota makes the enumerator wait for
//! the reset before the next page is requested.

use std::collections::VecDeque;

use crate::core::types::{RepoKey, Repository};
use crate::github::{await_rate_limit, ApiError, ForkApi};

/// First page number of the forks listing. GitHub pages are 1-based.
pub const FIRST_FORKS_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Nothing requested yet.
    Start,
    /// Paging through the forks listing.
    Paging,
    /// Finished (or failed).
    Done,
}

/// Pull-based enumerator over a repository and its direct forks.
///
/// Finite and not restartable: once `next` returns `Ok(None)` or an error it
/// keeps returning `Ok(None)`. Build a new enumerator to start over.
pub struct ForkEnumerator<'a, A: ForkApi + ?Sized> {
    api: &'a A,
    key: RepoKey,
    state: State,
    next_page: u32,
    buffered: VecDeque<Repository>,
    /// Wait for quota before the next page request.
    quota_wait_pending: bool,
}

impl<'a, A: ForkApi + ?Sized> ForkEnumerator<'a, A> {
    /// Create an enumerator for `key`. No request is made until `next`.
    pub fn new(api: &'a A, key: RepoKey) -> Self {
        Self {
            api,
            key,
            state: State::Start,
            next_page: FIRST_FORKS_PAGE,
            buffered: VecDeque::new(),
            quota_wait_pending: false,
        }
    }

    /// Produce the next record.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the underlying requests. The enumerator is
    /// finished afterwards.
    pub async fn next(&mut self) -> Result<Option<Repository>, ApiError> {
        let result = self.advance().await;
        if result.is_err() {
            self.state = State::Done;
            self.buffered.clear();
        }
        result
    }

    /// Drain the enumerator into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<Repository>, ApiError> {
        let mut repos = Vec::new();
        while let Some(repo) = self.next().await? {
            repos.push(repo);
        }
        Ok(repos)
    }

    async fn advance(&mut self) -> Result<Option<Repository>, ApiError> {
        loop {
            if let Some(repo) = self.buffered.pop_front() {
                return Ok(Some(repo));
            }

            match self.state {
                State::Start => {
                    tracing::debug!(repo = %self.key, "fetching repository");
                    await_rate_limit(self.api).await?;
                    let fetched = self.api.repository(&self.key).await?;
                    let repo = fetched.value;

                    // No forks means every page would be empty.
                    self.state = if repo.has_forks() {
                        State::Paging
                    } else {
                        State::Done
                    };
                    return Ok(Some(repo));
                }
                State::Paging => {
                    if self.quota_wait_pending {
                        await_rate_limit(self.api).await?;
                        self.quota_wait_pending = false;
                    }

                    let page = self.next_page;
                    let fetched = self.api.forks_page(&self.key, page).await?;
                    tracing::debug!(
                        repo = %self.key,
                        page,
                        count = fetched.value.len(),
                        "fetched forks page"
                    );

                    if fetched.value.is_empty() {
                        self.state = State::Done;
                        continue;
                    }

                    self.next_page += 1;
                    self.quota_wait_pending = fetched.quota_exhausted;
                    self.buffered.extend(fetched.value);
                }
                State::Done => return Ok(None),
            }
        }
    }
}
