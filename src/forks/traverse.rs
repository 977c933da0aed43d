//! forks::traverse
//!
//! Recursive discovery across forks of forks.
//!
//! # Algorithm
//!
//! A LIFO work stack seeded with the starting repository. Each popped
//! repository is enumerated with [`ForkEnumerator`]; every produced record
//! with forks of its own is pushed for later, and every record not seen
//! before is yielded.
//!
//! Two sets keep the walk finite and duplicate-free:
//! - `fetched`: repositories whose fork list has been requested
//! - `yielded`: repositories already handed to the caller
//!
//! A repository can be pushed more than once before it is popped (two
//! parents listing it), so a popped key that is already fetched is skipped.

use std::collections::HashSet;

use super::enumerate::ForkEnumerator;
use crate::core::types::{RepoKey, Repository};
use crate::github::{ApiError, ForkApi};

/// Pull-based traversal of everything reachable through forks.
///
/// Every distinct reachable repository is yielded exactly once, and no
/// repository's fork list is fetched more than once, even when the fork
/// graph has cycles.
pub struct RecursiveTraversal<'a, A: ForkApi + ?Sized> {
    api: &'a A,
    stack: Vec<RepoKey>,
    fetched: HashSet<RepoKey>,
    yielded: HashSet<RepoKey>,
    current: Option<ForkEnumerator<'a, A>>,
}

impl<'a, A: ForkApi + ?Sized> RecursiveTraversal<'a, A> {
    /// Start a traversal at `root`. No request is made until `next`.
    pub fn new(api: &'a A, root: RepoKey) -> Self {
        Self {
            api,
            stack: vec![root],
            fetched: HashSet::new(),
            yielded: HashSet::new(),
            current: None,
        }
    }

    /// Number of repositories whose fork lists have been requested.
    pub fn fetched_count(&self) -> usize {
        self.fetched.len()
    }

    /// Produce the next newly discovered repository.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from the enumerator. Errors are fatal; the
    /// traversal is finished afterwards.
    pub async fn next(&mut self) -> Result<Option<Repository>, ApiError> {
        let result = self.advance().await;
        if result.is_err() {
            self.stack.clear();
            self.current = None;
        }
        result
    }

    /// Drain the traversal into a vector.
    pub async fn collect_all(mut self) -> Result<Vec<Repository>, ApiError> {
        let mut repos = Vec::new();
        while let Some(repo) = self.next().await? {
            repos.push(repo);
        }
        Ok(repos)
    }

    async fn advance(&mut self) -> Result<Option<Repository>, ApiError> {
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.next().await? {
                    Some(repo) => {
                        let key = repo.key();
                        if repo.has_forks() && !self.fetched.contains(&key) {
                            self.stack.push(key.clone());
                        }
                        if self.yielded.insert(key) {
                            return Ok(Some(repo));
                        }
                        continue;
                    }
                    None => self.current = None,
                }
            }

            let Some(key) = self.stack.pop() else {
                return Ok(None);
            };
            if !self.fetched.insert(key.clone()) {
                continue;
            }

            tracing::debug!(repo = %key, pending = self.stack.len(), "expanding forks");
            self.current = Some(ForkEnumerator::new(self.api, key));
        }
    }
}
