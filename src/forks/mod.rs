//! forks
//!
//! Fork discovery over a [`ForkApi`].
//!
//! # Modules
//!
//! - [`enumerate`]: one repository plus its direct forks
//! - [`traverse`]: everything reachable through forks of forks
//!
//! Both are pull-based: nothing is requested until the caller asks for the
//! next record, and each call requests at most one page.
//!
//! # Example
//!
//! ```
//! use forkindex::core::types::RepoKey;
//! use forkindex::forks::Discovery;
//! use forkindex::github::mock::MockForkApi;
//!
//! # tokio_test::block_on(async {
//! let api = MockForkApi::new()
//!     .with_fork(("octocat", "spoon-knife"), ("alice", "spoon-knife"))
//!     .with_fork(("alice", "spoon-knife"), ("bob", "spoon-knife"));
//!
//! let root = RepoKey::new("octocat", "spoon-knife");
//! let direct = Discovery::new(&api, root.clone(), false).collect_all().await.unwrap();
//! assert_eq!(direct.len(), 2);
//!
//! let all = Discovery::new(&api, root, true).collect_all().await.unwrap();
//! assert_eq!(all.len(), 3);
//! # });
//! ```

pub mod enumerate;
pub mod traverse;

pub use enumerate::ForkEnumerator;
pub use traverse::RecursiveTraversal;

use crate::core::types::{RepoKey, Repository};
use crate::github::{ApiError, ForkApi};

/// Either a direct or a recursive discovery, driven through one `next`.
pub enum Discovery<'a, A: ForkApi + ?Sized> {
    /// The repository and its direct forks only.
    Direct(ForkEnumerator<'a, A>),
    /// Forks of forks, recursively.
    Recursive(RecursiveTraversal<'a, A>),
}

impl<'a, A: ForkApi + ?Sized> Discovery<'a, A> {
    /// Start discovery at `root`.
    pub fn new(api: &'a A, root: RepoKey, recursive: bool) -> Self {
        tracing::info!(repo = %root, recursive, "discovering forks");
        if recursive {
            Discovery::Recursive(RecursiveTraversal::new(api, root))
        } else {
            Discovery::Direct(ForkEnumerator::new(api, root))
        }
    }

    /// Produce the next record.
    pub async fn next(&mut self) -> Result<Option<Repository>, ApiError> {
        match self {
            Discovery::Direct(forks) => forks.next().await,
            Discovery::Recursive(traversal) => traversal.next().await,
        }
    }

    /// Drain the discovery into a vector.
    pub async fn collect_all(self) -> Result<Vec<Repository>, ApiError> {
        match self {
            Discovery::Direct(forks) => forks.collect_all().await,
            Discovery::Recursive(traversal) => traversal.collect_all().await,
        }
    }
}
