//! core::types
//!
//! Domain types for fork discovery.
//!
//! # Types
//!
//! - [`RepoKey`] - Identity of a repository: the (owner, name) pair
//! - [`Repository`] - A repository record as reported by the API
//!
//! # Identity
//!
//! GitHub resolves owners and repository names case-insensitively, so
//! `Octocat/Hello-World` and `octocat/hello-world` are the same repository.
//! [`RepoKey`] compares and hashes ASCII case-insensitively while keeping the
//! spelling it was created with for display and URL construction.
//!
//! # Examples
//!
//! ```
//! use forkindex::core::types::RepoKey;
//!
//! let a = RepoKey::new("octocat", "Hello-World");
//! let b = RepoKey::new("OctoCat", "hello-world");
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "octocat/Hello-World");
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity key of a repository.
#[derive(Debug, Clone)]
pub struct RepoKey {
    owner: String,
    name: String,
}

impl RepoKey {
    /// Create a key from an owner and repository name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Account that owns the repository.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for RepoKey {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepoKey {}

impl Hash for RepoKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.owner.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        // Separator so ("ab", "c") and ("a", "bc") hash differently
        state.write_u8(b'/');
        for byte in self.name.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl fmt::Display for RepoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A repository record.
///
/// Built once from an API response and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Account that owns the repository
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Browser URL (`https://github.com/owner/name`)
    pub web_url: String,
    /// HTTPS clone URL
    pub clone_url_http: String,
    /// `git://` clone URL
    pub clone_url_git: String,
    /// SSH clone URL
    pub clone_url_ssh: String,
    /// Number of direct forks
    pub fork_count: u64,
    /// Number of stargazers
    pub star_count: u64,
}

impl Repository {
    /// Identity key of this repository.
    pub fn key(&self) -> RepoKey {
        RepoKey::new(&self.owner, &self.name)
    }

    /// Whether this repository has forks of its own.
    pub fn has_forks(&self) -> bool {
        self.fork_count > 0
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} (stars: {}, forks: {}) {}",
            self.owner, self.name, self.star_count, self.fork_count, self.web_url
        )
    }
}
