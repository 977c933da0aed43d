//! github
//!
//! Access to the GitHub REST API for fork discovery.
//!
//! # Architecture
//!
//! The [`ForkApi`] trait is the seam between discovery logic and the
//! network. [`GitHubClient`] implements it over HTTP; [`mock::MockForkApi`]
//! implements it in memory for tests.
//!
//! # Modules
//!
//! - `traits`: `ForkApi`, errors, credentials and response wrappers
//! - [`client`]: reqwest-based client with rate-limit aware fetch
//! - [`rate_limit`]: the quota gate shared by the client and the enumerator
//! - [`url`]: parsing of source URLs given on the command line
//! - [`mock`]: in-memory implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use forkindex::github::{Credentials, ForkApi, GitHubClient};
//! use forkindex::core::types::RepoKey;
//!
//! let client = GitHubClient::new(Some(Credentials::parse("octocat:ghp_xxx")));
//! let repo = client.repository(&RepoKey::new("octocat", "Hello-World")).await?;
//! println!("{} has {} forks", repo.value.name, repo.value.fork_count);
//! ```

pub mod client;
pub mod mock;
pub mod rate_limit;
mod traits;
pub mod url;

pub use client::{GitHubClient, DEFAULT_API_BASE};
pub use rate_limit::{await_rate_limit, wait_duration};
pub use traits::*;
