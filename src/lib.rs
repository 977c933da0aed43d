//! forkindex - Build a livegrep index config from a GitHub fork graph
//!
//! Given one or more GitHub repositories, forkindex lists each repository
//! together with its forks (optionally forks of forks, recursively) and
//! writes a `livegrep.json` that a livegrep indexer can consume directly.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, runs discovery)
//! - [`core`] - Domain types and configuration
//! - [`github`] - The [`github::ForkApi`] seam, its HTTP client and a mock
//! - [`forks`] - Lazy fork enumeration and recursive traversal
//! - [`livegrep`] - The `livegrep.json` document
//! - [`ui`] - User-facing output
//!
//! # Guarantees
//!
//! 1. Every discovered repository appears exactly once in the output
//! 2. No repository's fork list is requested twice in one run
//! 3. When the API quota runs out, requests wait for the reset instead of
//!    failing

pub mod cli;
pub mod core;
pub mod forks;
pub mod github;
pub mod livegrep;
pub mod ui;
