//! core
//!
//! Core domain types and configuration for forkindex.
//!
//! # Modules
//!
//! - [`types`] - Repository records and identity keys
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
