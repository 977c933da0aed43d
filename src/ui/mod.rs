//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and verbosity handling
//!
//! # Design
//!
//! Library code reports progress through `tracing`. What the user asked
//! for (discovered repositories, the final summary, skipped inputs) is
//! printed through this module so quiet and verbose modes apply uniformly.

pub mod output;
