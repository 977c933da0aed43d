//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Results go to stdout; warnings and errors go to stderr. Output respects
//! the quiet flag, and per-repository lines only appear in verbose mode.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - errors only
    Quiet,
    /// Normal mode - warnings and the final summary
    Normal,
    /// Verbose mode - one line per discovered repository
    Verbose,
}

impl Verbosity {
    /// Create verbosity from flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a message only in verbose mode.
pub fn detail(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Verbose {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}
