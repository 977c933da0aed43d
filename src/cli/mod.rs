//! cli
//!
//! Command-line interface layer for forkindex.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and merge them with the config file
//! - Set up logging
//! - Drive discovery on a single-threaded runtime
//!
//! # Architecture
//!
//! The CLI layer is thin. Discovery lives in [`crate::forks`], the HTTP
//! client in [`crate::github`] and the output format in [`crate::livegrep`].
//! [`build::build_config`] ties them together against any
//! [`ForkApi`](crate::github::ForkApi), so it can be exercised with the mock.

pub mod args;
pub mod build;

pub use args::Cli;
pub use build::{build_config, BuildOptions, BuildSummary};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::github::GitHubClient;
use crate::ui::output;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let config = Config::load().context("failed to load configuration")?;
    let options = BuildOptions::resolve(&cli, &config, prompt_password)?;
    let client = GitHubClient::with_api_base(options.credentials.clone(), &options.api_base);
    tracing::debug!(?client, recursive = options.recursive, "starting");

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let summary = rt.block_on(build_config(&client, &options))?;

    output::print(
        format!(
            "wrote {} repositories to {}",
            summary.repositories,
            summary.path.display()
        ),
        options.verbosity,
    );
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if debug => EnvFilter::new("forkindex=debug"),
        Err(_) => EnvFilter::new("forkindex=info"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_password(username: &str) -> Result<String> {
    rpassword::prompt_password(format!("Password for {}: ", username))
        .context("failed to read password")
}
