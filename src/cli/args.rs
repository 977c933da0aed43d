//! cli::args
//!
//! Command-line argument definitions using clap derive.

use clap::Parser;
use std::path::PathBuf;

/// forkindex - Build a livegrep index config from a GitHub fork graph
#[derive(Parser, Debug)]
#[command(name = "forkindex")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Index a repository and its direct forks
    forkindex /srv/livegrep/hello hello octocat/Hello-World

    # Follow forks of forks, printing each repository found
    forkindex -r -v /srv/livegrep/spoon spoon https://github.com/octocat/Spoon-Knife

    # Authenticate for a larger rate limit (prompts for the token)
    forkindex --auth octocat /srv/livegrep/hello hello octocat/Hello-World

CONFIGURATION:
    Defaults for --auth, --api-base and --recursive can be set in
    $FORKINDEX_CONFIG, $XDG_CONFIG_HOME/forkindex/config.toml or
    ~/.forkindex/config.toml. Flags take precedence.")]
pub struct Cli {
    /// Output directory; livegrep.json is written here
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Name of the livegrep index
    #[arg(value_name = "NAME")]
    pub name: String,

    /// GitHub repositories, as owner/repo or full URLs
    #[arg(value_name = "URLS", required = true)]
    pub urls: Vec<String>,

    /// HTTP basic auth, "user:pass"; prompts for the password if omitted
    #[arg(long, value_name = "USER[:PASS]")]
    pub auth: Option<String>,

    /// Follow forks recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// Print every discovered repository
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// GitHub API base URL (for GitHub Enterprise)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
