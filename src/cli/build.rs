//! cli::build
//!
//! Discover forks for every source and write `livegrep.json`.
//!
//! # Behavior
//!
//! - The output directory is created before any request is made
//! - Sources that are not GitHub repositories are skipped with a warning
//! - Any API failure aborts the whole run; nothing is written
//! - A repository reachable from several sources is listed once

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::config::{validate_api_base, Config};
use crate::core::types::Repository;
use crate::forks::Discovery;
use crate::github::url::parse_source_url;
use crate::github::{Credentials, ForkApi};
use crate::livegrep::LivegrepConfig;
use crate::ui::output::{self, Verbosity};

use super::args::Cli;

/// Everything a run needs, after merging flags and the config file.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Output directory
    pub output_dir: PathBuf,
    /// livegrep index name
    pub name: String,
    /// Source URLs as given
    pub sources: Vec<String>,
    /// Basic-auth credentials
    pub credentials: Option<Credentials>,
    /// GitHub API base URL
    pub api_base: String,
    /// Follow forks of forks
    pub recursive: bool,
    /// Output verbosity
    pub verbosity: Verbosity,
}

impl BuildOptions {
    /// Merge CLI flags over the config file.
    ///
    /// `prompt` is asked for a password when the auth value names only a
    /// user.
    pub fn resolve<F>(cli: &Cli, config: &Config, prompt: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let credentials = match cli
            .auth
            .as_deref()
            .map(Credentials::parse)
            .or_else(|| config.credentials())
        {
            Some(mut creds) => {
                if creds.password.is_none() {
                    creds.password = Some(prompt(&creds.username)?);
                }
                Some(creds)
            }
            None => None,
        };

        let api_base = cli
            .api_base
            .clone()
            .unwrap_or_else(|| config.api_base().to_string());
        validate_api_base(&api_base)?;

        Ok(BuildOptions {
            output_dir: cli.path.clone(),
            name: cli.name.clone(),
            sources: cli.urls.clone(),
            credentials,
            api_base,
            recursive: cli.recursive || config.recursive(),
            verbosity: Verbosity::from_flags(cli.quiet, cli.verbose),
        })
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Path of the written config
    pub path: PathBuf,
    /// Repositories listed in the config
    pub repositories: usize,
    /// Sources skipped as unusable
    pub skipped: usize,
}

/// Discover every source's forks and write the livegrep config.
pub async fn build_config<A>(api: &A, options: &BuildOptions) -> Result<BuildSummary>
where
    A: ForkApi + ?Sized,
{
    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            options.output_dir.display()
        )
    })?;

    let mut repos: Vec<Repository> = Vec::new();
    let mut listed = HashSet::new();
    let mut skipped = 0;

    for source in &options.sources {
        let root = match parse_source_url(source) {
            Ok(key) => key,
            Err(err) => {
                output::warn(format!("skipping {}", err), options.verbosity);
                skipped += 1;
                continue;
            }
        };

        let mut discovery = Discovery::new(api, root.clone(), options.recursive);
        while let Some(repo) = discovery
            .next()
            .await
            .with_context(|| format!("failed to discover forks of {}", root))?
        {
            if listed.insert(repo.key()) {
                output::detail(&repo, options.verbosity);
                repos.push(repo);
            }
        }
    }

    let config = LivegrepConfig::build(&options.name, &options.output_dir, &repos);
    let path = config.write(&options.output_dir)?;

    Ok(BuildSummary {
        path,
        repositories: repos.len(),
        skipped,
    })
}
