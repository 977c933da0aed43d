//! livegrep
//!
//! The `livegrep.json` index configuration.
//!
//! # Format
//!
//! ```json
//! {
//!     "name": "linux-forks",
//!     "repos": [
//!         {
//!             "path": "/srv/forks/torvalds/linux",
//!             "name": "torvalds/linux",
//!             "revisions": ["HEAD"],
//!             "metadata": {
//!                 "remote": "https://github.com/torvalds/linux.git",
//!                 "github": "https://github.com/torvalds/linux"
//!             }
//!         }
//!     ]
//! }
//! ```
//!
//! Repositories are listed most-starred first. Each `path` is where the
//! checkout is expected to live: `<output_dir>/<owner>/<name>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Repository;

/// File name written inside the output directory.
pub const CONFIG_FILE_NAME: &str = "livegrep.json";

/// Revision indexed for every repository.
pub const HEAD_REVISION: &str = "HEAD";

/// Errors from writing the config.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize livegrep config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level livegrep configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivegrepConfig {
    /// Index name
    pub name: String,
    /// Repositories to index
    pub repos: Vec<LivegrepRepo>,
}

/// One repository entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivegrepRepo {
    /// Local checkout path
    pub path: String,
    /// Display name, `owner/name`
    pub name: String,
    /// Revisions to index
    pub revisions: Vec<String>,
    /// Links shown in search results
    pub metadata: LivegrepMetadata,
}

/// Per-repository links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivegrepMetadata {
    /// HTTPS clone URL
    pub remote: String,
    /// Browser URL
    pub github: String,
}

impl LivegrepConfig {
    /// Build a config from discovered repositories.
    ///
    /// Repositories are ordered by star count, highest first. Ties keep
    /// their input order.
    pub fn build(name: impl Into<String>, output_dir: &Path, repos: &[Repository]) -> Self {
        let mut sorted: Vec<&Repository> = repos.iter().collect();
        sorted.sort_by(|a, b| b.star_count.cmp(&a.star_count));

        LivegrepConfig {
            name: name.into(),
            repos: sorted
                .into_iter()
                .map(|repo| LivegrepRepo::for_repository(output_dir, repo))
                .collect(),
        }
    }

    /// Serialize as JSON indented with four spaces.
    pub fn to_json(&self) -> Result<String, EmitError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write `livegrep.json` into `output_dir`, creating the directory if
    /// needed. Returns the path written. The file is overwritten in place.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf, EmitError> {
        fs::create_dir_all(output_dir).map_err(|e| EmitError::CreateDir {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let path = output_dir.join(CONFIG_FILE_NAME);
        let contents = self.to_json()?;
        fs::write(&path, contents).map_err(|e| EmitError::Write {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), repos = self.repos.len(), "wrote livegrep config");
        Ok(path)
    }
}

impl LivegrepRepo {
    fn for_repository(output_dir: &Path, repo: &Repository) -> Self {
        LivegrepRepo {
            path: output_dir
                .join(&repo.owner)
                .join(&repo.name)
                .display()
                .to_string(),
            name: format!("{}/{}", repo.owner, repo.name),
            revisions: vec![HEAD_REVISION.to_string()],
            metadata: LivegrepMetadata {
                remote: repo.clone_url_http.clone(),
                github: repo.web_url.clone(),
            },
        }
    }
}
