//! github::url
//!
//! Turning command-line inputs into repository keys.
//!
//! Accepted forms:
//! - `owner/repo` (treated as `https://github.com/owner/repo`)
//! - `github.com/owner/repo`
//! - `https://github.com/owner/repo`, with optional `.git`, extra path
//!   segments, query or fragment
//! - `git@github.com:owner/repo.git`
//!
//! Any host other than `github.com` is rejected, as is a path without both
//! an owner and a repository segment. Callers skip rejected inputs with a
//! warning rather than aborting.

use thiserror::Error;
use url::Url;

use crate::core::types::RepoKey;

/// The only host fork discovery knows how to talk to.
pub const GITHUB_HOST: &str = "github.com";

/// Why an input could not be turned into a repository key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The URL points somewhere other than github.com.
    #[error("unknown host '{host}' in {input}")]
    UnknownHost {
        /// The raw input
        input: String,
        /// The host that was found
        host: String,
    },

    /// The URL has no owner/repository path.
    #[error("no repository path in {input}")]
    MissingRepository {
        /// The raw input
        input: String,
    },
}

/// Parse a source URL into a repository key.
///
/// # Example
///
/// ```
/// use forkindex::github::url::parse_source_url;
///
/// let key = parse_source_url("octocat/Hello-World").unwrap();
/// assert_eq!(key.owner(), "octocat");
/// assert_eq!(key.name(), "Hello-World");
///
/// assert!(parse_source_url("https://gitlab.com/foo/bar").is_err());
/// ```
pub fn parse_source_url(input: &str) -> Result<RepoKey, SourceError> {
    let missing = || SourceError::MissingRepository {
        input: input.to_string(),
    };

    let url = Url::parse(&absolute_url(input.trim())).map_err(|_| missing())?;
    let host = url.host_str().ok_or_else(missing)?;
    if !host.eq_ignore_ascii_case(GITHUB_HOST) {
        return Err(SourceError::UnknownHost {
            input: input.to_string(),
            host: host.to_string(),
        });
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let [owner, repo, ..] = segments.as_slice() else {
        return Err(missing());
    };
    let repo: &str = repo;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return Err(missing());
    }

    Ok(RepoKey::new(*owner, repo))
}

/// Rewrite shorthand inputs into absolute URLs.
fn absolute_url(trimmed: &str) -> String {
    if trimmed.contains("://") {
        return trimmed.to_string();
    }

    // SSH format: git@github.com:owner/repo.git
    if let Some((user_host, path)) = trimmed.split_once(':') {
        if user_host.contains('@') {
            return format!("ssh://{}/{}", user_host, path.trim_start_matches('/'));
        }
    }

    // GitHub owners never contain dots, so a dotted first segment is a host.
    if first_segment_has_dot(trimmed) {
        format!("https://{}", trimmed)
    } else {
        format!("https://{}/{}", GITHUB_HOST, trimmed.trim_start_matches('/'))
    }
}

/// Whether the first path segment looks like a host name.
fn first_segment_has_dot(input: &str) -> bool {
    input
        .split('/')
        .next()
        .is_some_and(|segment| segment.contains('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> (String, String) {
        let key = parse_source_url(input).unwrap();
        (key.owner().to_string(), key.name().to_string())
    }

    fn pair(owner: &str, repo: &str) -> (String, String) {
        (owner.to_string(), repo.to_string())
    }

    mod parse_source_url {
        use super::*;

        #[test]
        fn bare_owner_repo() {
            assert_eq!(parsed("octocat/Hello-World"), pair("octocat", "Hello-World"));
        }

        #[test]
        fn bare_owner_repo_with_dots() {
            assert_eq!(parsed("rust-lang/rust.vim"), pair("rust-lang", "rust.vim"));
        }

        #[test]
        fn host_without_scheme() {
            assert_eq!(
                parsed("github.com/octocat/Hello-World"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn https_url() {
            assert_eq!(
                parsed("https://github.com/octocat/Hello-World"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn https_with_git_suffix() {
            assert_eq!(
                parsed("https://github.com/octocat/Hello-World.git"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn trailing_slash_and_extra_segments() {
            assert_eq!(
                parsed("https://github.com/octocat/Hello-World/"),
                pair("octocat", "Hello-World")
            );
            assert_eq!(
                parsed("https://github.com/octocat/Hello-World/tree/main/src"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn query_and_fragment_ignored() {
            assert_eq!(
                parsed("https://github.com/octocat/Hello-World?tab=readme#top"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn http_scheme_and_port() {
            assert_eq!(
                parsed("http://github.com:443/octocat/Hello-World"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn ssh_format() {
            assert_eq!(
                parsed("git@github.com:octocat/Hello-World.git"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn host_is_case_insensitive() {
            assert_eq!(
                parsed("https://GitHub.com/octocat/Hello-World"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn unknown_host_rejected() {
            let err = parse_source_url("https://gitlab.com/foo/bar").unwrap_err();
            assert_eq!(
                err,
                SourceError::UnknownHost {
                    input: "https://gitlab.com/foo/bar".into(),
                    host: "gitlab.com".into(),
                }
            );
        }

        #[test]
        fn unknown_host_without_scheme_rejected() {
            assert!(matches!(
                parse_source_url("gitlab.com/foo/bar"),
                Err(SourceError::UnknownHost { .. })
            ));
            assert!(matches!(
                parse_source_url("git@gitlab.com:foo/bar.git"),
                Err(SourceError::UnknownHost { .. })
            ));
        }

        #[test]
        fn subdomain_is_not_github() {
            assert!(matches!(
                parse_source_url("https://www.github.com/octocat/Hello-World"),
                Err(SourceError::UnknownHost { .. })
            ));
        }

        #[test]
        fn backslashes_read_as_slashes() {
            assert_eq!(
                parsed("https://github.com\\octocat\\Hello-World"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn tabs_and_newlines_dropped() {
            assert_eq!(
                parsed("https://github.com/octo\tcat/Hello-World\n"),
                pair("octocat", "Hello-World")
            );
        }

        #[test]
        fn invalid_port_rejected() {
            let input = "https://github.com:notaport/octocat/Hello-World";
            assert_eq!(
                parse_source_url(input),
                Err(SourceError::MissingRepository {
                    input: input.to_string()
                })
            );
        }

        #[test]
        fn missing_repository_rejected() {
            for input in [
                "https://github.com/",
                "https://github.com/octocat",
                "https://github.com//Hello-World",
                "octocat",
                "",
            ] {
                assert_eq!(
                    parse_source_url(input),
                    Err(SourceError::MissingRepository {
                        input: input.to_string()
                    }),
                    "input: {:?}",
                    input
                );
            }
        }
    }
}
