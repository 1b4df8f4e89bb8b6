//! GitHub REST API access.
//!
//! [`GitHubApi`] is the seam the handlers and the star cache depend on;
//! [`GitHubClient`] is the reqwest-backed implementation.

mod client;
#[cfg(test)]
pub(crate) mod mock;
mod types;

use async_trait::async_trait;
use serde_json::Number;

pub use client::{ClientOptions, GitHubClient};
pub use types::{LanguageBytes, Owner, RepositoryMetadata};

use crate::error::GitHubError;

pub const USER_AGENT: &str = concat!("repo-preview/", env!("CARGO_PKG_VERSION"));
pub const ACCEPT: &str = "application/vnd.github+json";

#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn fetch_repository(&self, owner: &str, repo: &str)
    -> Result<RepositoryMetadata, GitHubError>;

    async fn fetch_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes, GitHubError>;

    /// Star count of one repository, bounded by the client's star deadline.
    /// Any JSON number is passed through as sent; the caller range-checks it.
    async fn fetch_star_count(&self, owner: &str, repo: &str) -> Result<Number, GitHubError>;
}

/// Owner and repository names use a small alphabet on GitHub; anything else
/// cannot exist and must not be spliced into a request path.
pub fn validate_name(name: &str) -> Result<(), GitHubError> {
    let valid = !name.is_empty()
        && name.len() <= 100
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(GitHubError::InvalidName(name.to_string()))
    }
}
