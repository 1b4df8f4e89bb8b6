use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Number;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GitHubApi, LanguageBytes, Owner, RepositoryMetadata};
use crate::error::GitHubError;

/// In-memory stand-in for the GitHub API.
///
/// Star counts are served FIFO from a queue; an empty queue behaves like an
/// upstream outage. Every call is counted.
#[derive(Default)]
pub struct MockGitHub {
    pub repository: Mutex<Option<RepositoryMetadata>>,
    pub languages: Mutex<Option<LanguageBytes>>,
    stars: Mutex<VecDeque<Result<Number, GitHubError>>>,
    pub repository_calls: AtomicUsize,
    pub language_calls: AtomicUsize,
    pub star_calls: AtomicUsize,
}

impl MockGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(self, repo: RepositoryMetadata) -> Self {
        *self.repository.lock().unwrap() = Some(repo);
        self
    }

    pub fn with_languages(self, langs: &[(&str, u64)]) -> Self {
        *self.languages.lock().unwrap() = Some(LanguageBytes(
            langs.iter().map(|(n, b)| (n.to_string(), *b)).collect(),
        ));
        self
    }

    pub fn push_stars(&self, result: Result<i64, GitHubError>) {
        self.stars.lock().unwrap().push_back(result.map(Number::from));
    }

    /// Queue a star count exactly as upstream would encode it.
    pub fn push_raw_stars(&self, count: Number) {
        self.stars.lock().unwrap().push_back(Ok(count));
    }

    pub fn star_calls(&self) -> usize {
        self.star_calls.load(Ordering::SeqCst)
    }

    pub fn upstream_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
            + self.language_calls.load(Ordering::SeqCst)
            + self.star_calls()
    }
}

pub fn sample_repository() -> RepositoryMetadata {
    RepositoryMetadata {
        owner: Owner {
            login: "LucasCur".to_string(),
        },
        name: "github-bio".to_string(),
        description: Some("Generate preview cards for GitHub repositories".to_string()),
        language: Some("TypeScript".to_string()),
        stargazers_count: 1234,
        forks_count: 56,
        open_issues_count: 7,
        created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap(),
    }
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn fetch_repository(
        &self,
        _owner: &str,
        _repo: &str,
    ) -> Result<RepositoryMetadata, GitHubError> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        self.repository
            .lock()
            .unwrap()
            .clone()
            .ok_or(GitHubError::NotFound)
    }

    async fn fetch_languages(&self, _owner: &str, _repo: &str) -> Result<LanguageBytes, GitHubError> {
        self.language_calls.fetch_add(1, Ordering::SeqCst);
        self.languages
            .lock()
            .unwrap()
            .clone()
            .ok_or(GitHubError::Status(502))
    }

    async fn fetch_star_count(&self, _owner: &str, _repo: &str) -> Result<Number, GitHubError> {
        self.star_calls.fetch_add(1, Ordering::SeqCst);
        self.stars
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GitHubError::Timeout))
    }
}
