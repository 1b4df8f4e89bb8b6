use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::types::StarCountBody;
use super::{GitHubApi, LanguageBytes, RepositoryMetadata, validate_name};
use crate::error::{ConfigError, GitHubError};

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub token: Option<String>,
    // applies to metadata and language fetches
    pub request_timeout: Duration,
    pub star_timeout: Duration,
    // honour HTTP(S)_PROXY from the environment
    pub system_proxy: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "https://api.github.com".to_string(),
            token: None,
            request_timeout: Duration::from_secs(10),
            star_timeout: Duration::from_secs(5),
            system_proxy: true,
        }
    }
}

/// reqwest-backed GitHub client.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    star_timeout: Duration,
}

impl GitHubClient {
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(super::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(super::ACCEPT));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(options.request_timeout);
        if !options.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        // An empty token is the same as no token
        let token = options.token.filter(|t| !t.trim().is_empty());

        Ok(Self {
            client,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            token,
            star_timeout: options.star_timeout,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn repo_url(&self, owner: &str, repo: &str, suffix: &str) -> Result<String, GitHubError> {
        validate_name(owner)?;
        validate_name(repo)?;
        Ok(format!("{}/repos/{}/{}{}", self.base_url, owner, repo, suffix))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<T, GitHubError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| {
            let err = GitHubError::from_reqwest(e);
            warn!(%url, error = %err, "GitHub request failed");
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "GitHub API error");
            return Err(if status == reqwest::StatusCode::NOT_FOUND {
                GitHubError::NotFound
            } else {
                GitHubError::Status(status.as_u16())
            });
        }

        // Read the whole body first so a malformed payload is a decode error,
        // not a transport error
        let body = response.bytes().await.map_err(GitHubError::from_reqwest)?;
        serde_json::from_slice(&body).map_err(|e| {
            warn!(%url, error = %e, "Malformed GitHub API response");
            GitHubError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn fetch_repository(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, GitHubError> {
        let url = self.repo_url(owner, repo, "")?;
        debug!(%owner, %repo, "Fetching repository metadata");
        self.get_json(&url, None).await
    }

    async fn fetch_languages(&self, owner: &str, repo: &str) -> Result<LanguageBytes, GitHubError> {
        let url = self.repo_url(owner, repo, "/languages")?;
        debug!(%owner, %repo, "Fetching repository languages");
        self.get_json(&url, None).await
    }

    async fn fetch_star_count(&self, owner: &str, repo: &str) -> Result<Number, GitHubError> {
        let url = self.repo_url(owner, repo, "")?;
        let body: StarCountBody = self.get_json(&url, Some(self.star_timeout)).await?;
        match body.stargazers_count {
            Value::Number(count) => Ok(count),
            other => Err(GitHubError::Decode(format!(
                "stargazers_count is not a number: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_means_unauthenticated() {
        let client = GitHubClient::new(ClientOptions {
            token: Some("   ".into()),
            ..ClientOptions::default()
        })
        .unwrap();
        assert!(!client.is_authenticated());

        let client = GitHubClient::new(ClientOptions {
            token: Some("ghp_secret".into()),
            ..ClientOptions::default()
        })
        .unwrap();
        assert!(client.is_authenticated());
    }

    #[test]
    fn builds_repo_urls_without_trailing_slash() {
        let client = GitHubClient::new(ClientOptions {
            base_url: "http://127.0.0.1:9999/".into(),
            ..ClientOptions::default()
        })
        .unwrap();
        assert_eq!(
            client.repo_url("rust-lang", "rust", "/languages").unwrap(),
            "http://127.0.0.1:9999/repos/rust-lang/rust/languages"
        );
        assert!(client.repo_url("..", "rust", "").is_err());
    }

    #[tokio::test]
    async fn invalid_names_never_reach_upstream() {
        // Nothing listens here; an attempted request would be a transport error
        let client = GitHubClient::new(ClientOptions {
            base_url: "http://127.0.0.1:1".into(),
            ..ClientOptions::default()
        })
        .unwrap();
        let err = client.fetch_repository("a/b", "c").await.unwrap_err();
        assert!(matches!(err, GitHubError::InvalidName(_)));
    }
}
