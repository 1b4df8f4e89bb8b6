use std::sync::Arc;

use crate::config::Args;
use crate::error::ConfigError;
use crate::github::{ClientOptions, GitHubApi, GitHubClient};
use crate::origin::OriginPolicy;
use crate::rate_limit::RateLimiter;
use crate::star_cache::StarCache;

// app's shared state, built once at startup and handed to every handler
pub struct AppState {
    pub github: Arc<dyn GitHubApi>,
    pub rate_limiter: RateLimiter,
    pub star_cache: StarCache,
    pub origin_policy: OriginPolicy,
    pub date_format: String,
}

impl AppState {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let client = GitHubClient::new(ClientOptions {
            base_url: args.github_api_url.clone(),
            token: args.github_token.clone(),
            request_timeout: args.upstream_timeout(),
            star_timeout: args.star_timeout(),
            system_proxy: true,
        })?;
        Self::with_github(Arc::new(client), args)
    }

    /// Same wiring as [`AppState::from_args`] around any [`GitHubApi`].
    pub fn with_github(github: Arc<dyn GitHubApi>, args: &Args) -> Result<Self, ConfigError> {
        args.validate()?;
        let (owner, repo) = args.star_repo()?;

        Ok(Self {
            star_cache: StarCache::new(Arc::clone(&github), owner, repo, args.cache_ttl()),
            github,
            rate_limiter: RateLimiter::new(args.rate_limit, args.rate_window()),
            origin_policy: OriginPolicy::new(
                args.production,
                args.deployment_url.as_deref(),
                args.site_url.as_deref(),
            ),
            date_format: args.date_format.clone(),
        })
    }
}
