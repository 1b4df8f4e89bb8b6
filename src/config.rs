use chrono::format::{Item, StrftimeItems};
use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "repo-preview")]
#[command(about = "Preview images and a cached star counter for GitHub repositories")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Interface to bind
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0")]
    pub bind: String,

    // GitHub REST API base url
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub github_api_url: String,

    // Optional bearer token, requests go out unauthenticated without it
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    // Repository whose stars the /api/stars endpoint reports ("owner/name")
    #[arg(long, env = "STAR_REPO", default_value = "LucasCur/github-bio")]
    pub star_repo: String,

    // Star cache TTL in seconds
    #[arg(short, long, default_value_t = 7200)]
    pub cache_ttl: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Hard deadline for the star count fetch
    #[arg(long, default_value_t = 5)]
    pub star_timeout: u64,

    // Deadline for metadata and language fetches
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,

    // How often stale rate limit entries are evicted
    #[arg(long, default_value_t = 300)]
    pub prune_interval: u64,

    // Public site url, used for the advisory origin check
    #[arg(long, env = "SITE_URL")]
    pub site_url: Option<String>,

    // Deployment host without scheme (e.g. "my-app.vercel.app")
    #[arg(long, env = "DEPLOYMENT_URL")]
    pub deployment_url: Option<String>,

    // Origin checks only run in production
    #[arg(long, env = "PRODUCTION", default_value_t = false)]
    pub production: bool,

    // strftime pattern for the created/updated dates on preview images
    #[arg(long, default_value = "%-m/%-d/%Y")]
    pub date_format: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    // Split "owner/name" into its parts
    pub fn star_repo(&self) -> Result<(String, String), ConfigError> {
        match self.star_repo.trim().split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok((owner.to_string(), name.to_string()))
            }
            _ => Err(ConfigError::StarRepo(self.star_repo.clone())),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window)
    }

    pub fn star_timeout(&self) -> Duration {
        Duration::from_secs(self.star_timeout)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout)
    }

    pub fn prune_interval(&self) -> Duration {
        Duration::from_secs(self.prune_interval.max(1))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.star_repo()?;
        if self.rate_limit == 0 {
            return Err(ConfigError::Invalid("rate limit must be non-zero".into()));
        }
        if self.rate_window == 0 {
            return Err(ConfigError::Invalid("rate window must be non-zero".into()));
        }
        if self.date_format.trim().is_empty()
            || StrftimeItems::new(&self.date_format).any(|item| item == Item::Error)
        {
            return Err(ConfigError::Invalid(format!(
                "unusable date format {:?}",
                self.date_format
            )));
        }
        Ok(())
    }
}
