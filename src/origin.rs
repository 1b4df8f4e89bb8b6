use axum::http::HeaderMap;
use tracing::warn;

use crate::metrics::ORIGIN_MISMATCHES;

const PROJECT_ORIGIN: &str = "https://githubbio.vercel.app";
const LOCAL_ORIGIN: &str = "http://localhost:3000";

/// Advisory origin allow-list for the stars endpoint.
///
/// Mismatches are logged and counted, requests are never rejected.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    enabled: bool,
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(production: bool, deployment_url: Option<&str>, site_url: Option<&str>) -> Self {
        let mut allowed = Vec::new();
        if let Some(host) = deployment_url.map(str::trim).filter(|h| !h.is_empty()) {
            allowed.push(format!("https://{host}"));
        }
        if let Some(site) = site_url.map(str::trim).filter(|s| !s.is_empty()) {
            allowed.push(site.to_string());
        }
        allowed.push(PROJECT_ORIGIN.to_string());
        allowed.push(LOCAL_ORIGIN.to_string());

        Self {
            enabled: production,
            allowed,
        }
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed
    }

    /// True when the request is acceptable or the check does not apply.
    pub fn is_allowed(&self, headers: &HeaderMap) -> bool {
        if !self.enabled {
            return true;
        }
        let origin = headers.get("origin").and_then(|v| v.to_str().ok());
        let referer = headers.get("referer").and_then(|v| v.to_str().ok());

        // both must be present for the check to run
        let (Some(origin), Some(_)) = (origin, referer) else {
            return true;
        };
        self.allowed.iter().any(|a| origin.starts_with(a.as_str()))
    }

    /// Warn about unexpected origins without blocking.
    pub fn observe(&self, headers: &HeaderMap) {
        if !self.is_allowed(headers) {
            ORIGIN_MISMATCHES.inc();
            let origin = headers
                .get("origin")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            warn!(%origin, "Request from unauthorized origin (not blocked)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(origin: &'static str, referer: &'static str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("origin", HeaderValue::from_static(origin));
        h.insert("referer", HeaderValue::from_static(referer));
        h
    }

    #[test]
    fn allow_list_includes_configured_urls() {
        let policy = OriginPolicy::new(true, Some("preview-abc.vercel.app"), Some("https://bio.dev"));
        assert_eq!(
            policy.allowed_origins(),
            &[
                "https://preview-abc.vercel.app".to_string(),
                "https://bio.dev".to_string(),
                PROJECT_ORIGIN.to_string(),
                LOCAL_ORIGIN.to_string(),
            ]
        );
    }

    #[test]
    fn foreign_origin_is_flagged_in_production() {
        let policy = OriginPolicy::new(true, None, Some("https://bio.dev"));
        assert!(policy.is_allowed(&headers("https://bio.dev", "https://bio.dev/")));
        assert!(!policy.is_allowed(&headers("https://evil.example", "https://evil.example/")));
    }

    #[test]
    fn check_is_skipped_outside_production_or_without_both_headers() {
        let dev = OriginPolicy::new(false, None, None);
        assert!(dev.is_allowed(&headers("https://evil.example", "https://evil.example/")));

        let prod = OriginPolicy::new(true, None, None);
        let mut only_origin = HeaderMap::new();
        only_origin.insert("origin", HeaderValue::from_static("https://evil.example"));
        assert!(prod.is_allowed(&only_origin));
    }
}
