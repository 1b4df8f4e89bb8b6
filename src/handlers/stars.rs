use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metrics::{
    RATE_LIMITED, REQUEST_TOTAL, STAR_CACHE_HITS, STAR_CACHE_MISSES, STAR_CACHE_STALE,
};
use crate::rate_limit::client_key;
use crate::star_cache::StarLookup;
use crate::state::AppState;

const FRESH_CACHE_CONTROL: &str = "public, s-maxage=3600";
const STALE_CACHE_CONTROL: &str = "public, s-maxage=300";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarsBody {
    pub stars: u64,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// GET /api/stars
pub async fn stars_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    REQUEST_TOTAL.with_label_values(&["stars"]).inc();

    let key = client_key(&headers);
    if state.rate_limiter.is_rate_limited(&key) {
        RATE_LIMITED.inc();
        debug!(client = %key, "Rate limit exceeded");
        return Err(ApiError::RateLimited);
    }

    state.origin_policy.observe(&headers);

    let lookup = state.star_cache.get_stars().await.map_err(|e| {
        STAR_CACHE_MISSES.inc();
        warn!(error = %e, "Star count unavailable");
        ApiError::from(e)
    })?;

    let response = match lookup {
        StarLookup::Fresh { count, age } => {
            STAR_CACHE_HITS.inc();
            let body = StarsBody {
                stars: count,
                cached: true,
                cache_age: Some(age.as_secs()),
                timestamp: None,
                error: None,
            };
            fresh(body)
        }
        StarLookup::Refreshed { count, fetched_at } => {
            STAR_CACHE_MISSES.inc();
            let body = StarsBody {
                stars: count,
                cached: false,
                cache_age: None,
                timestamp: Some(fetched_at.timestamp_millis()),
                error: None,
            };
            fresh(body)
        }
        StarLookup::Stale { count, reason, .. } => {
            STAR_CACHE_MISSES.inc();
            STAR_CACHE_STALE.inc();
            let body = StarsBody {
                stars: count,
                cached: true,
                cache_age: None,
                timestamp: None,
                error: Some(reason.to_string()),
            };
            ([(header::CACHE_CONTROL, STALE_CACHE_CONTROL)], Json(body)).into_response()
        }
    };
    Ok(response)
}

fn fresh(body: StarsBody) -> Response {
    (
        [
            (header::CACHE_CONTROL, FRESH_CACHE_CONTROL),
            (header::HeaderName::from_static("cdn-cache-control"), FRESH_CACHE_CONTROL),
        ],
        Json(body),
    )
        .into_response()
}

// Anything but GET on /api/stars
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
