use lazy_static::lazy_static;
use prometheus::{
    Counter, Gauge, Histogram, IntCounterVec, register_counter, register_gauge,
    register_histogram, register_int_counter_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "preview_requests_total",
        "Total number of requests per endpoint",
        &["endpoint"]
    )
    .unwrap();
    pub static ref STAR_CACHE_HITS: Counter =
        register_counter!("preview_star_cache_hits_total", "Star cache hits").unwrap();
    pub static ref STAR_CACHE_MISSES: Counter =
        register_counter!("preview_star_cache_misses_total", "Star cache misses").unwrap();
    pub static ref STAR_CACHE_STALE: Counter = register_counter!(
        "preview_star_cache_stale_total",
        "Stale star counts served after an upstream failure"
    )
    .unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("preview_rate_limited_total", "Requests rejected by the rate limiter")
            .unwrap();
    pub static ref UPSTREAM_ERRORS: Counter =
        register_counter!("preview_upstream_errors_total", "Failed GitHub API calls").unwrap();
    pub static ref ORIGIN_MISMATCHES: Counter = register_counter!(
        "preview_origin_mismatches_total",
        "Star requests from origins outside the allow-list"
    )
    .unwrap();
    pub static ref RATE_LIMIT_KEYS: Gauge =
        register_gauge!("preview_rate_limit_keys", "Client keys tracked by the rate limiter")
            .unwrap();
    pub static ref RENDER_LATENCY: Histogram = register_histogram!(
        "preview_render_latency_seconds",
        "Time spent rasterizing preview images"
    )
    .unwrap();
}
