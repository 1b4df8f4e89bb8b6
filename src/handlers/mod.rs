mod health;
mod metrics;
mod repo;
mod stars;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use repo::repo_handler;
pub use stars::{method_not_allowed, stars_handler};
