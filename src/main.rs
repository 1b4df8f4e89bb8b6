use clap::Parser; // for cli
use repo_preview::config::Args;
use repo_preview::metrics::RATE_LIMIT_KEYS;
use repo_preview::state::AppState;
use repo_preview::{router, telemetry};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

// this is main async function with tokio
#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();

    if let Err(e) = telemetry::init_tracing(&args.log_level) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        error!(error = %e, "Server exited with error");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // creating shared state
    let state = Arc::new(AppState::from_args(&args)?);

    if args.github_token.as_deref().is_none_or(|t| t.trim().is_empty()) {
        warn!("GITHUB_TOKEN not set, GitHub API calls are unauthenticated");
    }

    // evict rate limit keys whose windows closed long ago
    let prune_state = Arc::clone(&state);
    let prune_every = args.prune_interval();
    tokio::spawn(async move {
        let mut ticker = interval(prune_every);
        loop {
            ticker.tick().await;
            let removed = prune_state.rate_limiter.prune_expired(Instant::now());
            let tracked = prune_state.rate_limiter.tracked_keys();
            RATE_LIMIT_KEYS.set(tracked as f64);
            if removed > 0 {
                debug!(removed, tracked, "Pruned rate limit entries");
            }
        }
    });

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Preview server running on http://{}", listener.local_addr()?);
    info!("GitHub API at {}", args.github_api_url);
    info!(
        "Star counter for {} (cache TTL {} seconds)",
        state.star_cache.repository(),
        args.cache_ttl
    );
    info!(
        "Rate limit: {} requests per {} seconds",
        state.rate_limiter.max_requests(),
        state.rate_limiter.window().as_secs()
    );
    if args.production {
        info!(
            "Expected origins: {}",
            state.origin_policy.allowed_origins().join(", ")
        );
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
