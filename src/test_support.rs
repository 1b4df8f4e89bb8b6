use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Args;
use crate::github::GitHubApi;
use crate::state::AppState;

pub struct TestApp {
    pub addr: SocketAddr,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn_app(github: Arc<dyn GitHubApi>) -> TestApp {
    spawn_app_with(github, &[]).await
}

/// Serve the real router on an ephemeral port with `extra` CLI flags.
pub async fn spawn_app_with(github: Arc<dyn GitHubApi>, extra: &[&str]) -> TestApp {
    let mut argv = vec!["repo-preview", "--star-repo", "LucasCur/github-bio"];
    argv.extend_from_slice(extra);
    let args = Args::try_parse_from(argv).unwrap();
    let state = Arc::new(AppState::with_github(github, &args).unwrap());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, crate::router(state)).await.unwrap();
    });
    TestApp { addr }
}

// Loopback requests must not be routed through a proxy from the environment
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn header(res: &reqwest::Response, name: &str) -> String {
    res.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
