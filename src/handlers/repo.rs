use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::error::{ApiError, RenderError};
use crate::metrics::{RENDER_LATENCY, REQUEST_TOTAL, UPSTREAM_ERRORS};
use crate::preview;
use crate::state::AppState;

const IMAGE_CACHE_CONTROL: &str = "public, immutable, no-transform, max-age=31536000";

#[derive(Debug, Deserialize)]
pub struct RepoQuery {
    pub username: Option<String>,
    pub repo: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// GET /api/repo?username=&repo=
pub async fn repo_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RepoQuery>,
) -> Response {
    REQUEST_TOTAL.with_label_values(&["repo"]).inc();

    match render_preview(&state, query).await {
        Ok(png) => (
            [
                (header::CONTENT_TYPE, "image/png"),
                (header::CACHE_CONTROL, IMAGE_CACHE_CONTROL),
            ],
            png,
        )
            .into_response(),
        Err(e) => e.into_text(),
    }
}

async fn render_preview(state: &AppState, query: RepoQuery) -> Result<Vec<u8>, ApiError> {
    let (Some(username), Some(repo)) = (non_empty(query.username), non_empty(query.repo)) else {
        return Err(ApiError::InvalidInput);
    };

    let metadata = state
        .github
        .fetch_repository(&username, &repo)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                debug!(%username, %repo, "Repository not found");
            } else {
                UPSTREAM_ERRORS.inc();
                warn!(%username, %repo, error = %e, "Repository metadata unavailable");
            }
            ApiError::NotFound
        })?;

    // Languages are best effort, the card falls back to the primary language
    let languages = match state.github.fetch_languages(&username, &repo).await {
        Ok(langs) => Some(langs),
        Err(e) => {
            UPSTREAM_ERRORS.inc();
            warn!(%username, %repo, error = %e, "Language breakdown unavailable");
            None
        }
    };

    let date_format = state.date_format.clone();
    let timer = RENDER_LATENCY.start_timer();
    let rendered = tokio::task::spawn_blocking(move || {
        preview::render(&metadata, languages.as_ref(), &date_format)
    })
    .await
    .unwrap_or_else(|e| Err(RenderError::Task(e.to_string())));
    timer.observe_duration();

    rendered.map_err(|e| {
        error!(%username, %repo, error = %e, "Failed to generate preview");
        ApiError::Internal(format!("Failed to generate the image: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use crate::github::mock::{MockGitHub, sample_repository};
    use crate::test_support::{header, http_client, spawn_app};
    use reqwest::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn returns_png_of_fixed_size() {
        let mock = Arc::new(
            MockGitHub::new()
                .with_repository(sample_repository())
                .with_languages(&[("TypeScript", 9000), ("CSS", 300)]),
        );
        let app = spawn_app(mock.clone()).await;

        let res = http_client()
            .get(app.url("/api/repo?username=LucasCur&repo=github-bio"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "content-type"), "image/png");
        let png = res.bytes().await.unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1200, 400));
    }

    #[tokio::test]
    async fn language_failure_is_not_fatal() {
        let mock = Arc::new(MockGitHub::new().with_repository(sample_repository()));
        let app = spawn_app(mock.clone()).await;

        let res = http_client()
            .get(app.url("/api/repo?username=LucasCur&repo=github-bio"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            mock.language_calls.load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn missing_params_are_rejected_without_upstream_calls() {
        let mock = Arc::new(MockGitHub::new().with_repository(sample_repository()));
        let app = spawn_app(mock.clone()).await;

        for path in [
            "/api/repo",
            "/api/repo?username=LucasCur",
            "/api/repo?repo=github-bio",
            "/api/repo?username=&repo=github-bio",
            "/api/repo?username=%20%20&repo=github-bio",
        ] {
            let res = http_client().get(app.url(path)).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
            assert_eq!(
                res.text().await.unwrap(),
                "Missing username or repo parameter"
            );
        }
        assert_eq!(mock.upstream_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_repository_is_404() {
        let mock = Arc::new(MockGitHub::new());
        let app = spawn_app(mock.clone()).await;

        let res = http_client()
            .get(app.url("/api/repo?username=nobody&repo=nothing"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            res.text().await.unwrap(),
            "Repository not found or rate limit exceeded"
        );
        // no language lookup after a failed metadata fetch
        assert_eq!(
            mock.language_calls.load(std::sync::atomic::Ordering::SeqCst),
            0
        );
    }
}
