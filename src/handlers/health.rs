use axum::{Json, response::IntoResponse};

// health handler
pub async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use crate::github::mock::MockGitHub;
    use crate::test_support::{header, http_client, spawn_app};
    use reqwest::StatusCode;
    use std::sync::Arc;

    #[tokio::test]
    async fn health_and_metrics_are_served() {
        let app = spawn_app(Arc::new(MockGitHub::new())).await;
        let client = http_client();

        let res = client.get(app.url("/health")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["status"], "healthy");
        assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());

        client.get(app.url("/api/repo")).send().await.unwrap();
        let res = client.get(app.url("/metrics")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert!(header(&res, "content-type").starts_with("text/plain"));
        let text = res.text().await.unwrap();
        assert!(text.contains("preview_rate_limit_keys"));
        assert!(text.contains("preview_requests_total"));
    }
}
