use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures talking to the GitHub REST API.
#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("repository not found")]
    NotFound,

    #[error("GitHub API returned status {0}")]
    Status(u16),

    #[error("GitHub API request timed out")]
    Timeout,

    #[error("GitHub API request failed: {0}")]
    Transport(String),

    #[error("malformed GitHub API response: {0}")]
    Decode(String),

    #[error("invalid repository name: {0}")]
    InvalidName(String),
}

impl GitHubError {
    /// The repository does not exist (or is not visible to us).
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::NotFound | GitHubError::InvalidName(_))
    }

    pub fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GitHubError::Timeout
        } else if e.is_decode() {
            GitHubError::Decode(e.to_string())
        } else {
            GitHubError::Transport(e.to_string())
        }
    }
}

/// Why the star cache could not produce a count.
#[derive(Debug, Error)]
pub enum StarCacheError {
    #[error("star count unavailable: {0}")]
    Unavailable(#[source] GitHubError),

    #[error("star count {0} is not an integer in the accepted range")]
    InvalidCount(serde_json::Number),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),

    #[error("pixel buffer does not match the canvas size")]
    Buffer,

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("render task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("star repository must look like owner/name, got {0:?}")]
    StarRepo(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing username or repo parameter")]
    InvalidInput,

    #[error("Repository not found or rate limit exceeded")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Failed to fetch star count")]
    UpstreamUnavailable,

    #[error("Invalid data received")]
    DataValidation,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UpstreamUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DataValidation | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain text body, used by the image endpoint.
    pub fn into_text(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<StarCacheError> for ApiError {
    fn from(e: StarCacheError) -> Self {
        match e {
            StarCacheError::Unavailable(_) => ApiError::UpstreamUnavailable,
            StarCacheError::InvalidCount(_) => ApiError::DataValidation,
        }
    }
}

// JSON `{error}` body, used by the stars endpoint
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
