use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned to clients when the generation gateway throttles us
pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded, please try again later.";

/// Message returned to clients when the generation gateway is out of credits
pub const QUOTA_EXCEEDED_MESSAGE: &str = "Payment required. Please add credits to continue.";

/// Message returned to clients for any other gateway failure
pub const UPSTREAM_MESSAGE: &str = "Failed to get AI recommendations";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Configuration(String),

    #[error("{}", RATE_LIMITED_MESSAGE)]
    RateLimited,

    #[error("{}", QUOTA_EXCEEDED_MESSAGE)]
    QuotaExceeded,

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("{0}")]
    Unknown(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status this error is surfaced with
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::QuotaExceeded => StatusCode::PAYMENT_REQUIRED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Configuration(_)
            | AppError::Upstream(_)
            | AppError::Unknown(_)
            | AppError::Database(_)
            | AppError::Cache(_)
            | AppError::HttpClient(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Upstream detail goes to the logs, not to the client
        let message = match &self {
            AppError::Upstream(_) => UPSTREAM_MESSAGE.to_string(),
            AppError::NotFound(msg) | AppError::InvalidInput(msg) => msg.clone(),
            _ => self.to_string(),
        };

        // The gateway client already logged upstream failures
        if status.is_server_error() && !matches!(self, AppError::Upstream(_)) {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
