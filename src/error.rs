use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::services::seat_map::LayoutError;

/// Field name → human readable problem, returned on form validation failures
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed for {}", .0.keys().copied().collect::<Vec<_>>().join(", "))]
    Validation(FieldErrors),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Couldn't load movie {0}")]
    MovieUnavailable(String),

    #[error("Seat layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string(), "fields": fields }),
            ),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() })),
            AppError::MovieUnavailable(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "couldn't load", "home": "/" }),
            ),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, json!({ "error": msg })),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() })),
            AppError::Cache(_) | AppError::Layout(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
