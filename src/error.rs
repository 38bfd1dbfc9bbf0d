//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error("entry not found: {0}")]
    NotFound(String),
    #[error("entry id already exists: {0}")]
    Conflict(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("failed to {action}: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl AppError {
    /// Tag a raw database error with the operation that failed, e.g. "create entry".
    pub fn during(self, action: &'static str) -> Self {
        match self {
            AppError::Db(source) => AppError::Store { action, source },
            other => other,
        }
    }
}

/// Error body consumed by the frontend: `{"error": ..., "details": ...}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg.clone(),
                    details: None,
                },
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    error: msg.clone(),
                    details: None,
                },
            ),
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "Entry not found".into(),
                    details: None,
                },
            ),
            AppError::Conflict(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Failed to create entry".into(),
                    details: Some(self.to_string()),
                },
            ),
            AppError::Store { action, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: format!("Failed to {}", action),
                    details: Some(source.to_string()),
                },
            ),
            AppError::Db(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Database error".into(),
                    details: Some(e.to_string()),
                },
            ),
            AppError::Config(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: "Configuration error".into(),
                    details: Some(e.to_string()),
                },
            ),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(body)).into_response()
    }
}
