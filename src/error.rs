use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Too many login attempts")]
    TooManyAttempts,

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid CORS origin `{0}`")]
    InvalidOrigin(String),
}

impl VaultError {
    pub fn validation(msg: impl Into<String>) -> Self {
        VaultError::Validation(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            VaultError::Validation(_) => StatusCode::BAD_REQUEST,
            VaultError::InvalidPassword | VaultError::InvalidToken => StatusCode::UNAUTHORIZED,
            VaultError::NotFound(_) => StatusCode::NOT_FOUND,
            VaultError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            VaultError::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            VaultError::DatabaseError(_)
            | VaultError::JsonError(_)
            | VaultError::IoError(_)
            | VaultError::InvalidOrigin(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for VaultError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let detail = if status.is_server_error() {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiErrorBody { detail })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub detail: String,
}
