//! Application error type and its HTTP mapping.
//!
//! Every fallible core operation returns [`AppError`]. Handlers return it
//! directly and rely on the [`IntoResponse`] impl to produce a JSON error body:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short link not found", "details": { "id": "ab12_" } } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The caller sent something malformed (bad target URL, bad request body).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The identifier has no backing link. Expected, never logged as an error.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The identifier generator hit its attempt ceiling.
    #[error("Failed to generate a unique identifier after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// The underlying store failed unexpectedly.
    #[error("{message}")]
    Storage { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::GenerationExhausted { .. } => "generation_exhausted",
            AppError::Storage { .. } => "storage_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::GenerationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let details = match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Storage { details, .. } => details.clone(),
            AppError::GenerationExhausted { attempts } => json!({ "attempts": attempts }),
        };

        ErrorInfo {
            code: self.code(),
            message: self.to_string(),
            details,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Storage { .. } | AppError::GenerationExhausted { .. } => {
                tracing::error!(error = %self, "request failed");
            }
            AppError::Validation { .. } | AppError::NotFound { .. } => {
                tracing::debug!(error = %self, "request rejected");
            }
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
