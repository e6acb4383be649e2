//! Application error taxonomy and its HTTP mapping.
//!
//! Every error leaves the service as a JSON envelope:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short URL not found", "details": { "id": "abcd1234" } } }
//! ```
//!
//! Server-side failures carry a generic message and empty details; the
//! underlying cause is logged instead of returned.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned to clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body or parameters could not be accepted.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The identifier does not have the shape of a short identifier.
    #[error("Invalid short identifier")]
    InvalidIdentifier { id: String },

    /// The identifier is well-formed but no record holds it.
    #[error("Short URL not found")]
    NotFound { id: String },

    /// Every candidate window of the digest collided.
    #[error("Identifier allocation exhausted after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidIdentifier { .. } => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AllocationExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(StoreError::DuplicateKey(_) | StoreError::Backend(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the client-facing description of this error.
    pub fn to_error_info(&self) -> ErrorInfo {
        match self {
            AppError::Validation { message, details } => ErrorInfo {
                code: "validation_error",
                message: message.clone(),
                details: details.clone(),
            },
            AppError::InvalidIdentifier { id } => ErrorInfo {
                code: "invalid_identifier",
                message: self.to_string(),
                details: json!({ "id": id, "expected_length": crate::domain::entities::SHORT_ID_LEN }),
            },
            AppError::NotFound { id } => ErrorInfo {
                code: "not_found",
                message: self.to_string(),
                details: json!({ "id": id }),
            },
            AppError::AllocationExhausted { .. } => ErrorInfo {
                code: "allocation_exhausted",
                message: "Could not allocate a short identifier".to_string(),
                details: json!({}),
            },
            AppError::Store(StoreError::Unavailable(_)) => ErrorInfo {
                code: "store_unavailable",
                message: "Service temporarily unavailable".to_string(),
                details: json!({}),
            },
            AppError::Store(_) => ErrorInfo {
                code: "internal_error",
                message: "Internal server error".to_string(),
                details: json!({}),
            },
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Malformed request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}
