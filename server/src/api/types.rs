//! Shared API types

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::metrics::{FieldError, IngestError};

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    Validation { errors: Vec<FieldError> },
    Internal { message: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::ValidationFailed(errors) => Self::Validation { errors },
            IngestError::CatalogFailure(e) => {
                tracing::error!(error = %e, "Catalog registration failed");
                Self::internal("Metric metadata registration failed")
            }
            IngestError::StoreFailure(e) => {
                tracing::error!(error = %e, "Metric store insert failed");
                Self::internal("Metric persistence failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation { errors } => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "bad_request",
                    "code": "VALIDATION_ERROR",
                    "message": format!("{} validation error(s)", errors.len()),
                    "errors": errors
                }),
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "internal_error",
                    "code": "INTERNAL",
                    "message": message
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
