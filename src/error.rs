//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Generic message for 500 responses. Causes are logged, never sent to the client.
const INTERNAL_MESSAGE: &str = "an error occurred while processing the request";

#[derive(Error, Debug)]
pub enum AppError {
    /// No row with the requested id. Rendered as 404 with an empty body;
    /// the message is for logs only.
    #[error("not found: {0}")]
    NotFound(String),
    /// Rejected input: missing/empty required field, out-of-range value,
    /// malformed patch document, or an unparseable request body.
    #[error("{message}")]
    Validation {
        message: String,
        details: Option<serde_json::Value>,
    },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            details: None,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation {
            message: "validation failed".into(),
            details: serde_json::to_value(&errors).ok(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Internal(e.to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

fn error_response(
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code,
            message,
            details,
        },
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                tracing::debug!(%what, "row not found");
                StatusCode::NOT_FOUND.into_response()
            }
            AppError::Validation { message, details } => {
                error_response(StatusCode::BAD_REQUEST, "validation_error", message, details)
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.into(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    INTERNAL_MESSAGE.into(),
                    None,
                )
            }
        }
    }
}
