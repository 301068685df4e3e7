//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error, including constraint violations
///   raised by the store (duplicate key, unknown owner)
/// - **Resource Errors**: Requested API key not found
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed.
    ///
    /// Constraint violations are carried here unchanged; use
    /// [`AppError::is_unique_violation`] and
    /// [`AppError::is_foreign_key_violation`] to tell them apart.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No record matches the requested API key.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("API key not found")]
    ApiKeyNotFound,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// True when the store rejected a write because the API key already exists.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
            _ => false,
        }
    }

    /// True when the store rejected a write because the owner does not exist.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
            _ => false,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `ApiKeyNotFound` → 404 Not Found
/// - `InvalidRequest` → 400 Bad Request
/// - `Database` (unique violation) → 409 Conflict
/// - `Database` (foreign key violation) → 422 Unprocessable Entity
/// - `Database` (anything else) → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::ApiKeyNotFound => {
                (StatusCode::NOT_FOUND, "api_key_not_found", self.to_string())
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(_) if self.is_unique_violation() => (
                StatusCode::CONFLICT,
                "api_key_exists",
                "API key already exists".to_string(),
            ),
            AppError::Database(_) if self.is_foreign_key_violation() => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "owner_not_found",
                "Owner user does not exist".to_string(),
            ),
            AppError::Database(ref err) => {
                tracing::error!(error = %err, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
