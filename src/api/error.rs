//! Error responses for the account and token endpoints.
//!
//! Client errors carry a fixed message. Server-side failures keep their
//! source so it can be logged, and only a generic message reaches the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::task::JoinError;
use tracing::error;

use crate::db::StoreError;
use crate::jwt::JwtError;
use crate::password::PasswordError;

#[derive(Debug)]
pub enum ApiError {
    Forbidden(&'static str),
    Unauthorized(&'static str),
    Conflict(&'static str),
    /// User directory or token cache failed
    Storage(StoreError),
    /// Hasher failed or the stored hash is unreadable
    Password(PasswordError),
    /// A blocking hash/verify task panicked or was cancelled
    Worker(JoinError),
    /// Signing a new token failed
    Signing(JwtError),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Storage(e)
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        ApiError::Password(e)
    }
}

impl From<JoinError> for ApiError {
    fn from(e: JoinError) -> Self {
        ApiError::Worker(e)
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        ApiError::Signing(e)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Storage(e) => {
                error!(error = %e, "Store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage unavailable")
            }
            ApiError::Password(e) => {
                error!(error = %e, "Password check failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Password processing failed")
            }
            ApiError::Worker(e) => {
                error!(error = %e, "Password task did not complete");
                (StatusCode::INTERNAL_SERVER_ERROR, "Password processing failed")
            }
            ApiError::Signing(e) => {
                error!(error = %e, "Token signing failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate token")
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
