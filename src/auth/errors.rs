//! Authentication error types.

use axum::response::{IntoResponse, Response};

/// Why a request could not be authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No `Authorization` header, or an empty one
    MissingCredentials,
    /// Header present but not `Bearer <token>`
    MalformedHeader,
    /// Bad signature, expired, or unparseable token
    InvalidToken,
    /// Valid token of a kind other than access token
    WrongTokenKind,
    /// Valid token for an email that is not registered
    UserNotFound,
    /// Authenticated, but the role does not permit the operation
    InsufficientRole,
    /// User directory could not be read
    StorageUnavailable,
}

/// Authentication errors returned to API clients as JSON.
#[derive(Debug)]
pub struct ApiAuthError {
    pub(super) kind: AuthErrorKind,
}

impl ApiAuthError {
    pub(super) fn new(kind: AuthErrorKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> AuthErrorKind {
        self.kind
    }

    fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self.kind {
            AuthErrorKind::MissingCredentials | AuthErrorKind::InsufficientRole => {
                StatusCode::FORBIDDEN
            }
            AuthErrorKind::MalformedHeader
            | AuthErrorKind::InvalidToken
            | AuthErrorKind::WrongTokenKind
            | AuthErrorKind::UserNotFound => StatusCode::UNAUTHORIZED,
            AuthErrorKind::StorageUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Unknown users get the invalid-token message; registered emails stay
    // indistinguishable.
    fn message(&self) -> &'static str {
        match self.kind {
            AuthErrorKind::MissingCredentials => "Not authenticated",
            AuthErrorKind::MalformedHeader => "Malformed authorization header",
            AuthErrorKind::InvalidToken
            | AuthErrorKind::WrongTokenKind
            | AuthErrorKind::UserNotFound => "Invalid or expired token",
            AuthErrorKind::InsufficientRole => "Insufficient permissions",
            AuthErrorKind::StorageUnavailable => "Storage unavailable",
        }
    }
}

impl From<AuthErrorKind> for ApiAuthError {
    fn from(kind: AuthErrorKind) -> Self {
        Self::new(kind)
    }
}

impl IntoResponse for ApiAuthError {
    fn into_response(self) -> Response {
        use axum::Json;
        use serde::Serialize;

        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
