//! Request authentication middleware.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};

use super::authenticator::Authenticator;
use super::errors::{ApiAuthError, AuthErrorKind};
use super::state::HasAuthBackend;
use super::types::Identity;
use crate::jwt::parse_authorization_header;

/// Authenticate the bearer token of a request from its headers.
///
/// A missing or empty header is reported separately from a malformed one:
/// the first maps to 403, the second to 401.
pub fn authenticate_headers<S: HasAuthBackend>(
    headers: &HeaderMap,
    state: &S,
) -> Result<Identity, AuthErrorKind> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthErrorKind::MissingCredentials)?;

    if header.is_empty() {
        return Err(AuthErrorKind::MissingCredentials);
    }

    let header = header
        .to_str()
        .map_err(|_| AuthErrorKind::MalformedHeader)?;
    let token = parse_authorization_header(header).map_err(|_| AuthErrorKind::MalformedHeader)?;

    Authenticator::new(state.jwt(), state.db().users()).authenticate(token)
}

/// Middleware guarding protected routes.
///
/// On success the `Identity` is inserted into the request extensions for the
/// `Auth` extractor; otherwise the request is answered with an auth error and
/// the handler never runs.
///
/// ```ignore
/// Router::new()
///     .route("/user", get(current_user))
///     .layer(middleware::from_fn_with_state(state.clone(), require_auth::<UsersState>))
/// ```
pub async fn require_auth<S>(
    State(state): State<S>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiAuthError>
where
    S: HasAuthBackend + Clone + Send + Sync + 'static,
{
    let identity = authenticate_headers(request.headers(), &state).map_err(|kind| {
        tracing::debug!(?kind, path = %request.uri().path(), "Request not authenticated");
        ApiAuthError::from(kind)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, User, UserRole};
    use crate::jwt::TokenCodec;
    use axum::http::HeaderValue;

    const SECRET: &[u8] = b"test-secret-key-for-testing";

    struct TestState {
        jwt: TokenCodec,
        db: Database,
    }

    impl HasAuthBackend for TestState {
        fn jwt(&self) -> &TokenCodec {
            &self.jwt
        }
        fn db(&self) -> &Database {
            &self.db
        }
    }

    fn state_with_user(email: &str) -> TestState {
        let db = Database::in_memory();
        db.users()
            .save(User {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .unwrap();
        TestState {
            jwt: TokenCodec::new(SECRET),
            db,
        }
    }

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_missing_header() {
        let state = state_with_user("a@b.co");

        let result = authenticate_headers(&HeaderMap::new(), &state);

        assert_eq!(result, Err(AuthErrorKind::MissingCredentials));
    }

    #[test]
    fn test_empty_header() {
        let state = state_with_user("a@b.co");

        let result = authenticate_headers(&headers_with(""), &state);

        assert_eq!(result, Err(AuthErrorKind::MissingCredentials));
    }

    #[test]
    fn test_malformed_header() {
        let state = state_with_user("a@b.co");

        for value in ["Basic YWxhZGRpbjpvcGVuc2VzYW1l", "Bearer", "token-without-scheme"] {
            assert_eq!(
                authenticate_headers(&headers_with(value), &state),
                Err(AuthErrorKind::MalformedHeader),
                "header {:?}",
                value
            );
        }
    }

    #[test]
    fn test_valid_bearer_token() {
        let state = state_with_user("a@b.co");
        let token = state.jwt.create_access_token("a@b.co").unwrap().token;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let identity = authenticate_headers(&headers, &state).unwrap();
        assert_eq!(identity.email, "a@b.co");
    }

    #[test]
    fn test_expired_token_is_invalid_not_malformed() {
        let state = state_with_user("a@b.co");
        let token = TokenCodec::with_lifetimes(SECRET, -60, -60)
            .create_access_token("a@b.co")
            .unwrap()
            .token;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        assert_eq!(
            authenticate_headers(&headers, &state),
            Err(AuthErrorKind::InvalidToken)
        );
    }
}
