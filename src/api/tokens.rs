//! Token exchange endpoints.
//!
//! - POST `/refresh` - Exchange a refresh token for a new access token
//! - POST `/logout` - Revoke a refresh token
//!
//! Refresh tokens are not rotated: `/refresh` answers with the same refresh
//! token, which stays usable until it expires or is revoked.

use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use crate::db::Database;
use crate::jwt::{TokenCodec, TokenKind};

#[derive(Clone)]
pub struct TokensState {
    pub db: Database,
    pub jwt: Arc<TokenCodec>,
}

pub fn router(state: TokensState) -> Router {
    Router::new()
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Body returned by every endpoint that issues tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry of the access token
    pub expires_at: DateTime<Utc>,
}

const INVALID_REFRESH_TOKEN: &str = "Invalid or expired refresh token";

#[derive(Deserialize)]
struct RefreshTokenRequest {
    refresh_token: String,
}

/// Sign an access/refresh token pair for `email`. Nothing is stored.
pub(super) fn mint_tokens(jwt: &TokenCodec, email: &str) -> Result<TokenResponse, ApiError> {
    let access = jwt.create_access_token(email)?;
    let refresh = jwt.create_refresh_token(email)?;

    Ok(TokenResponse {
        email: email.to_string(),
        access_token: access.token,
        refresh_token: refresh.token,
        expires_at: access.expires_at,
    })
}

/// Mint a token pair for `email` and start accepting its refresh token at
/// `/refresh`.
pub(super) fn issue_tokens(
    jwt: &TokenCodec,
    db: &Database,
    email: &str,
) -> Result<TokenResponse, ApiError> {
    let issued = mint_tokens(jwt, email)?;
    db.tokens().add(&issued.refresh_token)?;
    Ok(issued)
}

/// Exchange a known refresh token for a new access token.
async fn refresh(
    State(state): State<TokensState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.tokens().exists(&payload.refresh_token)? {
        return Err(ApiError::Forbidden("Unknown refresh token"));
    }

    let claims = state
        .jwt
        .decode(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized(INVALID_REFRESH_TOKEN))?;
    if claims.kind != TokenKind::RefreshToken {
        return Err(ApiError::Unauthorized(INVALID_REFRESH_TOKEN));
    }

    if state.db.users().load(&claims.email)?.is_none() {
        return Err(ApiError::Unauthorized(INVALID_REFRESH_TOKEN));
    }

    let access = state.jwt.create_access_token(&claims.email)?;

    info!(email = %claims.email, "Access token refreshed");

    Ok(Json(TokenResponse {
        email: claims.email,
        access_token: access.token,
        refresh_token: payload.refresh_token,
        expires_at: access.expires_at,
    }))
}

#[derive(Serialize)]
struct LogoutResponse {
    revoked: bool,
}

/// Revoke a refresh token. Revoking an unknown token is not an error.
async fn logout(
    State(state): State<TokensState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let revoked = state.db.tokens().remove(&payload.refresh_token)?;
    if revoked {
        info!("Refresh token revoked");
    }

    Ok(Json(LogoutResponse { revoked }))
}
