//! Account endpoints.
//!
//! - POST `/register` - Create an account and issue tokens
//! - POST `/login` - Check credentials and issue tokens
//! - GET `/user` - Current identity (requires the `USER` role)

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::ApiError;
use super::tokens::{issue_tokens, mint_tokens};
use crate::auth::{Auth, HasAuthBackend, UserOnly, require_auth};
use crate::db::{Database, User, UserRole};
use crate::jwt::TokenCodec;
use crate::password::PasswordHasher;

#[derive(Clone)]
pub struct UsersState {
    pub db: Database,
    pub jwt: Arc<TokenCodec>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl HasAuthBackend for UsersState {
    fn jwt(&self) -> &TokenCodec {
        &self.jwt
    }
    fn db(&self) -> &Database {
        &self.db
    }
}

pub fn router(state: UsersState) -> Router {
    let protected = Router::new()
        .route("/user", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<UsersState>,
        ))
        .with_state(state.clone());

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .with_state(state)
        .merge(protected)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const EMAIL_TAKEN: &str = "Email already registered";

async fn register(
    State(state): State<UsersState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if state.db.users().load(&payload.email)?.is_some() {
        return Err(ApiError::Conflict(EMAIL_TAKEN));
    }

    let hasher = state.hasher.clone();
    let password = payload.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    // An account is only saved once its refresh token is accepted.
    let issued = mint_tokens(&state.jwt, &payload.email)?;
    state.db.tokens().add(&issued.refresh_token)?;

    let saved = state.db.users().save(User {
        email: payload.email.clone(),
        password_hash,
        role: UserRole::User,
    });
    match saved {
        Ok(true) => {}
        Ok(false) => {
            discard_refresh_token(&state.db, &issued.refresh_token);
            return Err(ApiError::Conflict(EMAIL_TAKEN));
        }
        Err(e) => {
            discard_refresh_token(&state.db, &issued.refresh_token);
            return Err(e.into());
        }
    }

    info!(email = %payload.email, "User registered");

    Ok(Json(issued))
}

fn discard_refresh_token(db: &Database, token: &str) {
    if let Err(e) = db.tokens().remove(token) {
        warn!(error = %e, "Failed to discard refresh token of aborted registration");
    }
}

async fn login(
    State(state): State<UsersState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(user) = state.db.users().load(&payload.email)? else {
        warn!(email = %payload.email, "Login for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    let hasher = state.hasher.clone();
    let password = payload.password;
    let stored_hash = user.password_hash;
    let matches =
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await??;

    if !matches {
        warn!(email = %user.email, "Login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    info!(email = %user.email, "User logged in");

    Ok(Json(issue_tokens(&state.jwt, &state.db, &user.email)?))
}

/// Return the authenticated identity. The password hash never leaves the
/// directory.
async fn current_user(auth: Auth<UserOnly>) -> impl IntoResponse {
    Json(auth.identity)
}
