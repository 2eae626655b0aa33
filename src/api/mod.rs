mod error;
mod tokens;
mod users;

use axum::Router;
use std::sync::Arc;

use crate::db::Database;
use crate::jwt::TokenCodec;
use crate::password::PasswordHasher;

pub use error::ApiError;
pub use tokens::TokenResponse;

/// Create the API router.
pub fn create_api_router(
    db: Database,
    jwt: Arc<TokenCodec>,
    hasher: Arc<dyn PasswordHasher>,
) -> Router {
    let tokens_state = tokens::TokensState {
        db: db.clone(),
        jwt: jwt.clone(),
    };

    let users_state = users::UsersState { db, jwt, hasher };

    Router::new()
        .merge(users::router(users_state))
        .merge(tokens::router(tokens_state))
}
