pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;

use api::create_api_router;
use axum::Router;
use db::Database;
use jwt::TokenCodec;
use password::{Argon2Hasher, PasswordHasher};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// User directory and refresh token cache (cloneable, shared stores)
    pub db: Database,
    /// Secret used to derive the token signing key
    pub token_secret: Vec<u8>,
    /// Password hasher, Argon2 when not set
    pub hasher: Option<Arc<dyn PasswordHasher>>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(TokenCodec::new(&config.token_secret));
    let hasher: Arc<dyn PasswordHasher> = match &config.hasher {
        Some(hasher) => hasher.clone(),
        None => Arc::new(Argon2Hasher::new()),
    };

    create_api_router(config.db.clone(), jwt, hasher)
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
