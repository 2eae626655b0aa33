#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use tokengate::{
    ServerConfig, create_app,
    db::{Database, User, UserRole},
    jwt::TokenCodec,
    password::{Argon2Hasher, PasswordHasher},
};
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-token-secret-for-integration";

/// Create a test app and return (app, db, codec sharing the app's secret).
pub fn create_test_app() -> (Router, Database, TokenCodec) {
    create_test_app_with_db(Database::in_memory())
}

pub fn create_test_app_with_db(db: Database) -> (Router, Database, TokenCodec) {
    let config = ServerConfig {
        db: db.clone(),
        token_secret: TEST_SECRET.to_vec(),
        hasher: None,
    };
    (create_app(&config), db, TokenCodec::new(TEST_SECRET))
}

/// Store a user directly in the directory with an Argon2 hash of `password`.
pub fn create_user(db: &Database, email: &str, password: &str) {
    let password_hash = Argon2Hasher::new().hash(password).unwrap();
    let created = db
        .users()
        .save(User {
            email: email.to_string(),
            password_hash,
            role: UserRole::User,
        })
        .unwrap();
    assert!(created, "user {} already exists", email);
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// GET a path, optionally with an `Authorization` header.
pub async fn get(app: &Router, uri: &str, authorization: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

/// POST a JSON body to a path.
pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Register through the API and return the issuance body.
pub async fn register(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let (status, body) = post_json(
        app,
        "/register",
        serde_json::json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "register failed: {}", body);
    body
}
