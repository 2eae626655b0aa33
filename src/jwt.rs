//! Signed token creation and validation.
//!
//! Tokens are HS256 JWTs carrying the account email, the token kind in `sub`,
//! and an expiration. The kind decides what a token may be used for:
//! access tokens authenticate requests, refresh tokens are exchanged for new
//! access tokens at `/refresh`.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access token lifetime: 5 minutes
pub const ACCESS_TOKEN_DURATION_SECS: i64 = 5 * 60;

/// Refresh token lifetime: 5 days
pub const REFRESH_TOKEN_DURATION_SECS: i64 = 5 * 24 * 60 * 60;

/// Prefix of the `Authorization` header value for the bearer scheme.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Token kind, stored in the `sub` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Short-lived token sent with every protected request
    AccessToken,
    /// Long-lived token exchanged for new access tokens
    RefreshToken,
}

/// Claims shared by access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token kind
    #[serde(rename = "sub")]
    pub kind: TokenKind,
    /// Account email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id, keeps tokens minted in the same second distinct
    pub jti: String,
}

/// A freshly signed token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The compact JWT string
    pub token: String,
    /// Expiration as embedded in the `exp` claim
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds
    pub duration: i64,
}

/// Signing/verification keys and token lifetimes.
///
/// Built once at startup from the configured secret and shared read-only.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_duration: i64,
    refresh_duration: i64,
}

impl TokenCodec {
    /// Create a codec with the default lifetimes.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_lifetimes(
            secret,
            ACCESS_TOKEN_DURATION_SECS,
            REFRESH_TOKEN_DURATION_SECS,
        )
    }

    /// Create a codec with explicit lifetimes in seconds.
    /// A negative lifetime yields tokens that are already expired.
    pub fn with_lifetimes(secret: &[u8], access_secs: i64, refresh_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_duration: access_secs,
            refresh_duration: refresh_secs,
        }
    }

    /// Create a short-lived access token for presenting on protected routes.
    pub fn create_access_token(&self, email: &str) -> Result<IssuedToken, JwtError> {
        self.create_token(TokenKind::AccessToken, email, self.access_duration)
    }

    /// Create a long-lived refresh token. It is only useful once added to
    /// the token cache.
    pub fn create_refresh_token(&self, email: &str) -> Result<IssuedToken, JwtError> {
        self.create_token(TokenKind::RefreshToken, email, self.refresh_duration)
    }

    fn create_token(
        &self,
        kind: TokenKind,
        email: &str,
        duration: i64,
    ) -> Result<IssuedToken, JwtError> {
        let now = Utc::now().timestamp();
        let exp = now + duration;
        let expires_at = DateTime::from_timestamp(exp, 0).ok_or(JwtError::TimeError)?;

        let claims = Claims {
            kind,
            email: email.to_string(),
            iat: now,
            exp,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            expires_at,
            duration,
        })
    }

    /// Verify the signature and expiration and return the claims.
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(JwtError::Decoding)
    }

    /// Whether the token was signed with our key and has not expired.
    /// Never fails: every decoding error counts as invalid.
    pub fn is_valid(&self, token: &str) -> bool {
        self.decode(token).is_ok()
    }

    /// Get the email the token was issued for. Fails on any token that
    /// `decode` rejects.
    pub fn extract_claim_email(&self, token: &str) -> Result<String, JwtError> {
        self.decode(token).map(|claims| claims.email)
    }

    /// Get the token's expiration time as a UTC timestamp.
    pub fn claim_expires_at(&self, token: &str) -> Result<DateTime<Utc>, JwtError> {
        let claims = self.decode(token)?;
        DateTime::from_timestamp(claims.exp, 0).ok_or(JwtError::TimeError)
    }
}

/// Strip the `Bearer ` prefix from an `Authorization` header value.
///
/// The prefix is matched case-sensitively and the remaining token must be
/// non-empty.
pub fn parse_authorization_header(header: &str) -> Result<&str, JwtError> {
    match header.strip_prefix(BEARER_PREFIX) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(JwtError::MalformedHeader),
    }
}

/// Errors that can occur during token operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding or verifying the token (bad signature, expired, malformed)
    Decoding(jsonwebtoken::errors::Error),
    /// Timestamp out of range
    TimeError,
    /// `Authorization` header is not in `Bearer <token>` form
    MalformedHeader,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::TimeError => write!(f, "Timestamp out of range"),
            JwtError::MalformedHeader => write!(f, "Malformed authorization header"),
        }
    }
}

impl std::error::Error for JwtError {}
