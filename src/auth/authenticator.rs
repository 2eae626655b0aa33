//! Turns a bearer token into an authenticated identity.

use tracing::{debug, error};

use super::errors::AuthErrorKind;
use super::types::Identity;
use crate::db::{UserDirectory, UserRole};
use crate::jwt::{TokenCodec, TokenKind};

/// Role given to every authenticated identity. The stored role is not
/// consulted on this path.
pub const DEFAULT_ROLE: UserRole = UserRole::User;

/// Validates access tokens against the codec and the user directory.
/// Read-only: never writes to the directory.
pub struct Authenticator<'a> {
    jwt: &'a TokenCodec,
    users: &'a dyn UserDirectory,
}

impl<'a> Authenticator<'a> {
    pub fn new(jwt: &'a TokenCodec, users: &'a dyn UserDirectory) -> Self {
        Self { jwt, users }
    }

    pub fn authenticate(&self, token: &str) -> Result<Identity, AuthErrorKind> {
        // Signature and expiry are both checked by decode
        let claims = self.jwt.decode(token).map_err(|e| {
            debug!("Rejected token: {}", e);
            AuthErrorKind::InvalidToken
        })?;

        if claims.kind != TokenKind::AccessToken {
            debug!(kind = ?claims.kind, "Rejected non-access token");
            return Err(AuthErrorKind::WrongTokenKind);
        }

        let user = self
            .users
            .load(&claims.email)
            .map_err(|e| {
                error!("Failed to load user: {}", e);
                AuthErrorKind::StorageUnavailable
            })?
            .ok_or(AuthErrorKind::UserNotFound)?;

        Ok(Identity {
            email: user.email,
            role: DEFAULT_ROLE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryUserDirectory, StoreError, User};

    const SECRET: &[u8] = b"test-secret-key-for-testing";

    fn directory_with(email: &str, role: UserRole) -> InMemoryUserDirectory {
        let users = InMemoryUserDirectory::new();
        users
            .save(User {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                role,
            })
            .unwrap();
        users
    }

    struct BrokenDirectory;

    impl UserDirectory for BrokenDirectory {
        fn load(&self, _email: &str) -> Result<Option<User>, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn save(&self, _user: User) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
        fn update(&self, _user: User) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[test]
    fn test_known_user_authenticates() {
        let jwt = TokenCodec::new(SECRET);
        let users = directory_with("a@b.co", UserRole::User);
        let token = jwt.create_access_token("a@b.co").unwrap().token;

        let identity = Authenticator::new(&jwt, &users).authenticate(&token).unwrap();

        assert_eq!(identity.email, "a@b.co");
        assert_eq!(identity.role, UserRole::User);
    }

    #[test]
    fn test_stored_role_is_overridden_with_default() {
        let jwt = TokenCodec::new(SECRET);
        let users = directory_with("admin@b.co", UserRole::Admin);
        let token = jwt.create_access_token("admin@b.co").unwrap().token;

        let identity = Authenticator::new(&jwt, &users).authenticate(&token).unwrap();

        assert_eq!(identity.role, DEFAULT_ROLE);
        // The directory is left untouched
        assert_eq!(
            users.load("admin@b.co").unwrap().unwrap().role,
            UserRole::Admin
        );
    }

    #[test]
    fn test_unknown_user_rejected() {
        let jwt = TokenCodec::new(SECRET);
        let users = directory_with("a@b.co", UserRole::User);
        let token = jwt.create_access_token("nobody@b.co").unwrap().token;

        let result = Authenticator::new(&jwt, &users).authenticate(&token);

        assert_eq!(result, Err(AuthErrorKind::UserNotFound));
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        let jwt = TokenCodec::new(SECRET);
        let users = directory_with("a@b.co", UserRole::User);
        let authenticator = Authenticator::new(&jwt, &users);

        let expired = TokenCodec::with_lifetimes(SECRET, -60, -60)
            .create_access_token("a@b.co")
            .unwrap()
            .token;
        let forged = TokenCodec::new(b"another-secret")
            .create_access_token("a@b.co")
            .unwrap()
            .token;

        for token in ["", "garbage", expired.as_str(), forged.as_str()] {
            assert_eq!(
                authenticator.authenticate(token),
                Err(AuthErrorKind::InvalidToken)
            );
        }
    }

    #[test]
    fn test_refresh_token_not_accepted_as_access_token() {
        let jwt = TokenCodec::new(SECRET);
        let users = directory_with("a@b.co", UserRole::User);
        let token = jwt.create_refresh_token("a@b.co").unwrap().token;

        let result = Authenticator::new(&jwt, &users).authenticate(&token);

        assert_eq!(result, Err(AuthErrorKind::WrongTokenKind));
    }

    #[test]
    fn test_storage_failure_is_not_unauthenticated() {
        let jwt = TokenCodec::new(SECRET);
        let token = jwt.create_access_token("a@b.co").unwrap().token;

        let result = Authenticator::new(&jwt, &BrokenDirectory).authenticate(&token);

        assert_eq!(result, Err(AuthErrorKind::StorageUnavailable));
    }
}
