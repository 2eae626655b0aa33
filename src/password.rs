//! Password hashing.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use rand::RngCore;

/// Hashes and verifies account passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with default parameters and a random 16-byte salt.
#[derive(Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        use argon2::password_hash::PasswordHasher as _;

        let mut salt_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordError::Unavailable(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Unavailable(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Unavailable(e.to_string())),
        }
    }
}

/// Errors that can occur while hashing or verifying.
#[derive(Debug)]
pub enum PasswordError {
    /// The hashing operation could not be performed
    Unavailable(String),
    /// The stored hash could not be parsed
    MalformedHash(String),
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Unavailable(e) => write!(f, "Password hashing failed: {}", e),
            PasswordError::MalformedHash(e) => write!(f, "Malformed password hash: {}", e),
        }
    }
}

impl std::error::Error for PasswordError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("hunter22").unwrap();

        assert_ne!(hash, "hunter22");
        assert!(hasher.verify("hunter22", &hash).unwrap());
        assert!(!hasher.verify("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let hasher = Argon2Hasher::new();

        let first = hasher.hash("hunter22").unwrap();
        let second = hasher.hash("hunter22").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash() {
        let hasher = Argon2Hasher::new();

        assert!(matches!(
            hasher.verify("hunter22", "not-a-hash"),
            Err(PasswordError::MalformedHash(_))
        ));
    }
}
