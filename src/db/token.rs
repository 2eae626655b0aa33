//! Refresh token tracking and revocation.
//!
//! A refresh token can be exchanged for a new access token only while it is
//! present here. Expiry is not tracked: the `exp` claim inside the token is
//! checked separately when it is decoded.

use std::collections::HashSet;
use std::sync::RwLock;

use super::StoreError;

/// Set of refresh tokens that are currently accepted at `/refresh`.
pub trait TokenCache: Send + Sync {
    /// Start accepting a token.
    fn add(&self, token: &str) -> Result<(), StoreError>;

    /// Stop accepting a token (revoke). Returns whether it was present.
    fn remove(&self, token: &str) -> Result<bool, StoreError>;

    /// Whether the token is currently accepted.
    fn exists(&self, token: &str) -> Result<bool, StoreError>;
}

/// Token cache backed by a locked hash set.
#[derive(Default)]
pub struct InMemoryTokenCache {
    tokens: RwLock<HashSet<String>>,
}

impl InMemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panic while holding the write lock so later calls see a poisoned lock.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.tokens.write();
            panic!("poisoning token cache");
        }));
    }
}

impl TokenCache for InMemoryTokenCache {
    fn add(&self, token: &str) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().map_err(|_| StoreError::Poisoned)?;
        tokens.insert(token.to_string());
        Ok(())
    }

    fn remove(&self, token: &str) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.write().map_err(|_| StoreError::Poisoned)?;
        Ok(tokens.remove(token))
    }

    fn exists(&self, token: &str) -> Result<bool, StoreError> {
        let tokens = self.tokens.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tokens.contains(token))
    }
}
