mod token;
mod user;

use std::sync::Arc;

pub use token::{InMemoryTokenCache, TokenCache};
pub use user::{InMemoryUserDirectory, User, UserDirectory, UserRole};

/// Handle to the user directory and refresh token cache.
///
/// Cloning is cheap; all clones share the same stores.
#[derive(Clone)]
pub struct Database {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn TokenCache>,
}

impl Database {
    /// Build from custom store implementations.
    pub fn new(users: Arc<dyn UserDirectory>, tokens: Arc<dyn TokenCache>) -> Self {
        Self { users, tokens }
    }

    /// Empty in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryUserDirectory::new()),
            Arc::new(InMemoryTokenCache::new()),
        )
    }

    pub fn users(&self) -> &dyn UserDirectory {
        self.users.as_ref()
    }

    pub fn tokens(&self) -> &dyn TokenCache {
        self.tokens.as_ref()
    }
}

/// Errors from the user directory or token cache.
#[derive(Debug)]
pub enum StoreError {
    /// A writer panicked while holding the store lock
    Poisoned,
    /// Backing storage could not be reached
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Poisoned => write!(f, "Store lock poisoned"),
            StoreError::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
