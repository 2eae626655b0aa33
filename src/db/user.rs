use std::collections::HashMap;
use std::sync::RwLock;

use super::StoreError;

/// User role for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular account, the role every identity currently receives
    User,
    /// Administrator, stored but not yet granted to identities
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "USER",
            UserRole::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique key in the directory
    pub email: String,
    /// Argon2 PHC string, never the plaintext password
    pub password_hash: String,
    pub role: UserRole,
}

/// Storage for user records keyed by email.
///
/// `load` hands out copies; changes only reach the store through `update`.
pub trait UserDirectory: Send + Sync {
    /// Get a user by email.
    fn load(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Returns false if the email is already taken.
    fn save(&self, user: User) -> Result<bool, StoreError>;

    /// Replace an existing user. Returns false if no user has that email.
    fn update(&self, user: User) -> Result<bool, StoreError>;
}

/// User directory backed by a locked hash map.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panic while holding the write lock so later calls see a poisoned lock.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = self.users.write();
            panic!("poisoning user directory");
        }));
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn load(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(users.get(email).cloned())
    }

    fn save(&self, user: User) -> Result<bool, StoreError> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        if users.contains_key(&user.email) {
            return Ok(false);
        }
        users.insert(user.email.clone(), user);
        Ok(true)
    }

    fn update(&self, user: User) -> Result<bool, StoreError> {
        let mut users = self.users.write().map_err(|_| StoreError::Poisoned)?;
        match users.get_mut(&user.email) {
            Some(existing) => {
                *existing = user;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
