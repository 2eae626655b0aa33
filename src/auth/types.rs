//! Authentication identity types.

use serde::Serialize;

use crate::db::UserRole;

/// The principal attached to a request after successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub email: String,
    pub role: UserRole,
}
