//! State required by the authentication middleware.

use crate::db::Database;
use crate::jwt::TokenCodec;

/// Router state that provides the token codec and stores needed to
/// authenticate a request.
pub trait HasAuthBackend {
    fn jwt(&self) -> &TokenCodec;
    fn db(&self) -> &Database;
}
