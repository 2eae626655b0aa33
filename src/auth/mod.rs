//! Bearer token authentication with role-based access control.
//!
//! Protected routes sit behind `require_auth`, which reads the
//! `Authorization: Bearer <token>` header, validates the access token and
//! looks up its email in the user directory. Handlers then take the
//! `Auth<R>` extractor to read the identity and enforce a role.

mod authenticator;
mod errors;
mod extractors;
mod middleware;
mod state;
mod types;

pub use authenticator::{Authenticator, DEFAULT_ROLE};
pub use errors::{ApiAuthError, AuthErrorKind};
pub use extractors::{AdminOnly, AnyRole, Auth, RoleConstraint, UserOnly};
pub use middleware::{authenticate_headers, require_auth};
pub use state::HasAuthBackend;
pub use types::Identity;
