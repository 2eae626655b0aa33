//! Axum extractors for authenticated handlers.

use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use super::errors::{ApiAuthError, AuthErrorKind};
use super::types::Identity;
use crate::db::UserRole;

/// Role requirement checked by the `Auth` extractor.
pub trait RoleConstraint {
    fn allows(role: UserRole) -> bool;
}

/// Any authenticated identity.
pub struct AnyRole;

impl RoleConstraint for AnyRole {
    fn allows(_role: UserRole) -> bool {
        true
    }
}

/// Only identities with the `USER` role.
pub struct UserOnly;

impl RoleConstraint for UserOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::User
    }
}

/// Only identities with the `ADMIN` role.
pub struct AdminOnly;

impl RoleConstraint for AdminOnly {
    fn allows(role: UserRole) -> bool {
        role == UserRole::Admin
    }
}

/// Extractor for the identity attached by `require_auth`.
///
/// Rejects with 403 if the identity's role does not satisfy `R`. Routes
/// using it must sit behind the `require_auth` middleware; without it every
/// request is treated as unauthenticated.
pub struct Auth<R: RoleConstraint = AnyRole> {
    pub identity: Identity,
    _role: PhantomData<fn() -> R>,
}

impl<S, R> FromRequestParts<S> for Auth<R>
where
    S: Send + Sync,
    R: RoleConstraint,
{
    type Rejection = ApiAuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(ApiAuthError::new(AuthErrorKind::MissingCredentials))?;

        if !R::allows(identity.role) {
            return Err(ApiAuthError::new(AuthErrorKind::InsufficientRole));
        }

        Ok(Auth {
            identity,
            _role: PhantomData,
        })
    }
}
