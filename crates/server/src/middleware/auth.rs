//! Authentication extractors.
//!
//! Route handlers take one of the `Require*` extractors as an argument to
//! gate access. Each extractor pulls the current user out of the
//! tower-sessions [`Session`] and rejects the request with the matching
//! status and JSON error body when the requirement is not met.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use artconnect_core::Role;

use crate::models::{CurrentUser, session::keys};

/// Extractor that requires a logged-in user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a logged-in user with the artist role.
#[derive(Debug, Clone)]
pub struct RequireArtist(pub CurrentUser);

/// Extractor that requires a logged-in user with the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

/// Rejection returned when an auth requirement is not met.
#[derive(Debug, Clone, Copy)]
pub enum AuthRejection {
    /// No session, or the session carries no user.
    Unauthenticated,
    /// The caller is not an artist (covers the unauthenticated case too).
    NotArtist,
    /// The caller is not an admin (covers the unauthenticated case too).
    NotAdmin,
}

impl AuthRejection {
    const fn status(self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::NotArtist => StatusCode::UNAUTHORIZED,
            Self::NotAdmin => StatusCode::FORBIDDEN,
        }
    }

    const fn message(self) -> &'static str {
        match self {
            Self::Unauthenticated => "Authentication required",
            Self::NotArtist => "Artist authentication required",
            Self::NotAdmin => "Admin access required",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Read the current user from the session attached to the request.
async fn current_user(parts: &mut Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session.get(keys::CURRENT_USER).await.ok().flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        current_user(parts)
            .await
            .map(Self)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for RequireArtist
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(user) if user.role == Role::Artist => Ok(Self(user)),
            _ => Err(AuthRejection::NotArtist),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match current_user(parts).await {
            Some(user) if user.role == Role::Admin => Ok(Self(user)),
            _ => Err(AuthRejection::NotAdmin),
        }
    }
}

/// Store the current user in the session after login.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Remove the current user from the session on logout.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_statuses() {
        assert_eq!(
            AuthRejection::Unauthenticated.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthRejection::NotArtist.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthRejection::NotAdmin.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            AuthRejection::NotArtist.message(),
            "Artist authentication required"
        );
        assert_eq!(AuthRejection::NotAdmin.message(), "Admin access required");
    }
}
