//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use artconnect_core::{ArtistProfileId, Email, Role, UserId};

/// Session-stored user identity.
///
/// A snapshot taken at login. `artist_profile_id` is refreshed when the user
/// onboards as an artist within the same session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub name: String,
    /// User's email address, if the account has one.
    pub email: Option<Email>,
    /// Account role.
    pub role: Role,
    /// Artist profile owned by this account, if onboarded.
    pub artist_profile_id: Option<ArtistProfileId>,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
