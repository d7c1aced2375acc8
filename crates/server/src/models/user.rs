//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use artconnect_core::{ArtistProfileId, Email, Phone, Role, UserId};

/// A marketplace account (domain type).
///
/// The password hash never leaves the repository layer; login flows fetch it
/// separately.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address, absent for phone-only accounts.
    pub email: Option<Email>,
    /// Phone number, absent for email-only accounts.
    pub phone: Option<Phone>,
    /// Account role.
    pub role: Role,
    /// Artist profile owned by this account, if onboarded.
    pub artist_profile_id: Option<ArtistProfileId>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
