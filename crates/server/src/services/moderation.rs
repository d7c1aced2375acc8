//! Admin moderation: the artist approval queue and the global order list.
//!
//! Role enforcement happens in the extractor layer; these methods assume the
//! caller is already an admin.

use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, VerificationStatus};

use crate::db::{ArtistRepository, OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{ArtistProfile, ArtistWithContact, OrderSummary};

/// Moderation domain service.
pub struct ModerationService<'a> {
    artists: ArtistRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> ModerationService<'a> {
    /// Create a new moderation service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            artists: ArtistRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Every artist profile, newest first, with the owning account's email.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list_artists(&self) -> Result<Vec<ArtistWithContact>> {
        Ok(self.artists.list_all().await?)
    }

    /// Apply a partial moderation update; absent fields keep their value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the profile doesn't exist.
    pub async fn update_artist(
        &self,
        id: ArtistProfileId,
        verification_status: Option<VerificationStatus>,
        is_featured: Option<bool>,
    ) -> Result<ArtistProfile> {
        self.artists
            .update_moderation(id, verification_status, is_featured)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::NotFound("Artist not found".to_owned()),
                other => AppError::Database(other),
            })
    }

    /// Every order on the platform, newest first, with display names.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the query fails.
    pub async fn list_orders(&self) -> Result<Vec<OrderSummary>> {
        Ok(self.orders.list_all().await?)
    }
}
