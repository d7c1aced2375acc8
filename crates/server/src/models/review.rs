//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use artconnect_core::{ArtistProfileId, OrderId, ReviewId, UserId};

/// A buyer review of a delivered order (domain type).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique review ID.
    pub id: ReviewId,
    /// Order being reviewed; one review per order.
    pub order_id: OrderId,
    /// Artist who fulfilled the order.
    pub artist_profile_id: ArtistProfileId,
    /// Buyer who wrote the review.
    pub buyer_user_id: UserId,
    /// Star rating, 1 to 5.
    pub rating: i64,
    /// Optional free-text comment.
    pub comment: Option<String>,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

/// A review with the reviewer's display name, for public artist pages.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReviewWithBuyer {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub review: Review,
    pub buyer_name: String,
}
