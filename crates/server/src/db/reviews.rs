//! Review repository for database operations.
//!
//! `avg_rating` and `total_reviews` on `artist_profiles` are denormalized
//! and owned by this module: they are recomputed from a full re-scan inside
//! the same transaction as the insert, so two concurrent submissions for the
//! same artist can't lose an update.

use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, OrderId};

use super::RepositoryError;
use crate::models::{Order, Review, ReviewWithBuyer};

const SELECT_REVIEW: &str = r"
    SELECT id, order_id, artist_profile_id, buyer_user_id, rating, comment, created_at
    FROM reviews
";

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the review attached to an order, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Review>, RepositoryError> {
        Ok(
            sqlx::query_as::<_, Review>(&format!("{SELECT_REVIEW} WHERE order_id = ?1"))
                .bind(order_id)
                .fetch_optional(self.pool)
                .await?,
        )
    }

    /// The newest reviews for an artist, with each reviewer's name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_recent_for_artist(
        &self,
        artist_profile_id: ArtistProfileId,
        limit: i64,
    ) -> Result<Vec<ReviewWithBuyer>, RepositoryError> {
        Ok(sqlx::query_as::<_, ReviewWithBuyer>(
            r"
            SELECT r.id, r.order_id, r.artist_profile_id, r.buyer_user_id, r.rating,
                   r.comment, r.created_at, u.name AS buyer_name
            FROM reviews r
            JOIN users u ON u.id = r.buyer_user_id
            WHERE r.artist_profile_id = ?1
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?2
            ",
        )
        .bind(artist_profile_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?)
    }

    /// Insert a review and recompute the artist's rating aggregates, all in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order already has a review.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_and_recompute(
        &self,
        order: &Order,
        rating: i64,
        comment: Option<&str>,
    ) -> Result<Review, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let review = sqlx::query_as::<_, Review>(
            r"
            INSERT INTO reviews (order_id, artist_profile_id, buyer_user_id, rating, comment)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, order_id, artist_profile_id, buyer_user_id, rating, comment, created_at
            ",
        )
        .bind(order.id)
        .bind(order.artist_profile_id)
        .bind(order.buyer_user_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order already has a review".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let (count, total): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(rating), 0) FROM reviews WHERE artist_profile_id = ?1",
        )
        .bind(order.artist_profile_id)
        .fetch_one(&mut *tx)
        .await?;

        let avg_rating = round_to_tenth(mean(total, count));

        sqlx::query("UPDATE artist_profiles SET avg_rating = ?1, total_reviews = ?2 WHERE id = ?3")
            .bind(avg_rating)
            .bind(count)
            .bind(order.artist_profile_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(review)
    }
}

/// Mean rating; zero when there are no reviews.
#[allow(clippy::cast_precision_loss)]
fn mean(total: i64, count: i64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total as f64 / count as f64
}

/// Round to one decimal place, the precision the aggregate is stored at.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_tenth() {
        assert!((round_to_tenth(4.25) - 4.3).abs() < f64::EPSILON);
        assert!((round_to_tenth(4.0) - 4.0).abs() < f64::EPSILON);
        assert!((round_to_tenth(4.449) - 4.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_of_three_ratings() {
        // ratings {4, 5, 3} average out to exactly 4.0
        assert!((round_to_tenth(mean(12, 3)) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mean_empty() {
        assert!(mean(0, 0).abs() < f64::EPSILON);
    }
}
