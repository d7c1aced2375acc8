//! Review submission.
//!
//! The checks run in the order a buyer would hit them: input shape, order
//! existence, ownership, delivered status, then the one-review-per-order
//! rule. The insert and the aggregate recompute happen in one transaction
//! inside the repository.

use sqlx::SqlitePool;

use artconnect_core::{OrderId, OrderStatus};

use crate::db::{OrderRepository, RepositoryError, ReviewRepository};
use crate::error::{AppError, Result};
use crate::models::{CurrentUser, Review};

/// Ratings are whole stars from one to five.
const RATING_RANGE: std::ops::RangeInclusive<i64> = 1..=5;

/// Review domain service.
pub struct ReviewService<'a> {
    orders: OrderRepository<'a>,
    reviews: ReviewRepository<'a>,
}

impl<'a> ReviewService<'a> {
    /// Create a new review service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            reviews: ReviewRepository::new(pool),
        }
    }

    /// Submit a review for a delivered order and refresh the artist's
    /// rating aggregates.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for missing/out-of-range input,
    /// `AppError::NotFound` for an unknown order, `AppError::Forbidden` when
    /// the caller isn't the order's buyer, `AppError::InvalidState` when the
    /// order isn't delivered, and `AppError::Conflict` for a second review.
    pub async fn submit(
        &self,
        user: &CurrentUser,
        order_id: Option<OrderId>,
        rating: Option<i64>,
        comment: Option<&str>,
    ) -> Result<Review> {
        let (Some(order_id), Some(rating)) = (order_id, rating) else {
            return Err(AppError::Validation("Invalid review data".to_owned()));
        };

        if !RATING_RANGE.contains(&rating) {
            return Err(AppError::Validation("Invalid review data".to_owned()));
        }

        let Some(order) = self.orders.get_by_id(order_id).await? else {
            return Err(AppError::NotFound("Order not found".to_owned()));
        };

        if order.buyer_user_id != user.id {
            return Err(AppError::Forbidden(
                "You can only review your own orders".to_owned(),
            ));
        }

        if order.status != OrderStatus::Delivered {
            return Err(AppError::InvalidState(
                "You can only review delivered orders".to_owned(),
            ));
        }

        if self.reviews.get_by_order(order_id).await?.is_some() {
            return Err(AppError::Conflict(
                "You have already reviewed this order".to_owned(),
            ));
        }

        // The unique index backstops the pre-check when two submissions race
        let review = self
            .reviews
            .create_and_recompute(&order, rating, comment)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AppError::Conflict("You have already reviewed this order".to_owned())
                }
                other => AppError::Database(other),
            })?;

        Ok(review)
    }
}
