//! Review route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use artconnect_core::OrderId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Review;
use crate::services::ReviewService;
use crate::state::AppState;

/// Review submission request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub order_id: Option<OrderId>,
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Review submission response body.
#[derive(Debug, Serialize)]
pub struct CreateReviewResponse {
    pub success: bool,
    pub review: Review,
}

/// Submit a review for a delivered order and refresh the artist's aggregates.
///
/// POST /reviews
///
/// # Errors
///
/// Returns 400 for a bad rating, a non-delivered order, or a duplicate
/// review; 403 when the caller is not the order's buyer; 404 for an unknown
/// order.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateReviewRequest>,
) -> Result<Json<CreateReviewResponse>> {
    let service = ReviewService::new(state.pool());

    let review = service
        .submit(&user, req.order_id, req.rating, req.comment.as_deref())
        .await?;

    Ok(Json(CreateReviewResponse {
        success: true,
        review,
    }))
}
