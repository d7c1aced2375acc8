//! Admin console route handlers.
//!
//! Every handler takes [`RequireAdmin`], so non-admin callers are rejected
//! before any query runs.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use artconnect_core::{ArtistProfileId, VerificationStatus};

use crate::error::{self, Result};
use crate::middleware::RequireAdmin;
use crate::models::{ArtistProfile, ArtistWithContact, OrderSummary};
use crate::services::ModerationService;
use crate::state::AppState;

/// Moderation queue response body.
#[derive(Debug, Serialize)]
pub struct AdminArtistsResponse {
    pub artists: Vec<ArtistWithContact>,
}

/// Every artist profile, newest first, with the owning account's email.
///
/// GET /admin/artists
///
/// # Errors
///
/// Returns 403 for non-admin callers.
pub async fn list_artists(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AdminArtistsResponse>> {
    let service = ModerationService::new(state.pool());

    let artists = service.list_artists().await?;

    Ok(Json(AdminArtistsResponse { artists }))
}

/// Moderation update request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArtistRequest {
    pub verification_status: Option<VerificationStatus>,
    pub is_featured: Option<bool>,
}

/// Moderation update response body.
#[derive(Debug, Serialize)]
pub struct UpdateArtistResponse {
    pub success: bool,
    pub artist: ArtistProfile,
}

/// Update an artist's moderation fields; absent fields keep their value.
///
/// PATCH /admin/artists/{id}
///
/// # Errors
///
/// Returns 403 for non-admin callers and 404 for an unknown profile.
pub async fn update_artist(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<ArtistProfileId>,
    Json(req): Json<UpdateArtistRequest>,
) -> Result<Json<UpdateArtistResponse>> {
    let service = ModerationService::new(state.pool());

    let artist = service
        .update_artist(id, req.verification_status, req.is_featured)
        .await?;

    let id_str = artist.id.to_string();
    let status_str = artist.verification_status.to_string();
    error::add_breadcrumb(
        "admin",
        "Artist moderation updated",
        Some(&[
            ("artist_profile_id", id_str.as_str()),
            ("verification_status", status_str.as_str()),
        ]),
    );

    Ok(Json(UpdateArtistResponse {
        success: true,
        artist,
    }))
}

/// Admin order overview response body.
#[derive(Debug, Serialize)]
pub struct AdminOrdersResponse {
    pub orders: Vec<OrderSummary>,
}

/// Every order, newest first, with buyer/artist/package names.
///
/// GET /admin/orders
///
/// # Errors
///
/// Returns 403 for non-admin callers.
pub async fn list_orders(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AdminOrdersResponse>> {
    let service = ModerationService::new(state.pool());

    let orders = service.list_orders().await?;

    Ok(Json(AdminOrdersResponse { orders }))
}
