//! Package route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use artconnect_core::PackageId;

use crate::db::PackageRepository;
use crate::error::{AppError, Result};
use crate::models::{ArtistBrief, Package};
use crate::state::AppState;

/// Package detail response body.
#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub package: Package,
    pub artist: ArtistBrief,
}

/// A package with its artist's display info, as shown on the order page.
///
/// GET /packages/{id}
///
/// # Errors
///
/// Returns 404 for an unknown package.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<PackageId>,
) -> Result<Json<PackageResponse>> {
    let repo = PackageRepository::new(state.pool());

    let (package, artist) = repo
        .get_with_artist(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Package not found".to_owned()))?;

    Ok(Json(PackageResponse { package, artist }))
}
