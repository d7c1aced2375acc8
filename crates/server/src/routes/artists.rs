//! Artist route handlers: public browse/detail and the artist's own
//! onboarding and profile endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use artconnect_core::{ArtistProfileId, DeliveryType, Price};

use crate::db::{ArtistBrowseFilter, ArtistRepository, ArtistSort};
use crate::error::{self, AppError, Result};
use crate::middleware::{RequireArtist, set_current_user};
use crate::models::{ArtistDetail, ArtistSummary, CurrentUser, OwnArtistProfile};
use crate::services::ArtistService;
use crate::services::artists::{OnboardForm, PackageForm};
use crate::state::AppState;

// =============================================================================
// Public Browse & Detail
// =============================================================================

/// Browse query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseQuery {
    pub category: Option<String>,
    pub city: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    /// Only the literal string `true` enables the filter.
    pub featured: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
}

/// Browse response body.
#[derive(Debug, Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<ArtistSummary>,
}

/// Browse approved artists with optional filters.
///
/// GET /artists
///
/// # Errors
///
/// Returns 500 if the query fails.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<ArtistsResponse>> {
    let repo = ArtistRepository::new(state.pool());

    let filter = ArtistBrowseFilter {
        category: query.category.filter(|s| !s.is_empty()),
        city: query.city.filter(|s| !s.is_empty()),
        price_min: query.price_min,
        price_max: query.price_max,
        featured: query.featured.as_deref() == Some("true"),
        sort: ArtistSort::from_param(query.sort.as_deref()),
        limit: query.limit,
    };

    let artists = repo.browse(&filter).await?;

    Ok(Json(ArtistsResponse { artists }))
}

/// Artist detail response body.
#[derive(Debug, Serialize)]
pub struct ArtistDetailResponse {
    pub artist: ArtistDetail,
}

/// Public artist page: profile, portfolio, active packages, recent reviews.
///
/// GET /artists/{id}
///
/// # Errors
///
/// Returns 404 for unknown or not-yet-approved profiles.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ArtistProfileId>,
) -> Result<Json<ArtistDetailResponse>> {
    let repo = ArtistRepository::new(state.pool());

    let artist = repo
        .get_public_detail(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Artist not found".to_owned()))?;

    Ok(Json(ArtistDetailResponse { artist }))
}

// =============================================================================
// Onboarding & Own Profile
// =============================================================================

/// Profile section of the onboarding request.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OnboardProfileSection {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    #[serde(default)]
    pub delivery_types: Vec<DeliveryType>,
    pub starting_price: Option<Price>,
    pub instagram_url: Option<String>,
}

/// First-package section of the onboarding request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardPackageSection {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub delivery_time_text: String,
    pub delivery_type: DeliveryType,
}

/// Onboarding request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardRequest {
    #[serde(default)]
    pub profile: OnboardProfileSection,
    #[serde(default)]
    pub portfolio_urls: Vec<String>,
    pub package: Option<OnboardPackageSection>,
}

/// Onboarding response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardResponse {
    pub success: bool,
    pub artist_profile_id: ArtistProfileId,
}

/// Create the caller's artist profile.
///
/// POST /artist/onboard
///
/// # Errors
///
/// Returns 400 for missing required fields or an already-onboarded caller,
/// and 401 for non-artist callers.
pub async fn onboard(
    State(state): State<AppState>,
    session: Session,
    RequireArtist(user): RequireArtist,
    Json(req): Json<OnboardRequest>,
) -> Result<Json<OnboardResponse>> {
    let service = ArtistService::new(state.pool());

    let form = OnboardForm {
        display_name: req.profile.display_name,
        bio: req.profile.bio,
        city: req.profile.city.filter(|s| !s.is_empty()),
        styles: req.profile.styles,
        delivery_types: req.profile.delivery_types,
        starting_price: req.profile.starting_price,
        instagram_url: req.profile.instagram_url.filter(|s| !s.is_empty()),
        portfolio_urls: req.portfolio_urls,
        package: req.package.map(|pkg| PackageForm {
            name: pkg.name,
            description: pkg.description,
            price: pkg.price,
            delivery_time_text: pkg.delivery_time_text,
            delivery_type: pkg.delivery_type,
        }),
    };

    let artist_profile_id = service.onboard(&user, form).await?;

    // The session snapshot predates the profile; refresh it so role=artist
    // order listing works without a re-login.
    let refreshed = CurrentUser {
        artist_profile_id: Some(artist_profile_id),
        ..user
    };
    if let Err(e) = set_current_user(&session, &refreshed).await {
        tracing::error!("Failed to refresh session after onboarding: {}", e);
    }

    let id_str = artist_profile_id.to_string();
    error::add_breadcrumb(
        "artist",
        "Artist onboarded",
        Some(&[("artist_profile_id", id_str.as_str())]),
    );

    Ok(Json(OnboardResponse {
        success: true,
        artist_profile_id,
    }))
}

/// Own profile response body.
#[derive(Debug, Serialize)]
pub struct OwnProfileResponse {
    pub profile: OwnArtistProfile,
}

/// The caller's own profile with portfolio and every package.
///
/// GET /artist/profile
///
/// # Errors
///
/// Returns 401 for non-artist callers and 404 before onboarding.
pub async fn own_profile(
    State(state): State<AppState>,
    RequireArtist(user): RequireArtist,
) -> Result<Json<OwnProfileResponse>> {
    let service = ArtistService::new(state.pool());

    let profile = service.own_profile(&user).await?;

    Ok(Json(OwnProfileResponse { profile }))
}
