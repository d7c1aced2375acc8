//! Artist domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use artconnect_core::{
    ArtistProfileId, DeliveryType, Email, PortfolioImageId, Price, UserId, VerificationStatus,
};

use crate::models::package::{Package, PackageCard};
use crate::models::review::ReviewWithBuyer;

/// A public artist listing (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    /// Unique profile ID.
    pub id: ArtistProfileId,
    /// Account that owns this profile.
    pub user_id: UserId,
    /// Public display name.
    pub display_name: String,
    /// Short self-description.
    pub bio: String,
    /// City the artist works from.
    pub city: Option<String>,
    /// Art styles offered (e.g. "realistic", "anime").
    pub styles: Vec<String>,
    /// Delivery types the artist supports.
    pub delivery_types: Vec<DeliveryType>,
    /// Lowest advertised price.
    pub starting_price: Price,
    /// Avatar URL.
    pub profile_photo_url: Option<String>,
    /// Instagram profile URL.
    pub instagram_url: Option<String>,
    /// Moderation state; only approved profiles are publicly visible.
    pub verification_status: VerificationStatus,
    /// Whether the profile is featured on the home page.
    pub is_featured: bool,
    /// Mean review rating rounded to one decimal; 0 when unreviewed.
    pub avg_rating: f64,
    /// Number of reviews received.
    pub total_reviews: i64,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}

/// A portfolio image.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioImage {
    pub id: PortfolioImageId,
    pub artist_profile_id: ArtistProfileId,
    pub image_url: String,
    pub title: Option<String>,
}

/// Artist display info embedded in order and package responses.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ArtistBrief {
    pub id: ArtistProfileId,
    pub display_name: String,
    pub profile_photo_url: Option<String>,
}

/// A browse result: the profile plus what the listing card shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    #[serde(flatten)]
    pub profile: ArtistProfile,
    /// First portfolio image.
    pub thumbnail_url: Option<String>,
    /// First active package.
    pub package: Option<PackageCard>,
}

/// A full public artist page: profile, portfolio, active packages, and the
/// most recent reviews.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistDetail {
    #[serde(flatten)]
    pub profile: ArtistProfile,
    pub portfolio: Vec<PortfolioImage>,
    pub packages: Vec<Package>,
    pub reviews: Vec<ReviewWithBuyer>,
}

/// An artist's own profile with portfolio and all packages, active or not.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnArtistProfile {
    #[serde(flatten)]
    pub profile: ArtistProfile,
    pub portfolio: Vec<PortfolioImage>,
    pub packages: Vec<Package>,
}

/// An artist profile as shown in the admin moderation queue, with the
/// account's contact email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistWithContact {
    #[serde(flatten)]
    pub profile: ArtistProfile,
    /// Email of the owning account, if it has one.
    pub user_email: Option<Email>,
}

/// Input for creating an artist profile at onboarding.
#[derive(Debug, Clone)]
pub struct NewArtistProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub bio: String,
    pub city: Option<String>,
    pub styles: Vec<String>,
    pub delivery_types: Vec<DeliveryType>,
    pub starting_price: Price,
    pub instagram_url: Option<String>,
    pub profile_photo_url: Option<String>,
    /// Legal name for the private contact record.
    pub full_name: String,
    /// Contact email for the private contact record.
    pub contact_email: Option<Email>,
}

/// A portfolio image to insert at onboarding.
#[derive(Debug, Clone)]
pub struct NewPortfolioImage {
    pub image_url: String,
    pub title: Option<String>,
}

/// A first package created together with the profile at onboarding.
#[derive(Debug, Clone)]
pub struct OnboardPackage {
    pub name: String,
    pub description: String,
    pub delivery_type: DeliveryType,
    pub price: Price,
    pub delivery_time_text: String,
    pub revisions_included: i64,
    pub add_ons: BTreeMap<String, Price>,
}
