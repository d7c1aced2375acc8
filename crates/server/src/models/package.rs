//! Package domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use artconnect_core::{ArtistProfileId, DeliveryType, PackageId, Price};

/// A service package offered by an artist (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Unique package ID.
    pub id: PackageId,
    /// Artist offering this package.
    pub artist_profile_id: ArtistProfileId,
    /// Package name (e.g. "Digital Portrait").
    pub name: String,
    /// What the package includes.
    pub description: String,
    /// How the finished work is delivered.
    pub delivery_type: DeliveryType,
    /// Base price.
    pub price: Price,
    /// Human-readable delivery estimate (e.g. "3-5 days").
    pub delivery_time_text: String,
    /// Number of revisions included in the base price.
    pub revisions_included: i64,
    /// Inactive packages are hidden from public pages but stay orderable
    /// history for existing orders.
    pub is_active: bool,
    /// Optional extras by name, each with its price.
    pub add_ons: BTreeMap<String, Price>,
    /// When the package was created.
    pub created_at: DateTime<Utc>,
}

/// Minimal package data shown on browse cards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCard {
    pub id: PackageId,
    pub name: String,
    pub price: Price,
}

/// Input for creating a package.
#[derive(Debug, Clone)]
pub struct NewPackage {
    pub artist_profile_id: ArtistProfileId,
    pub name: String,
    pub description: String,
    pub delivery_type: DeliveryType,
    pub price: Price,
    pub delivery_time_text: String,
    pub revisions_included: i64,
    pub is_active: bool,
    pub add_ons: BTreeMap<String, Price>,
}
