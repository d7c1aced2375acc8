//! Order domain types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use artconnect_core::{
    ArtistProfileId, DeliveryType, OrderFileId, OrderId, OrderStatus, PackageId, Price, UserId,
};

use crate::models::artist::ArtistBrief;
use crate::models::package::Package;
use crate::models::review::Review;

/// A commission order (domain type).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Buyer account.
    pub buyer_user_id: UserId,
    /// Artist fulfilling the order.
    pub artist_profile_id: ArtistProfileId,
    /// Package the order was placed against.
    pub package_id: PackageId,
    /// Workflow state.
    pub status: OrderStatus,
    /// Buyer's brief to the artist.
    pub instructions: String,
    /// How the finished work is delivered.
    pub delivery_type: DeliveryType,
    /// Shipping address for physical delivery.
    pub shipping_address: Option<String>,
    /// Add-on name to whether the buyer picked it.
    pub add_ons_selected: BTreeMap<String, bool>,
    /// Amount charged at checkout.
    pub total_price: Price,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order last changed.
    pub updated_at: DateTime<Utc>,
}

/// A file attached to an order (e.g. buyer reference images).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderFile {
    pub id: OrderFileId,
    pub order_id: OrderId,
    pub file_url: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

/// An order with everything the buyer and artist dashboards show.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub package: Package,
    pub artist_profile: ArtistBrief,
    pub buyer_name: String,
    pub files: Vec<OrderFile>,
    pub review: Option<Review>,
}

/// An order row in the admin overview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(flatten)]
    pub order: Order,
    pub buyer_name: String,
    pub artist_display_name: String,
    pub package_name: String,
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub buyer_user_id: UserId,
    pub artist_profile_id: ArtistProfileId,
    pub package_id: PackageId,
    pub instructions: String,
    pub delivery_type: DeliveryType,
    pub shipping_address: Option<String>,
    pub add_ons_selected: BTreeMap<String, bool>,
    pub total_price: Price,
    /// Buyer reference images stored as order files.
    pub reference_file_urls: Vec<String>,
}
