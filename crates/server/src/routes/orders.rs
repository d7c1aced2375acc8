//! Order route handlers: placement, dashboard listings, and status updates.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use artconnect_core::{ArtistProfileId, DeliveryType, OrderId, OrderStatus, PackageId, Price};

use crate::error::{self, Result};
use crate::middleware::RequireAuth;
use crate::models::{Order, OrderDetails};
use crate::services::OrderService;
use crate::services::orders::OrderDraft;
use crate::state::AppState;

// =============================================================================
// Create
// =============================================================================

/// Order placement request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub artist_profile_id: Option<ArtistProfileId>,
    pub package_id: Option<PackageId>,
    pub instructions: Option<String>,
    pub delivery_type: Option<DeliveryType>,
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub add_ons_selected: BTreeMap<String, bool>,
    pub total_price: Option<Price>,
    #[serde(default)]
    pub reference_files: Vec<String>,
}

/// The slice of an order returned right after placement.
#[derive(Debug, Serialize)]
pub struct CreatedOrder {
    pub id: OrderId,
    pub status: OrderStatus,
}

/// Order placement response body.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order: CreatedOrder,
}

/// Place an order for the calling buyer.
///
/// POST /orders
///
/// # Errors
///
/// Returns 400 for missing fields or a package/artist mismatch, 401 without
/// a session, and 404 for an unknown package.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    let service = OrderService::new(state.pool());

    let draft = OrderDraft {
        artist_profile_id: req.artist_profile_id,
        package_id: req.package_id,
        instructions: req.instructions,
        delivery_type: req.delivery_type,
        shipping_address: req.shipping_address,
        add_ons_selected: req.add_ons_selected,
        total_price: req.total_price,
        reference_file_urls: req.reference_files,
    };

    let order = service.create(&user, draft).await?;

    let id_str = order.id.to_string();
    error::add_breadcrumb("order", "Order placed", Some(&[("order_id", id_str.as_str())]));

    Ok(Json(CreateOrderResponse {
        success: true,
        order: CreatedOrder {
            id: order.id,
            status: order.status,
        },
    }))
}

// =============================================================================
// List
// =============================================================================

/// Order listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub role: Option<String>,
    pub status: Option<String>,
}

/// Order listing response body.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderDetails>,
}

/// The caller's orders, as buyer (default) or as artist, newest first.
///
/// GET /orders?role=buyer|artist&status=...
///
/// # Errors
///
/// Returns 400 for an unknown role/status value and 401 without a session.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListOrdersQuery>,
) -> Result<Json<OrdersResponse>> {
    let service = OrderService::new(state.pool());

    let orders = service
        .list_for(&user, query.role.as_deref(), query.status.as_deref())
        .await?;

    Ok(Json(OrdersResponse { orders }))
}

// =============================================================================
// Status Updates
// =============================================================================

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Status update response body.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub success: bool,
    pub order: Order,
}

/// Move an order to a new status.
///
/// PATCH /orders/{id}/status
///
/// Admins and the order's artist may set any status; the buyer may only
/// cancel.
///
/// # Errors
///
/// Returns 400 for an unparseable status, 403 when the permission rule
/// rejects the caller, and 404 for an unknown order.
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<OrderId>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let service = OrderService::new(state.pool());

    let order = service
        .update_status(&user, id, req.status.as_deref())
        .await?;

    let id_str = order.id.to_string();
    let status_str = order.status.to_string();
    error::add_breadcrumb(
        "order",
        "Order status updated",
        Some(&[("order_id", id_str.as_str()), ("status", status_str.as_str())]),
    );

    Ok(Json(UpdateStatusResponse {
        success: true,
        order,
    }))
}
