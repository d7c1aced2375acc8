//! Order placement, listing, and the status workflow.
//!
//! Payment is simulated, so orders are created directly in `paid`. Status
//! changes have no transition table; the permission rule alone decides who
//! may set what: admins and the order's artist set anything, buyers may only
//! cancel.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, DeliveryType, OrderId, OrderStatus, PackageId, Price, Role};

use crate::db::{OrderRepository, PackageRepository};
use crate::error::{AppError, Result};
use crate::models::{CurrentUser, NewOrder, Order, OrderDetails};

/// A submitted order before validation.
#[derive(Debug, Clone, Default)]
pub struct OrderDraft {
    pub artist_profile_id: Option<ArtistProfileId>,
    pub package_id: Option<PackageId>,
    pub instructions: Option<String>,
    pub delivery_type: Option<DeliveryType>,
    pub shipping_address: Option<String>,
    pub add_ons_selected: BTreeMap<String, bool>,
    pub total_price: Option<Price>,
    pub reference_file_urls: Vec<String>,
}

/// Order domain service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    packages: PackageRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            packages: PackageRepository::new(pool),
        }
    }

    /// Place an order for the calling buyer.
    ///
    /// The referenced package must exist and belong to the referenced artist
    /// profile, which keeps order rows consistent from the start.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for missing/inconsistent fields and
    /// `AppError::NotFound` for an unknown package.
    pub async fn create(&self, user: &CurrentUser, draft: OrderDraft) -> Result<Order> {
        let (
            Some(artist_profile_id),
            Some(package_id),
            Some(instructions),
            Some(delivery_type),
            Some(total_price),
        ) = (
            draft.artist_profile_id,
            draft.package_id,
            draft.instructions,
            draft.delivery_type,
            draft.total_price,
        )
        else {
            return Err(AppError::Validation("Missing required fields".to_owned()));
        };

        if instructions.trim().is_empty() {
            return Err(AppError::Validation("Missing required fields".to_owned()));
        }

        let package = self
            .packages
            .get_by_id(package_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Package not found".to_owned()))?;

        if package.artist_profile_id != artist_profile_id {
            return Err(AppError::Validation(
                "Package does not belong to this artist".to_owned(),
            ));
        }

        let new_order = NewOrder {
            buyer_user_id: user.id,
            artist_profile_id,
            package_id,
            instructions,
            delivery_type,
            shipping_address: draft.shipping_address,
            add_ons_selected: draft.add_ons_selected,
            total_price,
            reference_file_urls: draft.reference_file_urls,
        };

        // Payment is out of scope, so orders are born paid
        let order = self.orders.create(&new_order, OrderStatus::Paid).await?;

        Ok(order)
    }

    /// List the caller's orders, as buyer (default) or as artist.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an unknown role value, for
    /// `role=artist` without an artist profile, or for an unparseable
    /// status filter.
    pub async fn list_for(
        &self,
        user: &CurrentUser,
        role: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<OrderDetails>> {
        let status = status
            .filter(|s| !s.is_empty())
            .map(|raw| {
                raw.parse::<OrderStatus>()
                    .map_err(|_| AppError::Validation("Invalid status".to_owned()))
            })
            .transpose()?;

        match role.filter(|r| !r.is_empty()).unwrap_or("buyer") {
            "buyer" => Ok(self.orders.list_for_buyer(user.id, status).await?),
            "artist" => {
                let Some(artist_profile_id) = user.artist_profile_id else {
                    return Err(AppError::Validation("Invalid role".to_owned()));
                };
                Ok(self
                    .orders
                    .list_for_artist(artist_profile_id, status)
                    .await?)
            }
            _ => Err(AppError::Validation("Invalid role".to_owned())),
        }
    }

    /// Set an order's status on behalf of an authorized actor.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for an unknown status,
    /// `AppError::NotFound` for an unknown order, and `AppError::Forbidden`
    /// when the caller fails the permission rule.
    pub async fn update_status(
        &self,
        user: &CurrentUser,
        order_id: OrderId,
        status: Option<&str>,
    ) -> Result<Order> {
        let status = status
            .and_then(|raw| raw.parse::<OrderStatus>().ok())
            .ok_or_else(|| AppError::Validation("Invalid status".to_owned()))?;

        let Some(order) = self.orders.get_by_id(order_id).await? else {
            return Err(AppError::NotFound("Order not found".to_owned()));
        };

        authorize_status_change(user, &order, status)?;

        Ok(self.orders.update_status(order_id, status).await?)
    }
}

/// The status permission rule: admins and the order's own artist may set any
/// status, the buyer may only cancel, everyone else is rejected.
fn authorize_status_change(user: &CurrentUser, order: &Order, status: OrderStatus) -> Result<()> {
    let is_admin = user.role == Role::Admin;
    let is_artist = user.artist_profile_id == Some(order.artist_profile_id);
    let is_buyer = user.id == order.buyer_user_id;

    if is_admin || is_artist {
        return Ok(());
    }

    if is_buyer {
        if status == OrderStatus::Cancelled {
            return Ok(());
        }
        return Err(AppError::Forbidden("You can only cancel orders".to_owned()));
    }

    Err(AppError::Forbidden("Not authorized".to_owned()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use artconnect_core::UserId;

    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new(1),
            buyer_user_id: UserId::new(10),
            artist_profile_id: ArtistProfileId::new(20),
            package_id: PackageId::new(30),
            status: OrderStatus::Paid,
            instructions: "A family portrait".to_owned(),
            delivery_type: DeliveryType::Digital,
            shipping_address: None,
            add_ons_selected: BTreeMap::new(),
            total_price: Price::new(999),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn actor(id: i64, role: Role, artist_profile_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            name: "Test Actor".to_owned(),
            email: None,
            role,
            artist_profile_id: artist_profile_id.map(ArtistProfileId::new),
        }
    }

    #[test]
    fn test_admin_sets_any_status() {
        let admin = actor(99, Role::Admin, None);
        for status in [
            OrderStatus::PendingPayment,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::Refunded,
        ] {
            assert!(authorize_status_change(&admin, &order(), status).is_ok());
        }
    }

    #[test]
    fn test_matching_artist_sets_any_status() {
        let artist = actor(50, Role::Artist, Some(20));
        for status in [
            OrderStatus::Accepted,
            OrderStatus::InProgress,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(authorize_status_change(&artist, &order(), status).is_ok());
        }
    }

    #[test]
    fn test_other_artist_is_rejected() {
        let other = actor(51, Role::Artist, Some(21));
        let err = authorize_status_change(&other, &order(), OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "Not authorized"));
    }

    #[test]
    fn test_buyer_may_only_cancel() {
        let buyer = actor(10, Role::User, None);

        assert!(authorize_status_change(&buyer, &order(), OrderStatus::Cancelled).is_ok());

        let err = authorize_status_change(&buyer, &order(), OrderStatus::Delivered).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "You can only cancel orders"));
    }

    #[test]
    fn test_stranger_is_rejected() {
        let stranger = actor(77, Role::User, None);
        let err = authorize_status_change(&stranger, &order(), OrderStatus::Cancelled).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(msg) if msg == "Not authorized"));
    }
}
