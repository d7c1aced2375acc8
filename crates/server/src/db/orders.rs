//! Order repository for database operations.
//!
//! Order rows are cheap; the list queries additionally attach the package,
//! artist card, buyer name, files, and review that order pages render, using
//! batched `IN` lookups instead of per-row queries.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use artconnect_core::{
    ArtistProfileId, DeliveryType, OrderId, OrderStatus, PackageId, Price, UserId,
};

use super::packages::PackageRow;
use super::{RepositoryError, decode_json, encode_json};
use crate::models::{
    ArtistBrief, NewOrder, Order, OrderDetails, OrderFile, OrderSummary, Package, Review,
};

/// File type recorded for attachments uploaded with the order.
const REFERENCE_FILE_TYPE: &str = "reference";

const SELECT_ORDER: &str = r"
    SELECT id, buyer_user_id, artist_profile_id, package_id, status, instructions,
           delivery_type, shipping_address, add_ons_selected, total_price,
           created_at, updated_at
    FROM orders
";

/// An `orders` row before the add-on JSON column is decoded.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    buyer_user_id: UserId,
    artist_profile_id: ArtistProfileId,
    package_id: PackageId,
    status: OrderStatus,
    instructions: String,
    delivery_type: DeliveryType,
    shipping_address: Option<String>,
    add_ons_selected: Option<String>,
    total_price: Price,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        let add_ons_selected = match self.add_ons_selected.as_deref() {
            Some(raw) => decode_json("add_ons_selected", raw)?,
            None => BTreeMap::new(),
        };

        Ok(Order {
            id: self.id,
            buyer_user_id: self.buyer_user_id,
            artist_profile_id: self.artist_profile_id,
            package_id: self.package_id,
            status: self.status,
            instructions: self.instructions,
            delivery_type: self.delivery_type,
            shipping_address: self.shipping_address,
            add_ons_selected,
            total_price: self.total_price,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// An admin list row: the order plus the names shown in the console table.
#[derive(sqlx::FromRow)]
struct AdminOrderRow {
    #[sqlx(flatten)]
    order: OrderRow,
    buyer_name: String,
    artist_display_name: String,
    package_name: String,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an order and its reference file attachments in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        order: &NewOrder,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let add_ons = encode_json("add_ons_selected", &order.add_ons_selected)?;

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (buyer_user_id, artist_profile_id, package_id, status,
                                instructions, delivery_type, shipping_address,
                                add_ons_selected, total_price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id, buyer_user_id, artist_profile_id, package_id, status, instructions,
                      delivery_type, shipping_address, add_ons_selected, total_price,
                      created_at, updated_at
            ",
        )
        .bind(order.buyer_user_id)
        .bind(order.artist_profile_id)
        .bind(order.package_id)
        .bind(status)
        .bind(&order.instructions)
        .bind(order.delivery_type)
        .bind(&order.shipping_address)
        .bind(add_ons)
        .bind(order.total_price)
        .fetch_one(&mut *tx)
        .await?;

        for url in &order.reference_file_urls {
            sqlx::query(
                "INSERT INTO order_files (order_id, file_url, file_type) VALUES (?1, ?2, ?3)",
            )
            .bind(row.id)
            .bind(url)
            .bind(REFERENCE_FILE_TYPE)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        row.into_order()
    }

    /// Get an order by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{SELECT_ORDER} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(OrderRow::into_order).transpose()
    }

    /// Set an order's status, bumping `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = ?1, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?2
            RETURNING id, buyer_user_id, artist_profile_id, package_id, status, instructions,
                      delivery_type, shipping_address, add_ons_selected, total_price,
                      created_at, updated_at
            ",
        )
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_order()
    }

    /// List a buyer's orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_buyer(
        &self,
        buyer_user_id: UserId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT_ORDER);
        qb.push(" WHERE buyer_user_id = ");
        qb.push_bind(buyer_user_id);
        if let Some(status) = status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(self.pool).await?;

        self.load_details(rows).await
    }

    /// List an artist's incoming orders, newest first, optionally filtered
    /// by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_artist(
        &self,
        artist_profile_id: ArtistProfileId,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(SELECT_ORDER);
        qb.push(" WHERE artist_profile_id = ");
        qb.push_bind(artist_profile_id);
        if let Some(status) = status {
            qb.push(" AND status = ");
            qb.push_bind(status);
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<OrderRow> = qb.build_query_as().fetch_all(self.pool).await?;

        self.load_details(rows).await
    }

    /// List every order for the admin console, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminOrderRow>(
            r"
            SELECT o.id, o.buyer_user_id, o.artist_profile_id, o.package_id, o.status,
                   o.instructions, o.delivery_type, o.shipping_address, o.add_ons_selected,
                   o.total_price, o.created_at, o.updated_at,
                   u.name AS buyer_name,
                   ap.display_name AS artist_display_name,
                   pk.name AS package_name
            FROM orders o
            JOIN users u ON u.id = o.buyer_user_id
            JOIN artist_profiles ap ON ap.id = o.artist_profile_id
            JOIN packages pk ON pk.id = o.package_id
            ORDER BY o.created_at DESC, o.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderSummary {
                    order: row.order.into_order()?,
                    buyer_name: row.buyer_name,
                    artist_display_name: row.artist_display_name,
                    package_name: row.package_name,
                })
            })
            .collect()
    }

    /// Attach the package, artist card, buyer name, files, and review to
    /// each order row.
    async fn load_details(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderDetails>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<OrderId> = rows.iter().map(|r| r.id).collect();
        let package_ids: Vec<PackageId> = rows.iter().map(|r| r.package_id).collect();
        let artist_ids: Vec<ArtistProfileId> = rows.iter().map(|r| r.artist_profile_id).collect();
        let buyer_ids: Vec<UserId> = rows.iter().map(|r| r.buyer_user_id).collect();

        let packages = self.load_packages(&package_ids).await?;
        let artists = self.load_artist_briefs(&artist_ids).await?;
        let buyers = self.load_buyer_names(&buyer_ids).await?;
        let mut files = self.load_files(&order_ids).await?;
        let mut reviews = self.load_reviews(&order_ids).await?;

        rows.into_iter()
            .map(|row| {
                let order = row.into_order()?;

                let package = packages.get(&order.package_id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing package {}",
                        order.id, order.package_id
                    ))
                })?;
                let artist_profile =
                    artists.get(&order.artist_profile_id).cloned().ok_or_else(|| {
                        RepositoryError::DataCorruption(format!(
                            "order {} references missing artist profile {}",
                            order.id, order.artist_profile_id
                        ))
                    })?;
                let buyer_name = buyers.get(&order.buyer_user_id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!(
                        "order {} references missing buyer {}",
                        order.id, order.buyer_user_id
                    ))
                })?;
                let files = files.remove(&order.id).unwrap_or_default();
                let review = reviews.remove(&order.id);

                Ok(OrderDetails {
                    order,
                    package,
                    artist_profile,
                    buyer_name,
                    files,
                    review,
                })
            })
            .collect()
    }

    async fn load_packages(
        &self,
        ids: &[PackageId],
    ) -> Result<HashMap<PackageId, Package>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, artist_profile_id, name, description, delivery_type, price, \
             delivery_time_text, revisions_included, is_active, add_ons, created_at \
             FROM packages WHERE id IN (",
        );
        push_id_list(&mut qb, ids.iter().map(|id| id.as_i64()));

        let rows: Vec<PackageRow> = qb.build_query_as().fetch_all(self.pool).await?;

        rows.into_iter()
            .map(|row| {
                let package = row.into_package()?;
                Ok((package.id, package))
            })
            .collect()
    }

    async fn load_artist_briefs(
        &self,
        ids: &[ArtistProfileId],
    ) -> Result<HashMap<ArtistProfileId, ArtistBrief>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, display_name, profile_photo_url FROM artist_profiles WHERE id IN (",
        );
        push_id_list(&mut qb, ids.iter().map(|id| id.as_i64()));

        let briefs: Vec<ArtistBrief> = qb.build_query_as().fetch_all(self.pool).await?;

        Ok(briefs.into_iter().map(|b| (b.id, b)).collect())
    }

    async fn load_buyer_names(
        &self,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, String>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, name FROM users WHERE id IN (");
        push_id_list(&mut qb, ids.iter().map(|id| id.as_i64()));

        let names: Vec<(UserId, String)> = qb.build_query_as().fetch_all(self.pool).await?;

        Ok(names.into_iter().collect())
    }

    async fn load_files(
        &self,
        order_ids: &[OrderId],
    ) -> Result<HashMap<OrderId, Vec<OrderFile>>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, order_id, file_url, file_type, created_at \
             FROM order_files WHERE order_id IN (",
        );
        push_id_list(&mut qb, order_ids.iter().map(|id| id.as_i64()));
        qb.push(" ORDER BY id");

        let files: Vec<OrderFile> = qb.build_query_as().fetch_all(self.pool).await?;

        let mut by_order: HashMap<OrderId, Vec<OrderFile>> = HashMap::new();
        for file in files {
            by_order.entry(file.order_id).or_default().push(file);
        }
        Ok(by_order)
    }

    async fn load_reviews(
        &self,
        order_ids: &[OrderId],
    ) -> Result<HashMap<OrderId, Review>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            "SELECT id, order_id, artist_profile_id, buyer_user_id, rating, comment, created_at \
             FROM reviews WHERE order_id IN (",
        );
        push_id_list(&mut qb, order_ids.iter().map(|id| id.as_i64()));

        let reviews: Vec<Review> = qb.build_query_as().fetch_all(self.pool).await?;

        Ok(reviews.into_iter().map(|r| (r.order_id, r)).collect())
    }
}

/// Push a comma-separated bind list and the closing parenthesis for an
/// `IN (...)` clause.
fn push_id_list(qb: &mut QueryBuilder<'_, Sqlite>, ids: impl Iterator<Item = i64>) {
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    separated.push_unseparated(")");
}
