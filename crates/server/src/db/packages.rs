//! Package repository for database operations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, DeliveryType, PackageId, Price};

use super::{RepositoryError, decode_json, encode_json};
use crate::models::{ArtistBrief, NewPackage, Package};

const SELECT_PACKAGE: &str = r"
    SELECT id, artist_profile_id, name, description, delivery_type, price,
           delivery_time_text, revisions_included, is_active, add_ons, created_at
    FROM packages
";

/// A `packages` row before the JSON columns are decoded.
#[derive(sqlx::FromRow)]
pub(crate) struct PackageRow {
    id: PackageId,
    artist_profile_id: ArtistProfileId,
    name: String,
    description: String,
    delivery_type: DeliveryType,
    price: Price,
    delivery_time_text: String,
    revisions_included: i64,
    is_active: bool,
    add_ons: String,
    created_at: DateTime<Utc>,
}

impl PackageRow {
    pub(crate) fn into_package(self) -> Result<Package, RepositoryError> {
        let add_ons: BTreeMap<String, Price> = decode_json("add_ons", &self.add_ons)?;

        Ok(Package {
            id: self.id,
            artist_profile_id: self.artist_profile_id,
            name: self.name,
            description: self.description,
            delivery_type: self.delivery_type,
            price: self.price,
            delivery_time_text: self.delivery_time_text,
            revisions_included: self.revisions_included,
            is_active: self.is_active,
            add_ons,
            created_at: self.created_at,
        })
    }
}

/// Insert a package, returning the stored row.
///
/// Takes an executor so onboarding can run this inside its transaction.
pub(crate) async fn insert_package<'e, E>(
    executor: E,
    package: &NewPackage,
) -> Result<Package, RepositoryError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let add_ons = encode_json("add_ons", &package.add_ons)?;

    let row = sqlx::query_as::<_, PackageRow>(
        r"
        INSERT INTO packages (artist_profile_id, name, description, delivery_type, price,
                              delivery_time_text, revisions_included, is_active, add_ons)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        RETURNING id, artist_profile_id, name, description, delivery_type, price,
                  delivery_time_text, revisions_included, is_active, add_ons, created_at
        ",
    )
    .bind(package.artist_profile_id)
    .bind(&package.name)
    .bind(&package.description)
    .bind(package.delivery_type)
    .bind(package.price)
    .bind(&package.delivery_time_text)
    .bind(package.revisions_included)
    .bind(package.is_active)
    .bind(add_ons)
    .fetch_one(executor)
    .await?;

    row.into_package()
}

/// Repository for package database operations.
pub struct PackageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> PackageRepository<'a> {
    /// Create a new package repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a package by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored add-ons are invalid.
    pub async fn get_by_id(&self, id: PackageId) -> Result<Option<Package>, RepositoryError> {
        let row = sqlx::query_as::<_, PackageRow>(&format!("{SELECT_PACKAGE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(PackageRow::into_package).transpose()
    }

    /// Get a package together with its artist's display info.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_artist(
        &self,
        id: PackageId,
    ) -> Result<Option<(Package, ArtistBrief)>, RepositoryError> {
        let Some(package) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let artist = sqlx::query_as::<_, ArtistBrief>(
            "SELECT id, display_name, profile_photo_url FROM artist_profiles WHERE id = ?1",
        )
        .bind(package.artist_profile_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "package {id} references missing artist profile {}",
                package.artist_profile_id
            ))
        })?;

        Ok(Some((package, artist)))
    }

    /// List all packages for an artist in creation order, active or not.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_artist(
        &self,
        artist_profile_id: ArtistProfileId,
    ) -> Result<Vec<Package>, RepositoryError> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "{SELECT_PACKAGE} WHERE artist_profile_id = ?1 ORDER BY id"
        ))
        .bind(artist_profile_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PackageRow::into_package).collect()
    }

    /// List an artist's active packages, cheapest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_by_price(
        &self,
        artist_profile_id: ArtistProfileId,
    ) -> Result<Vec<Package>, RepositoryError> {
        let rows = sqlx::query_as::<_, PackageRow>(&format!(
            "{SELECT_PACKAGE} WHERE artist_profile_id = ?1 AND is_active = 1 ORDER BY price, id"
        ))
        .bind(artist_profile_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PackageRow::into_package).collect()
    }
}
