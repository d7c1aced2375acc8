//! Artist repository for database operations.
//!
//! Covers the public browse/detail queries, onboarding (one transaction
//! spanning profile, private details, portfolio, and the optional first
//! package), and the admin moderation queue.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use artconnect_core::{ArtistProfileId, Email, PackageId, Price, UserId, VerificationStatus};

use super::packages::insert_package;
use super::{PackageRepository, RepositoryError, ReviewRepository, decode_json, encode_json};
use crate::models::{
    ArtistDetail, ArtistProfile, ArtistSummary, ArtistWithContact, NewArtistProfile, NewPackage,
    NewPortfolioImage, OnboardPackage, OwnArtistProfile, PackageCard, PortfolioImage,
};

/// How many reviews the public artist page shows.
const RECENT_REVIEWS_LIMIT: i64 = 10;

const SELECT_PROFILE: &str = r"
    SELECT id, user_id, display_name, bio, city, styles, delivery_types, starting_price,
           profile_photo_url, instagram_url, verification_status, is_featured,
           avg_rating, total_reviews, created_at
    FROM artist_profiles
";

/// An `artist_profiles` row before the JSON columns are decoded.
#[derive(sqlx::FromRow)]
struct ArtistProfileRow {
    id: ArtistProfileId,
    user_id: UserId,
    display_name: String,
    bio: String,
    city: Option<String>,
    styles: String,
    delivery_types: String,
    starting_price: Price,
    profile_photo_url: Option<String>,
    instagram_url: Option<String>,
    verification_status: VerificationStatus,
    is_featured: bool,
    avg_rating: f64,
    total_reviews: i64,
    created_at: DateTime<Utc>,
}

impl ArtistProfileRow {
    fn into_profile(self) -> Result<ArtistProfile, RepositoryError> {
        let styles = decode_json("styles", &self.styles)?;
        let delivery_types = decode_json("delivery_types", &self.delivery_types)?;

        Ok(ArtistProfile {
            id: self.id,
            user_id: self.user_id,
            display_name: self.display_name,
            bio: self.bio,
            city: self.city,
            styles,
            delivery_types,
            starting_price: self.starting_price,
            profile_photo_url: self.profile_photo_url,
            instagram_url: self.instagram_url,
            verification_status: self.verification_status,
            is_featured: self.is_featured,
            avg_rating: self.avg_rating,
            total_reviews: self.total_reviews,
            created_at: self.created_at,
        })
    }
}

/// A browse result row: the profile plus listing-card extras.
#[derive(sqlx::FromRow)]
struct BrowseRow {
    #[sqlx(flatten)]
    profile: ArtistProfileRow,
    thumbnail_url: Option<String>,
    package_id: Option<PackageId>,
    package_name: Option<String>,
    package_price: Option<Price>,
}

impl BrowseRow {
    fn into_summary(self) -> Result<ArtistSummary, RepositoryError> {
        let package = match (self.package_id, self.package_name, self.package_price) {
            (Some(id), Some(name), Some(price)) => Some(PackageCard { id, name, price }),
            _ => None,
        };

        Ok(ArtistSummary {
            profile: self.profile.into_profile()?,
            thumbnail_url: self.thumbnail_url,
            package,
        })
    }
}

/// A moderation queue row: the profile plus the account's email.
#[derive(sqlx::FromRow)]
struct AdminArtistRow {
    #[sqlx(flatten)]
    profile: ArtistProfileRow,
    user_email: Option<String>,
}

/// How browse results are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtistSort {
    /// Highest average rating first (default).
    #[default]
    TopRated,
    /// Cheapest starting price first.
    PriceLow,
    /// Highest starting price first.
    PriceHigh,
    /// Most reviewed first.
    MostReviewed,
}

impl ArtistSort {
    /// Parse a sort query parameter. Unknown values fall back to the default.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("price-low") => Self::PriceLow,
            Some("price-high") => Self::PriceHigh,
            Some("reviews") => Self::MostReviewed,
            _ => Self::TopRated,
        }
    }

    const fn order_clause(self) -> &'static str {
        match self {
            Self::TopRated => " ORDER BY ap.avg_rating DESC, ap.id",
            Self::PriceLow => " ORDER BY ap.starting_price ASC, ap.id",
            Self::PriceHigh => " ORDER BY ap.starting_price DESC, ap.id",
            Self::MostReviewed => " ORDER BY ap.total_reviews DESC, ap.id",
        }
    }
}

/// Filters for browsing approved artists.
#[derive(Debug, Clone, Default)]
pub struct ArtistBrowseFilter {
    /// Style substring match (e.g. "anime").
    pub category: Option<String>,
    /// City substring match.
    pub city: Option<String>,
    /// Minimum starting price.
    pub price_min: Option<i64>,
    /// Maximum starting price.
    pub price_max: Option<i64>,
    /// Only featured artists.
    pub featured: bool,
    /// Result ordering.
    pub sort: ArtistSort,
    /// Maximum number of results.
    pub limit: Option<i64>,
}

/// Repository for artist database operations.
pub struct ArtistRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ArtistRepository<'a> {
    /// Create a new artist repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an artist profile with private details, portfolio images, and
    /// an optional first package, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already has a profile.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn onboard(
        &self,
        profile: &NewArtistProfile,
        portfolio: &[NewPortfolioImage],
        package: Option<&OnboardPackage>,
    ) -> Result<ArtistProfileId, RepositoryError> {
        let styles = encode_json("styles", &profile.styles)?;
        let delivery_types = encode_json("delivery_types", &profile.delivery_types)?;

        let mut tx = self.pool.begin().await?;

        let profile_id: ArtistProfileId = sqlx::query_scalar(
            r"
            INSERT INTO artist_profiles (user_id, display_name, bio, city, styles,
                                         delivery_types, starting_price, profile_photo_url,
                                         instagram_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            RETURNING id
            ",
        )
        .bind(profile.user_id)
        .bind(&profile.display_name)
        .bind(&profile.bio)
        .bind(&profile.city)
        .bind(styles)
        .bind(delivery_types)
        .bind(profile.starting_price)
        .bind(&profile.profile_photo_url)
        .bind(&profile.instagram_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("artist profile already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query(
            r"
            INSERT INTO artist_private_details (artist_profile_id, full_name, email)
            VALUES (?1, ?2, ?3)
            ",
        )
        .bind(profile_id)
        .bind(&profile.full_name)
        .bind(profile.contact_email.as_ref().map(Email::as_str))
        .execute(&mut *tx)
        .await?;

        for image in portfolio {
            sqlx::query(
                "INSERT INTO portfolio_images (artist_profile_id, image_url, title) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(profile_id)
            .bind(&image.image_url)
            .bind(&image.title)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(pkg) = package {
            let new_package = NewPackage {
                artist_profile_id: profile_id,
                name: pkg.name.clone(),
                description: pkg.description.clone(),
                delivery_type: pkg.delivery_type,
                price: pkg.price,
                delivery_time_text: pkg.delivery_time_text.clone(),
                revisions_included: pkg.revisions_included,
                is_active: true,
                add_ons: pkg.add_ons.clone(),
            };
            insert_package(&mut *tx, &new_package).await?;
        }

        tx.commit().await?;

        Ok(profile_id)
    }

    /// Get a profile by its ID, regardless of verification status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: ArtistProfileId,
    ) -> Result<Option<ArtistProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistProfileRow>(&format!("{SELECT_PROFILE} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(ArtistProfileRow::into_profile).transpose()
    }

    /// Get the profile owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_id(
        &self,
        user_id: UserId,
    ) -> Result<Option<ArtistProfile>, RepositoryError> {
        let row =
            sqlx::query_as::<_, ArtistProfileRow>(&format!("{SELECT_PROFILE} WHERE user_id = ?1"))
                .bind(user_id)
                .fetch_optional(self.pool)
                .await?;

        row.map(ArtistProfileRow::into_profile).transpose()
    }

    /// Browse approved artists with filters and ordering.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn browse(
        &self,
        filter: &ArtistBrowseFilter,
    ) -> Result<Vec<ArtistSummary>, RepositoryError> {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(
            r"
            SELECT ap.id, ap.user_id, ap.display_name, ap.bio, ap.city, ap.styles,
                   ap.delivery_types, ap.starting_price, ap.profile_photo_url,
                   ap.instagram_url, ap.verification_status, ap.is_featured,
                   ap.avg_rating, ap.total_reviews, ap.created_at,
                   (SELECT pi.image_url FROM portfolio_images pi
                    WHERE pi.artist_profile_id = ap.id ORDER BY pi.id LIMIT 1) AS thumbnail_url,
                   pk.id AS package_id, pk.name AS package_name, pk.price AS package_price
            FROM artist_profiles ap
            LEFT JOIN packages pk ON pk.id = (
                SELECT id FROM packages
                WHERE artist_profile_id = ap.id AND is_active = 1
                ORDER BY id LIMIT 1
            )
            WHERE ap.verification_status = 'approved'
            ",
        );

        if let Some(category) = &filter.category {
            qb.push(" AND ap.styles LIKE ");
            qb.push_bind(like_pattern(category));
            qb.push(" ESCAPE '\\'");
        }
        if let Some(city) = &filter.city {
            qb.push(" AND ap.city LIKE ");
            qb.push_bind(like_pattern(city));
            qb.push(" ESCAPE '\\'");
        }
        if let Some(min) = filter.price_min {
            qb.push(" AND ap.starting_price >= ");
            qb.push_bind(min);
        }
        if let Some(max) = filter.price_max {
            qb.push(" AND ap.starting_price <= ");
            qb.push_bind(max);
        }
        if filter.featured {
            qb.push(" AND ap.is_featured = 1");
        }

        qb.push(filter.sort.order_clause());

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ");
            qb.push_bind(limit);
        }

        let rows: Vec<BrowseRow> = qb.build_query_as().fetch_all(self.pool).await?;

        rows.into_iter().map(BrowseRow::into_summary).collect()
    }

    /// Get the full public page for an approved artist: profile, portfolio,
    /// active packages (cheapest first), and the most recent reviews.
    ///
    /// Returns `None` for unknown or non-approved profiles.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_public_detail(
        &self,
        id: ArtistProfileId,
    ) -> Result<Option<ArtistDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistProfileRow>(&format!(
            "{SELECT_PROFILE} WHERE id = ?1 AND verification_status = 'approved'"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let profile = row.into_profile()?;

        let portfolio = self.list_portfolio(id).await?;
        let packages = PackageRepository::new(self.pool)
            .list_active_by_price(id)
            .await?;
        let reviews = ReviewRepository::new(self.pool)
            .list_recent_for_artist(id, RECENT_REVIEWS_LIMIT)
            .await?;

        Ok(Some(ArtistDetail {
            profile,
            portfolio,
            packages,
            reviews,
        }))
    }

    /// Get a user's own profile with portfolio and every package.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_own_profile(
        &self,
        user_id: UserId,
    ) -> Result<Option<OwnArtistProfile>, RepositoryError> {
        let Some(profile) = self.get_by_user_id(user_id).await? else {
            return Ok(None);
        };

        let portfolio = self.list_portfolio(profile.id).await?;
        let packages = PackageRepository::new(self.pool)
            .list_for_artist(profile.id)
            .await?;

        Ok(Some(OwnArtistProfile {
            profile,
            portfolio,
            packages,
        }))
    }

    /// List every profile for the admin moderation queue, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored data is invalid.
    pub async fn list_all(&self) -> Result<Vec<ArtistWithContact>, RepositoryError> {
        let rows = sqlx::query_as::<_, AdminArtistRow>(
            r"
            SELECT ap.id, ap.user_id, ap.display_name, ap.bio, ap.city, ap.styles,
                   ap.delivery_types, ap.starting_price, ap.profile_photo_url,
                   ap.instagram_url, ap.verification_status, ap.is_featured,
                   ap.avg_rating, ap.total_reviews, ap.created_at,
                   u.email AS user_email
            FROM artist_profiles ap
            JOIN users u ON u.id = ap.user_id
            ORDER BY ap.created_at DESC, ap.id DESC
            ",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let user_email = row
                    .user_email
                    .as_deref()
                    .map(Email::parse)
                    .transpose()
                    .map_err(|e| {
                        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                    })?;

                Ok(ArtistWithContact {
                    profile: row.profile.into_profile()?,
                    user_email,
                })
            })
            .collect()
    }

    /// Apply a partial moderation update. Fields passed as `None` keep their
    /// current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the profile doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_moderation(
        &self,
        id: ArtistProfileId,
        verification_status: Option<VerificationStatus>,
        is_featured: Option<bool>,
    ) -> Result<ArtistProfile, RepositoryError> {
        let row = sqlx::query_as::<_, ArtistProfileRow>(
            r"
            UPDATE artist_profiles
            SET verification_status = COALESCE(?1, verification_status),
                is_featured = COALESCE(?2, is_featured)
            WHERE id = ?3
            RETURNING id, user_id, display_name, bio, city, styles, delivery_types,
                      starting_price, profile_photo_url, instagram_url, verification_status,
                      is_featured, avg_rating, total_reviews, created_at
            ",
        )
        .bind(verification_status)
        .bind(is_featured)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        row.into_profile()
    }

    async fn list_portfolio(
        &self,
        id: ArtistProfileId,
    ) -> Result<Vec<PortfolioImage>, RepositoryError> {
        Ok(sqlx::query_as::<_, PortfolioImage>(
            "SELECT id, artist_profile_id, image_url, title FROM portfolio_images \
             WHERE artist_profile_id = ?1 ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?)
    }
}

/// Build a `LIKE` substring pattern with the wildcard characters escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_plain() {
        assert_eq!(like_pattern("anime"), "%anime%");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("100%_real"), "%100\\%\\_real%");
    }

    #[test]
    fn test_sort_from_param() {
        assert_eq!(ArtistSort::from_param(None), ArtistSort::TopRated);
        assert_eq!(
            ArtistSort::from_param(Some("price-low")),
            ArtistSort::PriceLow
        );
        assert_eq!(
            ArtistSort::from_param(Some("price-high")),
            ArtistSort::PriceHigh
        );
        assert_eq!(
            ArtistSort::from_param(Some("reviews")),
            ArtistSort::MostReviewed
        );
        // Unknown sort values fall back to the default ordering
        assert_eq!(ArtistSort::from_param(Some("bogus")), ArtistSort::TopRated);
    }
}
