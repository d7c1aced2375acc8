//! Artist onboarding and own-profile domain logic.
//!
//! Onboarding turns the submitted form into a pending profile: the avatar is
//! generated, portfolio images are titled by position, and the optional first
//! package gets the house defaults (two revisions, the standard add-on price
//! table). Verification starts at `pending`; admins approve from the console.

use std::collections::BTreeMap;

use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, DeliveryType, Price};

use crate::db::{ArtistRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::models::{
    CurrentUser, NewArtistProfile, NewPortfolioImage, OnboardPackage, OwnArtistProfile,
};

/// Every first package starts with the same revision allowance.
const FIRST_PACKAGE_REVISIONS: i64 = 2;

/// Profile photos are generated avatars keyed on the user ID.
const AVATAR_BASE_URL: &str = "https://i.pravatar.cc/150";

/// The onboarding form, decoupled from the wire payload.
#[derive(Debug, Clone, Default)]
pub struct OnboardForm {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub styles: Vec<String>,
    pub delivery_types: Vec<DeliveryType>,
    pub starting_price: Option<Price>,
    pub instagram_url: Option<String>,
    pub portfolio_urls: Vec<String>,
    pub package: Option<PackageForm>,
}

/// First-package section of the onboarding form.
#[derive(Debug, Clone)]
pub struct PackageForm {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub delivery_time_text: String,
    pub delivery_type: DeliveryType,
}

/// Artist onboarding and profile service.
pub struct ArtistService<'a> {
    artists: ArtistRepository<'a>,
}

impl<'a> ArtistService<'a> {
    /// Create a new artist service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            artists: ArtistRepository::new(pool),
        }
    }

    /// Create the caller's artist profile from the onboarding form.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` when a required field is missing and
    /// `AppError::Conflict` when the caller already has a profile.
    pub async fn onboard(
        &self,
        user: &CurrentUser,
        form: OnboardForm,
    ) -> Result<ArtistProfileId> {
        let (Some(display_name), Some(bio), Some(starting_price)) =
            (form.display_name, form.bio, form.starting_price)
        else {
            return Err(AppError::Validation("Missing required fields".to_owned()));
        };

        let delivery_types = if form.delivery_types.is_empty() {
            vec![DeliveryType::Digital]
        } else {
            form.delivery_types
        };

        // The private contact record falls back to the public display name
        // when the account has no name of its own.
        let full_name = if user.name.trim().is_empty() {
            display_name.clone()
        } else {
            user.name.clone()
        };

        let profile = NewArtistProfile {
            user_id: user.id,
            display_name,
            bio,
            city: form.city,
            styles: form.styles,
            delivery_types,
            starting_price,
            instagram_url: form.instagram_url,
            profile_photo_url: Some(format!("{AVATAR_BASE_URL}?u={}", user.id)),
            full_name,
            contact_email: user.email.clone(),
        };

        let portfolio: Vec<NewPortfolioImage> = form
            .portfolio_urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| NewPortfolioImage {
                image_url: url,
                title: Some(format!("Artwork {}", i + 1)),
            })
            .collect();

        let package = form.package.map(|pkg| OnboardPackage {
            name: pkg.name,
            description: pkg.description,
            delivery_type: pkg.delivery_type,
            price: pkg.price,
            delivery_time_text: pkg.delivery_time_text,
            revisions_included: FIRST_PACKAGE_REVISIONS,
            add_ons: default_add_ons(),
        });

        let profile_id = self
            .artists
            .onboard(&profile, &portfolio, package.as_ref())
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    AppError::Conflict("Artist profile already exists".to_owned())
                }
                other => AppError::Database(other),
            })?;

        Ok(profile_id)
    }

    /// The caller's own profile with portfolio and every package.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the caller hasn't onboarded yet.
    pub async fn own_profile(&self, user: &CurrentUser) -> Result<OwnArtistProfile> {
        self.artists
            .get_own_profile(user.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Artist profile not found".to_owned()))
    }
}

/// Add-on price table attached to an artist's first package.
fn default_add_ons() -> BTreeMap<String, Price> {
    BTreeMap::from([
        ("extraPerson".to_owned(), Price::new(299)),
        ("detailedBackground".to_owned(), Price::new(199)),
        ("expressDelivery".to_owned(), Price::new(499)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_add_ons_table() {
        let add_ons = default_add_ons();

        assert_eq!(add_ons.len(), 3);
        assert_eq!(add_ons.get("extraPerson"), Some(&Price::new(299)));
        assert_eq!(add_ons.get("detailedBackground"), Some(&Price::new(199)));
        assert_eq!(add_ons.get("expressDelivery"), Some(&Price::new(499)));
    }
}
