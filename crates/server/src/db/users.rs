//! User repository for database operations.
//!
//! Queries join `artist_profiles` so every loaded account carries the ID of
//! its artist profile when one exists.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use artconnect_core::{ArtistProfileId, Email, Phone, Role, UserId};

use super::RepositoryError;
use crate::models::User;

const SELECT_USER: &str = r"
    SELECT u.id, u.name, u.email, u.phone, u.password_hash, u.role,
           ap.id AS artist_profile_id, u.created_at
    FROM users u
    LEFT JOIN artist_profiles ap ON ap.user_id = u.id
";

/// A `users` row before domain validation.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    password_hash: Option<String>,
    role: Role,
    artist_profile_id: Option<ArtistProfileId>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = self
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;
        let phone = self
            .phone
            .as_deref()
            .map(Phone::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid phone in database: {e}"))
            })?;

        Ok(User {
            id: self.id,
            name: self.name,
            email,
            phone,
            role: self.role,
            artist_profile_id: self.artist_profile_id,
            created_at: self.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored contact data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.email = ?1"))
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their phone number.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored contact data is invalid.
    pub async fn get_by_phone(&self, phone: &Phone) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.phone = ?1"))
            .bind(phone.as_str())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored contact data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.id = ?1"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user.
    ///
    /// At least one of `email` and `phone` must be present; the service layer
    /// enforces this before calling.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or phone is already registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: Option<&Email>,
        phone: Option<&Phone>,
        password_hash: Option<&str>,
        role: Role,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, phone, password_hash, role)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, name, email, phone, password_hash, role,
                      NULL AS artist_profile_id, created_at
            ",
        )
        .bind(name)
        .bind(email.map(Email::as_str))
        .bind(phone.map(Phone::as_str))
        .bind(password_hash)
        .bind(role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                let field = if db_err.message().contains("users.phone") {
                    "phone number"
                } else {
                    "email"
                };
                return RepositoryError::Conflict(format!("{field} already registered"));
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set
    /// (OTP-only accounts).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE u.email = ?1"))
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;

        let Some(mut row) = row else {
            return Ok(None);
        };

        let Some(password_hash) = row.password_hash.take() else {
            return Ok(None);
        };

        Ok(Some((row.into_user()?, password_hash)))
    }
}
