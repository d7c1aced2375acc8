//! Admin account management commands.
//!
//! # Usage
//!
//! ```bash
//! ac-cli admin create -e admin@example.com -n "Admin Name" -p "a-strong-password"
//! ```
//!
//! Signup through the API never grants the admin role, so admin accounts are
//! bootstrapped with this command instead.
//!
//! # Environment Variables
//!
//! - `ARTCONNECT_DATABASE_URL` - `SQLite` connection string (falls back to
//!   the generic `DATABASE_URL`)

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;
use thiserror::Error;

use artconnect_core::{Email, Role, UserId};

/// Minimum password length, matching the signup rule.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during admin account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Account already exists.
    #[error("Account already exists with email: {0}")]
    UserExists(String),

    /// Password hashing failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}

/// Create a new admin account.
///
/// # Arguments
///
/// * `email` - Admin's email address
/// * `name` - Admin's display name
/// * `password` - Login password (hashed before storage)
///
/// # Returns
///
/// The ID of the created account.
///
/// # Errors
///
/// Returns `AdminError` if validation fails, the email is already taken, or
/// the database is unreachable.
pub async fn create_account(email: &str, name: &str, password: &str) -> Result<UserId, AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminError::WeakPassword);
    }

    let database_url = database_url()?;

    tracing::info!("Connecting to database...");
    let pool = SqlitePool::connect(&database_url).await?;

    tracing::info!("Creating admin account: {} ({})", name, email);

    let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?1")
        .bind(email.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(AdminError::UserExists(email.into_inner()));
    }

    let password_hash = hash_password(password)?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        r"
        INSERT INTO users (name, email, password_hash, role)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id
        ",
    )
    .bind(name)
    .bind(email.as_str())
    .bind(&password_hash)
    .bind(Role::Admin)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "Admin account created successfully! ID: {}, Email: {}",
        user_id,
        email
    );

    Ok(user_id)
}

fn hash_password(password: &str) -> Result<String, AdminError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AdminError::PasswordHash(e.to_string()))
}

fn database_url() -> Result<String, AdminError> {
    std::env::var("ARTCONNECT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| AdminError::MissingEnvVar("ARTCONNECT_DATABASE_URL"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_produces_argon2_hash() {
        let hash = hash_password("bootstrap-password").unwrap();
        assert!(hash.starts_with("$argon2"));
    }
}
