//! Database operations for the marketplace `SQLite` database.
//!
//! ## Tables
//!
//! - `users` - Buyer, artist, and admin accounts
//! - `tower_sessions` - Tower-sessions storage
//! - `artist_profiles` - Public artist listings with denormalized review aggregates
//! - `artist_private_details` - Contact details collected at onboarding
//! - `portfolio_images` - Artist portfolio
//! - `packages` - Services offered by an artist
//! - `orders` / `order_files` - Commission orders and attached files
//! - `reviews` - One review per delivered order
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p artconnect-cli -- migrate
//! ```

pub mod artists;
pub mod orders;
pub mod packages;
pub mod reviews;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use artists::{ArtistBrowseFilter, ArtistRepository, ArtistSort};
pub use orders::OrderRepository;
pub use packages::PackageRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Embedded migrations, shared by the server binary and the test suite.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created on first connect; WAL mode keeps readers
/// from blocking the writer.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Decode a JSON text column, mapping failures to [`RepositoryError::DataCorruption`].
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    column: &str,
    raw: &str,
) -> Result<T, RepositoryError> {
    serde_json::from_str(raw)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid JSON in {column}: {e}")))
}

/// Encode a value for storage in a JSON text column.
pub(crate) fn encode_json<T: serde::Serialize>(
    column: &str,
    value: &T,
) -> Result<String, RepositoryError> {
    serde_json::to_string(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("cannot encode {column}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_valid() {
        let styles: Vec<String> = decode_json("styles", r#"["realistic","anime"]"#).unwrap();
        assert_eq!(styles, vec!["realistic".to_string(), "anime".to_string()]);
    }

    #[test]
    fn test_decode_json_invalid() {
        let result: Result<Vec<String>, _> = decode_json("styles", "not json");
        assert!(matches!(result, Err(RepositoryError::DataCorruption(_))));
    }

    #[test]
    fn test_encode_json_roundtrip() {
        let encoded = encode_json("styles", &vec!["portrait".to_string()]).unwrap();
        let decoded: Vec<String> = decode_json("styles", &encoded).unwrap();
        assert_eq!(decoded, vec!["portrait".to_string()]);
    }
}
