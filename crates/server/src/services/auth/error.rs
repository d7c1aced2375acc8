//! Authentication error types.

use thiserror::Error;

use artconnect_core::{EmailError, PhoneError};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// The `Display` strings of the 4xx variants are sent to clients verbatim,
/// so they are written as user-facing messages.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair didn't match an account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// No account is registered for this phone number.
    #[error("No account found with this phone number")]
    PhoneNotRegistered,

    /// The OTP is not a 6-digit numeric code.
    #[error("Invalid OTP. Please enter a 6-digit code.")]
    InvalidOtp,

    /// The account's role doesn't match the login entry point.
    #[error("{0}")]
    WrongLoginType(&'static str),

    /// Signup is missing the account holder's name.
    #[error("Name is required")]
    MissingName,

    /// Signup needs at least one contact channel.
    #[error("Email or phone number is required")]
    MissingContact,

    /// The email address is malformed.
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),

    /// The phone number is malformed.
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),

    /// The email is already registered to another account.
    #[error("Email already registered")]
    EmailTaken,

    /// The phone number is already registered to another account.
    #[error("Phone number already registered")]
    PhoneTaken,

    /// The requested role can't be claimed at signup.
    #[error("Invalid role")]
    InvalidRole,

    /// Password doesn't meet the minimum requirements.
    #[error("Password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
