//! Authentication service: signup, password login, and the demo OTP login.
//!
//! Passwords are hashed with argon2 and stored as PHC strings. The OTP
//! scheme is the simulated demo flow: any syntactically valid 6-digit code
//! logs in a registered phone number, no SMS is ever sent.
//!
//! Each login entry point (`user`, `artist`, `admin`) gates which roles may
//! authenticate through it, so an artist account can't wander into the buyer
//! flow and vice versa.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use artconnect_core::{Email, Phone, Role};

use crate::db::UserRepository;
use crate::models::User;

mod error;

pub use error::AuthError;

/// Minimum password length at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Which login page the request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginType {
    /// Buyer-facing login; artists are pointed at their own page.
    #[default]
    User,
    /// Artist login; requires an artist account.
    Artist,
    /// Admin console login; requires an admin account.
    Admin,
}

impl LoginType {
    /// Parse the `loginType` request field; absent or unknown means `User`.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("artist") => Self::Artist,
            Some("admin") => Self::Admin,
            _ => Self::User,
        }
    }
}

/// Authentication service.
///
/// Wraps the user repository with credential verification and the signup
/// validation rules.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    // ========================================================================
    // Signup
    // ========================================================================

    /// Register a new account.
    ///
    /// Requires a name and at least one of email/phone. The password is
    /// optional (OTP-only accounts have none). Role may be `user` or
    /// `artist`; admin accounts are only created via the CLI.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` describing the first failed validation, or a
    /// wrapped repository error.
    pub async fn signup(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        phone: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AuthError::MissingName)?;

        let email = email.map(str::trim).filter(|s| !s.is_empty());
        let phone = phone.map(str::trim).filter(|s| !s.is_empty());
        if email.is_none() && phone.is_none() {
            return Err(AuthError::MissingContact);
        }

        let email = email.map(Email::parse).transpose()?;
        let phone = phone.map(Phone::parse).transpose()?;

        let role = match role {
            None | Some("user") => Role::User,
            Some("artist") => Role::Artist,
            // No self-service admin accounts; see the CLI's `admin create`
            Some(_) => return Err(AuthError::InvalidRole),
        };

        if let Some(email) = &email
            && self.users.get_by_email(email).await?.is_some()
        {
            return Err(AuthError::EmailTaken);
        }

        if let Some(phone) = &phone
            && self.users.get_by_phone(phone).await?.is_some()
        {
            return Err(AuthError::PhoneTaken);
        }

        let password_hash = match password {
            Some(password) => {
                validate_password(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let user = self
            .users
            .create(
                name,
                email.as_ref(),
                phone.as_ref(),
                password_hash.as_deref(),
                role,
            )
            .await?;

        Ok(user)
    }

    // ========================================================================
    // Login
    // ========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` when the pair doesn't match
    /// an account (including accounts with no password set), or
    /// `AuthError::WrongLoginType` when the account's role isn't allowed
    /// through this entry point.
    pub async fn login_with_password(
        &self,
        email: &str,
        password: &str,
        login_type: LoginType,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let Some((user, password_hash)) = self.users.get_password_hash(&email).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        verify_password(password, &password_hash)?;

        check_login_type(login_type, user.role)?;

        Ok(user)
    }

    /// Authenticate with phone and the demo OTP.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOtp` for a malformed code,
    /// `AuthError::PhoneNotRegistered` for an unknown number, or
    /// `AuthError::WrongLoginType` for a role/entry-point mismatch.
    pub async fn login_with_otp(
        &self,
        phone: &str,
        otp: &str,
        login_type: LoginType,
    ) -> Result<User, AuthError> {
        if !is_valid_otp(otp) {
            return Err(AuthError::InvalidOtp);
        }

        let phone = Phone::parse(phone).map_err(|_| AuthError::PhoneNotRegistered)?;

        let Some(user) = self.users.get_by_phone(&phone).await? else {
            return Err(AuthError::PhoneNotRegistered);
        };

        check_login_type(login_type, user.role)?;

        Ok(user)
    }
}

/// Enforce the role gate for a login entry point.
fn check_login_type(login_type: LoginType, role: Role) -> Result<(), AuthError> {
    match login_type {
        LoginType::Artist if role != Role::Artist => Err(AuthError::WrongLoginType(
            "This account is not registered as an artist",
        )),
        LoginType::User if role == Role::Artist => Err(AuthError::WrongLoginType(
            "Please use the artist login page",
        )),
        LoginType::Admin if role != Role::Admin => Err(AuthError::WrongLoginType(
            "You do not have admin privileges",
        )),
        _ => Ok(()),
    }
}

/// The demo OTP is any 6-digit numeric code.
fn is_valid_otp(otp: &str) -> bool {
    otp.len() == 6 && otp.bytes().all(|b| b.is_ascii_digit())
}

// ============================================================================
// Password Helpers
// ============================================================================

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("a-much-longer-password").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret-password").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret-password", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHash(_))
        ));
    }

    #[test]
    fn test_is_valid_otp() {
        assert!(is_valid_otp("123456"));
        assert!(is_valid_otp("000000"));

        assert!(!is_valid_otp("12345"));
        assert!(!is_valid_otp("1234567"));
        assert!(!is_valid_otp("12345a"));
        assert!(!is_valid_otp("12 456"));
        assert!(!is_valid_otp(""));
    }

    #[test]
    fn test_login_type_from_param() {
        assert_eq!(LoginType::from_param(None), LoginType::User);
        assert_eq!(LoginType::from_param(Some("user")), LoginType::User);
        assert_eq!(LoginType::from_param(Some("artist")), LoginType::Artist);
        assert_eq!(LoginType::from_param(Some("admin")), LoginType::Admin);
        // Unknown values fall back to the buyer entry point
        assert_eq!(LoginType::from_param(Some("banana")), LoginType::User);
    }

    #[test]
    fn test_check_login_type_artist_page() {
        assert!(check_login_type(LoginType::Artist, Role::Artist).is_ok());
        assert!(check_login_type(LoginType::Artist, Role::User).is_err());
        assert!(check_login_type(LoginType::Artist, Role::Admin).is_err());
    }

    #[test]
    fn test_check_login_type_user_page() {
        assert!(check_login_type(LoginType::User, Role::User).is_ok());
        // Admins may use the buyer login
        assert!(check_login_type(LoginType::User, Role::Admin).is_ok());
        assert!(check_login_type(LoginType::User, Role::Artist).is_err());
    }

    #[test]
    fn test_check_login_type_admin_page() {
        assert!(check_login_type(LoginType::Admin, Role::Admin).is_ok());
        assert!(check_login_type(LoginType::Admin, Role::User).is_err());
        assert!(check_login_type(LoginType::Admin, Role::Artist).is_err());
    }

    #[test]
    fn test_gate_messages() {
        let err = check_login_type(LoginType::User, Role::Artist).unwrap_err();
        assert_eq!(err.to_string(), "Please use the artist login page");

        let err = check_login_type(LoginType::Artist, Role::User).unwrap_err();
        assert_eq!(err.to_string(), "This account is not registered as an artist");

        let err = check_login_type(LoginType::Admin, Role::User).unwrap_err();
        assert_eq!(err.to_string(), "You do not have admin privileges");
    }
}
