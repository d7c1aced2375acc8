//! Authentication route handlers.
//!
//! JSON endpoints for signup, the two login schemes, logout, and session
//! introspection. A successful login stores a [`CurrentUser`] snapshot in the
//! session; the auth extractors read it back on protected routes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use artconnect_core::{Email, Role, UserId};

use crate::error::{self, AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::services::auth::LoginType;
use crate::state::AppState;

// =============================================================================
// Signup
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Public view of an account, as returned by signup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: Option<Email>,
    pub role: Role,
}

/// Signup response body.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Register a new account.
///
/// POST /auth/signup
///
/// # Errors
///
/// Returns 400 for validation failures: missing name or contact, taken
/// email/phone, weak password, or an unknown role.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .signup(
            req.name.as_deref(),
            req.email.as_deref(),
            req.phone.as_deref(),
            req.password.as_deref(),
            req.role.as_deref(),
        )
        .await?;

    Ok(Json(SignupResponse {
        success: true,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}

// =============================================================================
// Login
// =============================================================================

/// Password login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub login_type: Option<String>,
}

/// OTP login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpLoginRequest {
    pub phone: Option<String>,
    pub otp: Option<String>,
    pub login_type: Option<String>,
}

/// Login response body.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: CurrentUser,
}

/// Authenticate with email and password.
///
/// POST /auth/login
///
/// # Errors
///
/// Returns 401 for bad credentials or a role/entry-point mismatch.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let login_type = LoginType::from_param(req.login_type.as_deref());

    // Missing fields parse as empty strings, which fail credential checks
    // with the same message a bad pair gets.
    let user = auth
        .login_with_password(
            req.email.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
            login_type,
        )
        .await?;

    establish_session(&session, user).await.map(Json)
}

/// Authenticate with phone and the demo OTP.
///
/// POST /auth/login/otp
///
/// # Errors
///
/// Returns 400 for a malformed code and 401 for an unknown phone or a
/// role/entry-point mismatch.
pub async fn login_otp(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<OtpLoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let login_type = LoginType::from_param(req.login_type.as_deref());

    let user = auth
        .login_with_otp(
            req.phone.as_deref().unwrap_or(""),
            req.otp.as_deref().unwrap_or(""),
            login_type,
        )
        .await?;

    establish_session(&session, user).await.map(Json)
}

/// Store the authenticated user in the session and the Sentry scope.
async fn establish_session(session: &Session, user: User) -> Result<LoginResponse> {
    let current = CurrentUser {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        artist_profile_id: user.artist_profile_id,
    };

    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    error::set_sentry_user(&current.id, current.email.as_ref().map(Email::as_str));

    Ok(LoginResponse {
        success: true,
        user: current,
    })
}

// =============================================================================
// Logout & Session
// =============================================================================

/// Logout response body.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// End the current session.
///
/// POST /auth/logout
///
/// Clearing the session is best effort: store failures are logged and the
/// client still gets a success response with the cookie invalidated.
pub async fn logout(session: Session) -> Json<LogoutResponse> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session record
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    error::clear_sentry_user();

    Json(LogoutResponse { success: true })
}

/// Session introspection response body.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: CurrentUser,
}

/// The identity stored in the current session.
///
/// GET /auth/session
pub async fn current_session(RequireAuth(user): RequireAuth) -> Json<SessionResponse> {
    Json(SessionResponse { user })
}
