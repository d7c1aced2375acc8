//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Auth
//! POST /auth/signup            - Register an account
//! POST /auth/login             - Password login
//! POST /auth/login/otp         - Phone + OTP login (demo scheme)
//! POST /auth/logout            - End the session
//! GET  /auth/session           - Current session identity
//!
//! # Public catalog
//! GET  /artists                - Browse approved artists (filters + sort)
//! GET  /artists/{id}           - Artist detail page
//! GET  /packages/{id}          - Package with artist info
//!
//! # Artist (requires artist role)
//! POST /artist/onboard         - Create own artist profile
//! GET  /artist/profile         - Own profile with portfolio and packages
//!
//! # Orders (requires auth)
//! POST  /orders                - Place an order
//! GET   /orders                - Own orders, as buyer or artist
//! PATCH /orders/{id}/status    - Move an order to a new status
//!
//! # Reviews (requires auth)
//! POST /reviews                - Review a delivered order
//!
//! # Admin (requires admin role)
//! GET   /admin/artists         - Moderation queue with contact emails
//! PATCH /admin/artists/{id}    - Approve/reject/feature an artist
//! GET   /admin/orders          - All orders overview
//! ```

pub mod admin;
pub mod artists;
pub mod auth;
pub mod orders;
pub mod packages;
pub mod reviews;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, post},
};

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/login/otp", post(auth::login_otp))
        .route("/logout", post(auth::logout))
        .route("/session", get(auth::current_session))
}

/// Create the public artist routes router.
pub fn artist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(artists::index))
        .route("/{id}", get(artists::show))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/{id}/status", patch(orders::update_status))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/artists", get(admin::list_artists))
        .route("/artists/{id}", patch(admin::update_artist))
        .route("/orders", get(admin::list_orders))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth routes
        .nest("/auth", auth_routes())
        // Public catalog
        .nest("/artists", artist_routes())
        .route("/packages/{id}", get(packages::show))
        // Artist-only routes
        .route("/artist/onboard", post(artists::onboard))
        .route("/artist/profile", get(artists::own_profile))
        // Order routes
        .nest("/orders", order_routes())
        // Reviews
        .route("/reviews", post(reviews::create))
        // Admin console
        .nest("/admin", admin_routes())
}

/// Build the full application router, session layer included.
///
/// Integration tests drive this router directly; `main` adds the tracing and
/// Sentry layers on top.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.pool(), state.config());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes())
        .layer(session_layer)
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
