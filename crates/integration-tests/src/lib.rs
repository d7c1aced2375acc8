//! In-process integration test harness for ArtConnect.
//!
//! [`TestContext`] builds the real router against a fresh in-memory `SQLite`
//! database, so every test exercises the actual extractors, session layer,
//! services, and repositories without a running server. [`TestClient`] plays
//! the part of a browser: it carries the session cookie across requests.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p artconnect-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Signup, login, OTP, and session lifecycle
//! - `artist_onboarding` - Profile creation and the pending state
//! - `artist_browse` - Public browsing, filters, sorts, and detail pages
//! - `order_workflow` - Order placement and the status state machine
//! - `review_flow` - Reviews and rating aggregate recomputation
//! - `admin_console` - Moderation endpoints and role gates

#![cfg_attr(not(test), forbid(unsafe_code))]
// serde_json::Value indexing returns Null for absent keys rather than panicking.
#![allow(clippy::indexing_slicing)]
// Harness helpers assert and expect() freely; failures are test failures.
#![allow(clippy::missing_panics_doc)]

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tower::util::ServiceExt;

use artconnect_server::config::ServerConfig;
use artconnect_server::db::MIGRATOR;
use artconnect_server::routes;
use artconnect_server::state::AppState;

/// Password used for every account the harness creates.
pub const PASSWORD: &str = "orange-tiger-brush-42";

// =============================================================================
// Test Context
// =============================================================================

/// A fully wired application instance backed by an in-memory database.
///
/// The pool is limited to a single connection so the in-memory database
/// outlives individual acquires; dropping the last connection to a
/// `sqlite::memory:` database would discard it.
pub struct TestContext {
    app: Router,
    pub pool: SqlitePool,
}

impl TestContext {
    /// Build the router against a freshly migrated in-memory database.
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("Failed to parse host"),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("kJ8mN3pQ7rT2uW9zXc4vBn6sDf1gHl5a"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };

        let state = AppState::new(config, pool.clone());
        let app = routes::app(state);

        Self { app, pool }
    }

    /// A fresh client with no session.
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient {
            app: self.app.clone(),
            cookie: None,
        }
    }

    /// Sign up an account and log it in, returning a client holding the
    /// session. `role` is the signup role (`user` or `artist`).
    pub async fn signup_and_login(&self, name: &str, email: &str, role: &str) -> TestClient {
        let mut client = self.client();

        let resp = client
            .post(
                "/auth/signup",
                json!({
                    "name": name,
                    "email": email,
                    "password": PASSWORD,
                    "role": role,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "signup failed: {}", resp.text);

        let login_type = if role == "artist" { "artist" } else { "user" };
        let resp = client
            .post(
                "/auth/login",
                json!({
                    "email": email,
                    "password": PASSWORD,
                    "loginType": login_type,
                }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::OK, "login failed: {}", resp.text);

        client
    }

    /// Create an admin account directly in the database (signup never grants
    /// the admin role) and log it in through the admin login page.
    pub async fn admin(&self) -> TestClient {
        let email = "admin@artconnect.test";
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(PASSWORD.as_bytes(), &salt)
            .expect("Failed to hash password")
            .to_string();

        sqlx::query("INSERT INTO users (name, email, password_hash, role) VALUES (?1, ?2, ?3, 'admin')")
            .bind("Admin")
            .bind(email)
            .bind(hash)
            .execute(&self.pool)
            .await
            .expect("Failed to insert admin account");

        let mut client = self.client();
        let resp = client
            .post(
                "/auth/login",
                json!({ "email": email, "password": PASSWORD, "loginType": "admin" }),
            )
            .await;
        assert_eq!(
            resp.status,
            StatusCode::OK,
            "admin login failed: {}",
            resp.text
        );

        client
    }

    /// Sign up an artist, onboard a profile with one package, and approve it
    /// so the profile is publicly visible.
    pub async fn seeded_artist(&self, email: &str, display_name: &str) -> SeededArtist {
        let mut client = self.signup_and_login(display_name, email, "artist").await;

        let resp = client
            .post(
                "/artist/onboard",
                onboard_body(display_name, "Mumbai", &["realistic"], 999),
            )
            .await;
        assert_eq!(
            resp.status,
            StatusCode::OK,
            "onboarding failed: {}",
            resp.text
        );
        let artist_profile_id = resp.body["artistProfileId"]
            .as_i64()
            .expect("artistProfileId missing from onboard response");

        self.approve_artist(artist_profile_id).await;

        // The starter package id only surfaces through the profile endpoint.
        let resp = client.get("/artist/profile").await;
        assert_eq!(resp.status, StatusCode::OK);
        let package_id = resp.body["profile"]["packages"][0]["id"]
            .as_i64()
            .expect("starter package missing from profile");

        SeededArtist {
            client,
            artist_profile_id,
            package_id,
        }
    }

    /// Flip a profile to `approved` directly, standing in for the admin
    /// console when a test only needs a visible artist.
    pub async fn approve_artist(&self, artist_profile_id: i64) {
        sqlx::query("UPDATE artist_profiles SET verification_status = 'approved' WHERE id = ?1")
            .bind(artist_profile_id)
            .execute(&self.pool)
            .await
            .expect("Failed to approve artist profile");
    }

    /// Mark a profile as featured directly.
    pub async fn feature_artist(&self, artist_profile_id: i64) {
        sqlx::query("UPDATE artist_profiles SET is_featured = 1 WHERE id = ?1")
            .bind(artist_profile_id)
            .execute(&self.pool)
            .await
            .expect("Failed to feature artist profile");
    }

    /// Set the stored rating aggregates directly, for sort-order tests that
    /// would otherwise need a full order-and-review cycle per data point.
    pub async fn set_rating(&self, artist_profile_id: i64, avg_rating: f64, total_reviews: i64) {
        sqlx::query("UPDATE artist_profiles SET avg_rating = ?1, total_reviews = ?2 WHERE id = ?3")
            .bind(avg_rating)
            .bind(total_reviews)
            .bind(artist_profile_id)
            .execute(&self.pool)
            .await
            .expect("Failed to set rating aggregates");
    }
}

/// An approved artist created by [`TestContext::seeded_artist`].
pub struct SeededArtist {
    /// Logged-in client for the artist account.
    pub client: TestClient,
    pub artist_profile_id: i64,
    pub package_id: i64,
}

// =============================================================================
// Test Client
// =============================================================================

/// An HTTP client driving the router in-process via `tower::ServiceExt`.
///
/// The session cookie from the most recent `Set-Cookie` response header is
/// replayed on every subsequent request, mirroring browser behaviour.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&mut self, path: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn request(&mut self, method: Method, path: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router returned an error");

        let status = response.status();
        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let value = set_cookie
                .to_str()
                .expect("Set-Cookie header is not valid UTF-8");
            // Keep only `name=value`, dropping Path/Expires/etc. attributes.
            self.cookie = value.split(';').next().map(str::to_string);
        }

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse { status, body, text }
    }
}

/// A decoded response: status, parsed JSON body (or `Null` for non-JSON
/// responses such as `/health`), and the raw text.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// The `error` field of the response body.
    #[must_use]
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or("")
    }
}

// =============================================================================
// Request Builders & Flow Helpers
// =============================================================================

/// A complete onboarding request body with one portfolio image and one
/// starter package priced at `starting_price`.
#[must_use]
pub fn onboard_body(display_name: &str, city: &str, styles: &[&str], starting_price: i64) -> Value {
    json!({
        "profile": {
            "displayName": display_name,
            "bio": "Commissioned portraits and character art",
            "city": city,
            "styles": styles,
            "deliveryTypes": ["digital"],
            "startingPrice": starting_price,
            "instagramUrl": "https://instagram.test/studio",
        },
        "portfolioUrls": ["https://cdn.artconnect.test/art-1.jpg"],
        "package": {
            "name": "Digital Portrait",
            "description": "One character, full colour, high resolution",
            "price": starting_price,
            "deliveryTimeText": "5-7 days",
            "deliveryType": "digital",
        },
    })
}

/// A complete order request body for the given artist and package.
#[must_use]
pub fn order_body(artist_profile_id: i64, package_id: i64) -> Value {
    json!({
        "artistProfileId": artist_profile_id,
        "packageId": package_id,
        "instructions": "Two cats in renaissance dress",
        "deliveryType": "digital",
        "addOnsSelected": { "expressDelivery": true },
        "totalPrice": 1498,
        "referenceFiles": ["https://cdn.artconnect.test/ref-1.jpg"],
    })
}

/// Place an order as `buyer` against the artist's starter package,
/// returning the new order id.
pub async fn place_order(buyer: &mut TestClient, artist: &SeededArtist) -> i64 {
    let resp = buyer
        .post(
            "/orders",
            order_body(artist.artist_profile_id, artist.package_id),
        )
        .await;
    assert_eq!(
        resp.status,
        StatusCode::OK,
        "order placement failed: {}",
        resp.text
    );
    resp.body["order"]["id"]
        .as_i64()
        .expect("order id missing from create response")
}

/// Move an order to `status` via the API as `client`.
pub async fn set_order_status(client: &mut TestClient, order_id: i64, status: &str) {
    let resp = client
        .patch(
            &format!("/orders/{order_id}/status"),
            json!({ "status": status }),
        )
        .await;
    assert_eq!(
        resp.status,
        StatusCode::OK,
        "status change to {status} failed: {}",
        resp.text
    );
}
