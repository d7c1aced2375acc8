//! Integration tests for signup, login, OTP, and session lifecycle.
//!
//! Each test builds its own [`TestContext`] with a fresh in-memory database,
//! so tests are fully isolated and run in parallel.

// serde_json::Value indexing returns Null for absent keys rather than panicking.
#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use artconnect_integration_tests::{PASSWORD, TestContext};

// ============================================================================
// Health Checks
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client.get("/health").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.text, "ok");

    let resp = client.get("/health/ready").await;
    assert_eq!(resp.status, StatusCode::OK);
}

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_returns_public_user() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({
                "name": "Priya",
                "email": "priya@example.com",
                "password": PASSWORD,
                "role": "user",
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["user"]["name"], "Priya");
    assert_eq!(resp.body["user"]["email"], "priya@example.com");
    assert_eq!(resp.body["user"]["role"], "user");
    assert!(resp.body["user"]["id"].as_i64().is_some());
    // The public view carries no profile linkage.
    assert!(resp.body["user"].get("artistProfileId").is_none());
}

#[tokio::test]
async fn test_signup_requires_name() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({ "email": "anon@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Name is required");

    // Whitespace-only names are rejected the same way.
    let resp = client
        .post(
            "/auth/signup",
            json!({ "name": "   ", "email": "anon@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Name is required");
}

#[tokio::test]
async fn test_signup_requires_email_or_phone() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post("/auth/signup", json!({ "name": "Noah", "password": PASSWORD }))
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Email or phone number is required");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_email() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let body = json!({ "name": "First", "email": "taken@example.com", "password": PASSWORD });
    let resp = client.post("/auth/signup", body.clone()).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = client.post("/auth/signup", body).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Email already registered");
}

#[tokio::test]
async fn test_signup_rejects_duplicate_phone() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({ "name": "First", "phone": "9876543210" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let resp = client
        .post(
            "/auth/signup",
            json!({ "name": "Second", "phone": "9876543210" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Phone number already registered");
}

#[tokio::test]
async fn test_signup_rejects_weak_password() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({ "name": "Short", "email": "short@example.com", "password": "12345" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signup_rejects_admin_role() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": PASSWORD,
                "role": "admin",
            }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Invalid role");
}

#[tokio::test]
async fn test_signup_rejects_malformed_email() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/signup",
            json!({ "name": "Typo", "email": "not-an-email", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "email must contain an @ symbol");
}

// ============================================================================
// Password Login
// ============================================================================

#[tokio::test]
async fn test_login_establishes_session() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Priya", "email": "priya@example.com", "password": PASSWORD }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "priya@example.com", "password": PASSWORD, "loginType": "user" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["user"]["role"], "user");
    assert_eq!(resp.body["user"]["artistProfileId"], Value::Null);

    // The session cookie now identifies the account.
    let resp = client.get("/auth/session").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["email"], "priya@example.com");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Priya", "email": "priya@example.com", "password": PASSWORD }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "priya@example.com", "password": "wrong-password" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_rejects_unknown_email() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "ghost@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_missing_fields_fails_like_bad_credentials() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client.post("/auth/login", json!({})).await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_login_rejects_account_without_password() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    // Phone-first accounts can sign up with no password at all.
    client
        .post(
            "/auth/signup",
            json!({ "name": "OtpOnly", "email": "otp-only@example.com", "phone": "9123456780" }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "otp-only@example.com", "password": PASSWORD }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Invalid email or password");
}

#[tokio::test]
async fn test_artist_login_page_rejects_buyer_account() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Buyer", "email": "buyer@example.com", "password": PASSWORD }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "buyer@example.com", "password": PASSWORD, "loginType": "artist" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "This account is not registered as an artist");
}

#[tokio::test]
async fn test_user_login_page_redirects_artist_account() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({
                "name": "Artist",
                "email": "artist@example.com",
                "password": PASSWORD,
                "role": "artist",
            }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "artist@example.com", "password": PASSWORD, "loginType": "user" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Please use the artist login page");
}

#[tokio::test]
async fn test_admin_login_page_rejects_regular_account() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Buyer", "email": "buyer@example.com", "password": PASSWORD }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "buyer@example.com", "password": PASSWORD, "loginType": "admin" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "You do not have admin privileges");
}

#[tokio::test]
async fn test_admin_may_use_user_login_page() {
    let ctx = TestContext::new().await;
    // Creates the admin account and verifies the admin login page.
    ctx.admin().await;

    let mut client = ctx.client();
    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "admin@artconnect.test", "password": PASSWORD, "loginType": "user" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_unknown_login_type_defaults_to_user() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Priya", "email": "priya@example.com", "password": PASSWORD }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login",
            json!({ "email": "priya@example.com", "password": PASSWORD, "loginType": "banana" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
}

// ============================================================================
// OTP Login
// ============================================================================

#[tokio::test]
async fn test_otp_login_with_registered_phone() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Leela", "phone": "9876543210" }),
        )
        .await;

    // The demo scheme accepts any well-formed 6-digit code.
    let resp = client
        .post(
            "/auth/login/otp",
            json!({ "phone": "9876543210", "otp": "424242" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.body["success"], true);
    assert_eq!(resp.body["user"]["name"], "Leela");

    let resp = client.get("/auth/session").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["name"], "Leela");
}

#[tokio::test]
async fn test_otp_rejects_malformed_code() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Leela", "phone": "9876543210" }),
        )
        .await;

    for bad_otp in ["12345", "1234567", "12a456", ""] {
        let resp = client
            .post(
                "/auth/login/otp",
                json!({ "phone": "9876543210", "otp": bad_otp }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "otp: {bad_otp:?}");
        assert_eq!(resp.error(), "Invalid OTP. Please enter a 6-digit code.");
    }
}

#[tokio::test]
async fn test_otp_rejects_unregistered_phone() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client
        .post(
            "/auth/login/otp",
            json!({ "phone": "9999999999", "otp": "123456" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "No account found with this phone number");
}

#[tokio::test]
async fn test_otp_login_respects_entry_point() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    client
        .post(
            "/auth/signup",
            json!({ "name": "Artist", "phone": "9876543210", "role": "artist" }),
        )
        .await;

    let resp = client
        .post(
            "/auth/login/otp",
            json!({ "phone": "9876543210", "otp": "123456", "loginType": "user" }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Please use the artist login page");
}

// ============================================================================
// Logout & Session
// ============================================================================

#[tokio::test]
async fn test_session_requires_auth() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    let resp = client.get("/auth/session").await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Authentication required");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::new().await;
    let mut client = ctx
        .signup_and_login("Priya", "priya@example.com", "user")
        .await;

    let resp = client.get("/auth/session").await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = client.post("/auth/logout", json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);

    let resp = client.get("/auth/session").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Authentication required");
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let ctx = TestContext::new().await;
    let mut client = ctx.client();

    // Logging out with no session still succeeds.
    let resp = client.post("/auth/logout", json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);
}
