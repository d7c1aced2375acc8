//! Integration tests for artist onboarding and the pending state.
//!
//! Onboarding creates a `pending` profile that stays invisible to the public
//! catalog until an admin approves it.

// serde_json::Value indexing returns Null for absent keys rather than panicking.
#![allow(clippy::indexing_slicing)]

use axum::http::StatusCode;
use serde_json::json;

use artconnect_integration_tests::{TestContext, onboard_body};

// ============================================================================
// Onboarding
// ============================================================================

#[tokio::test]
async fn test_onboard_creates_pending_profile() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist
        .post(
            "/artist/onboard",
            onboard_body("Mira Draws", "Jaipur", &["realistic", "anime"], 1499),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);
    assert_eq!(resp.body["success"], true);
    let profile_id = resp.body["artistProfileId"]
        .as_i64()
        .expect("artistProfileId");

    let resp = artist.get("/artist/profile").await;
    assert_eq!(resp.status, StatusCode::OK);
    let profile = &resp.body["profile"];
    assert_eq!(profile["id"], profile_id);
    assert_eq!(profile["displayName"], "Mira Draws");
    assert_eq!(profile["city"], "Jaipur");
    assert_eq!(profile["styles"], json!(["realistic", "anime"]));
    assert_eq!(profile["startingPrice"], 1499);
    assert_eq!(profile["verificationStatus"], "pending");
    assert_eq!(profile["isFeatured"], false);
    assert_eq!(profile["avgRating"], 0.0);
    assert_eq!(profile["totalReviews"], 0);

    // Portfolio images are titled by position.
    assert_eq!(profile["portfolio"][0]["title"], "Artwork 1");
    assert_eq!(
        profile["portfolio"][0]["imageUrl"],
        "https://cdn.artconnect.test/art-1.jpg"
    );

    // The first package gets the house defaults.
    let package = &profile["packages"][0];
    assert_eq!(package["name"], "Digital Portrait");
    assert_eq!(package["price"], 1499);
    assert_eq!(package["revisionsIncluded"], 2);
    assert_eq!(package["isActive"], true);
    assert_eq!(
        package["addOns"],
        json!({ "extraPerson": 299, "detailedBackground": 199, "expressDelivery": 499 })
    );
}

#[tokio::test]
async fn test_onboard_generates_avatar_from_user_id() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist.get("/auth/session").await;
    let user_id = resp.body["user"]["id"].as_i64().expect("user id");

    artist
        .post("/artist/onboard", onboard_body("Mira Draws", "Jaipur", &[], 999))
        .await;

    let resp = artist.get("/artist/profile").await;
    assert_eq!(
        resp.body["profile"]["profilePhotoUrl"],
        format!("https://i.pravatar.cc/150?u={user_id}")
    );
}

#[tokio::test]
async fn test_onboard_defaults_delivery_types_to_digital() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let mut body = onboard_body("Mira Draws", "Jaipur", &["realistic"], 999);
    body["profile"]["deliveryTypes"] = json!([]);

    let resp = artist.post("/artist/onboard", body).await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.text);

    let resp = artist.get("/artist/profile").await;
    assert_eq!(resp.body["profile"]["deliveryTypes"], json!(["digital"]));
}

#[tokio::test]
async fn test_onboard_rejects_missing_fields() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    // No displayName at all.
    let resp = artist
        .post(
            "/artist/onboard",
            json!({ "profile": { "bio": "I draw", "startingPrice": 999 } }),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Missing required fields");
}

#[tokio::test]
async fn test_onboard_conflicts_on_second_profile() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist
        .post("/artist/onboard", onboard_body("Mira Draws", "Jaipur", &[], 999))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = artist
        .post("/artist/onboard", onboard_body("Mira Again", "Jaipur", &[], 999))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), "Artist profile already exists");
}

#[tokio::test]
async fn test_onboard_requires_artist_account() {
    let ctx = TestContext::new().await;

    // Anonymous callers are rejected.
    let mut anon = ctx.client();
    let resp = anon
        .post("/artist/onboard", onboard_body("Ghost", "Nowhere", &[], 999))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Artist authentication required");

    // Buyer accounts too; the gate is the artist role, not just a session.
    let mut buyer = ctx
        .signup_and_login("Buyer", "buyer@example.com", "user")
        .await;
    let resp = buyer
        .post("/artist/onboard", onboard_body("Buyer Art", "Delhi", &[], 999))
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Artist authentication required");
}

#[tokio::test]
async fn test_onboard_refreshes_session_profile_id() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist.get("/auth/session").await;
    assert_eq!(resp.body["user"]["artistProfileId"], serde_json::Value::Null);

    let resp = artist
        .post("/artist/onboard", onboard_body("Mira Draws", "Jaipur", &[], 999))
        .await;
    let profile_id = resp.body["artistProfileId"].as_i64().expect("profile id");

    // No re-login needed; the session snapshot now carries the profile id.
    let resp = artist.get("/auth/session").await;
    assert_eq!(resp.body["user"]["artistProfileId"], profile_id);
}

// ============================================================================
// Pending State
// ============================================================================

#[tokio::test]
async fn test_pending_profile_is_hidden_from_public() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist
        .post("/artist/onboard", onboard_body("Mira Draws", "Jaipur", &[], 999))
        .await;
    let profile_id = resp.body["artistProfileId"].as_i64().expect("profile id");

    let mut public = ctx.client();
    let resp = public.get("/artists").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["artists"], json!([]));

    let resp = public.get(&format!("/artists/{profile_id}")).await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), "Artist not found");
}

#[tokio::test]
async fn test_approved_profile_becomes_visible() {
    let ctx = TestContext::new().await;
    let artist = ctx.seeded_artist("mira@example.com", "Mira Draws").await;

    let mut public = ctx.client();
    let resp = public
        .get(&format!("/artists/{}", artist.artist_profile_id))
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["artist"]["displayName"], "Mira Draws");
    assert_eq!(resp.body["artist"]["verificationStatus"], "approved");
}

#[tokio::test]
async fn test_own_profile_before_onboarding_is_not_found() {
    let ctx = TestContext::new().await;
    let mut artist = ctx
        .signup_and_login("Mira", "mira@example.com", "artist")
        .await;

    let resp = artist.get("/artist/profile").await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), "Artist profile not found");
}

#[tokio::test]
async fn test_own_profile_requires_artist_account() {
    let ctx = TestContext::new().await;
    let mut buyer = ctx
        .signup_and_login("Buyer", "buyer@example.com", "user")
        .await;

    let resp = buyer.get("/artist/profile").await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.error(), "Artist authentication required");
}
