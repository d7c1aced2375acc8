//! Domain services sitting between route handlers and repositories.
//!
//! Handlers stay thin: they extract the session and the payload, call one
//! service method, and shape the JSON response. Business rules (validation
//! order, permission checks, defaults) live here.

pub mod artists;
pub mod auth;
pub mod moderation;
pub mod orders;
pub mod reviews;

pub use artists::ArtistService;
pub use auth::AuthService;
pub use moderation::ModerationService;
pub use orders::OrderService;
pub use reviews::ReviewService;
