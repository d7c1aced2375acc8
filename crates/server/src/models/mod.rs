//! Domain models.
//!
//! Validated domain objects, separate from database row types. Most derive
//! `Serialize` because handlers return them directly as JSON (camelCase keys,
//! matching the public API).

pub mod artist;
pub mod order;
pub mod package;
pub mod review;
pub mod session;
pub mod user;

pub use artist::{
    ArtistBrief, ArtistDetail, ArtistProfile, ArtistSummary, ArtistWithContact, NewArtistProfile,
    NewPortfolioImage, OnboardPackage, OwnArtistProfile, PortfolioImage,
};
pub use order::{NewOrder, Order, OrderDetails, OrderFile, OrderSummary};
pub use package::{NewPackage, Package, PackageCard};
pub use review::{Review, ReviewWithBuyer};
pub use session::CurrentUser;
pub use user::User;
