//! Local service directory for OurArea
//!
//! Food, taxi, delivery and offer services shown next to the feed, with their
//! coupon offers and a per-user list of saved services.

pub mod directory;
pub mod saved;
pub mod types;

pub use directory::ServiceDirectory;
pub use saved::SavedServices;
pub use types::*;
