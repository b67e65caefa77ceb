//! Area-scoped post feed.
//!
//! [`FeedScope`] keeps the active [`FeedQuery`] in step with the resolved
//! area and the chosen category; the follower re-lists content whenever the
//! query changes.

pub mod follower;
pub mod listing;
pub mod scope;
pub mod session;
pub mod store;
pub mod types;

pub use follower::{spawn_feed_follower, FeedUpdate};
pub use listing::FeedListing;
pub use scope::{scope, FeedQuery, FeedScope, ScopeInputs};
pub use session::FeedSession;
pub use store::InMemoryFeedStore;
pub use types::*;
