//! Background task that re-lists the feed whenever the scope changes.
//!
//! Listing runs off the caller's task; results come back on an mpsc channel
//! tagged with the query they were produced for.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::listing::FeedListing;
use crate::scope::FeedQuery;
use crate::types::{FeedError, FeedPage, FeedRequest};

/// First page of the feed for one query.
#[derive(Debug, Clone)]
pub struct FeedUpdate {
    pub query: FeedQuery,
    pub result: Result<FeedPage, FeedError>,
}

/// Spawn a follower that lists the first page for the current query and for
/// every query published afterwards.
///
/// A listing that finishes after a newer query was published is not sent.
/// The task ends when either the scope or the update receiver is dropped.
pub fn spawn_feed_follower<L>(
    listing: Arc<L>,
    mut queries: watch::Receiver<FeedQuery>,
    page_size: u32,
) -> (JoinHandle<()>, mpsc::Receiver<FeedUpdate>)
where
    L: FeedListing + 'static,
{
    let (tx, rx) = mpsc::channel(16);

    let handle = tokio::spawn(async move {
        loop {
            let query = queries.borrow_and_update().clone();
            let result = listing
                .list(FeedRequest::first_page(query.clone(), page_size))
                .await;

            if matches!(queries.has_changed(), Ok(true)) {
                tracing::debug!("Dropping feed listing for superseded query {:?}", query);
                continue;
            }

            if let Err(e) = &result {
                tracing::warn!("Feed listing failed: {}", e);
            }

            if tx.send(FeedUpdate { query, result }).await.is_err() {
                break;
            }

            if queries.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("Feed follower stopped");
    });

    (handle, rx)
}
