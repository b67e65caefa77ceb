//! Ties location, area resolution and scoping together for one viewer.

use std::sync::Arc;

use ourarea_geo::{AreaResolver, GeolocationSource, LocationProvider, ResolvedArea};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::follower::{spawn_feed_follower, FeedUpdate};
use crate::listing::FeedListing;
use crate::scope::{FeedQuery, FeedScope};
use crate::types::{FeedError, FeedPage, FeedRequest};

pub struct FeedSession<S, L> {
    provider: LocationProvider<S>,
    resolver: AreaResolver,
    scope: Arc<FeedScope>,
    listing: Arc<L>,
    page_size: u32,
}

impl<S, L> FeedSession<S, L>
where
    S: GeolocationSource,
    L: FeedListing + 'static,
{
    pub fn new(
        provider: LocationProvider<S>,
        resolver: AreaResolver,
        listing: Arc<L>,
        page_size: u32,
    ) -> Self {
        Self {
            provider,
            resolver,
            scope: Arc::new(FeedScope::new()),
            listing,
            page_size,
        }
    }

    /// Acquire a location, resolve it and move the scope to that area.
    ///
    /// Returns `None` when a newer `locate()` superseded this one; the scope
    /// is left to the newer call.
    pub async fn locate(&self) -> Option<ResolvedArea> {
        let location = self.provider.acquire().await?;
        let resolved = self.resolver.resolve_location(&location);
        tracing::info!("Feed area: {} ({:?})", resolved.name(), resolved.source);
        self.scope.set_area(Some(resolved.clone()));
        Some(resolved)
    }

    /// Returns true if the visible set changed.
    pub fn select_category(&self, category: Option<String>) -> bool {
        self.scope.set_category(category)
    }

    /// Change area and category together, publishing at most one query.
    pub fn apply(&self, area: Option<ResolvedArea>, category: Option<String>) -> bool {
        self.scope.update(|inputs| {
            inputs.area = area;
            inputs.category = category;
        })
    }

    pub fn query(&self) -> FeedQuery {
        self.scope.current()
    }

    pub fn area(&self) -> Option<ResolvedArea> {
        self.scope.inputs().area
    }

    pub fn scope(&self) -> &Arc<FeedScope> {
        &self.scope
    }

    pub fn listing(&self) -> &Arc<L> {
        &self.listing
    }

    pub fn resolver(&self) -> &AreaResolver {
        &self.resolver
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Load a 1-based page for the current query.
    ///
    /// # Errors
    /// Propagates the listing service's error.
    pub async fn load_page(&self, page: u32) -> Result<FeedPage, FeedError> {
        let request = FeedRequest {
            query: self.query(),
            page,
            page_size: self.page_size,
        };
        self.listing.list(request).await
    }

    /// Start a follower that re-lists on every scope change.
    pub fn follow(&self) -> (JoinHandle<()>, mpsc::Receiver<FeedUpdate>) {
        spawn_feed_follower(Arc::clone(&self.listing), self.scope.subscribe(), self.page_size)
    }
}
