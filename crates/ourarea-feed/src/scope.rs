//! Feed scoping: which posts are visible given the area and category.
//!
//! [`FeedScope`] owns the two inputs and publishes the derived query on a
//! `watch` channel. Every change recomputes the query from both inputs
//! together, so a batch that moves area and category at once publishes a
//! single query and never a half-updated one.

use std::sync::atomic::{AtomicU64, Ordering};

use ourarea_geo::{AreaId, ResolvedArea};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Filter passed to the content listing. `area_id: None` means unscoped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FeedQuery {
    pub area_id: Option<AreaId>,
    pub category: Option<String>,
}

impl FeedQuery {
    pub fn is_global(&self) -> bool {
        self.area_id.is_none()
    }
}

/// Derive the query for an area and category.
///
/// A blank category is the same as no category.
pub fn scope(area: Option<&ResolvedArea>, category: Option<&str>) -> FeedQuery {
    FeedQuery {
        area_id: area.map(ResolvedArea::id),
        category: category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}

/// Inputs the query is derived from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeInputs {
    pub area: Option<ResolvedArea>,
    pub category: Option<String>,
}

impl ScopeInputs {
    fn query(&self) -> FeedQuery {
        scope(self.area.as_ref(), self.category.as_deref())
    }
}

/// Reactive owner of the active [`FeedQuery`].
#[derive(Debug)]
pub struct FeedScope {
    inputs: Mutex<ScopeInputs>,
    query_tx: watch::Sender<FeedQuery>,
    revision: AtomicU64,
}

impl FeedScope {
    /// Unscoped, no category.
    pub fn new() -> Self {
        Self::with_inputs(ScopeInputs::default())
    }

    pub fn with_inputs(inputs: ScopeInputs) -> Self {
        let (query_tx, _) = watch::channel(inputs.query());
        Self {
            inputs: Mutex::new(inputs),
            query_tx,
            revision: AtomicU64::new(0),
        }
    }

    /// Replace the resolved area. Returns true if the query changed.
    pub fn set_area(&self, area: Option<ResolvedArea>) -> bool {
        self.update(|inputs| inputs.area = area)
    }

    /// Replace the category filter. Returns true if the query changed.
    pub fn set_category(&self, category: Option<String>) -> bool {
        self.update(|inputs| inputs.category = category)
    }

    /// Apply any number of input changes as one batch.
    ///
    /// The query is recomputed once from the final inputs and published only
    /// if it differs from the current one. Returns true if it was published.
    ///
    /// # Deadlocks
    ///
    /// `apply` runs while the inputs lock is held. Calling `update`,
    /// `set_area`, `set_category` or `inputs` on the same scope from inside
    /// it deadlocks. `current`, `revision` and `subscribe` are safe there.
    pub fn update<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut ScopeInputs),
    {
        // Held across the publish so concurrent batches can't interleave.
        let mut inputs = self.inputs.lock();
        apply(&mut *inputs);
        let next = inputs.query();

        let changed = self.query_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        if changed {
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            tracing::debug!(
                "Feed scope revision {}: area={:?} category={:?}",
                revision,
                inputs.area.as_ref().map(ResolvedArea::name),
                inputs.category
            );
        }

        changed
    }

    /// The query currently in effect.
    pub fn current(&self) -> FeedQuery {
        self.query_tx.borrow().clone()
    }

    pub fn inputs(&self) -> ScopeInputs {
        self.inputs.lock().clone()
    }

    /// Number of distinct queries published since construction.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Receiver that wakes whenever a new query is published.
    pub fn subscribe(&self) -> watch::Receiver<FeedQuery> {
        self.query_tx.subscribe()
    }
}

impl Default for FeedScope {
    fn default() -> Self {
        Self::new()
    }
}
