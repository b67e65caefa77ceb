//! One-shot location acquisition with a deterministic fallback.
//!
//! The platform capability sits behind [`GeolocationSource`]. The provider
//! never reports an error: denial, timeout or a missing capability all yield
//! the reference point of the catalog's first area with
//! `LocationStatus::Fallback`.
//!
//! Every `acquire()` call takes a fresh [`RequestToken`]. When an older call
//! completes after a newer one has started, its result is dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::catalog::AreaCatalog;
use crate::types::{Coordinate, LocationError, LocationResult, LocationStatus, RequestToken};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAXIMUM_AGE_SECS: u64 = 300;

/// Accuracy / timeout / cache-age policy passed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be returned instead of a fresh one.
    pub maximum_age: Duration,
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            maximum_age: Duration::from_secs(DEFAULT_MAXIMUM_AGE_SECS),
        }
    }
}

/// Platform location capability.
///
/// Implementations own the timeout in `options`; the provider does not layer
/// another one on top.
pub trait GeolocationSource: Send + Sync {
    fn current_position(
        &self,
        options: &LocationOptions,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// A coordinate supplied from outside (config, command line, tests).
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    coordinate: Coordinate,
}

impl FixedSource {
    pub fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }
}

impl GeolocationSource for FixedSource {
    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinate, LocationError> {
        Ok(self.coordinate)
    }
}

/// Host without any location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

impl GeolocationSource for UnavailableSource {
    async fn current_position(
        &self,
        _options: &LocationOptions,
    ) -> Result<Coordinate, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}

/// Wraps a source and serves fixes younger than `options.maximum_age` from
/// memory.
#[derive(Debug)]
pub struct CachingSource<S> {
    inner: S,
    last_fix: Mutex<Option<(Instant, Coordinate)>>,
}

impl<S> CachingSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            last_fix: Mutex::new(None),
        }
    }

    fn cached(&self, maximum_age: Duration) -> Option<Coordinate> {
        let guard = self.last_fix.lock();
        match *guard {
            Some((at, coordinate)) if at.elapsed() <= maximum_age => Some(coordinate),
            _ => None,
        }
    }
}

impl<S: GeolocationSource> GeolocationSource for CachingSource<S> {
    async fn current_position(
        &self,
        options: &LocationOptions,
    ) -> Result<Coordinate, LocationError> {
        if let Some(coordinate) = self.cached(options.maximum_age) {
            tracing::debug!("Using cached location fix");
            return Ok(coordinate);
        }

        let coordinate = self.inner.current_position(options).await?;
        *self.last_fix.lock() = Some((Instant::now(), coordinate));
        Ok(coordinate)
    }
}

/// Acquires the user's coordinate, falling back to the catalog default.
#[derive(Debug)]
pub struct LocationProvider<S> {
    source: S,
    options: LocationOptions,
    fallback: Coordinate,
    latest: AtomicU64,
}

impl<S: GeolocationSource> LocationProvider<S> {
    pub fn new(source: S, options: LocationOptions, catalog: &AreaCatalog) -> Self {
        Self {
            source,
            options,
            fallback: catalog.first().reference(),
            latest: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    /// Coordinate reported when no fix can be obtained.
    pub fn fallback_coordinate(&self) -> Coordinate {
        self.fallback
    }

    /// Token of the most recently started request (0 before the first).
    pub fn latest_request(&self) -> RequestToken {
        RequestToken(self.latest.load(Ordering::SeqCst))
    }

    /// Request a single location fix.
    ///
    /// Returns `None` when another `acquire()` started while this one was
    /// pending; only the newest request's result is delivered.
    pub async fn acquire(&self) -> Option<LocationResult> {
        let request = RequestToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1);
        tracing::debug!("Location request {} started", request.get());

        let result = match self.source.current_position(&self.options).await {
            Ok(coordinate) => LocationResult {
                status: LocationStatus::Resolved,
                coordinate,
                request,
            },
            Err(e) => {
                tracing::warn!("Location unavailable ({}), using default area", e);
                LocationResult {
                    status: LocationStatus::Fallback,
                    coordinate: self.fallback,
                    request,
                }
            }
        };

        if self.latest_request() != request {
            tracing::debug!("Discarding superseded location request {}", request.get());
            return None;
        }

        Some(result)
    }
}
