//! Nearest-area matching.
//!
//! Distance is the Manhattan distance over raw degrees, `|Δlat| + |Δlng|`.
//! This is only meaningful because the catalog spans a few kilometres of one
//! city. Swapping in great-circle distance changes which area wins near
//! borders and is a behavior change, not a fix.

use std::sync::Arc;

use crate::catalog::AreaCatalog;
use crate::types::{Area, Coordinate, GeoError, LocationResult, ResolvedArea};

/// `|Δlat| + |Δlng|` in degrees.
pub fn manhattan_distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.latitude - b.latitude).abs() + (a.longitude - b.longitude).abs()
}

/// Pick the area nearest to `coordinate`.
///
/// Ties go to the area listed first. Only a strictly smaller distance
/// replaces the current best.
///
/// # Errors
/// Returns `GeoError::EmptyCatalog` when `areas` is empty.
pub fn resolve(coordinate: Coordinate, areas: &[Area]) -> Result<&Area, GeoError> {
    let mut iter = areas.iter();
    let mut best = iter.next().ok_or(GeoError::EmptyCatalog)?;
    let mut best_distance = manhattan_distance(coordinate, best.reference());

    for area in iter {
        let distance = manhattan_distance(coordinate, area.reference());
        if distance < best_distance {
            best = area;
            best_distance = distance;
        }
    }

    Ok(best)
}

/// Resolver bound to one catalog.
#[derive(Debug, Clone)]
pub struct AreaResolver {
    catalog: Arc<AreaCatalog>,
}

impl AreaResolver {
    pub fn new(catalog: Arc<AreaCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.catalog
    }

    /// Nearest catalog area to `coordinate`.
    pub fn nearest(&self, coordinate: Coordinate) -> &Area {
        match resolve(coordinate, self.catalog.areas()) {
            Ok(area) => area,
            // AreaCatalog is never empty
            Err(_) => self.catalog.first(),
        }
    }

    /// Resolve a location result into the area now in effect.
    pub fn resolve_location(&self, location: &LocationResult) -> ResolvedArea {
        let area = self.nearest(location.coordinate).clone();
        tracing::debug!(
            "Resolved ({}, {}) to {} [{:?}]",
            location.coordinate.latitude,
            location.coordinate.longitude,
            area.name,
            location.status
        );
        ResolvedArea {
            area,
            source: location.area_source(),
        }
    }
}
