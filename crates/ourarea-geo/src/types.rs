use serde::{Deserialize, Serialize};
use std::fmt;

/// A point reported by the platform or supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Catalog identifier of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u32);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named neighborhood with the point used for nearest-area matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    pub name: String,
    pub reference_latitude: f64,
    pub reference_longitude: f64,
}

impl Area {
    pub fn new(id: u32, name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: AreaId(id),
            name: name.into(),
            reference_latitude: latitude,
            reference_longitude: longitude,
        }
    }

    pub fn reference(&self) -> Coordinate {
        Coordinate::new(self.reference_latitude, self.reference_longitude)
    }
}

/// How an area was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaSource {
    Geolocated,
    Fallback,
}

/// The area currently in effect. Replaced on every location update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedArea {
    pub area: Area,
    pub source: AreaSource,
}

impl ResolvedArea {
    pub fn id(&self) -> AreaId {
        self.area.id
    }

    pub fn name(&self) -> &str {
        &self.area.name
    }
}

/// Outcome of a location request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationStatus {
    Resolved,
    Fallback,
}

/// Sequence number handed out per `acquire()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A location fix, or the fallback coordinate when none could be had.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationResult {
    pub status: LocationStatus,
    pub coordinate: Coordinate,
    pub request: RequestToken,
}

impl LocationResult {
    pub fn is_fallback(&self) -> bool {
        self.status == LocationStatus::Fallback
    }

    /// Provenance tag carried over to the resolved area.
    pub fn area_source(&self) -> AreaSource {
        match self.status {
            LocationStatus::Resolved => AreaSource::Geolocated,
            LocationStatus::Fallback => AreaSource::Fallback,
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Area catalog errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("Area catalog is empty")]
    EmptyCatalog,
    #[error("Duplicate area id in catalog: {0}")]
    DuplicateArea(AreaId),
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_area_reference_coordinate() {
        let area = Area::new(1, "Koramangala", 12.9352, 77.6245);
        assert_eq!(area.reference(), Coordinate::new(12.9352, 77.6245));
    }

    #[test]
    fn test_location_result_source_mapping() {
        let resolved = LocationResult {
            status: LocationStatus::Resolved,
            coordinate: Coordinate::new(0.0, 0.0),
            request: RequestToken(1),
        };
        assert_eq!(resolved.area_source(), AreaSource::Geolocated);
        assert!(!resolved.is_fallback());

        let fallback = LocationResult {
            status: LocationStatus::Fallback,
            ..resolved
        };
        assert_eq!(fallback.area_source(), AreaSource::Fallback);
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_area_serialization() {
        let area = Area::new(3, "Whitefield", 12.9698, 77.75);
        let json = serde_json::to_string(&area).unwrap();
        assert!(json.contains("\"id\":3"));
        assert!(json.contains("\"reference_latitude\":12.9698"));

        let source = serde_json::to_string(&AreaSource::Fallback).unwrap();
        assert_eq!(source, "\"fallback\"");
    }

    #[test]
    fn test_location_error_display() {
        assert_eq!(LocationError::Timeout.to_string(), "Location request timed out");
        assert!(GeoError::EmptyCatalog.to_string().contains("empty"));
    }
}
