//! Area detection for OurArea
//!
//! Turns a platform location fix into one of a fixed catalog of named
//! neighborhoods. Location failure never reaches callers: the provider
//! degrades to the catalog's first area.

pub mod catalog;
pub mod location;
pub mod resolver;
pub mod types;

pub use catalog::AreaCatalog;
pub use location::{
    CachingSource, FixedSource, GeolocationSource, LocationOptions, LocationProvider, UnavailableSource,
};
pub use resolver::{manhattan_distance, resolve, AreaResolver};
pub use types::*;
