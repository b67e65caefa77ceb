//! Static catalog of neighborhoods.
//!
//! The catalog is fixed for the life of the process and handed to the
//! resolver and the location provider explicitly, so tests can use any set of
//! areas.

use std::collections::HashSet;

use crate::types::{Area, AreaId, GeoError};

#[derive(Debug, Clone, PartialEq)]
pub struct AreaCatalog {
    areas: Vec<Area>,
}

impl AreaCatalog {
    /// Build a catalog, rejecting empty lists and repeated ids.
    pub fn new(areas: Vec<Area>) -> Result<Self, GeoError> {
        if areas.is_empty() {
            return Err(GeoError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for area in &areas {
            if !seen.insert(area.id) {
                return Err(GeoError::DuplicateArea(area.id));
            }
        }

        Ok(Self { areas })
    }

    /// The four Bengaluru neighborhoods the app ships with.
    pub fn bengaluru() -> Self {
        Self {
            areas: default_areas(),
        }
    }

    /// The fallback area: always the first entry.
    pub fn first(&self) -> &Area {
        // `new` guarantees at least one entry
        &self.areas[0]
    }

    pub fn get(&self, id: AreaId) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn iter(&self) -> impl Iterator<Item = &Area> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl Default for AreaCatalog {
    fn default() -> Self {
        Self::bengaluru()
    }
}

/// Default area list, also used to seed the config file.
pub fn default_areas() -> Vec<Area> {
    vec![
        Area::new(1, "Koramangala", 12.9352, 77.6245),
        Area::new(2, "Indiranagar", 12.9719, 77.6412),
        Area::new(3, "Whitefield", 12.9698, 77.7500),
        Area::new(4, "Jayanagar", 12.9279, 77.5937),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_bengaluru_catalog() {
        let catalog = AreaCatalog::bengaluru();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.first().name, "Koramangala");
        assert_eq!(catalog.get(AreaId(3)).map(|a| a.name.as_str()), Some("Whitefield"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert_eq!(AreaCatalog::new(vec![]), Err(GeoError::EmptyCatalog));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = AreaCatalog::new(vec![
            Area::new(1, "A", 0.0, 0.0),
            Area::new(1, "B", 1.0, 1.0),
        ]);
        assert_eq!(result, Err(GeoError::DuplicateArea(AreaId(1))));
    }

    #[test]
    fn test_by_name_is_case_insensitive() {
        let catalog = AreaCatalog::bengaluru();
        assert_eq!(catalog.by_name("jayanagar").map(|a| a.id), Some(AreaId(4)));
        assert!(catalog.by_name("Malleshwaram").is_none());
    }
}
