use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const SAVED_SERVICES_FILE: &str = "saved_services.json";

/// Service ids the user saved, stored as a JSON array in a single file.
///
/// A missing or unreadable file reads as an empty list.
#[derive(Debug, Clone)]
pub struct SavedServices {
    path: PathBuf,
}

impl SavedServices {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside `dir` using the standard file name.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SAVED_SERVICES_FILE))
    }

    /// Store in the user's config directory.
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("ourarea");
        Ok(Self::in_dir(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved ids in the order they were saved.
    pub fn saved(&self) -> Vec<String> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str(&json) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Ignoring unreadable saved services file {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    pub fn is_saved(&self, service_id: &str) -> bool {
        self.saved().iter().any(|id| id == service_id)
    }

    /// Add a service. Saving twice keeps a single entry.
    pub fn save(&self, service_id: &str) -> Result<()> {
        let mut ids = self.saved();
        if ids.iter().any(|id| id == service_id) {
            return Ok(());
        }
        ids.push(service_id.to_string());
        self.write(&ids)?;
        tracing::info!("Saved service: {}", service_id);
        Ok(())
    }

    pub fn remove(&self, service_id: &str) -> Result<()> {
        let mut ids = self.saved();
        ids.retain(|id| id != service_id);
        self.write(&ids)?;
        tracing::info!("Removed saved service: {}", service_id);
        Ok(())
    }

    /// Flip the saved state. Returns whether the service is now saved.
    pub fn toggle(&self, service_id: &str) -> Result<bool> {
        if self.is_saved(service_id) {
            self.remove(service_id)?;
            Ok(false)
        } else {
            self.save(service_id)?;
            Ok(true)
        }
    }

    fn write(&self, ids: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create saved services directory")?;
        }

        let json = serde_json::to_string(ids).context("Failed to serialize saved services")?;
        fs::write(&self.path, json).context("Failed to write saved services file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = SavedServices::in_dir(dir.path());
        assert!(store.saved().is_empty());
        assert!(!store.is_saved("zomato"));
    }

    #[test]
    fn test_save_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = SavedServices::in_dir(dir.path().join("nested"));

        store.save("zomato").unwrap();
        store.save("uber").unwrap();
        store.save("zomato").unwrap();
        assert_eq!(store.saved(), vec!["zomato", "uber"]);

        store.remove("zomato").unwrap();
        assert_eq!(store.saved(), vec!["uber"]);
    }

    #[test]
    fn test_toggle() {
        let dir = TempDir::new().unwrap();
        let store = SavedServices::in_dir(dir.path());

        assert!(store.toggle("paytm").unwrap());
        assert!(store.is_saved("paytm"));
        assert!(!store.toggle("paytm").unwrap());
        assert!(!store.is_saved("paytm"));
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = SavedServices::in_dir(dir.path());
        fs::write(store.path(), "{not json").unwrap();

        assert!(store.saved().is_empty());
        store.save("dunzo").unwrap();
        assert_eq!(store.saved(), vec!["dunzo"]);
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = TempDir::new().unwrap();
        SavedServices::in_dir(dir.path()).save("rapido").unwrap();
        assert!(SavedServices::in_dir(dir.path()).is_saved("rapido"));
    }
}
