use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Session;

const SESSION_FILE: &str = "session.json";

/// File-based storage for the signed-in session
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
        }
    }

    /// Store in the user's config directory
    pub fn default_location() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("ourarea");
        Ok(Self::in_dir(dir))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&self.path, json).context("Failed to write session file")?;

        tracing::info!("Stored session for {} at {:?}", session.user.email, self.path);
        Ok(())
    }

    /// The stored session, or `None` if nothing has been stored.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let session: Session =
            serde_json::from_str(&json).context("Failed to deserialize session")?;
        Ok(Some(session))
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to delete session file")?;
            tracing::info!("Cleared stored session");
        }
        Ok(())
    }
}
