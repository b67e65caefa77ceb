use anyhow::{Context, Result};
use ourarea_geo::catalog::default_areas;
use ourarea_geo::{Area, AreaCatalog, Coordinate, GeoError, LocationOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for the config file, saved services and the session
    pub config_dir: PathBuf,

    pub location: LocationConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    /// Neighborhoods the feed can be scoped to
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub enable_high_accuracy: bool,

    /// Give up on a location fix after this many seconds
    pub timeout_secs: u64,

    /// Accept a cached fix up to this old
    pub maximum_age_secs: u64,

    /// Coordinate to use instead of asking the platform. Both must be set.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl LocationConfig {
    pub fn options(&self) -> LocationOptions {
        LocationOptions {
            enable_high_accuracy: self.enable_high_accuracy,
            timeout: Duration::from_secs(self.timeout_secs),
            maximum_age: Duration::from_secs(self.maximum_age_secs),
        }
    }

    pub fn fixed_coordinate(&self) -> Option<Coordinate> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
            _ => None,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        let options = LocationOptions::default();
        Self {
            enable_high_accuracy: options.enable_high_accuracy,
            timeout_secs: options.timeout.as_secs(),
            maximum_age_secs: options.maximum_age.as_secs(),
            latitude: None,
            longitude: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// First area doubles as the fallback when location is unavailable
    pub areas: Vec<Area>,
}

impl CatalogConfig {
    /// # Errors
    /// Returns `GeoError` for an empty list or repeated ids.
    pub fn build(&self) -> Result<AreaCatalog, GeoError> {
        AreaCatalog::new(self.areas.clone())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            areas: default_areas(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Category selected when the app starts
    #[serde(default)]
    pub default_category: Option<String>,
}

fn default_page_size() -> u32 {
    ourarea_feed::DEFAULT_PAGE_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_category: None,
        }
    }
}

/// Environment variable consulted when `auth.api_key` is blank.
pub const API_KEY_ENV: &str = "OURAREA_FIREBASE_API_KEY";

/// Firebase Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Web API key of the Firebase project. Leave blank to take it from
    /// `OURAREA_FIREBASE_API_KEY` at startup instead.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_auth_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
}

fn default_auth_endpoint() -> String {
    ourarea_auth::firebase::IDENTITY_TOOLKIT_BASE.to_string()
}

fn default_token_endpoint() -> String {
    ourarea_auth::firebase::SECURE_TOKEN_BASE.to_string()
}

fn usable_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with("YOUR_")
}

impl AuthConfig {
    /// A key is set in the config file itself.
    pub fn is_configured(&self) -> bool {
        usable_key(&self.api_key)
    }

    /// Key to sign in with: the config file's, else the environment's.
    /// The environment value is never written back to the file.
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or(&self, fallback: Option<String>) -> Option<String> {
        if self.is_configured() {
            return Some(self.api_key.clone());
        }
        fallback.filter(|key| usable_key(key))
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_auth_endpoint(),
            token_endpoint: default_token_endpoint(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ourarea");

        Self {
            config_dir,
            location: LocationConfig::default(),
            feed: FeedConfig::default(),
            auth: AuthConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Created default config at {:?}", path);
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// # Errors
    /// Returns `ConfigError::ParseError` for malformed TOML.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // Catalog
        if self.catalog.areas.is_empty() {
            result.add_error("catalog.areas", "At least one area is required");
        }
        let mut seen = HashSet::new();
        for area in &self.catalog.areas {
            if !seen.insert(area.id) {
                result.add_error("catalog.areas", format!("Duplicate area id: {}", area.id));
            }
            if area.name.trim().is_empty() {
                result.add_error("catalog.areas", format!("Area {} has no name", area.id));
            }
        }

        // Location
        if self.location.timeout_secs == 0 {
            result.add_error("location.timeout_secs", "Timeout must be greater than 0");
        }
        match (self.location.latitude, self.location.longitude) {
            (Some(lat), Some(lng)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("location.latitude", "Latitude must be within -90..90");
                }
                if !(-180.0..=180.0).contains(&lng) {
                    result.add_error("location.longitude", "Longitude must be within -180..180");
                }
            }
            (None, None) => {}
            _ => result.add_warning(
                "location",
                "Both latitude and longitude are needed; the coordinate is ignored",
            ),
        }

        // Feed
        if self.feed.page_size == 0 {
            result.add_error("feed.page_size", "Page size must be greater than 0");
        } else if self.feed.page_size > 100 {
            result.add_warning("feed.page_size", "Page size is unusually large (>100)");
        }
        if let Some(category) = &self.feed.default_category {
            if !ourarea_feed::is_known_category(category) {
                result.add_error(
                    "feed.default_category",
                    format!("Unknown category: {}", category),
                );
            }
        }

        // Auth
        self.validate_url(&self.auth.endpoint, "auth.endpoint", &mut result);
        self.validate_url(&self.auth.token_endpoint, "auth.token_endpoint", &mut result);
        if self.auth.effective_api_key().is_none() {
            result.add_warning(
                "auth",
                "Firebase API key not configured - sign-in will be unavailable",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("ourarea");

        Ok(config_dir.join("config.toml"))
    }
}
