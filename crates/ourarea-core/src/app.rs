use std::sync::Arc;

use ourarea_auth::{navigate, FirebaseAuth, Route, SessionStore};
use ourarea_feed::{FeedSession, InMemoryFeedStore};
use ourarea_geo::{
    AreaCatalog, AreaResolver, CachingSource, Coordinate, FixedSource, GeolocationSource,
    LocationError, LocationOptions, LocationProvider, UnavailableSource,
};
use ourarea_services::{CategoryFilter, SavedServices, Service, ServiceDirectory};

use crate::config::Config;
use crate::error::{AppError, ConfigError};

/// Location source chosen from config: a configured coordinate, or none.
#[derive(Debug, Clone, Copy)]
pub enum ConfiguredSource {
    Fixed(FixedSource),
    Unavailable(UnavailableSource),
}

impl ConfiguredSource {
    pub fn from_coordinate(coordinate: Option<Coordinate>) -> Self {
        match coordinate {
            Some(c) => ConfiguredSource::Fixed(FixedSource::new(c)),
            None => ConfiguredSource::Unavailable(UnavailableSource),
        }
    }
}

impl GeolocationSource for ConfiguredSource {
    async fn current_position(&self, options: &LocationOptions) -> Result<Coordinate, LocationError> {
        match self {
            ConfiguredSource::Fixed(source) => source.current_position(options).await,
            ConfiguredSource::Unavailable(source) => source.current_position(options).await,
        }
    }
}

pub type AppFeed = FeedSession<CachingSource<ConfiguredSource>, InMemoryFeedStore>;

/// Main application state
pub struct App {
    config: Arc<Config>,
    catalog: Arc<AreaCatalog>,
    feed: AppFeed,
    directory: ServiceDirectory,
    saved: SavedServices,
    auth: Option<FirebaseAuth>,
}

impl App {
    /// Load config from the default location and build the app
    pub fn new() -> Result<Self, AppError> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }
        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        let catalog = Arc::new(config.catalog.build()?);
        tracing::info!("Loaded {} areas", catalog.len());

        let source = ConfiguredSource::from_coordinate(config.location.fixed_coordinate());
        let provider = LocationProvider::new(
            CachingSource::new(source),
            config.location.options(),
            &catalog,
        );
        let resolver = AreaResolver::new(Arc::clone(&catalog));
        let store = Arc::new(InMemoryFeedStore::seeded(Arc::clone(&catalog)));

        let feed = FeedSession::new(provider, resolver, store, config.feed.page_size);
        if let Some(category) = &config.feed.default_category {
            feed.select_category(Some(category.clone()));
        }

        let auth = config.auth.effective_api_key().map(|api_key| {
            FirebaseAuth::with_endpoints(
                &api_key,
                &config.auth.endpoint,
                &config.auth.token_endpoint,
            )
            .with_session_store(SessionStore::in_dir(&config.config_dir))
        });

        Ok(Self {
            saved: SavedServices::in_dir(&config.config_dir),
            config: Arc::new(config),
            catalog,
            feed,
            directory: ServiceDirectory::builtin(),
            auth,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.catalog
    }

    pub fn feed(&self) -> &AppFeed {
        &self.feed
    }

    pub fn directory(&self) -> &ServiceDirectory {
        &self.directory
    }

    pub fn saved_services(&self) -> &SavedServices {
        &self.saved
    }

    /// `None` when no API key is configured or set in the environment.
    pub fn auth(&self) -> Option<&FirebaseAuth> {
        self.auth.as_ref()
    }

    /// Services near the feed's current area.
    pub fn nearby_services(&self, filter: CategoryFilter) -> Vec<&Service> {
        let area = self.feed.area();
        self.directory.nearby(area.as_ref().map(|a| &a.area), filter)
    }

    /// Where navigating to `requested` lands. Without sign-in configured
    /// every route is open.
    pub fn route(&self, requested: Route) -> Route {
        match &self.auth {
            Some(auth) => navigate(auth, requested),
            None => requested,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use ourarea_geo::{Area, AreaId, AreaSource};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.config_dir = dir.path().to_path_buf();
        config.auth.api_key = String::new();
        config
    }

    #[tokio::test]
    async fn test_configured_coordinate_scopes_feed() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.location.latitude = Some(12.9279);
        config.location.longitude = Some(77.5937);

        let app = App::from_config(config).unwrap();
        let area = app.feed().locate().await.unwrap();
        assert_eq!(area.name(), "Jayanagar");
        assert_eq!(area.source, AreaSource::Geolocated);

        let page = app.feed().load_page(1).await.unwrap();
        assert!(page.posts.iter().all(|p| p.area_id == AreaId(4)));
    }

    #[tokio::test]
    async fn test_no_coordinate_falls_back_to_first_area() {
        let dir = TempDir::new().unwrap();
        let app = App::from_config(config(&dir)).unwrap();

        let area = app.feed().locate().await.unwrap();
        assert_eq!(area.id(), AreaId(1));
        assert_eq!(area.source, AreaSource::Fallback);
        assert_eq!(app.nearby_services(CategoryFilter::All).len(), 8);
    }

    #[tokio::test]
    async fn test_custom_catalog_fallback() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.catalog.areas = vec![
            Area::new(10, "Hebbal", 13.0358, 77.5970),
            Area::new(11, "HSR Layout", 12.9116, 77.6474),
        ];

        let app = App::from_config(config).unwrap();
        let area = app.feed().locate().await.unwrap();
        assert_eq!(area.name(), "Hebbal");
    }

    #[test]
    fn test_default_category_applied() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.feed.default_category = Some("Food".into());

        let app = App::from_config(config).unwrap();
        assert_eq!(app.feed().query().category.as_deref(), Some("Food"));
        assert!(app.feed().query().is_global());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.feed.page_size = 0;

        match App::from_config(config) {
            Err(AppError::Config(ConfigError::Invalid(summary))) => {
                assert!(summary.contains("feed.page_size"));
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("invalid config accepted"),
        }
    }

    #[test]
    fn test_routes_open_without_auth() {
        let dir = TempDir::new().unwrap();
        let app = App::from_config(config(&dir)).unwrap();
        assert!(app.auth().is_none());
        assert_eq!(app.route(Route::Create), Route::Create);
    }

    #[test]
    fn test_routes_gated_with_auth() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.auth.api_key = "test-key".into();

        let app = App::from_config(config).unwrap();
        assert_eq!(app.route(Route::Home), Route::Login);
    }

    #[test]
    fn test_saved_services_live_in_config_dir() {
        let dir = TempDir::new().unwrap();
        let app = App::from_config(config(&dir)).unwrap();
        app.saved_services().save("swiggy").unwrap();
        assert!(app.saved_services().path().starts_with(dir.path()));
    }
}
