pub mod app;
pub mod config;
pub mod error;

pub use app::{App, AppFeed, ConfiguredSource};
pub use config::{AuthConfig, CatalogConfig, Config, FeedConfig, LocationConfig, ValidationResult};
pub use error::{AppError, ConfigError};

use anyhow::Result;

/// Initialize logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("OurArea core initialized");
    Ok(())
}
