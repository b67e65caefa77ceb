//! Application-level error types.
//!
//! Each crate owns its own error enum; [`AppError`] gathers them so the
//! binary has one type to report and one place to get UI text from.

use ourarea_auth::AuthError;
use ourarea_feed::FeedError;
use ourarea_geo::GeoError;
use ourarea_services::DirectoryError;
use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Area error: {0}")]
    Geo(#[from] GeoError),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Service directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Geo(_) => "No neighborhoods are configured. Check your settings.".to_string(),
            AppError::Feed(e) => e.user_message().to_string(),
            AppError::Directory(e) => e.user_message().to_string(),
            AppError::Auth(e) => e.user_message(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
            AppError::Other(_) => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}
