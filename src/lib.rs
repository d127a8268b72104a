//! Telefeed: Telegram channels as syndication feeds
//!
//! This crate implements an HTTP service that scrapes the public web preview
//! of a Telegram channel and serves it as an RSS or Atom feed, with optional
//! post exclusion and Redis-backed response caching.

pub mod cache;
pub mod config;
pub mod extract;
pub mod feed;
pub mod model;
pub mod pipeline;
pub mod scraper;
pub mod server;

use thiserror::Error;

/// Main error type for feed operations
///
/// Only these errors reach the HTTP surface. Per-post extraction issues
/// (missing id, unparseable datetime, unresolvable image size) are logged as
/// warnings and never become error values, and cache failures degrade to
/// cache-miss behavior inside the pipeline.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid request parameter: {0}")]
    Validation(String),

    #[error("Could not fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Channel page at {url} has no recognizable structure")]
    Document { url: String },

    #[error("Could not render {format} feed: {message}")]
    Format { format: String, message: String },
}

impl FeedError {
    /// Classifies a reqwest failure for the channel page fetch
    pub fn from_fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();

        if source.is_timeout() {
            FeedError::Timeout { url }
        } else {
            FeedError::Fetch { url, source }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{Cache, CacheError, MemoryCache, RedisCache};
pub use config::Config;
pub use model::{CacheStatus, Channel, FeedFormat, FeedParams, Image, Post};
pub use pipeline::FeedService;
pub use scraper::Scraper;
