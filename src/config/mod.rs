//! Service configuration
//!
//! Configuration comes from an optional TOML file; every field has a default
//! so the service runs with no file at all. CLI flags may override the port
//! and the Redis URL after loading.

use std::path::Path;

use serde::Deserialize;

use crate::{ConfigError, ConfigResult};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Base URL of the source site
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout for the channel page fetch (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for each image size probe (seconds)
    #[serde(rename = "media-timeout-secs", default = "default_media_timeout")]
    pub media_timeout_secs: u64,
}

/// Cache backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,

    /// Bound for the detached write-through (seconds)
    #[serde(rename = "write-timeout-secs", default = "default_write_timeout")]
    pub write_timeout_secs: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "https://t.me".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36"
        .to_string()
}

fn default_page_timeout() -> u64 {
    30
}

fn default_media_timeout() -> u64 {
    15
}

fn default_redis_url() -> String {
    "redis://redis:6379".to_string()
}

fn default_write_timeout() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            port: default_port(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            page_timeout_secs: default_page_timeout(),
            media_timeout_secs: default_media_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            url: default_redis_url(),
            write_timeout_secs: default_write_timeout(),
        }
    }
}

/// Loads and validates configuration from a TOML file
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    validate(&config)?;

    Ok(config)
}

/// Checks configuration invariants that serde cannot express
pub fn validate(config: &Config) -> ConfigResult<()> {
    if url::Url::parse(&config.scraper.base_url).is_err() {
        return Err(ConfigError::Validation(format!(
            "scraper.base-url is not a valid URL: {}",
            config.scraper.base_url
        )));
    }

    if config.scraper.page_timeout_secs == 0 || config.scraper.media_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "scraper timeouts must be positive".to_string(),
        ));
    }

    if config.cache.write_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "cache.write-timeout-secs must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(validate(&config).is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.scraper.base_url, "https://t.me");
        assert_eq!(config.cache.write_timeout_secs, 5);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9090

            [scraper]
            base-url = "https://example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.scraper.base_url, "https://example.com");
        // Untouched sections keep their defaults
        assert_eq!(config.scraper.page_timeout_secs, 30);
        assert_eq!(config.cache.url, "redis://redis:6379");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = Config::default();
        config.scraper.base_url = "not a url".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = Config::default();
        config.scraper.page_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }
}
