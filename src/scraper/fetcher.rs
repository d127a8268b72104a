//! HTTP fetching for the scraper
//!
//! This module builds the HTTP clients and performs the two kinds of request
//! the scraper needs:
//! - Fetching the channel page body
//! - Probing an image URL for its byte size
//!
//! Clients are constructed once with explicit timeouts and shared; there is
//! no ambient transport state.

use std::time::Duration;

use reqwest::Client;

use crate::config::ScraperConfig;
use crate::{FeedError, Result};

/// Builds the client used for channel page fetches
pub fn build_page_client(config: &ScraperConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.page_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the client used for image size probes
///
/// Image probes get a shorter timeout than the page fetch so a slow CDN
/// cannot stall the whole extraction.
pub fn build_media_client(config: &ScraperConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.media_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the channel page and returns its body
///
/// Transport failures and non-success status codes both surface as fetch
/// errors; timeouts are classified separately.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FeedError::from_fetch(url, e))?
        .error_for_status()
        .map_err(|e| FeedError::from_fetch(url, e))?;

    response
        .text()
        .await
        .map_err(|e| FeedError::from_fetch(url, e))
}

/// Resolves the byte size of a resource by downloading and discarding it
///
/// Any failure yields 0 with a warning; image size is not critical to the
/// post.
pub async fn probe_size(client: &Client, url: &str) -> u64 {
    match try_probe_size(client, url).await {
        Ok(size) => size,
        Err(error) => {
            tracing::warn!(url = %url, error = %error, "Could not resolve image size");
            0
        }
    }
}

async fn try_probe_size(client: &Client, url: &str) -> std::result::Result<u64, reqwest::Error> {
    let mut response = client.get(url).send().await?.error_for_status()?;
    let mut total: u64 = 0;

    while let Some(chunk) = response.chunk().await? {
        total += chunk.len() as u64;
    }

    Ok(total)
}
