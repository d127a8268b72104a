//! Cache-backed request pipeline
//!
//! Orchestrates one feed request: cache lookup, extraction, synthesis and
//! write-through. Cache failures never fail a request; they degrade the
//! pipeline to always-miss behavior with a warning.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::feed;
use crate::model::{CacheStatus, FeedParams};
use crate::scraper::Scraper;
use crate::Result;

/// Key namespace; changing it invalidates every cached feed
const CACHE_NAMESPACE: &str = "telegram:channel";

/// Builds the deterministic cache key for a request
///
/// Exclude-word order is part of the key: two requests with the same words in
/// a different order cache separately. This is a documented limitation, not
/// normalized away.
pub fn build_cache_key(params: &FeedParams) -> String {
    format!(
        "{}:{}:{}:{}:{}",
        CACHE_NAMESPACE,
        params.username,
        params.format,
        params.exclude_words.join("|"),
        if params.exclude_case_sensitive { "1" } else { "0" }
    )
}

/// Serves feed requests through the cache
pub struct FeedService {
    scraper: Scraper,
    cache: Arc<dyn Cache>,
    cache_write_timeout: Duration,
}

impl FeedService {
    /// Creates the service
    ///
    /// # Arguments
    ///
    /// * `scraper` - The channel scraper
    /// * `cache` - Shared cache backend
    /// * `cache_write_timeout` - Bound for the detached write-through, kept
    ///   independent of the request's own deadline
    pub fn new(scraper: Scraper, cache: Arc<dyn Cache>, cache_write_timeout: Duration) -> Self {
        FeedService {
            scraper,
            cache,
            cache_write_timeout,
        }
    }

    /// Produces the feed bytes for one request
    ///
    /// # Returns
    ///
    /// The serialized feed and whether it came from the cache.
    pub async fn serve(&self, params: &FeedParams) -> Result<(Vec<u8>, CacheStatus)> {
        let caching = params.cache_ttl_minutes > 0;
        let key = build_cache_key(params);

        if caching {
            match self.cache.get(&key).await {
                Ok(Some(content)) => {
                    tracing::debug!(key = %key, "Cache hit");
                    return Ok((content, CacheStatus::Hit));
                }
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(key = %key, error = %error, "Cache read failed");
                }
            }
        }

        let channel = self.scraper.scrape(&params.username).await?;
        let content = feed::generate(&channel, params)?;

        if caching {
            self.write_through(key, content.clone(), params.cache_ttl_minutes);
        }

        Ok((content, CacheStatus::Miss))
    }

    /// Dispatches the cache write on a detached task
    ///
    /// The write runs under its own timeout so that neither a slow cache nor
    /// cancellation of the inbound request can affect it.
    fn write_through(&self, key: String, content: Vec<u8>, ttl_minutes: u64) {
        let cache = Arc::clone(&self.cache);
        let timeout = self.cache_write_timeout;
        let ttl = Duration::from_secs(ttl_minutes.saturating_mul(60));

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, cache.set(&key, content, ttl)).await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    tracing::warn!(key = %key, error = %error, "Cache write failed");
                }
                Err(_) => {
                    tracing::warn!(key = %key, "Cache write timed out");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeedFormat;

    fn params() -> FeedParams {
        FeedParams {
            username: "example".to_string(),
            format: FeedFormat::Rss,
            exclude_words: vec!["ads".to_string(), "promo".to_string()],
            exclude_case_sensitive: false,
            cache_ttl_minutes: 60,
        }
    }

    #[test]
    fn test_cache_key_layout() {
        assert_eq!(
            build_cache_key(&params()),
            "telegram:channel:example:rss:ads|promo:0"
        );
    }

    #[test]
    fn test_cache_key_deterministic() {
        assert_eq!(build_cache_key(&params()), build_cache_key(&params()));
    }

    #[test]
    fn test_cache_key_empty_exclude_words() {
        let mut p = params();
        p.exclude_words.clear();
        assert_eq!(build_cache_key(&p), "telegram:channel:example:rss::0");
    }

    #[test]
    fn test_every_field_changes_the_key() {
        let base = build_cache_key(&params());

        let mut p = params();
        p.format = FeedFormat::Atom;
        assert_ne!(build_cache_key(&p), base);

        let mut p = params();
        p.exclude_words.push("spam".to_string());
        assert_ne!(build_cache_key(&p), base);

        let mut p = params();
        p.exclude_case_sensitive = true;
        assert_ne!(build_cache_key(&p), base);

        let mut p = params();
        p.username = "other".to_string();
        assert_ne!(build_cache_key(&p), base);
    }

    #[test]
    fn test_exclude_word_order_is_significant() {
        let mut reordered = params();
        reordered.exclude_words.reverse();
        assert_ne!(build_cache_key(&params()), build_cache_key(&reordered));
    }
}
