//! Request parameters and their validation
//!
//! Query parameters arrive as raw strings from the HTTP layer and are
//! validated here into a `FeedParams`, so the rest of the pipeline only ever
//! sees well-formed values.

use std::fmt;
use std::str::FromStr;

use crate::FeedError;

/// Default cache TTL in minutes when the request does not specify one
pub const CACHE_TTL_DEFAULT_MINUTES: u64 = 60;

/// Upper bound on the requested cache TTL (one year in minutes)
///
/// Larger values are clamped so downstream seconds arithmetic and expiry
/// timestamps stay in range.
pub const CACHE_TTL_MAX_MINUTES: u64 = 525_600;

/// Output feed format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
}

impl FeedFormat {
    /// MIME type served in the Content-Type header
    pub fn mime_type(&self) -> &'static str {
        match self {
            FeedFormat::Rss => "application/rss+xml",
            FeedFormat::Atom => "application/atom+xml",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFormat::Rss => "rss",
            FeedFormat::Atom => "atom",
        }
    }
}

impl fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedFormat {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rss" => Ok(FeedFormat::Rss),
            "atom" => Ok(FeedFormat::Atom),
            other => Err(FeedError::Validation(format!(
                "format must be rss or atom, got: {}",
                other
            ))),
        }
    }
}

/// Whether a response was served from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value of the X-CACHE-STATUS response header
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Validated parameters of one feed request
#[derive(Debug, Clone)]
pub struct FeedParams {
    /// Telegram channel username
    pub username: String,

    /// Output format, defaults to RSS
    pub format: FeedFormat,

    /// Posts containing any of these words are excluded from the feed
    pub exclude_words: Vec<String>,

    /// Match exclude words case-sensitively
    pub exclude_case_sensitive: bool,

    /// Cache time-to-live in minutes; 0 disables caching for this request
    pub cache_ttl_minutes: u64,
}

impl FeedParams {
    /// Validates raw query values into a `FeedParams`
    ///
    /// # Arguments
    ///
    /// * `username` - Channel handle from the request path
    /// * `format` - Optional `format` query value
    /// * `exclude` - Optional pipe-separated `exclude` query value
    /// * `case_sensitive` - Optional `exclude_case_sensitive` query value
    /// * `cache_ttl` - Optional `cache_ttl` query value (minutes)
    pub fn from_query(
        username: &str,
        format: Option<&str>,
        exclude: Option<&str>,
        case_sensitive: Option<&str>,
        cache_ttl: Option<&str>,
    ) -> Result<Self, FeedError> {
        if username.is_empty() {
            return Err(FeedError::Validation("username is required".to_string()));
        }

        let format = match format {
            None | Some("") => FeedFormat::Rss,
            Some(value) => value.parse()?,
        };

        let exclude_words = match exclude {
            None | Some("") => Vec::new(),
            Some(value) => value
                .split('|')
                .map(str::trim)
                .filter(|word| !word.is_empty())
                .map(str::to_string)
                .collect(),
        };

        let exclude_case_sensitive = match case_sensitive {
            Some(value) => value == "1" || value.eq_ignore_ascii_case("true"),
            None => false,
        };

        let cache_ttl_minutes = match cache_ttl {
            None | Some("") => CACHE_TTL_DEFAULT_MINUTES,
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| {
                    FeedError::Validation("cache_ttl must be a non-negative integer".to_string())
                })?
                .min(CACHE_TTL_MAX_MINUTES),
        };

        Ok(FeedParams {
            username: username.to_string(),
            format,
            exclude_words,
            exclude_case_sensitive,
            cache_ttl_minutes,
        })
    }
}
