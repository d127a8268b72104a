//! Data model for channels, posts and feed requests

mod channel;
mod params;

pub use channel::{Channel, Image, Post};
pub use params::{
    CacheStatus, FeedFormat, FeedParams, CACHE_TTL_DEFAULT_MINUTES, CACHE_TTL_MAX_MINUTES,
};
