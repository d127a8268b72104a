//! Response caching
//!
//! The pipeline treats the cache as an abstract key/value store holding
//! serialized feed bytes. A zero TTL means "do not cache" and is a no-op for
//! every implementation, never an error. Implementations must be safe for
//! concurrent use.

mod memory;
mod redis;

pub use memory::MemoryCache;
pub use redis::RedisCache;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from cache backends
///
/// These never fail a request; the pipeline logs them and degrades to
/// cache-miss behavior.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Result type for cache operations
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Abstract key/value cache for serialized feed bytes
#[async_trait]
pub trait Cache: Send + Sync {
    /// Retrieves a value; `None` is an explicit not-found signal
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>>;

    /// Stores a value with the given TTL; a zero TTL is a no-op
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()>;
}
