//! Channel, post and image entities
//!
//! These are built fresh on every extraction and never persisted; only the
//! serialized feed bytes ever reach the cache.

use chrono::{DateTime, FixedOffset};

/// A public Telegram channel with its extracted posts
#[derive(Debug, Clone)]
pub struct Channel {
    /// Stable channel handle, e.g. "durov"
    pub username: String,

    /// Channel title from the page header
    pub title: String,

    /// Canonical channel URL (the web preview page)
    pub url: String,

    /// Channel avatar URL
    pub image_url: String,

    /// Posts in source document order (oldest first)
    pub posts: Vec<Post>,
}

/// One message within a channel
#[derive(Debug, Clone)]
pub struct Post {
    /// Channel-scoped composite identifier, e.g. "durov/123"
    pub id: String,

    /// Canonical deep link to the message
    pub url: String,

    /// Derived title, may be empty
    pub title: String,

    /// Message markup as sanitized by the source site; the builder substitutes
    /// a fallback link block when the source shows nothing
    pub content_html: String,

    /// Preview image used as the feed enclosure
    pub preview: Option<Image>,

    /// All images found in the post, in document order
    pub images: Vec<Image>,

    /// Message timestamp; posts without a parseable timestamp are dropped
    /// during extraction, so this is always valid
    pub datetime: DateTime<FixedOffset>,
}

/// An image attachment with its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,

    /// One of image/jpeg, image/png, image/gif; empty means unsupported and
    /// excluded from enclosures
    pub mime_type: String,

    /// Size in bytes; 0 when resolution failed
    pub size: u64,
}
