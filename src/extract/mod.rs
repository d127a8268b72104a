//! Content extraction from post HTML fragments
//!
//! This module derives the parts of a post the source page does not state
//! explicitly:
//! - A short title from the message markup (ordered heuristics)
//! - Whitespace- and punctuation-aware title formatting
//! - Embedded images from inline styles and link previews

pub mod format;
pub mod media;
pub mod title;

pub use format::format_title;
pub use title::extract_title;

/// Title length limit in Unicode scalar values
pub const TITLE_LIMIT: usize = 80;
