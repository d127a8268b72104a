//! Feed synthesis
//!
//! Renders a `Channel` into RSS or Atom bytes under the request's exclusion
//! policy. Excluded posts contribute nothing, not even to the feed's creation
//! timestamp; the gallery block and enclosure selection are shared between
//! both output formats.

mod atom;
mod rss;

use crate::model::{Channel, FeedFormat, FeedParams, Image, Post};
use crate::Result;

/// Renders the channel as a self-contained feed document
///
/// # Arguments
///
/// * `channel` - The extracted channel
/// * `params` - Request parameters (format and exclusion policy)
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - Directly servable feed bytes
/// * `Err(FeedError)` - Serialization failure
pub fn generate(channel: &Channel, params: &FeedParams) -> Result<Vec<u8>> {
    let mut included = Vec::with_capacity(channel.posts.len());

    for post in &channel.posts {
        if should_exclude(
            &post.content_html,
            &params.exclude_words,
            params.exclude_case_sensitive,
        ) {
            tracing::debug!(id = %post.id, "Skipping post with an excluded word");
            continue;
        }

        included.push(post);
    }

    // Created tracks only posts that made it into the feed.
    let created = included.iter().map(|post| post.datetime).max();

    match params.format {
        FeedFormat::Rss => rss::render(channel, &included, created),
        FeedFormat::Atom => atom::render(channel, &included, created),
    }
}

/// Decides whether content matches any exclude word
///
/// Matching is substring containment, case-folded unless `case_sensitive`.
pub fn should_exclude(content: &str, words: &[String], case_sensitive: bool) -> bool {
    if words.is_empty() {
        return false;
    }

    if case_sensitive {
        words.iter().any(|word| content.contains(word.as_str()))
    } else {
        let folded = content.to_lowercase();
        words
            .iter()
            .any(|word| folded.contains(&word.to_lowercase()))
    }
}

/// Item body: content plus an appended gallery of all post images
fn item_content(post: &Post) -> String {
    if post.images.is_empty() {
        return post.content_html.clone();
    }

    let gallery: Vec<String> = post
        .images
        .iter()
        .map(|image| format!(r#"<img src="{}">"#, image.url))
        .collect();

    format!("{}\n\n{}", post.content_html, gallery.join("\n"))
}

/// The image backing the item's enclosure, if the post has a usable one
fn enclosure_image(post: &Post) -> Option<&Image> {
    post.preview
        .as_ref()
        .filter(|image| !image.mime_type.is_empty())
}
