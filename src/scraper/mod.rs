//! Channel scraping
//!
//! Fetches the public web preview of a channel and builds the normalized
//! `Channel` model from it. Parsing is split from size resolution: the DOM
//! types of the HTML parser are not `Send`, so the document is reduced to
//! plain data before any image probing awaits.

mod fetcher;
mod parse;

pub use fetcher::{build_media_client, build_page_client, fetch_page, probe_size};

use reqwest::Client;

use crate::config::ScraperConfig;
use crate::extract::media;
use crate::model::{Channel, Image, Post};
use crate::Result;

use parse::{parse_channel, ParsedPost};

/// Channel page scraper
///
/// Holds the shared HTTP clients; safe for concurrent use.
#[derive(Debug, Clone)]
pub struct Scraper {
    page_client: Client,
    media_client: Client,
    base_url: String,
}

impl Scraper {
    /// Creates a scraper from configuration
    pub fn new(config: &ScraperConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Scraper {
            page_client: build_page_client(config)?,
            media_client: build_media_client(config)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a channel page and extracts its posts
    ///
    /// # Arguments
    ///
    /// * `username` - The channel handle
    ///
    /// # Returns
    ///
    /// * `Ok(Channel)` - The extracted channel with all valid posts
    /// * `Err(FeedError)` - Transport failure or unrecognized page structure
    pub async fn scrape(&self, username: &str) -> Result<Channel> {
        let page_url = format!("{}/s/{}", self.base_url, username);

        tracing::debug!(url = %page_url, "Fetching channel page");
        let body = fetch_page(&self.page_client, &page_url).await?;

        let parsed = parse_channel(&body, &self.base_url, &page_url)?;

        let mut posts = Vec::with_capacity(parsed.posts.len());

        for post in parsed.posts {
            posts.push(self.resolve_post(post).await);
        }

        tracing::info!(
            username = %username,
            posts = posts.len(),
            "Channel extracted"
        );

        Ok(Channel {
            username: username.to_string(),
            title: parsed.title,
            url: page_url,
            image_url: parsed.image_url,
            posts,
        })
    }

    /// Resolves image sizes and selects the preview for one parsed post
    async fn resolve_post(&self, parsed: ParsedPost) -> Post {
        let mut images = Vec::with_capacity(parsed.image_urls.len());

        for url in parsed.image_urls {
            let size = probe_size(&self.media_client, &url).await;

            images.push(Image {
                mime_type: media::mime_from_url(&url).to_string(),
                url,
                size,
            });
        }

        // The first inline image wins; a link preview is only consulted when
        // the post has no inline images at all.
        let preview = match images.first() {
            Some(first) => Some(first.clone()),
            None => match parsed.link_preview_url {
                Some(url) => {
                    let size = probe_size(&self.media_client, &url).await;

                    Some(Image {
                        mime_type: media::mime_from_url(&url).to_string(),
                        url,
                        size,
                    })
                }
                None => None,
            },
        };

        Post {
            id: parsed.id,
            url: parsed.url,
            title: parsed.title,
            content_html: parsed.content_html,
            preview,
            images,
            datetime: parsed.datetime,
        }
    }
}
