//! Channel page parsing
//!
//! Reduces the fetched document to plain per-post data. A malformed post is
//! skipped with a warning and never aborts the channel; a page without the
//! channel header block is a document-level error (the channel does not exist
//! or the page layout is unrecognized).

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html, Selector};

use crate::extract::{extract_title, media};
use crate::{FeedError, Result};

static CHANNEL_HEADER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_channel_info_header").expect("channel header selector must parse")
});

static CHANNEL_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_channel_info_header_title").expect("channel title selector must parse")
});

static CHANNEL_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("img selector must parse"));

static MESSAGE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message").expect("message selector must parse")
});

static MESSAGE_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message_text").expect("message text selector must parse")
});

static MESSAGE_DATE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message_date time").expect("message date selector must parse")
});

/// Channel data before image sizes are resolved
#[derive(Debug)]
pub(super) struct ParsedChannel {
    pub title: String,
    pub image_url: String,
    pub posts: Vec<ParsedPost>,
}

/// Post data before image sizes are resolved
#[derive(Debug)]
pub(super) struct ParsedPost {
    pub id: String,
    pub url: String,
    pub title: String,
    pub content_html: String,
    pub image_urls: Vec<String>,
    pub link_preview_url: Option<String>,
    pub datetime: DateTime<FixedOffset>,
}

/// Parses the channel page body into plain data
pub(super) fn parse_channel(body: &str, base_url: &str, page_url: &str) -> Result<ParsedChannel> {
    let document = Html::parse_document(body);

    let header = document
        .select(&CHANNEL_HEADER)
        .next()
        .ok_or_else(|| FeedError::Document {
            url: page_url.to_string(),
        })?;

    let title = header
        .select(&CHANNEL_TITLE)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let image_url = header
        .select(&CHANNEL_IMAGE)
        .next()
        .and_then(|element| element.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    let posts = document
        .select(&MESSAGE)
        .filter_map(|message| parse_post(message, base_url))
        .collect();

    Ok(ParsedChannel {
        title,
        image_url,
        posts,
    })
}

/// Parses one message fragment; returns None when the post is unusable
fn parse_post(message: ElementRef<'_>, base_url: &str) -> Option<ParsedPost> {
    let Some(id) = message.value().attr("data-post") else {
        tracing::warn!("Skipping message without a post identifier");
        return None;
    };

    let url = format!("{}/{}", base_url, id);

    // A post without a parseable timestamp cannot participate in feed
    // ordering, so it is dropped rather than defaulted.
    let Some(datetime_text) = message
        .select(&MESSAGE_DATE)
        .next()
        .and_then(|time| time.value().attr("datetime"))
    else {
        tracing::warn!(url = %url, "Skipping post without a datetime");
        return None;
    };

    let datetime = match DateTime::parse_from_rfc3339(datetime_text) {
        Ok(datetime) => datetime,
        Err(error) => {
            tracing::warn!(
                url = %url,
                datetime = %datetime_text,
                error = %error,
                "Skipping post with unparseable datetime"
            );
            return None;
        }
    };

    let mut title = extract_title(message);

    let mut content_html = message
        .select(&MESSAGE_TEXT)
        .next()
        .map(|container| container.inner_html())
        .unwrap_or_default();

    if content_html.is_empty() {
        // The web preview does not render every kind of message; fall back
        // to a deep link so the item still has a body.
        content_html = format!(r#"<a href="{}">[Open in Telegram]</a>"#, url);

        if title.is_empty() {
            title = "Unsupported content".to_string();
        }
    }

    Some(ParsedPost {
        id: id.to_string(),
        url,
        title,
        content_html,
        image_urls: media::collect_image_urls(message),
        link_preview_url: media::link_preview_url(message),
        datetime,
    })
}
