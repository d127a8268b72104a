//! Atom rendering

use atom_syndication::{ContentBuilder, EntryBuilder, FeedBuilder, LinkBuilder, Text};
use chrono::{DateTime, FixedOffset, Utc};

use crate::model::{Channel, Post};
use crate::Result;

/// Renders the included posts as an Atom document
pub(super) fn render(
    channel: &Channel,
    posts: &[&Post],
    created: Option<DateTime<FixedOffset>>,
) -> Result<Vec<u8>> {
    // Atom requires an updated timestamp even for an empty feed.
    let updated = created.unwrap_or_else(|| Utc::now().fixed_offset());

    let mut entries = Vec::with_capacity(posts.len());

    for post in posts {
        let mut links = vec![LinkBuilder::default()
            .href(post.url.clone())
            .rel("alternate")
            .build()];

        if let Some(enclosure) = super::enclosure_image(post) {
            links.push(
                LinkBuilder::default()
                    .href(enclosure.url.clone())
                    .rel("enclosure")
                    .mime_type(Some(enclosure.mime_type.clone()))
                    .length(Some(enclosure.size.to_string()))
                    .build(),
            );
        }

        let content = ContentBuilder::default()
            .value(Some(super::item_content(post)))
            .content_type(Some("html".to_string()))
            .build();

        entries.push(
            EntryBuilder::default()
                .id(post.url.clone())
                .title(Text::plain(post.title.clone()))
                .updated(post.datetime)
                .links(links)
                .content(Some(content))
                .build(),
        );
    }

    let feed = FeedBuilder::default()
        .title(Text::plain(channel.title.clone()))
        .id(channel.url.clone())
        .updated(updated)
        .links(vec![LinkBuilder::default()
            .href(channel.url.clone())
            .rel("alternate")
            .build()])
        .logo(Some(channel.image_url.clone()))
        .entries(entries)
        .build();

    Ok(feed.to_string().into_bytes())
}
