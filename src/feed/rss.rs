//! RSS 2.0 rendering

use chrono::{DateTime, FixedOffset};
use rss::{ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, ItemBuilder};

use crate::model::{Channel, Post};
use crate::Result;

/// Renders the included posts as an RSS 2.0 document
pub(super) fn render(
    channel: &Channel,
    posts: &[&Post],
    created: Option<DateTime<FixedOffset>>,
) -> Result<Vec<u8>> {
    let image = ImageBuilder::default()
        .url(channel.image_url.clone())
        .title(channel.title.clone())
        .link(channel.url.clone())
        .build();

    let mut items = Vec::with_capacity(posts.len());

    for post in posts {
        let mut item = ItemBuilder::default();

        item.guid(Some(
            GuidBuilder::default()
                .value(post.id.clone())
                .permalink(false)
                .build(),
        ))
        .link(Some(post.url.clone()))
        .description(Some(super::item_content(post)))
        .pub_date(Some(post.datetime.to_rfc2822()));

        if !post.title.is_empty() {
            item.title(Some(post.title.clone()));
        }

        if let Some(enclosure) = super::enclosure_image(post) {
            item.enclosure(Some(
                EnclosureBuilder::default()
                    .url(enclosure.url.clone())
                    .mime_type(enclosure.mime_type.clone())
                    .length(enclosure.size.to_string())
                    .build(),
            ));
        }

        items.push(item.build());
    }

    let mut feed = ChannelBuilder::default();

    feed.title(channel.title.clone())
        .link(channel.url.clone())
        .description(channel.title.clone())
        .image(Some(image))
        .items(items);

    if let Some(created) = created {
        let created = created.to_rfc2822();
        feed.pub_date(Some(created.clone()))
            .last_build_date(Some(created));
    }

    Ok(feed.build().to_string().into_bytes())
}
