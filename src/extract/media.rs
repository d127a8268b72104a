//! Media discovery in post fragments
//!
//! Images appear in two places on the source page: as CSS background images
//! on photo-wrap elements, and as link-preview anchors whose href points at an
//! image file. This module locates the URLs and classifies their MIME types;
//! byte sizes are resolved separately by the scraper because that requires
//! network access.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

static PHOTO_WRAP: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message_photo_wrap").expect("photo wrap selector must parse")
});

static LINK_PREVIEW: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message_link_preview").expect("link preview selector must parse")
});

static IMAGE_EXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(jpg|jpeg|png|gif)$").expect("image ext regex must compile"));

/// Maps a URL's file extension to a feed enclosure MIME type
///
/// Returns an empty string for unsupported extensions; such images are
/// omitted from enclosures.
pub fn mime_from_url(url: &str) -> &'static str {
    match Path::new(url).extension().and_then(|ext| ext.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "",
    }
}

/// Parses the image URL out of a CSS `url(...)` token in a style attribute
pub fn style_background_url(style: &str) -> Option<String> {
    let start = style.find("url(")? + 4;
    let end = start + style[start..].find(')')?;

    if end <= start {
        return None;
    }

    let url = style[start..end].trim_matches(|c| c == '\'' || c == '"');

    if url.is_empty() {
        None
    } else {
        Some(url.to_string())
    }
}

/// Collects inline-style image URLs from a post, in document order
///
/// Elements without a parseable URL or with an unsupported extension
/// contribute nothing.
pub fn collect_image_urls(post: ElementRef<'_>) -> Vec<String> {
    post.select(&PHOTO_WRAP)
        .filter_map(|wrap| wrap.value().attr("style"))
        .filter_map(style_background_url)
        .filter(|url| !mime_from_url(url).is_empty())
        .collect()
}

/// Finds a link-preview anchor whose href looks like an image
pub fn link_preview_url(post: ElementRef<'_>) -> Option<String> {
    let href = post
        .select(&LINK_PREVIEW)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))?;

    if IMAGE_EXT.is_match(href) {
        Some(href.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn fragment(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    #[test]
    fn test_style_url_with_single_quotes() {
        let style = "width:100%;background-image:url('https://cdn.example.com/file/photo.jpg')";
        assert_eq!(
            style_background_url(style).as_deref(),
            Some("https://cdn.example.com/file/photo.jpg")
        );
    }

    #[test]
    fn test_style_url_with_double_quotes() {
        let style = r#"background-image:url("https://cdn.example.com/a.png")"#;
        assert_eq!(
            style_background_url(style).as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }

    #[test]
    fn test_style_url_unquoted() {
        let style = "background-image:url(https://cdn.example.com/a.gif)";
        assert_eq!(
            style_background_url(style).as_deref(),
            Some("https://cdn.example.com/a.gif")
        );
    }

    #[test]
    fn test_style_without_url_token() {
        assert_eq!(style_background_url("width:100%"), None);
        assert_eq!(style_background_url(""), None);
    }

    #[test]
    fn test_mime_classification() {
        assert_eq!(mime_from_url("https://x/photo.jpg"), "image/jpeg");
        assert_eq!(mime_from_url("https://x/photo.jpeg"), "image/jpeg");
        assert_eq!(mime_from_url("https://x/photo.png"), "image/png");
        assert_eq!(mime_from_url("https://x/photo.gif"), "image/gif");
        assert_eq!(mime_from_url("https://x/video.mp4"), "");
        assert_eq!(mime_from_url("https://x/noext"), "");
    }

    #[test]
    fn test_collect_image_urls_in_order() {
        let html = r#"<div class="tgme_widget_message">
            <a class="tgme_widget_message_photo_wrap" style="background-image:url('https://cdn/one.jpg')"></a>
            <a class="tgme_widget_message_photo_wrap" style="background-image:url('https://cdn/two.png')"></a>
        </div>"#;
        let doc = fragment(html);
        let urls = collect_image_urls(doc.root_element());
        assert_eq!(urls, vec!["https://cdn/one.jpg", "https://cdn/two.png"]);
    }

    #[test]
    fn test_unsupported_extension_excluded() {
        let html = r#"<div class="tgme_widget_message">
            <a class="tgme_widget_message_photo_wrap" style="background-image:url('https://cdn/clip.webp')"></a>
            <a class="tgme_widget_message_photo_wrap" style="background-image:url('https://cdn/pic.jpg')"></a>
        </div>"#;
        let doc = fragment(html);
        let urls = collect_image_urls(doc.root_element());
        assert_eq!(urls, vec!["https://cdn/pic.jpg"]);
    }

    #[test]
    fn test_wrap_without_url_contributes_nothing() {
        let html = r#"<div class="tgme_widget_message">
            <a class="tgme_widget_message_photo_wrap" style="width:100%"></a>
        </div>"#;
        let doc = fragment(html);
        assert!(collect_image_urls(doc.root_element()).is_empty());
    }

    #[test]
    fn test_link_preview_with_image_href() {
        let html = r#"<div class="tgme_widget_message">
            <a class="tgme_widget_message_link_preview" href="https://cdn/preview.jpeg">link</a>
        </div>"#;
        let doc = fragment(html);
        assert_eq!(
            link_preview_url(doc.root_element()).as_deref(),
            Some("https://cdn/preview.jpeg")
        );
    }

    #[test]
    fn test_link_preview_with_non_image_href() {
        let html = r#"<div class="tgme_widget_message">
            <a class="tgme_widget_message_link_preview" href="https://example.com/article">link</a>
        </div>"#;
        let doc = fragment(html);
        assert_eq!(link_preview_url(doc.root_element()), None);
    }
}
