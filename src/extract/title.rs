//! Title extraction heuristics
//!
//! Derives a short title from a post's message markup. The heuristics run in
//! a fixed priority order, first success wins:
//! 1. A bold span at the very start of the message (explicit author headline)
//! 2. The first visual line, split on two or more consecutive line breaks
//! 3. The first sentence, up to terminal punctuation
//! 4. The full rendered text as a last resort
//!
//! Every candidate goes through the title formatter before it is returned.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::extract::{format_title, TITLE_LIMIT};

static MESSAGE_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".tgme_widget_message_text").expect("message text selector must parse")
});

static BOLD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("b").expect("bold selector must parse"));

// Two or more <br> tags, or paragraph boundaries
static MULTIPLE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:<br\s*/?>\s*){2,}|<p>|</p>").expect("breaks regex must compile")
});

// Sentence-terminal punctuation followed by whitespace or end of text
static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?…](?:\s|$)|\.{3}").expect("sentence regex must compile"));

/// Extracts a title from a post fragment, or an empty string when the post
/// has no message text container
pub fn extract_title(post: ElementRef<'_>) -> String {
    let Some(container) = find_message_container(post) else {
        return String::new();
    };

    if let Some(title) = bold_lead(container) {
        return format_title(&title, TITLE_LIMIT);
    }

    if let Some(title) = first_visual_line(container) {
        return format_title(&title, TITLE_LIMIT);
    }

    let text: String = container.text().collect();

    if let Some(found) = SENTENCE_END.find(&text) {
        return format_title(&text[..found.end()], TITLE_LIMIT);
    }

    format_title(&text, TITLE_LIMIT)
}

/// Resolves the message text container within a post fragment
///
/// The source page sometimes nests an identically-classed container inside
/// another; the innermost one holds the actual message.
fn find_message_container(post: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut container = post.select(&MESSAGE_TEXT).next()?;

    while let Some(inner) = container.select(&MESSAGE_TEXT).next() {
        container = inner;
    }

    Some(container)
}

/// Returns the text of a bold element opening the message, if any
fn bold_lead(container: ElementRef<'_>) -> Option<String> {
    let html = container.inner_html();

    if !html.trim_start().starts_with("<b>") {
        return None;
    }

    let text: String = container.select(&BOLD).next()?.text().collect();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Returns the rendered text of the first segment before a run of multiple
/// line breaks, if the markup splits at all
fn first_visual_line(container: ElementRef<'_>) -> Option<String> {
    let html = container.inner_html();
    let mut parts = MULTIPLE_BREAKS.splitn(&html, 2);
    let first = parts.next()?;

    // No split means no visual line boundary in the markup
    parts.next()?;

    let fragment = Html::parse_fragment(first);
    let text: String = fragment.root_element().text().collect();
    let text = text.trim();

    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
