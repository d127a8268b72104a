//! Title text formatting
//!
//! Normalizes whitespace and truncates candidate titles without cutting words
//! in half or leaving a dangling opening parenthesis. All length accounting is
//! in Unicode scalar values, never bytes; the output never exceeds the limit
//! by more than the appended ellipsis.

use std::sync::LazyLock;

use regex::Regex;

const ELLIPSIS: char = '…';
const OPEN_PAREN: char = '(';
const CLOSE_PAREN: char = ')';

/// Punctuation stripped before appending the ellipsis
const TRAILING_PUNCTUATION: &[char] = &[',', '.', ';', ':', '!', '?', ' '];

static MULTIPLE_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex must compile"));

/// Formats a title candidate to at most `limit` scalar values plus an ellipsis
///
/// Rules, in order:
/// 1. Collapse whitespace runs and trim.
/// 2. Short text ending in a colon loses the colon and gains an ellipsis
///    (a colon signals a truncated lead-in).
/// 3. If the limit falls inside an unclosed parenthetical, cut at the opening
///    parenthesis instead of emitting a dangling `(`.
/// 4. Otherwise truncate at the last word boundary at or before the limit;
///    a single word longer than the limit is hard-cut.
///
/// # Arguments
///
/// * `text` - The raw candidate text
/// * `limit` - Maximum length in Unicode scalar values
pub fn format_title(text: &str, limit: usize) -> String {
    let text = MULTIPLE_SPACES.replace_all(text, " ");
    let text = text.trim();

    if text.chars().count() <= limit {
        if let Some(stripped) = text.strip_suffix(':') {
            let mut result = stripped.to_string();
            result.push(ELLIPSIS);
            return result;
        }

        return text.to_string();
    }

    if let Some(cut) = unclosed_paren_cut(text, limit) {
        return cut;
    }

    truncate_at_word_boundary(text, limit)
}

/// Cuts at the opening parenthesis when the `limit`-th scalar value falls
/// inside a parenthetical that is still open at that point
///
/// A parenthetical that only opens past the limit is left to the word
/// boundary truncation. The opening parenthesis is always at or before the
/// limit here, so the cut stays within the length bound.
fn unclosed_paren_cut(text: &str, limit: usize) -> Option<String> {
    let mut in_parens = false;
    let mut paren_start = 0;
    let mut count = 0;

    for (index, ch) in text.char_indices() {
        if ch == OPEN_PAREN {
            in_parens = true;
            paren_start = index;
        } else if ch == CLOSE_PAREN {
            in_parens = false;
        }

        count += 1;

        if count == limit {
            if !in_parens {
                return None;
            }

            let mut result = text[..paren_start]
                .trim_end_matches(TRAILING_PUNCTUATION)
                .to_string();
            result.push(ELLIPSIS);
            return Some(result);
        }
    }

    None
}

/// Truncates over-limit text at a word boundary and appends an ellipsis
fn truncate_at_word_boundary(text: &str, limit: usize) -> String {
    let mut last_word_end = 0;
    let mut count = 0;

    for (index, ch) in text.char_indices() {
        count += 1;

        if ch.is_whitespace() {
            last_word_end = index;
        }

        if count >= limit {
            // No boundary before the limit means the first word alone
            // exceeds it; hard-cut just before the current scalar.
            let truncated = if last_word_end > 0 {
                &text[..last_word_end]
            } else {
                &text[..index]
            };

            let mut result = truncated.trim_end_matches(TRAILING_PUNCTUATION).to_string();
            result.push(ELLIPSIS);
            return result;
        }
    }

    text.to_string()
}
