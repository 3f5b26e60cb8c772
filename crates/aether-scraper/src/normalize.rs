//! Markup stripping and length bounding shared by every fetcher.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid script regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid style regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid tag regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{Cc}]+").expect("valid whitespace regex"));

/// Reduces raw HTML or text to single-spaced plain text of at most `max_chars`
/// characters.
///
/// Script and style blocks are removed with their contents; every other tag
/// becomes one space. Control characters such as NUL count as whitespace.
/// Truncation counts `char`s, so a code point is never split.
#[must_use]
pub fn normalize_text(raw_markup: &str, max_chars: usize) -> String {
    let without_scripts = SCRIPT_RE.replace_all(raw_markup, "");
    let without_styles = STYLE_RE.replace_all(&without_scripts, "");
    let without_tags = TAG_RE.replace_all(&without_styles, " ");
    let collapsed = WHITESPACE_RE.replace_all(&without_tags, " ");
    truncate_chars(collapsed.trim(), max_chars)
}

/// First `max_chars` characters of `s`.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
