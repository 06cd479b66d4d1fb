//! Markup filtering for user supplied titles and descriptions
//!
//! Only a small set of inline formatting tags survives; everything else that
//! looks like a tag is removed along with comments and unterminated tags.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Tags kept by [`strip_tags`]
pub const ALLOWED_TAGS: &[&str] = &["b", "i", "em", "strong", "p", "u", "ul", "ol", "li"];

static COMMENT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(-->|$)").expect("Invalid comment regex"));

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)[^>]*(>|$)|<![^>]*(>|$)").expect("Invalid tag regex")
});

/// Remove every tag except the ones in `allowed` (case-insensitive)
pub fn strip_tags_with(input: &str, allowed: &[&str]) -> String {
    let without_comments = COMMENT_REGEX.replace_all(input, "");
    TAG_REGEX
        .replace_all(&without_comments, |caps: &Captures<'_>| {
            let keep = caps
                .get(1)
                .map(|name| {
                    allowed
                        .iter()
                        .any(|tag| tag.eq_ignore_ascii_case(name.as_str()))
                })
                .unwrap_or(false);
            let complete = caps[0].ends_with('>');
            if keep && complete {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Remove every tag except [`ALLOWED_TAGS`]
pub fn strip_tags(input: &str) -> String {
    strip_tags_with(input, ALLOWED_TAGS)
}
