use once_cell::sync::Lazy;
use regex::Regex;

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

// Old CMS pages wrap inline scripts in /**/ ... /**/
static LEGACY_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*\*/[^>]*/\*\*/").unwrap());

/// Reduce a markup window to compact plain text.
///
/// Entities are decoded first, so escaped markup is stripped like real
/// markup. Tags and legacy comment spans then become a single space and
/// runs of whitespace collapse to one space.
pub fn strip_markup(window: &str) -> String {
    let decoded = html_escape::decode_html_entities(window);
    let without_tags = TAG.replace_all(&decoded, " ");
    let without_comments = LEGACY_COMMENT.replace_all(&without_tags, " ");

    without_comments.split_whitespace().collect::<Vec<_>>().join(" ")
}
