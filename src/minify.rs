//! HTML minification for pasted email templates.
//!
//! Only comments and whitespace are touched; markup is never parsed.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};

use crate::config::MinifyConfig;

/// Either a conditional-comment opener to keep (`keep`) or a whole comment.
///
/// Conditional openers are `<!--[if ...]>`, the `<!--<![endif]-->` closer of
/// downlevel-revealed blocks and the `<!-->` that ends `<!--[if !mso]><!-->`.
#[allow(clippy::expect_used)]
static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?P<keep><!--(?:\[if|<!\[endif\]|>))|<!--.*?-->")
        .expect("comment pattern is valid")
});

#[allow(clippy::expect_used)]
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\x1C-\x1F]+").expect("whitespace pattern is valid"));

/// Removes HTML comments, keeping conditional comments intact.
///
/// A `<!--` without a closing `-->` is left as it is.
#[must_use]
pub fn strip_comments(html: &str) -> String {
    COMMENT
        .replace_all(html, |caps: &Captures<'_>| {
            caps.name("keep").map_or_else(String::new, |m| m.as_str().to_string())
        })
        .into_owned()
}

/// Byte ranges of the comments [`strip_comments`] removes from `html`.
#[must_use]
pub fn comment_spans(html: &str) -> Vec<Range<usize>> {
    COMMENT
        .captures_iter(html)
        .filter(|caps| caps.name("keep").is_none())
        .filter_map(|caps| caps.get(0))
        .map(|comment| comment.range())
        .collect()
}

/// Collapses every whitespace run to a single space and trims both ends.
///
/// The information separators U+001C to U+001F count as whitespace too.
#[must_use]
pub fn collapse_whitespace(html: &str) -> String {
    WHITESPACE.replace_all(html, " ").trim().to_string()
}

/// Applies the passes enabled in `config`, comments first.
#[must_use]
pub fn minify(html: &str, config: MinifyConfig) -> String {
    let stripped = if config.strip_comments { strip_comments(html) } else { html.to_string() };

    if config.collapse_whitespace { collapse_whitespace(&stripped) } else { stripped }
}
