//! Whitespace minification of the final page.
//!
//! Comments go, line-broken whitespace between tags goes, every other
//! whitespace run shrinks to one space. The contents of `pre`, `textarea`,
//! `script` and `style` are copied through untouched.

use regex::Captures;

use crate::patterns::{
    BLANK_LINE_BETWEEN_TAGS, HTML_COMMENT, KEEP_PLACEHOLDER, PROTECTED_BLOCK, WHITESPACE_RUN,
};

/// Minify serialized HTML.
#[must_use]
pub fn minify_html(html: &str) -> String {
    let mut kept: Vec<String> = Vec::new();
    let masked = PROTECTED_BLOCK.replace_all(html, |caps: &Captures| {
        kept.push(caps[0].to_string());
        format!("<\u{E000}{}>", kept.len() - 1)
    });

    let without_comments = HTML_COMMENT.replace_all(&masked, |caps: &Captures| {
        let comment = &caps[0];
        if comment.starts_with("<!--[if") {
            comment.to_string()
        } else {
            String::new()
        }
    });
    let joined = BLANK_LINE_BETWEEN_TAGS.replace_all(&without_comments, "><");
    let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");

    KEEP_PLACEHOLDER
        .replace_all(collapsed.trim(), |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| kept.get(index))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
