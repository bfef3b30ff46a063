//! Compiled regex patterns shared by the build passes.
//!
//! All patterns are compiled once at first use with `LazyLock`.
//! Patterns are grouped by the pass that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Stylesheet Patterns
// =============================================================================

/// Matches an `@import` statement and captures its target.
///
/// Covers `@import url("a.css");`, `@import url(a.css) screen;` and `@import "a.css";`.
pub static CSS_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)@import\s+(?:url\(\s*)?["']?([^"')\s;]+)["']?\s*\)?[^;]*;"#)
        .expect("CSS_IMPORT regex")
});

/// Matches a CSS comment, including ones that contain `*`.
pub static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("CSS_COMMENT regex"));

/// Matches line breaks and tabs.
pub static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\r\n\t]+").expect("LINE_BREAKS regex"));

/// Matches two or more consecutive spaces.
pub static REPEATED_SPACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" {2,}").expect("REPEATED_SPACES regex"));

// =============================================================================
// Code Sample Patterns
// =============================================================================

/// A code sample that opens with a CSS rule (`selector { prop: value }`).
pub static CSS_RULE_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*[\w\s.#:>,\[\]="*-]+\{[^{}]*:[^{}]*\}"#).expect("CSS_RULE_SHAPE regex")
});

// =============================================================================
// Symbol Index Patterns
// =============================================================================

/// Characters that may not appear in an anchor id.
pub static NON_ANCHOR_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]+").expect("NON_ANCHOR_CHARS regex"));

/// Non-word runs, replaced by `-` when slugifying a section heading.
pub static NON_WORD_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("NON_WORD_CHARS regex"));

// =============================================================================
// HTML Minification Patterns
// =============================================================================

/// Elements whose contents must survive minification byte for byte.
pub static PROTECTED_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<pre\b.*?</pre>|<textarea\b.*?</textarea>|<script\b.*?</script>|<style\b.*?</style>",
    )
    .expect("PROTECTED_BLOCK regex")
});

/// Stand-in for a protected block while the rest of the page is minified.
pub static KEEP_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\x{E000}(\d+)>").expect("KEEP_PLACEHOLDER regex"));

/// HTML comments. Conditional comments are filtered out by the caller.
pub static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("HTML_COMMENT regex"));

/// Whitespace between two tags that spans a line break.
pub static BLANK_LINE_BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s*[\r\n]\s*<").expect("BLANK_LINE_BETWEEN_TAGS regex"));

/// Any whitespace run.
pub static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RUN regex"));
