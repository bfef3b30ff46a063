//! Stylesheet compaction and the docset's own style overrides.

use crate::patterns::{CSS_COMMENT, LINE_BREAKS, REPEATED_SPACES};

/// Hand-written rules appended to every consolidated stylesheet.
///
/// Anchor styling, the sticky accordion labels, a dark color scheme and a
/// print layout that spells out link targets.
pub const OVERRIDE_STYLES: &str = r#"
a {
    text-decoration: none;
    transition: 1s ease all;
}
a:hover {
    text-decoration: underline;
}

div.accordion.expanded label, section>h4 {
    top: 0em;
}

@media screen and (prefers-color-scheme: dark) {
    *,
    h1, h2, h3, h4,
    table th, table td,
    p {
        color: rgb(224, 211, 211);
        background-color: rgb(31, 31, 37);
    }
    a {
        color: #7abf6d;
    }
    .api-page table td code strong,
    .api-page table td:last-child {
        color: rgb(224, 211, 211);
        background: transparent;
    }
    .api-page table td code i {
        color: #a6d9a6;
    }

    div.accordion.expanded label, section>h4 {
        background: rgb(31, 31, 37);
    }

    .api-page h2[id]:hover:before,
    .api-page tr[id]:hover td:first-child:before {
        filter: invert(1);
    }

    tr:target, tr:target td:nth-of-type(1) {
        background: transparent;
        border-color: #cf8414!important;
    }
}

@media print {
    *,
    h1, h2, h3, h4,
    table th, table td,
    p {
        color: rgb(0, 0, 0);
        background-color: transparent;
    }
    a, a:visited, :active, a:focus, a:hover {
        color: #000000;
        text-decoration: underline;
    }
    a[href]::after {
        content: " ("attr(href)")";
        color: rgb(0, 0, 0);
        background-color: transparent;
        font-style: italic;
        size: 95%;
    }
    tr:target, tr:target td:nth-of-type(1) {
        background: transparent;
        border-color: none!important;
    }
}
"#;

/// Strip comments, collapse line breaks and repeated spaces.
#[must_use]
pub fn compact_css(css: &str) -> String {
    let css = CSS_COMMENT.replace_all(css, "");
    let css = LINE_BREAKS.replace_all(&css, " ");
    REPEATED_SPACES.replace_all(&css, " ").trim().to_string()
}

/// Remove override blocks a previous build appended to `css`.
///
/// On a rebuild the consolidated sheet is read back in as a merge source.
#[must_use]
pub fn strip_overrides(css: &str) -> String {
    css.replace(&compact_css(OVERRIDE_STYLES), "")
}

/// Compact the serialized sheet, append the overrides and compact again.
#[must_use]
pub fn finalize_css(serialized: &str) -> String {
    let mut css = compact_css(serialized);
    css.push_str(OVERRIDE_STYLES);
    compact_css(&css)
}
