//! DOM sanitization.
//!
//! Strips the parts of the mirrored page that make no sense offline: site
//! navigation, the table of contents, every script, icon and feed links,
//! links to remote resources and the client-side highlighting bundle that
//! the static highlighter replaces.

use tracing::debug;
use url::Url;

use crate::dom::{self, Document};

/// Selectors removed unconditionally.
///
/// The groups select disjoint element sets, so the order of removal does
/// not change the result.
pub const REMOVED_SELECTORS: &[&str] = &[
    "nav.ext-links",
    r#"link[rel="alternate"]"#,
    r#"link[rel$="icon"]"#,
    "body > header",
    "body > nav",
    "#toc",
    "script",
    r#"link[href^="docs/highlight"]"#,
];

/// Remove non-essential elements. Returns the number of elements removed.
pub fn sanitize(doc: &Document) -> usize {
    let mut removed = 0;

    for selector in REMOVED_SELECTORS {
        let count = dom::remove(&doc.select(selector));
        if count > 0 {
            debug!(selector, count, "removed elements");
        }
        removed += count;
    }

    removed += remove_external_links(doc);
    removed += remove_inline_scripts(doc);
    removed
}

/// Remove `<link>` elements pointing at absolute remote URLs.
fn remove_external_links(doc: &Document) -> usize {
    let mut removed = 0;
    for link in dom::each(&doc.select("link[href]")) {
        let href = dom::get_attribute(&link, "href").unwrap_or_default();
        if is_external_url(&href) {
            debug!(href = %href, "removing external link");
            removed += dom::remove(&link);
        }
    }
    removed
}

/// Remove scripts that carry their code inline.
///
/// The blanket `script` selector already catches these on the reference
/// page; this pass keeps the guarantee when the selector list is changed.
fn remove_inline_scripts(doc: &Document) -> usize {
    let mut removed = 0;
    for script in dom::each(&doc.select("script")) {
        let src = dom::get_attribute(&script, "src").unwrap_or_default();
        if src.trim().is_empty() {
            let preview: String = dom::outer_html(&script)
                .chars()
                .take(50)
                .map(|c| if c.is_whitespace() { ' ' } else { c })
                .collect();
            debug!(script = %preview, "removing inline script");
            removed += dom::remove(&script);
        }
    }
    removed
}

/// True for absolute URLs with a network host (`http:`, `https:`, `//cdn...`).
#[must_use]
pub fn is_external_url(href: &str) -> bool {
    let href = href.trim();
    if href.starts_with("//") {
        return true;
    }
    Url::parse(href).is_ok_and(|url| url.host_str().is_some())
}

/// Rewrite deprecated markup the page still uses.
///
/// `<nobr>` becomes a non-wrapping `<span>` and `<b>` becomes `<strong>`.
/// Returns the number of renamed elements.
pub fn modernize_markup(doc: &Document) -> usize {
    let mut renamed = 0;

    for nobr in dom::each(&doc.select("nobr")) {
        dom::rename(&nobr, "span");
        dom::set_attribute(&nobr, "style", "white-space: nowrap;");
        renamed += 1;
    }

    for bold in dom::each(&doc.select("b")) {
        dom::rename(&bold, "strong");
        renamed += 1;
    }

    renamed
}

/// Append one `<script src>` per entry to the end of `<body>`.
///
/// Runs after [`sanitize`], which drops every script the page shipped with.
pub fn inject_scripts(doc: &Document, sources: &[String]) -> usize {
    let body = doc.select("body");
    if !body.exists() {
        debug!("document has no body, no scripts injected");
        return 0;
    }
    for src in sources {
        debug!(src = %src, "injecting script");
        dom::append_html(&body, &format!(r#"<script src="{src}"></script>"#));
    }
    sources.len()
}
