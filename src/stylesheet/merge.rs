//! Stylesheet merging.
//!
//! Collects every local stylesheet the page links to, inlines their
//! `@import` targets, absorbs inline `<style>` blocks, and leaves exactly one
//! `<link rel="stylesheet">` in the tree, pointing at the consolidated file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use tracing::{debug, warn};

use crate::dom::{self, Document};
use crate::patterns::CSS_IMPORT;
use crate::sanitize::is_external_url;

/// Selector for stylesheet links.
pub const STYLESHEET_LINKS: &str = r#"link[rel="stylesheet"]"#;

/// The merged CSS text and where it came from.
#[derive(Debug, Clone, Default)]
pub struct MergedStyles {
    /// Concatenated CSS with every `@import` statement removed.
    pub css: String,
    /// Files read, linked stylesheets and their imports.
    pub sources: Vec<PathBuf>,
    /// Stylesheet links removed because their file does not exist.
    pub dropped_links: usize,
    /// Inline `<style>` blocks absorbed.
    pub inline_blocks: usize,
}

/// Merge all stylesheets of `doc` and repoint the surviving link to `output_href`.
///
/// Link targets resolve against `site_dir`. Import targets resolve against
/// the importing file's directory first, then against `static_dir`.
/// Imports are inlined one level deep and prepended to the importing sheet.
pub fn merge_stylesheets(
    doc: &Document,
    site_dir: &Path,
    static_dir: &Path,
    output_href: &str,
) -> MergedStyles {
    let mut merged = MergedStyles::default();

    for link in dom::each(&doc.select(STYLESHEET_LINKS)) {
        let href = dom::get_attribute(&link, "href").unwrap_or_default();
        let Some(path) = resolve_local(site_dir, &href) else {
            debug!(href = %href, "stylesheet target missing, dropping link");
            merged.dropped_links += dom::remove(&link);
            continue;
        };

        let Ok(css) = read_css(&path) else {
            debug!(path = %path.display(), "stylesheet unreadable, dropping link");
            merged.dropped_links += dom::remove(&link);
            continue;
        };
        debug!(path = %path.display(), length = css.len(), "read stylesheet");

        let mut sheet = format!("\n{css}");
        for target in import_targets(&css) {
            let Some(import_path) = resolve_import(&path, static_dir, &target) else {
                debug!(target = %target, "import target missing");
                continue;
            };
            match read_css(&import_path) {
                Ok(imported) => {
                    debug!(path = %import_path.display(), length = imported.len(), "inlined import");
                    sheet = format!("\n{imported}\n{sheet}");
                    merged.sources.push(import_path);
                }
                Err(e) => debug!(path = %import_path.display(), error = %e, "import unreadable"),
            }
        }

        merged.css.push_str(&sheet);
        merged.sources.push(path);
    }

    for style in dom::each(&doc.select("style")) {
        merged.css.push('\n');
        merged.css.push_str(dom::text_content(&style).trim());
        dom::remove(&style);
        merged.inline_blocks += 1;
    }

    repoint_links(doc, output_href);
    merged.css = CSS_IMPORT.replace_all(&merged.css, "").into_owned();
    merged
}

/// Read a stylesheet as UTF-8, replacing malformed sequences.
fn read_css(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let (css, malformed) = UTF_8.decode_with_bom_removal(&bytes);
    if malformed {
        warn!(path = %path.display(), "stylesheet is not valid UTF-8, decoded lossily");
    }
    Ok(css.into_owned())
}

/// Keep only the last stylesheet link and point it at `href`.
///
/// When no link survived, a fresh one is added to `<head>`.
fn repoint_links(doc: &Document, href: &str) {
    let links = dom::each(&doc.select(STYLESHEET_LINKS));
    let Some((last, earlier)) = links.split_last() else {
        let link = format!(r#"<link rel="stylesheet" type="text/css" href="{href}">"#);
        dom::append_html(&doc.select("head"), &link);
        return;
    };

    dom::set_attribute(last, "href", href);
    dom::set_attribute(last, "type", "text/css");
    dom::remove_attribute(last, "media");

    for link in earlier {
        dom::remove(link);
    }
}

/// Targets of the `@import` statements in `css`, in source order.
#[must_use]
pub fn import_targets(css: &str) -> Vec<String> {
    CSS_IMPORT
        .captures_iter(css)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Resolve an `href` to an existing local file under `base`.
#[must_use]
pub fn resolve_local(base: &Path, href: &str) -> Option<PathBuf> {
    let href = href.trim();
    if href.is_empty() || is_external_url(href) {
        return None;
    }
    let relative = href
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }
    let path = base.join(relative);
    path.is_file().then_some(path)
}

fn resolve_import(importer: &Path, static_dir: &Path, target: &str) -> Option<PathBuf> {
    importer
        .parent()
        .and_then(|dir| resolve_local(dir, target))
        .or_else(|| resolve_local(static_dir, target))
}
