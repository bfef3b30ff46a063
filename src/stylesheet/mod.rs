//! Stylesheet consolidation.
//!
//! Turns the page's linked and inline styles into one minified file that
//! only carries rules the final document can use. Runs after the highlighter
//! so the per-block highlight styles are part of the merge.
//!
//! 1. [`merge`]: collect, inline imports, absorb `<style>` blocks, repoint the link.
//! 2. [`dead_rules`]: drop rules whose selectors match nothing.
//! 3. [`compact`]: serialize, append overrides, minify, write.

pub mod compact;
pub mod dead_rules;
pub mod merge;
pub mod model;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

use crate::dom::Document;
use crate::error::{Error, Result};
use crate::options::Options;

pub use dead_rules::{eliminate_dead_rules, RuleFailure, RuleReport};
pub use model::{Declaration, GroupRule, Rule, StyleRule, Stylesheet};

/// Summary of a consolidation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConsolidationReport {
    /// Stylesheet files merged, including inlined imports.
    pub sources: Vec<PathBuf>,
    /// Links dropped because their target did not exist.
    pub dropped_links: usize,
    /// Inline `<style>` blocks absorbed.
    pub inline_blocks: usize,
    /// Merged CSS length before elimination.
    pub original_len: usize,
    /// Length of the written stylesheet.
    pub final_len: usize,
    /// Dead-rule elimination summary.
    pub rules: RuleReport,
    /// Stylesheet files deleted from the bundle.
    pub deleted_files: Vec<PathBuf>,
    /// Where the consolidated stylesheet was written.
    pub output: PathBuf,
}

/// Merge, prune and write the page's styles.
///
/// Returns the final stylesheet text, which the asset pruner searches for
/// image references.
pub fn consolidate(doc: &Document, options: &Options) -> Result<(String, ConsolidationReport)> {
    let site_dir = options.site_dir();
    let output = options.stylesheet_path();

    let merged = merge::merge_stylesheets(
        doc,
        &site_dir,
        &options.static_dir(),
        &options.stylesheet_output,
    );
    debug!(
        sources = merged.sources.len(),
        inline = merged.inline_blocks,
        length = merged.css.len(),
        "merged stylesheets"
    );

    let mut sheet = Stylesheet::parse(&compact::strip_overrides(&merged.css));
    let rules = eliminate_dead_rules(&mut sheet, doc);
    let css = compact::finalize_css(&sheet.to_css());

    let mut report = ConsolidationReport {
        original_len: merged.css.len(),
        final_len: css.len(),
        dropped_links: merged.dropped_links,
        inline_blocks: merged.inline_blocks,
        rules,
        output: output.clone(),
        ..ConsolidationReport::default()
    };

    report.deleted_files = delete_stale_stylesheets(&merged.sources, &output);
    report.sources = merged.sources;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(&output, &css).map_err(|e| Error::io(&output, e))?;

    info!(
        removed = report.rules.removed,
        kept = report.rules.matched + report.rules.exempt + report.rules.failures.len(),
        before = report.original_len,
        after = report.final_len,
        "consolidated stylesheet written"
    );
    Ok((css, report))
}

/// Delete the merged sources and any other `*.css` next to the output.
fn delete_stale_stylesheets(sources: &[PathBuf], output: &Path) -> Vec<PathBuf> {
    let mut stale: Vec<PathBuf> = sources.to_vec();
    if let Some(css_dir) = output.parent() {
        let pattern = format!("{}/*.css", glob::Pattern::escape(&css_dir.to_string_lossy()));
        match glob::glob(&pattern) {
            Ok(paths) => stale.extend(paths.flatten()),
            Err(e) => error!(pattern = %pattern, error = %e, "invalid stylesheet glob"),
        }
    }
    stale.sort();
    stale.dedup();

    let mut deleted = Vec::new();
    for path in stale {
        if path == output || !path.is_file() {
            continue;
        }
        debug!(path = %path.display(), "deleting stylesheet");
        match fs::remove_file(&path) {
            Ok(()) => deleted.push(path),
            Err(e) => error!(path = %path.display(), error = %e, "failed to delete stylesheet"),
        }
    }
    deleted
}
