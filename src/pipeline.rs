//! Docset build pipeline.
//!
//! Runs every pass over one in-memory document, in this order:
//!
//! 1. load the page (fatal checks), drop obsolete site directories
//! 2. rewrite self anchors, parse
//! 3. sanitize, highlight code, inject scripts, rename legacy markup
//! 4. consolidate stylesheets (needs the highlighter's `<style>` children)
//! 5. build the symbol index, write the JSON dump and the search database
//! 6. serialize, prune assets against the final text, minify, write the page
//! 7. `Info.plist`, archive

use std::fs;

use tracing::{debug, info};

use crate::dom;
use crate::error::{Error, Result};
use crate::highlight::{self, Highlighter};
use crate::indexer;
use crate::loader;
use crate::minify;
use crate::options::Options;
use crate::package;
use crate::prune;
use crate::report::BuildReport;
use crate::sanitize;
use crate::stylesheet;

/// Build the docset described by `options`.
///
/// Only a missing or near-empty source page and failures while writing the
/// outputs abort the build; everything else is recorded in the report.
pub fn build_docset(options: &Options) -> Result<BuildReport> {
    let index_path = options.index_path();
    let source = loader::load_source(&index_path)?;
    info!(path = %index_path.display(), length = source.len(), "building docset");

    let mut report = BuildReport {
        source: index_path.clone(),
        source_len: source.len(),
        ..BuildReport::default()
    };
    report.obsolete_dirs = prune::remove_obsolete_dirs(&options.site_dir(), &options.obsolete_dirs);

    let html = loader::rewrite_self_anchors(&source, &options.index_file);
    let doc = dom::parse(&html);

    report.sanitized = sanitize::sanitize(&doc);
    debug!(removed = report.sanitized, "sanitized document");

    let highlighter = Highlighter::new(&options.highlight_theme);
    report.highlight = highlight::highlight_code_blocks(&doc, &highlighter);
    report.injected_scripts = sanitize::inject_scripts(&doc, &options.extra_scripts);
    report.modernized = sanitize::modernize_markup(&doc);

    let (css, stylesheet) = stylesheet::consolidate(&doc, options)?;
    report.stylesheet = stylesheet;

    let index = indexer::build_symbol_index(&doc, &options.path_prefix);
    report.symbols = index.entries.len();
    report.tables_indexed = index.tables_indexed;
    report.tables_skipped = index.tables_skipped;
    if let Some(dump) = &options.symbols_dump {
        package::write_symbol_dump(dump, &index.entries)?;
    }
    report.index_rows = package::write_search_index(&options.database_path(), &index.entries)?;

    let html = doc.html().to_string();
    report.assets = prune::prune_assets(&options.static_dir(), &html, &css);

    let html = if options.minify {
        minify::minify_html(&html)
    } else {
        html
    };
    fs::write(&index_path, &html).map_err(|e| Error::io(&index_path, e))?;
    report.output_len = html.len();

    report.plist_written = package::write_info_plist(
        &options.plist_path(),
        &options.bundle,
        &options.index_relative_path(),
    )?;

    if let Some(archive) = &options.archive_path {
        report.archived_files = package::write_archive(&options.docset_dir, archive)?;
        report.archive = Some(archive.clone());
    }

    info!(summary = %report, "docset built");
    Ok(report)
}
