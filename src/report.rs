//! Run report for a docset build.
//!
//! Every pass contributes its own summary; the CLI prints the result as JSON
//! with `--report` and as a one-line summary otherwise.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::highlight::HighlightReport;
use crate::prune::PruneReport;
use crate::stylesheet::ConsolidationReport;

/// What one build did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// The reference page that was transformed.
    pub source: PathBuf,

    /// Decoded source length in bytes.
    pub source_len: usize,

    /// Obsolete site directories removed before processing.
    pub obsolete_dirs: PruneReport,

    /// Elements removed by the sanitizer.
    pub sanitized: usize,

    /// Code sample highlighting.
    pub highlight: HighlightReport,

    /// Scripts appended to `<body>`.
    pub injected_scripts: usize,

    /// Legacy elements renamed (`nobr`, `b`).
    pub modernized: usize,

    /// Stylesheet consolidation.
    pub stylesheet: ConsolidationReport,

    /// Symbols found in the page's tables.
    pub symbols: usize,

    /// Tables that produced symbols.
    pub tables_indexed: usize,

    /// Tables skipped for lack of a type header.
    pub tables_skipped: usize,

    /// Rows written to the search index.
    pub index_rows: usize,

    /// Unreferenced scripts and images.
    pub assets: PruneReport,

    /// Length of the page as written.
    pub output_len: usize,

    /// Whether `Info.plist` was generated in this run.
    pub plist_written: bool,

    /// Archive location, when one was written.
    pub archive: Option<PathBuf>,

    /// Files packed into the archive.
    pub archived_files: usize,
}

impl BuildReport {
    /// Number of per-item failures that were recovered from.
    #[must_use]
    pub fn recovered_failures(&self) -> usize {
        self.stylesheet.rules.failures.len()
            + self.obsolete_dirs.failures.len()
            + self.assets.failures.len()
            + self.highlight.unknown_hints.len()
    }

    /// Pretty JSON for `--report`.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} symbols from {} tables, {} code blocks highlighted, {} css rules removed \
             ({} -> {} bytes), {} assets pruned, {} recovered failures",
            self.symbols,
            self.tables_indexed,
            self.highlight.highlighted,
            self.stylesheet.rules.removed,
            self.stylesheet.original_len,
            self.stylesheet.final_len,
            self.assets.deleted.len(),
            self.recovered_failures(),
        )
    }
}
