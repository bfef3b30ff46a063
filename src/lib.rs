//! # leaflet-docset
//!
//! Turns a mirrored copy of the Leaflet API reference page into an offline
//! docset for Dash and Zeal: one cleaned, minified page with statically
//! highlighted code samples, a single trimmed stylesheet, and a SQLite
//! search index of every documented class, option, event and method.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leaflet_docset::{build_docset, Options};
//!
//! let options = Options {
//!     docset_dir: "dist/Leaflet.docset".into(),
//!     ..Options::default()
//! };
//! let report = build_docset(&options)?;
//! println!("{report}");
//! # Ok::<(), leaflet_docset::Error>(())
//! ```
//!
//! ## Passes
//!
//! - **Loader**: reads and transcodes the page, refuses missing or empty input
//! - **Sanitizer**: drops navigation, scripts and remote resources
//! - **Highlighter**: re-renders raw code samples with scoped styles
//! - **Stylesheet**: merges all styles and drops rules nothing matches
//! - **Indexer**: extracts search entries and anchors from the API tables
//! - **Pruner**: deletes scripts and images the page no longer references
//! - **Packager**: search database, JSON dump, `Info.plist`, archive
//!
//! The individual passes are public so they can be run against a parsed
//! [`dom::Document`] on their own.

mod error;
mod options;
mod patterns;
mod pipeline;
mod report;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Source loading, charset detection and anchor rewriting.
pub mod loader;

/// Removal of non-essential elements.
pub mod sanitize;

/// Static code sample highlighting.
pub mod highlight;

/// Stylesheet merging, dead-rule elimination and compaction.
pub mod stylesheet;

/// Symbol index extraction.
pub mod indexer;

/// Deletion of unreferenced assets and obsolete directories.
pub mod prune;

/// HTML minification.
pub mod minify;

/// Search database, symbol dump, bundle metadata and archive.
pub mod package;

pub use error::{Error, Result};
pub use highlight::{HighlightReport, Highlighter, LexerSource};
pub use indexer::{build_symbol_index, AnchorRegistry, SymbolEntry, SymbolIndex};
pub use options::{BundleInfo, Options};
pub use pipeline::build_docset;
pub use prune::{PruneFailure, PruneReport};
pub use report::BuildReport;
pub use stylesheet::{ConsolidationReport, RuleFailure, RuleReport, Stylesheet};
