//! Symbol index extraction.
//!
//! Every API table of the reference page yields one search entry per row.
//! The table's first header names the symbol type, the row's first cell the
//! symbol, and the row's anchor id the link target. Rows lacking an id get a
//! synthesized one, and every id handed out in a run is unique.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::dom::{self, Document, Selection};
use crate::patterns::{NON_ANCHOR_CHARS, NON_WORD_CHARS};

/// Headings and tables, walked in document order so each table knows its heading.
const HEADINGS_AND_TABLES: &str = "h2, section table";

const TYPE_HEADER: &str = "thead > tr > th:first-of-type";
const NAME_CELLS: &str = "tbody > tr > td:first-of-type";

/// One search index row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(skip)]
    pub anchor_id: String,
    pub path: String,
}

/// Entries in table order, then row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolIndex {
    pub entries: Vec<SymbolEntry>,
    /// Tables that produced entries.
    pub tables_indexed: usize,
    /// Tables without a usable type header.
    pub tables_skipped: usize,
}

/// Anchor ids handed out during one indexing run.
///
/// The first request for a base id returns it unchanged; later requests get
/// a numeric suffix starting at 2. Suffixed ids that collide with an id
/// already issued are skipped, so the mapping stays injective.
#[derive(Debug, Default)]
pub struct AnchorRegistry {
    seen: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl AnchorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique id derived from `base`.
    pub fn register(&mut self, base: &str) -> String {
        let mut count = self.seen.get(base).copied().unwrap_or(0) + 1;
        let mut candidate = suffixed(base, count);
        while self.issued.contains(&candidate) {
            count += 1;
            candidate = suffixed(base, count);
        }
        self.seen.insert(base.to_string(), count);
        self.issued.insert(candidate.clone());
        candidate
    }

    /// Number of ids issued so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.issued.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issued.is_empty()
    }
}

fn suffixed(base: &str, count: usize) -> String {
    if count == 1 {
        base.to_string()
    } else {
        format!("{base}{count}")
    }
}

/// Map a table header onto a docset entry type.
#[must_use]
pub fn normalize_symbol_type(header: &str) -> String {
    let header = header.trim();
    if header.eq_ignore_ascii_case("crs") {
        "Constant".to_string()
    } else if header.eq_ignore_ascii_case("pane") {
        "Element".to_string()
    } else {
        header.to_string()
    }
}

/// Lowercase and strip everything outside `[A-Za-z0-9_-]`.
#[must_use]
pub fn normalize_anchor(raw: &str) -> String {
    NON_ANCHOR_CHARS.replace_all(&raw.to_lowercase(), "").into_owned()
}

/// Heading text as an anchor prefix: `Map Methods` becomes `map-methods`.
#[must_use]
pub fn slugify(text: &str) -> String {
    NON_WORD_CHARS
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Extract the symbol index and inject a link anchor into every name cell.
///
/// `path_prefix` is the page path each entry links into, e.g.
/// `leafletjs.com/reference.html`.
pub fn build_symbol_index(doc: &Document, path_prefix: &str) -> SymbolIndex {
    let mut index = SymbolIndex::default();
    let mut anchors = AnchorRegistry::new();
    let mut heading = String::new();

    for node in dom::each(&doc.select(HEADINGS_AND_TABLES)) {
        if dom::tag_name(&node).as_deref() == Some("h2") {
            heading = slugify(&dom::text_content(&node));
            continue;
        }

        let Some(kind) = table_type(&node) else {
            debug!(heading = %heading, "table without a single type header, skipping");
            index.tables_skipped += 1;
            continue;
        };

        for (row, cell) in dom::each(&node.select(NAME_CELLS)).into_iter().enumerate() {
            let entry = index_row(&cell, &kind, &heading, row + 1, &mut anchors, path_prefix);
            index.entries.push(entry);
        }
        index.tables_indexed += 1;
    }

    info!(
        entries = index.entries.len(),
        tables = index.tables_indexed,
        skipped = index.tables_skipped,
        "symbol index built"
    );
    index
}

fn table_type(table: &Selection) -> Option<String> {
    let header = table.select(TYPE_HEADER);
    if header.length() != 1 {
        return None;
    }
    let text = dom::text_content(&header);
    let text = text.trim();
    (!text.is_empty()).then(|| normalize_symbol_type(text))
}

fn index_row(
    cell: &Selection,
    kind: &str,
    heading: &str,
    row: usize,
    anchors: &mut AnchorRegistry,
    path_prefix: &str,
) -> SymbolEntry {
    let tr = cell.parent();
    let raw_id = dom::get_attribute(&tr, "id");
    let base = raw_id
        .as_deref()
        .map(normalize_anchor)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| fallback_anchor(heading, row));

    let anchor_id = anchors.register(&base);
    if raw_id.as_deref() != Some(anchor_id.as_str()) {
        debug!(from = ?raw_id, to = %anchor_id, "assigning row id");
        dom::set_attribute(&tr, "id", &anchor_id);
    }

    let name = dom::text_content(cell).trim().to_string();
    dom::append_html(
        cell,
        &format!(r##"<a href="#{anchor_id}" data-anchor="{anchor_id}"></a>"##),
    );

    SymbolEntry {
        kind: kind.to_string(),
        name,
        path: format!("{path_prefix}#{anchor_id}"),
        anchor_id,
    }
}

fn fallback_anchor(heading: &str, row: usize) -> String {
    if heading.is_empty() {
        format!("row-{row}")
    } else {
        format!("{heading}-{row}")
    }
}
