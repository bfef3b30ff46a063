//! Docset packaging.
//!
//! Everything written after the page itself is final: the SQLite search
//! index, the JSON symbol dump, the bundle's `Info.plist` and the archive.

mod archive;
mod database;
mod plist;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, Result};
use crate::indexer::SymbolEntry;

pub use archive::{write_archive, ARCHIVE_EXCLUDES};
pub use database::{write_search_index, INSERT_ENTRY, SCHEMA};
pub use plist::{render_info_plist, write_info_plist};

/// Write `[{type, name, path}, ...]` as four-space indented JSON.
pub fn write_symbol_dump(path: &Path, entries: &[SymbolEntry]) -> Result<()> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    entries.serialize(&mut serializer)?;

    create_parent(path)?;
    fs::write(path, out).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), entries = entries.len(), "symbol dump written");
    Ok(())
}

/// Create the parent directory of `path` if it has one.
pub(crate) fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_dump_omits_anchor_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out/nodes.json");
        let entries = vec![SymbolEntry {
            kind: "Method".to_string(),
            name: "setView(<LatLng> center)".to_string(),
            anchor_id: "map-setview".to_string(),
            path: "leafletjs.com/reference.html#map-setview".to_string(),
        }];

        write_symbol_dump(&path, &entries).expect("dump");

        let text = fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("[\n    {\n        \"type\": \"Method\""));
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value[0]["name"], "setView(<LatLng> center)");
        assert_eq!(value[0]["path"], "leafletjs.com/reference.html#map-setview");
        assert!(value[0].get("anchor_id").is_none());
    }
}
