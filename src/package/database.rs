//! The `docSet.dsidx` search index.

use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};
use tracing::{debug, info};

use super::create_parent;
use crate::error::{Error, Result};
use crate::indexer::SymbolEntry;

/// Table and unique index the documentation browsers expect.
pub const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS searchIndex(id INTEGER PRIMARY KEY, name TEXT, type TEXT, path TEXT);
CREATE UNIQUE INDEX IF NOT EXISTS anchor ON searchIndex (name, type, path);";

/// Duplicate `(name, type, path)` rows are ignored.
pub const INSERT_ENTRY: &str =
    "INSERT OR IGNORE INTO searchIndex(name, type, path) VALUES (?1, ?2, ?3)";

/// Recreate the search index at `path` and fill it in one transaction.
///
/// Returns the number of rows actually inserted.
pub fn write_search_index(path: &Path, entries: &[SymbolEntry]) -> Result<usize> {
    if path.exists() {
        debug!(path = %path.display(), "removing stale search index");
        fs::remove_file(path).map_err(|e| Error::io(path, e))?;
    }
    create_parent(path)?;

    let mut conn = Connection::open(path)?;
    conn.execute_batch(SCHEMA)?;

    let tx = conn.transaction()?;
    let mut inserted = 0;
    {
        let mut stmt = tx.prepare(INSERT_ENTRY)?;
        for entry in entries {
            inserted += stmt.execute(params![entry.name, entry.kind, entry.path])?;
        }
    }
    tx.commit()?;

    info!(
        path = %path.display(),
        inserted,
        ignored = entries.len() - inserted,
        "search index written"
    );
    Ok(inserted)
}
