//! Error types for leaflet-docset.
//!
//! Only the failures that stop a build are errors. Per-item problems
//! (an unknown highlighter language, a selector the matcher cannot parse,
//! a file that refuses to be deleted) are recorded in the run report instead.

use std::path::PathBuf;

/// Error type for docset builds.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source reference page does not exist.
    #[error("source document not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// The source reference page is too small to be a real document.
    #[error("source document {} is only {size} bytes", path.display())]
    SourceTooSmall {
        /// Path of the rejected document.
        path: PathBuf,
        /// Size found on disk.
        size: u64,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the search index database failed.
    #[error("search index database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serializing the symbol dump or report failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Creating the docset archive failed.
    #[error("archive creation failed: {0}")]
    Archive(String),
}

impl Error {
    /// Wraps an I/O error together with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for docset operations.
pub type Result<T> = std::result::Result<T, Error>;
