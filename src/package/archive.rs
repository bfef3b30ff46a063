//! Gzipped tarball of the finished docset.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::info;

use super::create_parent;
use crate::error::{Error, Result};

/// File names never added to the archive.
pub const ARCHIVE_EXCLUDES: &[&str] = &[".DS_Store"];

/// Pack `docset_dir` into `archive_path`, rooted at the docset's directory name.
///
/// Returns the number of files added.
pub fn write_archive(docset_dir: &Path, archive_path: &Path) -> Result<usize> {
    let root = docset_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            Error::Archive(format!("{} has no directory name", docset_dir.display()))
        })?;
    if archive_path.starts_with(docset_dir) {
        return Err(Error::Archive(format!(
            "archive {} would be written inside the docset",
            archive_path.display()
        )));
    }

    create_parent(archive_path)?;
    let file = File::create(archive_path).map_err(|e| Error::io(archive_path, e))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    let files = add_directory_recursive(&mut builder, docset_dir, &root)?;

    let encoder = builder.into_inner().map_err(|e| Error::io(archive_path, e))?;
    encoder
        .finish()
        .and_then(|mut file| file.flush())
        .map_err(|e| Error::io(archive_path, e))?;

    info!(path = %archive_path.display(), files, "docset archive written");
    Ok(files)
}

fn add_directory_recursive<W: Write>(
    builder: &mut tar::Builder<W>,
    dir: &Path,
    prefix: &str,
) -> Result<usize> {
    builder
        .append_dir(prefix, dir)
        .map_err(|e| Error::io(dir, e))?;

    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::io(dir, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::io(dir, e))?;
    entries.sort_by_key(fs::DirEntry::file_name);

    let mut files = 0;
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if ARCHIVE_EXCLUDES.iter().any(|excluded| *excluded == name) {
            continue;
        }

        let archive_path = format!("{prefix}/{name}");
        if path.is_dir() {
            files += add_directory_recursive(builder, &path, &archive_path)?;
        } else if path.is_file() {
            builder
                .append_path_with_name(&path, &archive_path)
                .map_err(|e| Error::io(&path, e))?;
            files += 1;
        }
    }
    Ok(files)
}
