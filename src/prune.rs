//! Asset pruning.
//!
//! The mirrored site ships scripts and images for every page of the site;
//! the docset keeps only those the transformed reference page still names.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info};

/// A file that should have been deleted but was not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a pruning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Files and directories deleted.
    pub deleted: Vec<PathBuf>,
    /// Candidates kept because they are referenced.
    pub kept: usize,
    /// Deletions that failed; the run continues.
    pub failures: Vec<PruneFailure>,
}

impl PruneReport {
    fn delete_file(&mut self, path: PathBuf) {
        debug!(path = %path.display(), "deleting unreferenced asset");
        match fs::remove_file(&path) {
            Ok(()) => self.deleted.push(path),
            Err(e) => self.fail(path, &e),
        }
    }

    fn fail(&mut self, path: PathBuf, e: &std::io::Error) {
        error!(path = %path.display(), error = %e, "failed to delete");
        self.failures.push(PruneFailure {
            path,
            reason: e.to_string(),
        });
    }

    fn merge(&mut self, other: Self) {
        self.deleted.extend(other.deleted);
        self.kept += other.kept;
        self.failures.extend(other.failures);
    }
}

/// Remove leftover directories of the mirrored site that the docset never uses.
///
/// `dirs` are relative to `site_dir`; missing ones are ignored.
pub fn remove_obsolete_dirs(site_dir: &Path, dirs: &[String]) -> PruneReport {
    let mut report = PruneReport::default();
    for dir in dirs {
        let path = site_dir.join(dir);
        if !path.is_dir() {
            debug!(path = %path.display(), "obsolete directory absent");
            continue;
        }
        match fs::remove_dir_all(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed obsolete directory");
                report.deleted.push(path);
            }
            Err(e) => report.fail(path, &e),
        }
    }
    report
}

/// Delete scripts and images under `static_dir` that nothing references.
///
/// An asset survives when its file name occurs in `html` or `css`.
pub fn prune_assets(static_dir: &Path, html: &str, css: &str) -> PruneReport {
    let referenced = |name: &str| html.contains(name) || css.contains(name);
    let mut report = prune_matching(static_dir, "js/*.js", referenced);
    report.merge(prune_matching(static_dir, "images/*.*", referenced));

    info!(
        deleted = report.deleted.len(),
        kept = report.kept,
        failures = report.failures.len(),
        "unreferenced assets pruned"
    );
    report
}

fn prune_matching(dir: &Path, pattern: &str, referenced: impl Fn(&str) -> bool) -> PruneReport {
    let mut report = PruneReport::default();
    let pattern = format!("{}/{pattern}", glob::Pattern::escape(&dir.to_string_lossy()));
    let paths = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            error!(pattern = %pattern, error = %e, "invalid asset glob");
            return report;
        }
    };

    for path in paths.flatten().filter(|p| p.is_file()) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if referenced(&name) {
            report.kept += 1;
        } else {
            report.delete_file(path);
        }
    }
    report
}
