//! Snapshot of the candidate files in a source directory.

use ripsort_common::paths::has_extension;
use ripsort_common::{CandidateFile, Error, MediaSet, Result};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// List every regular file directly inside `dir` whose extension matches
/// `extension`, in file-name order.
///
/// An empty set is returned as-is; deciding what to do with it is up to the
/// caller.
///
/// # Errors
///
/// Returns [`Error::Inventory`] if the directory is missing, is not a
/// directory, or cannot be listed.
pub fn scan(dir: &Path, extension: &str) -> Result<MediaSet> {
    let root = dir.canonicalize().map_err(|e| Error::inventory(dir, e))?;

    if !root.is_dir() {
        return Err(Error::inventory(
            dir,
            std::io::Error::other("not a directory"),
        ));
    }

    // Surface permission problems up front instead of as an empty listing
    std::fs::read_dir(&root).map_err(|e| Error::inventory(dir, e))?;

    let mut files = Vec::new();

    for entry in WalkDir::new(&root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(Error::inventory(dir, e.into())),
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", root, e);
                continue;
            }
        };

        if !entry.file_type().is_file() || !has_extension(entry.path(), extension) {
            continue;
        }

        match entry.metadata() {
            Ok(meta) => {
                debug!("Found {:?} ({} bytes)", entry.path(), meta.len());
                files.push(CandidateFile::new(entry.path(), meta.len()));
            }
            Err(e) => warn!("Cannot stat {:?}, skipping: {}", entry.path(), e),
        }
    }

    Ok(MediaSet::new(root, files))
}
