//! Picks the principal title out of a media set.

use ripsort_common::{CandidateFile, Error, MediaSet, Result};

/// Return the largest file in the set.
///
/// When several files share the maximum size the first one in inventory
/// order wins, so the choice is stable for a given directory listing.
pub fn select_principal(set: &MediaSet) -> Result<&CandidateFile> {
    let mut best: Option<&CandidateFile> = None;

    for file in &set.files {
        if best.map_or(true, |b| file.size > b.size) {
            best = Some(file);
        }
    }

    best.ok_or_else(|| Error::empty_set(&set.source_dir))
}
