//! Media set organizer.
//!
//! Turns a directory of freshly ripped files into a library folder: the
//! largest file becomes the main title, near-duplicates of it are deleted,
//! and everything else is filed as an extra.

pub mod duplicates;
pub mod inventory;
pub mod placement;
pub mod selector;
pub mod summary;

use crate::config::Config;
use chrono::Utc;
use ripsort_common::paths::folder_name;
use ripsort_common::{CandidateFile, Error, FileOp, PlacementAction, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub use duplicates::{find_duplicates, is_duplicate, validate_tolerance, DEFAULT_TOLERANCE};
pub use inventory::scan;
pub use placement::{PlacementPlan, PlacementPlanner, MAX_SUFFIX_ATTEMPTS};
pub use selector::select_principal;
pub use summary::{
    ErrorEvent, FailureKind, Placement, RunStatus, RunSummary, SkipEvent, TranscodeJob,
};

/// Knobs for one organizing pass.
#[derive(Debug, Clone)]
pub struct OrganizerSettings {
    pub tolerance: f64,
    pub extension: String,
    pub extras_dir_name: String,
    pub rename_primary: bool,
    pub cleanup_source: bool,
    pub dry_run: bool,
    pub transcode_prefix: String,
    pub transcode_extras: bool,
}

impl OrganizerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            tolerance: config.organize.tolerance,
            extension: config.organize.extension.clone(),
            extras_dir_name: config.organize.extras_dir_name.clone(),
            rename_primary: config.organize.rename_primary,
            cleanup_source: config.organize.cleanup_source,
            dry_run: false,
            transcode_prefix: config.transcode.output_prefix.clone(),
            transcode_extras: config.transcode.transcode_extras,
        }
    }
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Resolved catalog metadata for the disc.
#[derive(Debug, Clone, Default)]
pub struct TitleInfo {
    pub title: Option<String>,
    pub year: Option<String>,
}

impl TitleInfo {
    pub fn new(title: impl Into<String>, year: Option<&str>) -> Self {
        Self {
            title: Some(title.into()),
            year: year.map(str::to_string),
        }
    }
}

/// Runs inventory, selection, deduplication, and placement as one pass.
#[derive(Debug, Clone)]
pub struct Organizer {
    settings: OrganizerSettings,
}

impl Organizer {
    pub fn new(settings: OrganizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OrganizerSettings {
        &self.settings
    }

    /// Organize `source_dir` into `library_dir`.
    ///
    /// # Errors
    ///
    /// Only run-level failures are returned: [`Error::Inventory`] when the
    /// source cannot be listed, [`Error::EmptySet`] when it has no
    /// candidates, and [`Error::InvalidInput`] for a tolerance outside
    /// `[0, 1)`. Per-file failures end up in [`RunSummary::errors`].
    pub fn run(&self, source_dir: &Path, library_dir: &Path, title: &TitleInfo) -> Result<RunSummary> {
        let settings = &self.settings;
        validate_tolerance(settings.tolerance)?;

        let started_at = Utc::now();
        let prefix = if settings.dry_run { "[DRY RUN] " } else { "" };

        let set = scan(source_dir, &settings.extension)?;
        info!(
            "Found {} .{} files ({} bytes) in {:?}",
            set.len(),
            settings.extension,
            set.total_size(),
            set.source_dir
        );

        let principal = select_principal(&set)?;
        info!("Principal title: {:?} ({} bytes)", principal.path, principal.size);

        let duplicates = find_duplicates(principal, &set.files, settings.tolerance);
        let extras: Vec<&CandidateFile> = set
            .files
            .iter()
            .filter(|f| f.path != principal.path && !duplicates.iter().any(|d| d.path == f.path))
            .collect();
        debug!("{} duplicates, {} extras", duplicates.len(), extras.len());

        let mut summary = RunSummary::new(
            set.source_dir.clone(),
            principal.clone(),
            settings.tolerance,
            settings.dry_run,
            started_at,
        );

        delete_duplicates(&duplicates, settings.dry_run, &mut summary);

        let folder = folder_name(
            title
                .title
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(&principal.file_stem()),
            title.year.as_deref(),
        );
        let primary_dir = library_dir.join(&folder);
        let extras_dir = primary_dir.join(&settings.extras_dir_name);
        let primary_name = self.primary_file_name(principal, &folder);

        let mut planner = PlacementPlanner::new(&primary_dir, &extras_dir);
        let plan = planner.plan(principal, &primary_name, &extras);

        for (path, err) in &plan.failures {
            error!("{}", err);
            summary.record_error(path, err);
        }

        for entry in plan.entries {
            if !settings.dry_run {
                if let Err(err) = relocate(&entry.source, &entry.destination) {
                    error!("{}", err);
                    summary.record_error(&entry.source, &err);
                    continue;
                }
            }

            info!(
                "{}{} {:?} -> {:?}",
                prefix, entry.action, entry.source, entry.destination
            );

            let wants_transcode =
                entry.action == PlacementAction::Primary || settings.transcode_extras;
            if wants_transcode {
                summary.transcodes.push(TranscodeJob {
                    output: transcode_output(&entry.destination, &settings.transcode_prefix),
                    source: entry.destination.clone(),
                });
            }

            summary.record_placement(Placement {
                source: entry.source,
                destination: entry.destination,
                action: entry.action,
            });
        }

        if settings.cleanup_source && !settings.dry_run && !summary.has_errors() {
            cleanup_source(&mut summary);
        }

        summary.finish();
        info!(
            "Organize {}: {} deleted, {} extras, {} errors",
            summary.status,
            summary.deleted.len(),
            summary.extras.len(),
            summary.errors.len()
        );

        Ok(summary)
    }

    fn primary_file_name(&self, principal: &CandidateFile, folder: &str) -> String {
        if !self.settings.rename_primary {
            return principal.file_name();
        }

        let ext = principal
            .path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.settings.extension.clone());
        format!("{}.{}", folder, ext)
    }
}

/// Delete each duplicate that still exists, recording every outcome.
fn delete_duplicates(duplicates: &[&CandidateFile], dry_run: bool, summary: &mut RunSummary) {
    for dup in duplicates {
        if !dup.path.exists() {
            warn!("Duplicate {:?} disappeared before deletion, skipping", dup.path);
            summary.record_skip(&dup.path, "duplicate no longer exists");
            continue;
        }

        if dry_run {
            info!("[DRY RUN] Would delete duplicate {:?}", dup.path);
            summary.deleted.push(dup.path.clone());
            continue;
        }

        match std::fs::remove_file(&dup.path) {
            Ok(()) => {
                info!("Deleted duplicate {:?} ({} bytes)", dup.path, dup.size);
                summary.deleted.push(dup.path.clone());
            }
            Err(e) => {
                let err = Error::file_operation(FileOp::Delete, &dup.path, e);
                error!("{}", err);
                summary.record_error(&dup.path, &err);
            }
        }
    }
}

/// Where the encoder should write the transcoded copy of `placed`.
pub fn transcode_output(placed: &Path, prefix: &str) -> PathBuf {
    let name = placed
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    placed.with_file_name(format!("{}{}", prefix, name))
}

/// Move one file, creating its destination directory first.
fn relocate(source: &Path, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::file_operation(FileOp::CreateDir, parent, e))?;
    }

    move_file(source, destination).map_err(|e| Error::file_operation(FileOp::Move, source, e))
}

/// Rename, falling back to copy-and-delete across filesystems.
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match std::fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            debug!("{:?} is on another device, copying", destination);
            copy_then_remove(source, destination, |path| std::fs::remove_file(path))
        }
        Err(e) => Err(e),
    }
}

/// Copy `source` to `destination`, then remove the source with
/// `remove_source`. On any failure the destination is removed again, so the
/// file exists in exactly one place.
fn copy_then_remove<F>(source: &Path, destination: &Path, remove_source: F) -> io::Result<()>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    let result = std::fs::copy(source, destination).and_then(|_| remove_source(source));
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(destination) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove partial copy {:?}: {}", destination, e);
            }
        }
    }
    result
}

#[cfg(unix)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::EXDEV)
}

// ERROR_NOT_SAME_DEVICE
#[cfg(windows)]
fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_err: &io::Error) -> bool {
    false
}

/// Remove the source directory if nothing is left in it. Every outcome other
/// than removal is recorded as a skip.
fn cleanup_source(summary: &mut RunSummary) {
    let dir = summary.source_dir.clone();
    let is_empty = match std::fs::read_dir(&dir) {
        Ok(mut entries) => entries.next().is_none(),
        Err(e) => {
            warn!("Failed to list source directory {:?}: {}", dir, e);
            summary.record_skip(&dir, format!("source directory not removed: {}", e));
            return;
        }
    };

    if !is_empty {
        info!("Leaving {:?} in place: not empty", dir);
        summary.record_skip(&dir, "source directory not empty");
        return;
    }

    match std::fs::remove_dir(&dir) {
        Ok(()) => info!("Removed source directory {:?}", dir),
        Err(e) => {
            warn!("Failed to remove source directory {:?}: {}", dir, e);
            summary.record_skip(&dir, format!("source directory not removed: {}", e));
        }
    }
}
