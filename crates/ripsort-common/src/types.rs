//! Core type definitions for an organizing run.
//!
//! All of these are snapshots: they describe the source directory as it was
//! when it was scanned and are never re-validated against the filesystem.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A ripped file considered for organizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateFile {
    /// Absolute path at scan time.
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
}

impl CandidateFile {
    /// Create a new candidate snapshot.
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// File name component, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File stem, lossily converted.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The candidate files of one source directory at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MediaSet {
    pub source_dir: PathBuf,
    pub files: Vec<CandidateFile>,
    pub scanned_at: DateTime<Utc>,
}

impl MediaSet {
    /// Create a media set stamped with the current time.
    pub fn new(source_dir: impl Into<PathBuf>, files: Vec<CandidateFile>) -> Self {
        Self {
            source_dir: source_dir.into(),
            files,
            scanned_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total bytes across all candidates.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Where a surviving file goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementAction {
    /// The principal title, placed in the primary destination.
    Primary,
    /// Any other survivor, placed in the extras destination.
    Extra,
}

impl fmt::Display for PlacementAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Extra => write!(f, "extra"),
        }
    }
}

/// One row of a placement plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: PlacementAction,
}
