//! Per-run report of everything the organizer did or failed to do.

use chrono::{DateTime, Utc};
use ripsort_common::{CandidateFile, Error, FileOp, PlacementAction};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Overall outcome of a run that got past selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Completed,
    CompletedWithErrors,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::CompletedWithErrors => write!(f, "completed with errors"),
        }
    }
}

/// A file that reached its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: PlacementAction,
}

/// Something that was deliberately not done.
#[derive(Debug, Clone, Serialize)]
pub struct SkipEvent {
    pub path: PathBuf,
    pub reason: String,
}

/// Which per-file failure happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureKind {
    FileOperation { op: FileOp },
    PlacementCollisionExhausted,
    Other,
}

/// A per-file failure that did not stop the run.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorEvent {
    pub fn from_error(path: impl Into<PathBuf>, error: &Error) -> Self {
        let kind = match error {
            Error::FileOperation { op, .. } => FailureKind::FileOperation { op: *op },
            Error::PlacementCollisionExhausted { .. } => FailureKind::PlacementCollisionExhausted,
            _ => FailureKind::Other,
        };

        Self {
            path: path.into(),
            kind,
            message: error.to_string(),
        }
    }
}

/// A placed file ready for the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscodeJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Everything that happened during one organizing pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub source_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub tolerance: f64,
    pub principal: CandidateFile,
    /// Where the principal ended up; `None` if it could not be placed.
    pub primary_destination: Option<PathBuf>,
    pub extras: Vec<Placement>,
    pub deleted: Vec<PathBuf>,
    pub skipped: Vec<SkipEvent>,
    pub errors: Vec<ErrorEvent>,
    pub transcodes: Vec<TranscodeJob>,
    pub status: RunStatus,
}

impl RunSummary {
    pub(crate) fn new(
        source_dir: PathBuf,
        principal: CandidateFile,
        tolerance: f64,
        dry_run: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            source_dir,
            started_at,
            finished_at: started_at,
            dry_run,
            tolerance,
            principal,
            primary_destination: None,
            extras: Vec::new(),
            deleted: Vec::new(),
            skipped: Vec::new(),
            errors: Vec::new(),
            transcodes: Vec::new(),
            status: RunStatus::Completed,
        }
    }

    pub(crate) fn record_placement(&mut self, placement: Placement) {
        match placement.action {
            PlacementAction::Primary => {
                self.primary_destination = Some(placement.destination);
            }
            PlacementAction::Extra => self.extras.push(placement),
        }
    }

    pub(crate) fn record_skip(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.skipped.push(SkipEvent {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub(crate) fn record_error(&mut self, path: impl Into<PathBuf>, error: &Error) {
        self.errors.push(ErrorEvent::from_error(path, error));
    }

    pub(crate) fn finish(&mut self) {
        self.finished_at = Utc::now();
        self.status = if self.errors.is_empty() {
            RunStatus::Completed
        } else {
            RunStatus::CompletedWithErrors
        };
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "would be" } else { "" };

        writeln!(f, "Source: {}", self.source_dir.display())?;
        writeln!(
            f,
            "Principal: {} ({} bytes)",
            self.principal.path.display(),
            self.principal.size
        )?;
        match &self.primary_destination {
            Some(dest) => writeln!(f, "  -> {}", dest.display())?,
            None => writeln!(f, "  -> not placed")?,
        }

        writeln!(f, "\nDuplicates {}deleted: {}", spaced(verb), self.deleted.len())?;
        for path in &self.deleted {
            writeln!(f, "  {}", path.display())?;
        }

        writeln!(f, "\nExtras {}placed: {}", spaced(verb), self.extras.len())?;
        for extra in &self.extras {
            writeln!(
                f,
                "  {} -> {}",
                extra.source.display(),
                extra.destination.display()
            )?;
        }

        if !self.skipped.is_empty() {
            writeln!(f, "\nSkipped: {}", self.skipped.len())?;
            for skip in &self.skipped {
                writeln!(f, "  {}: {}", skip.path.display(), skip.reason)?;
            }
        }

        if !self.errors.is_empty() {
            writeln!(f, "\nErrors: {}", self.errors.len())?;
            for error in &self.errors {
                writeln!(f, "  {}", error.message)?;
            }
        }

        if self.dry_run {
            writeln!(f, "\n[DRY RUN] No files were changed")?;
        }
        write!(f, "\nStatus: {}", self.status)
    }
}

fn spaced(word: &str) -> String {
    if word.is_empty() {
        String::new()
    } else {
        format!("{} ", word)
    }
}
