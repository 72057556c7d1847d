//! Error taxonomy for an organizing run.
//!
//! Inventory and empty-set failures abort the whole run. Placement and file
//! operation failures are scoped to a single file; the organizer records them
//! in the run summary and keeps going.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Filesystem operation that failed for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOp {
    /// Removing a duplicate.
    Delete,
    /// Relocating a principal or extra.
    Move,
    /// Creating a destination directory.
    CreateDir,
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => write!(f, "delete"),
            Self::Move => write!(f, "move"),
            Self::CreateDir => write!(f, "create directory"),
        }
    }
}

/// Errors raised while organizing a media set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source directory is missing or unreadable.
    #[error("cannot read source directory {}: {source}", path.display())]
    Inventory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source directory holds no candidate files.
    #[error("no candidate files found in {}", path.display())]
    EmptySet { path: PathBuf },

    /// Every suffixed destination name was already taken.
    #[error("no free destination for {} after {attempts} attempts", path.display())]
    PlacementCollisionExhausted { path: PathBuf, attempts: u32 },

    /// A move or delete failed for one file.
    #[error("failed to {op} {}: {source}", path.display())]
    FileOperation {
        op: FileOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Inventory error.
    pub fn inventory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Inventory {
            path: path.into(),
            source,
        }
    }

    /// Create a new EmptySet error.
    pub fn empty_set(path: impl Into<PathBuf>) -> Self {
        Self::EmptySet { path: path.into() }
    }

    /// Create a new FileOperation error.
    pub fn file_operation(op: FileOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOperation {
            op,
            path: path.into(),
            source,
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
