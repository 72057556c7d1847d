//! Destination planning for the files that survive deduplication.
//!
//! A destination is taken if it already exists on disk or if an earlier entry
//! of the same plan claimed it. Taken names get a ` (N)` suffix before the
//! extension. The existence check is not atomic; runs are assumed to be the
//! only writer to the destination tree.

use ripsort_common::paths::with_suffix;
use ripsort_common::{CandidateFile, Error, PlacementAction, PlacementEntry, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Upper bound on suffix attempts per file.
pub const MAX_SUFFIX_ATTEMPTS: u32 = 9999;

/// Outcome of planning a batch.
#[derive(Debug, Default)]
pub struct PlacementPlan {
    /// Files with a resolved destination, principal first.
    pub entries: Vec<PlacementEntry>,
    /// Files that could not be given a destination.
    pub failures: Vec<(PathBuf, Error)>,
}

/// Assigns collision-free destinations within one run.
#[derive(Debug)]
pub struct PlacementPlanner {
    primary_dir: PathBuf,
    extras_dir: PathBuf,
    max_attempts: u32,
    claimed: HashSet<PathBuf>,
}

impl PlacementPlanner {
    pub fn new(primary_dir: impl Into<PathBuf>, extras_dir: impl Into<PathBuf>) -> Self {
        Self {
            primary_dir: primary_dir.into(),
            extras_dir: extras_dir.into(),
            max_attempts: MAX_SUFFIX_ATTEMPTS,
            claimed: HashSet::new(),
        }
    }

    /// Cap the number of suffixes tried before giving up on a file.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Plan the principal under `primary_name` and every extra under its own
    /// file name.
    pub fn plan(
        &mut self,
        principal: &CandidateFile,
        primary_name: &str,
        extras: &[&CandidateFile],
    ) -> PlacementPlan {
        let mut plan = PlacementPlan::default();

        let desired = self.primary_dir.join(primary_name);
        self.push(&mut plan, principal, desired, PlacementAction::Primary);

        for extra in extras {
            let desired = self.extras_dir.join(extra.file_name());
            self.push(&mut plan, extra, desired, PlacementAction::Extra);
        }

        plan
    }

    fn push(
        &mut self,
        plan: &mut PlacementPlan,
        file: &CandidateFile,
        desired: PathBuf,
        action: PlacementAction,
    ) {
        match self.resolve(desired) {
            Ok(destination) => {
                debug!("Planned {} {:?} -> {:?}", action, file.path, destination);
                plan.entries.push(PlacementEntry {
                    source: file.path.clone(),
                    destination,
                    action,
                });
            }
            Err(e) => plan.failures.push((file.path.clone(), e)),
        }
    }

    /// Find the first free name for `desired` and claim it.
    pub fn resolve(&mut self, desired: PathBuf) -> Result<PathBuf> {
        if !self.is_taken(&desired) {
            self.claimed.insert(desired.clone());
            return Ok(desired);
        }

        for n in 1..=self.max_attempts {
            let candidate = with_suffix(&desired, n);
            if !self.is_taken(&candidate) {
                self.claimed.insert(candidate.clone());
                return Ok(candidate);
            }
        }

        Err(Error::PlacementCollisionExhausted {
            path: desired,
            attempts: self.max_attempts,
        })
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.claimed.contains(path) || path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    #[test]
    fn test_free_destination_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut planner = PlacementPlanner::new(dir.path(), dir.path().join("extras"));

        let dest = planner.resolve(dir.path().join("X.mkv")).unwrap();
        assert_eq!(dest, dir.path().join("X.mkv"));
    }

    #[test]
    fn test_existing_destination_gets_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("X.mkv"), b"").unwrap();

        let mut planner = PlacementPlanner::new(dir.path(), dir.path());
        assert_eq!(
            planner.resolve(dir.path().join("X.mkv")).unwrap(),
            dir.path().join("X (1).mkv")
        );
    }

    #[test]
    fn test_suffix_increments_past_existing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("X.mkv"), b"").unwrap();
        fs::write(dir.path().join("X (1).mkv"), b"").unwrap();

        let mut planner = PlacementPlanner::new(dir.path(), dir.path());
        assert_eq!(
            planner.resolve(dir.path().join("X.mkv")).unwrap(),
            dir.path().join("X (2).mkv")
        );
    }

    #[test]
    fn test_claims_are_unique_within_a_plan() {
        let dir = tempfile::tempdir().unwrap();
        let extras_dir = dir.path().join("Behind the Scenes");
        let mut planner = PlacementPlanner::new(dir.path(), &extras_dir);

        let principal = CandidateFile::new("/rips/disc1/title_t00.mkv", 900);
        let a = CandidateFile::new("/rips/disc1/title_t05.mkv", 10);
        let b = CandidateFile::new("/rips/disc2/title_t05.mkv", 12);

        let plan = planner.plan(&principal, "Heat (1995).mkv", &[&a, &b]);

        assert!(plan.failures.is_empty());
        let destinations: Vec<PathBuf> =
            plan.entries.iter().map(|e| e.destination.clone()).collect();
        assert_eq!(
            destinations,
            vec![
                dir.path().join("Heat (1995).mkv"),
                extras_dir.join("title_t05.mkv"),
                extras_dir.join("title_t05 (1).mkv"),
            ]
        );
        assert_eq!(plan.entries[0].action, PlacementAction::Primary);
        assert_eq!(plan.entries[1].action, PlacementAction::Extra);
        assert_eq!(plan.entries[2].source, b.path);
    }

    #[test]
    fn test_exhaustion_fails_only_that_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("busy.mkv"), b"").unwrap();
        fs::write(dir.path().join("busy (1).mkv"), b"").unwrap();
        fs::write(dir.path().join("busy (2).mkv"), b"").unwrap();

        let mut planner = PlacementPlanner::new(dir.path(), dir.path()).with_max_attempts(2);

        let principal = CandidateFile::new("/rips/title_t00.mkv", 900);
        let busy = CandidateFile::new("/rips/busy.mkv", 10);
        let plan = planner.plan(&principal, "Main.mkv", &[&busy]);

        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].destination, dir.path().join("Main.mkv"));

        assert_eq!(plan.failures.len(), 1);
        assert_eq!(plan.failures[0].0, busy.path);
        assert_matches!(
            plan.failures[0].1,
            Error::PlacementCollisionExhausted { attempts: 2, .. }
        );
    }
}
