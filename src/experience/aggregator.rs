use std::fs;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, warn};

use crate::experience::{ExperienceRollup, RollupMap};
use crate::rounds::{RoundStore, StoreError, parse_round_dir_name};

/// File name of the rollup snapshot written next to the round directories.
pub const PROCESSED_EXPERIENCE_FILE: &str = "processed_experience.json";

/// Top-level aggregation failures.
///
/// Per-round corruption is deliberately NOT represented here: a malformed
/// `experience.json` is logged and its round skipped, so a single bad round
/// cannot abort the pass. Only whole-scan failures surface.
#[derive(Debug, Error, Diagnostic)]
pub enum AggregateError {
    /// The rounds-root itself could not be enumerated.
    #[error("cannot scan rounds root {path}: {source}")]
    #[diagnostic(
        code(graphtune::experience::scan),
        help("Check that the rounds root exists and is readable.")
    )]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing the `processed_experience.json` snapshot failed.
    #[error("cannot persist rollup snapshot {path}: {source}")]
    #[diagnostic(code(graphtune::experience::snapshot))]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rollup map could not be serialized (should not happen for valid
    /// records; kept separate from I/O for diagnosis).
    #[error("cannot serialize rollup snapshot: {source}")]
    #[diagnostic(code(graphtune::experience::serde))]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// Scans every round under a rounds-root and folds the experience records
/// into one [`ExperienceRollup`] per parent round.
///
/// Each call starts from an empty map; there is no incremental update and
/// no state carried between calls. The returned map is the authoritative
/// output; the `processed_experience.json` snapshot written alongside the
/// rounds is an inspection artifact only and is never read back.
#[derive(Debug, Clone)]
pub struct ExperienceAggregator {
    store: RoundStore,
}

impl ExperienceAggregator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            store: RoundStore::new(root),
        }
    }

    /// Aggregate over an existing store (shares its root and file naming).
    pub fn for_store(store: RoundStore) -> Self {
        Self { store }
    }

    /// Run one full aggregation pass and persist the snapshot.
    ///
    /// Rounds are visited in ascending round-number order regardless of
    /// filesystem enumeration order, so the "first record seen" rule for a
    /// parent's score is deterministic: the lowest-numbered child wins.
    pub fn aggregate(&self) -> Result<RollupMap, AggregateError> {
        let mut rollups = RollupMap::new();

        for round in self.scan_round_numbers()? {
            let record = match self.store.read_experience(round) {
                Ok(record) => record,
                // Seed rounds (round 0, manually planted baselines) have no
                // record; that is the normal case, not corruption.
                Err(StoreError::NotFound { .. }) => continue,
                Err(error) => {
                    warn!(round, %error, "skipping round with unreadable experience record");
                    continue;
                }
            };
            if !record.is_finalized() {
                debug!(round, "skipping pending experience record");
                continue;
            }
            rollups
                .entry(record.father_round)
                .or_insert_with(ExperienceRollup::default)
                .absorb(round, &record);
        }

        self.persist_snapshot(&rollups)?;
        Ok(rollups)
    }

    /// Enumerate `round_<N>` subdirectories, sorted ascending by `N`.
    fn scan_round_numbers(&self) -> Result<Vec<u32>, AggregateError> {
        let root = self.store.root();
        let entries = fs::read_dir(root).map_err(|source| AggregateError::Scan {
            path: root.to_path_buf(),
            source,
        })?;

        let mut rounds = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, root = %root.display(), "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(round) = entry.file_name().to_str().and_then(parse_round_dir_name) {
                rounds.push(round);
            }
        }
        rounds.sort_unstable();
        Ok(rounds)
    }

    fn persist_snapshot(&self, rollups: &RollupMap) -> Result<(), AggregateError> {
        let path = self.snapshot_path();
        let json = serde_json::to_string_pretty(rollups)?;
        fs::write(&path, json).map_err(|source| AggregateError::Snapshot { path, source })?;
        debug!(snapshot = %self.snapshot_path().display(), parents = rollups.len(), "rollup snapshot persisted");
        Ok(())
    }

    /// Path of the persisted snapshot.
    #[must_use]
    pub fn snapshot_path(&self) -> PathBuf {
        self.store.root().join(PROCESSED_EXPERIENCE_FILE)
    }
}
