use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::experience::ExperienceRecord;

/// Aggregated view over every parent round referenced in a store, keyed by
/// parent round number. `BTreeMap` keeps parent iteration (and the persisted
/// snapshot) in ascending round order.
pub type RollupMap = BTreeMap<u32, ExperienceRollup>;

/// One finalized attempt as it appears inside a rollup: what changed, and
/// the score the child achieved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub modification: String,
    pub score: f64,
}

/// Per-parent rollup of every child round's outcome.
///
/// Derived data, rebuilt from scratch on each aggregation pass. Each
/// finalized child lands in exactly one of `successes`/`failures` according
/// to its `succeed` flag; both maps are keyed by the child's own round
/// number, ascending.
///
/// Serde names (`success`/`failure`) match the persisted
/// `processed_experience.json` snapshot shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExperienceRollup {
    /// The parent's score, taken from the first (lowest-numbered) child
    /// record seen for that parent. All children of one parent share the
    /// same `before` score by construction.
    pub score: Option<f64>,
    #[serde(rename = "success")]
    pub successes: BTreeMap<u32, AttemptSummary>,
    #[serde(rename = "failure")]
    pub failures: BTreeMap<u32, AttemptSummary>,
}

impl ExperienceRollup {
    /// Fold one finalized child record into the rollup.
    ///
    /// Records that are not finalized yet carry no outcome and are ignored;
    /// the caller (the aggregator) filters those out up front.
    pub fn absorb(&mut self, child_round: u32, record: &ExperienceRecord) {
        let (Some(succeeded), Some(score_after)) = (record.succeeded, record.score_after) else {
            return;
        };
        if self.score.is_none() {
            self.score = Some(record.score_before);
        }
        let summary = AttemptSummary {
            modification: record.modification.clone(),
            score: score_after,
        };
        if succeeded {
            self.successes.insert(child_round, summary);
        } else {
            self.failures.insert(child_round, summary);
        }
    }

    /// Total number of attempts folded into this rollup.
    #[must_use]
    pub fn attempt_count(&self) -> usize {
        self.successes.len() + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalized(father: u32, modification: &str, before: f64, after: f64) -> ExperienceRecord {
        let mut record = ExperienceRecord::stub(father, modification, before);
        record.finalize(after);
        record
    }

    #[test]
    fn absorb_routes_by_outcome_and_fixes_score_once() {
        let mut rollup = ExperienceRollup::default();
        rollup.absorb(1, &finalized(0, "a", 50.0, 40.0));
        rollup.absorb(2, &finalized(0, "b", 50.0, 60.0));

        assert_eq!(rollup.score, Some(50.0));
        assert_eq!(rollup.failures.keys().copied().collect::<Vec<_>>(), [1]);
        assert_eq!(rollup.successes.keys().copied().collect::<Vec<_>>(), [2]);
        assert_eq!(rollup.attempt_count(), 2);
    }

    #[test]
    fn absorb_ignores_pending_records() {
        let mut rollup = ExperienceRollup::default();
        rollup.absorb(5, &ExperienceRecord::stub(0, "pending", 50.0));
        assert_eq!(rollup.score, None);
        assert_eq!(rollup.attempt_count(), 0);
    }
}
