use serde::{Deserialize, Serialize};

/// One attempted modification of a parent round.
///
/// Serde field names are the external on-disk contract for
/// `experience.json`; the Rust names are the readable ones.
///
/// # JSON shape
///
/// ```json
/// {
///   "father node": 0,
///   "modification": "replaced the review operator with ensemble voting",
///   "before": 50.0,
///   "after": 61.5,
///   "succeed": true
/// }
/// ```
///
/// `after` and `succeed` are `null` in a freshly committed stub and are set
/// exactly once, by [`ExperienceRecord::finalize`], after the round's graph
/// has been evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceRecord {
    #[serde(rename = "father node")]
    pub father_round: u32,
    pub modification: String,
    #[serde(rename = "before")]
    pub score_before: f64,
    #[serde(rename = "after")]
    pub score_after: Option<f64>,
    #[serde(rename = "succeed")]
    pub succeeded: Option<bool>,
}

impl ExperienceRecord {
    /// A stub record as written at commit time, before evaluation.
    pub fn stub(father_round: u32, modification: impl Into<String>, score_before: f64) -> Self {
        Self {
            father_round,
            modification: modification.into(),
            score_before,
            score_after: None,
            succeeded: None,
        }
    }

    /// Fill in the evaluation result. Success is a strict improvement:
    /// `score_after > score_before`, so a tie counts as a failure.
    pub fn finalize(&mut self, score_after: f64) {
        self.score_after = Some(score_after);
        self.succeeded = Some(score_after > self.score_before);
    }

    /// True once the record has been finalized.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.succeeded.is_some()
    }
}
