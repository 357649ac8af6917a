use std::fmt::Write;

use crate::experience::RollupMap;

/// Fixed closing caution appended to every non-empty experience report.
const CLOSING_CAUTION: &str = "Note: Take into account past failures and avoid repeating the same mistakes, as these failures indicate that these approaches are ineffective. You must fundamentally change your way of thinking, rather than simply rephrasing prompts or making superficial syntactic edits to the graph.";

/// Render one parent's rollup as the prose block for a synthesis prompt.
///
/// Pure and deterministic: identical input yields byte-identical output.
/// Sections appear in fixed order: header with the parent score, one
/// prohibition line per failed attempt (with its score), one prohibition
/// line per successful attempt (score omitted: a prior success must not be
/// re-proposed as if novel, but its score adds nothing), then the closing
/// caution. Entries are ordered by child round number ascending, which the
/// rollup's `BTreeMap`s guarantee.
///
/// If there is no rollup for `parent`, returns a one-line "no experience
/// data" sentence naming the round.
#[must_use]
pub fn format_experience(rollups: &RollupMap, parent: u32) -> String {
    let Some(rollup) = rollups.get(&parent) else {
        return format!("No experience data found for round {parent}.");
    };

    let mut report = String::new();
    match rollup.score {
        Some(score) => {
            let _ = writeln!(report, "Original Score: {score}");
        }
        None => {
            let _ = writeln!(report, "Original Score: unknown");
        }
    }
    report.push_str("These are some conclusions drawn from experience:\n\n");

    for attempt in rollup.failures.values() {
        let _ = writeln!(
            report,
            "-Absolutely prohibit {} (Score: {})",
            attempt.modification, attempt.score
        );
    }
    for attempt in rollup.successes.values() {
        let _ = writeln!(report, "-Absolutely prohibit {}", attempt.modification);
    }

    report.push('\n');
    report.push_str(CLOSING_CAUTION);
    report
}
