//! Experience records, per-parent rollups, aggregation, and report
//! formatting.
//!
//! An [`ExperienceRecord`] captures one attempted modification of a parent
//! round; the [`ExperienceAggregator`] rescans every round on disk and folds
//! the records into one [`ExperienceRollup`] per parent; the formatter turns
//! a rollup into the prose block that feeds the synthesis prompt.
//!
//! The rollup is a derived projection, never a source of truth: it is
//! rebuilt from scratch on every aggregation pass and safe to discard.

mod aggregator;
mod formatter;
mod record;
mod rollup;

pub use aggregator::{AggregateError, ExperienceAggregator, PROCESSED_EXPERIENCE_FILE};
pub use formatter::format_experience;
pub use record::ExperienceRecord;
pub use rollup::{AttemptSummary, ExperienceRollup, RollupMap};
