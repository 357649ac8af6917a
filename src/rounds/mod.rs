//! Directory-per-round persistence for the optimization loop.
//!
//! Each round `N` owns one directory (`round_<N>/`) under a rounds-root,
//! holding the round's graph source, prompt source, and, for rounds derived
//! from a parent, an `experience.json` record. Rounds are immutable once
//! written: the only permitted mutation is the one-time finalization of an
//! experience stub after evaluation.

mod store;

pub use store::{EXPERIENCE_FILE, RoundStore, StoreError};

/// Directory name for round `n` under a rounds-root.
#[must_use]
pub fn round_dir_name(round: u32) -> String {
    format!("round_{round}")
}

/// Parse a `round_<N>` directory name back into its round number.
///
/// Returns `None` for anything that does not match the naming convention,
/// which is how the aggregator filters unrelated directories out of a scan.
#[must_use]
pub fn parse_round_dir_name(name: &str) -> Option<u32> {
    name.strip_prefix("round_")?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_dir_names_round_trip() {
        assert_eq!(round_dir_name(0), "round_0");
        assert_eq!(parse_round_dir_name("round_0"), Some(0));
        assert_eq!(parse_round_dir_name("round_17"), Some(17));
        assert_eq!(parse_round_dir_name("round_"), None);
        assert_eq!(parse_round_dir_name("template"), None);
        assert_eq!(parse_round_dir_name("round_x"), None);
    }
}
