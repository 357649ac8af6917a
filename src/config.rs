//! Optimizer configuration with environment resolution.
//!
//! Resolution order, later wins: compiled defaults, `GRAPHTUNE_*`
//! environment variables (a `.env` file is honored), then explicit `with_*`
//! overrides in code.

use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::rounds::RoundStore;

/// Everything the optimization loop needs to know about its surroundings.
#[derive(Debug, Clone)]
pub struct OptimizerConfig {
    /// Root directory holding the `round_<N>` directories.
    pub rounds_root: PathBuf,
    /// File name of each round's graph source.
    pub graph_file: String,
    /// File name of each round's prompt source.
    pub prompt_file: String,
    /// Dataset identifier handed to the evaluation collaborator.
    pub dataset: String,
    /// Submit retry policy (attempt bound, fixed delay).
    pub retry: RetryPolicy,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            rounds_root: PathBuf::from("rounds"),
            graph_file: "graph.py".to_string(),
            prompt_file: "prompt.py".to_string(),
            dataset: "default".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl OptimizerConfig {
    /// Defaults overlaid with `GRAPHTUNE_*` environment variables:
    /// `GRAPHTUNE_ROUNDS_ROOT`, `GRAPHTUNE_GRAPH_FILE`,
    /// `GRAPHTUNE_PROMPT_FILE`, `GRAPHTUNE_DATASET`,
    /// `GRAPHTUNE_MAX_RETRIES`, `GRAPHTUNE_RETRY_DELAY_SECS`.
    ///
    /// Unparseable numeric variables fall back to the default rather than
    /// failing startup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let mut config = Self::default();
        if let Ok(root) = std::env::var("GRAPHTUNE_ROUNDS_ROOT") {
            config.rounds_root = PathBuf::from(root);
        }
        if let Ok(name) = std::env::var("GRAPHTUNE_GRAPH_FILE") {
            config.graph_file = name;
        }
        if let Ok(name) = std::env::var("GRAPHTUNE_PROMPT_FILE") {
            config.prompt_file = name;
        }
        if let Ok(dataset) = std::env::var("GRAPHTUNE_DATASET") {
            config.dataset = dataset;
        }
        let max_attempts = env_parse("GRAPHTUNE_MAX_RETRIES", config.retry.max_attempts);
        let delay_secs = env_parse("GRAPHTUNE_RETRY_DELAY_SECS", config.retry.delay.as_secs());
        config.retry = RetryPolicy::new(max_attempts, Duration::from_secs(delay_secs));
        config
    }

    #[must_use]
    pub fn with_rounds_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.rounds_root = root.into();
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// A round store configured per this config.
    #[must_use]
    pub fn store(&self) -> RoundStore {
        RoundStore::new(&self.rounds_root)
            .with_graph_file(&self.graph_file)
            .with_prompt_file(&self.prompt_file)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_external_contract() {
        let config = OptimizerConfig::default();
        assert_eq!(config.graph_file, "graph.py");
        assert_eq!(config.prompt_file, "prompt.py");
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.delay, Duration::from_secs(5));
    }

    #[test]
    fn builder_overrides_apply() {
        let config = OptimizerConfig::default()
            .with_rounds_root("runs/math")
            .with_dataset("gsm8k")
            .with_retry(RetryPolicy::immediate(2));
        assert_eq!(config.rounds_root, PathBuf::from("runs/math"));
        assert_eq!(config.dataset, "gsm8k");
        assert_eq!(config.retry.max_attempts, 2);
    }
}
