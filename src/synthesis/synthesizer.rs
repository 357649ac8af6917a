use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;
use tracing::{info, warn};

use crate::experience::{RollupMap, format_experience};
use crate::retry::{RetryPolicy, attempt};
use crate::rounds::{RoundStore, StoreError};
use crate::synthesis::{OperatorCatalog, SynthesisRequest};

/// Failure surfaced by the generation collaborator: either the call itself
/// failed or its response could not be parsed into a usable round. Both are
/// transient from the synthesizer's point of view and get retried.
#[derive(Debug, Error, Diagnostic)]
pub enum GeneratorError {
    #[error("generation call failed: {message}")]
    #[diagnostic(code(graphtune::synthesis::generator_call))]
    Call { message: String },

    #[error("generation response is malformed: {detail}")]
    #[diagnostic(
        code(graphtune::synthesis::generator_response),
        help("The response must carry modification, graph, and prompt sections.")
    )]
    MalformedResponse { detail: String },
}

/// The structured payload extracted from a generation response: a
/// description of the attempted change plus the new round's two sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRound {
    pub modification: String,
    pub graph: String,
    pub prompt: String,
}

/// Generation collaborator seam: asks a language model (or anything else)
/// to produce a structured graph edit for a composite request.
#[async_trait]
pub trait GraphGenerator: Send + Sync {
    async fn generate(&self, request: &SynthesisRequest) -> Result<GeneratedRound, GeneratorError>;
}

/// Evaluation collaborator seam: scores a graph source against a dataset
/// subset. Retries and partial failures inside evaluation are the
/// collaborator's business.
#[async_trait]
pub trait GraphEvaluator: Send + Sync {
    async fn evaluate(&self, graph_source: &str, dataset: &str) -> Result<f64, EvaluatorError>;
}

/// Opaque evaluation failure reported by the collaborator.
#[derive(Debug, Error, Diagnostic)]
#[error("evaluation failed: {message}")]
#[diagnostic(code(graphtune::synthesis::evaluator))]
pub struct EvaluatorError {
    pub message: String,
}

/// Lifecycle of an optimization-attempt round.
///
/// `PendingSynthesis` is entered when a parent is selected for expansion,
/// `Synthesized` once the new round is committed, `Evaluated` (terminal)
/// once the score is recorded. A round stuck in `PendingSynthesis` after
/// retry exhaustion is abandoned; re-driving it is the external driver's
/// call, never an automatic restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    PendingSynthesis,
    Synthesized,
    Evaluated,
}

/// What one driven step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The new round was committed and awaits evaluation.
    Synthesized { round: u32 },
    /// The generation collaborator never produced a usable round; the
    /// attempt is skipped, not crashed.
    Abandoned { parent: u32 },
}

/// Drives one optimization step end to end: compose the request, submit it
/// with bounded retries, commit the accepted response as the next round.
#[derive(Debug, Clone)]
pub struct RoundSynthesizer {
    store: RoundStore,
    retry: RetryPolicy,
    dataset: String,
}

impl RoundSynthesizer {
    pub fn new(store: RoundStore, dataset: impl Into<String>) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
            dataset: dataset.into(),
        }
    }

    /// Override the submit retry policy (bound and fixed delay).
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &RoundStore {
        &self.store
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Build the composite synthesis request for expanding `parent`.
    ///
    /// `parent_score` is the driver's known score for the parent; the
    /// rollup's own score wins when present (they agree by construction).
    /// Pure string assembly, no I/O.
    #[must_use]
    pub fn synthesize(
        &self,
        parent: u32,
        rollups: &RollupMap,
        parent_score: f64,
        parent_graph: &str,
        parent_prompt: &str,
        operator_description: &str,
        log_excerpt: &str,
    ) -> SynthesisRequest {
        let experience = format_experience(rollups, parent);
        let score = rollups
            .get(&parent)
            .and_then(|rollup| rollup.score)
            .unwrap_or(parent_score);
        SynthesisRequest::compose(
            parent,
            &experience,
            score,
            parent_graph,
            parent_prompt,
            operator_description,
            log_excerpt,
        )
    }

    /// Dispatch the request to the generation collaborator, retrying up to
    /// the policy bound with its fixed delay.
    ///
    /// Exhaustion returns `None` (the skip-and-move-on sentinel) so one
    /// unproducible round cannot abort a long optimization sweep.
    pub async fn submit(
        &self,
        generator: &dyn GraphGenerator,
        request: &SynthesisRequest,
    ) -> Option<GeneratedRound> {
        match attempt(self.retry, |_| generator.generate(request)).await {
            Ok(response) => Some(response),
            Err(exhausted) => {
                warn!(
                    parent = request.parent_round,
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "generation retries exhausted, abandoning this synthesis attempt"
                );
                None
            }
        }
    }

    /// Persist an accepted response as round `round`: graph and prompt
    /// sources verbatim, plus the experience stub linking back to `parent`
    /// with the given branch-time score.
    pub fn commit(
        &self,
        round: u32,
        parent: u32,
        score_before: f64,
        response: &GeneratedRound,
    ) -> Result<RoundPhase, StoreError> {
        self.store.create_round_directory(round)?;
        self.store
            .write_round(round, &response.graph, &response.prompt)?;
        self.store
            .write_experience_stub(round, parent, &response.modification, score_before)?;
        info!(
            round,
            parent,
            dataset = %self.dataset,
            modification = %response.modification,
            "round committed"
        );
        Ok(RoundPhase::Synthesized)
    }

    /// Run one full step: read the parent's sources, synthesize, submit,
    /// and commit the response as `new_round`.
    ///
    /// Filesystem failures propagate; generation failure after retries is
    /// reported as [`StepOutcome::Abandoned`].
    pub async fn run_step(
        &self,
        generator: &dyn GraphGenerator,
        catalog: &OperatorCatalog,
        parent: u32,
        rollups: &RollupMap,
        parent_score: f64,
        log_excerpt: &str,
        new_round: u32,
    ) -> Result<StepOutcome, StoreError> {
        let (parent_graph, parent_prompt) = self.store.read_round(parent)?;
        let request = self.synthesize(
            parent,
            rollups,
            parent_score,
            &parent_graph,
            &parent_prompt,
            &catalog.describe_all(),
            log_excerpt,
        );

        let Some(response) = self.submit(generator, &request).await else {
            return Ok(StepOutcome::Abandoned { parent });
        };

        let score_before = rollups
            .get(&parent)
            .and_then(|rollup| rollup.score)
            .unwrap_or(parent_score);
        self.commit(new_round, parent, score_before, &response)?;
        Ok(StepOutcome::Synthesized { round: new_round })
    }

    /// Record the external evaluator's score for a synthesized round,
    /// finalizing its experience record. Terminal transition.
    pub fn record_evaluation(&self, round: u32, score: f64) -> Result<RoundPhase, StoreError> {
        self.store.finalize_experience(round, score)?;
        info!(round, score, "round evaluated");
        Ok(RoundPhase::Evaluated)
    }
}
