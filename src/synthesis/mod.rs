//! One optimization step, end to end.
//!
//! The synthesizer combines the formatted experience report, the parent
//! round's score and sources, and the operator catalog into a single
//! composite request; dispatches it to the generation collaborator behind
//! [`GraphGenerator`] with bounded retries; and commits the accepted
//! response as a new round plus its experience stub.

mod operators;
mod request;
mod synthesizer;

pub use operators::{CatalogError, OperatorCatalog, OperatorSpec};
pub use request::SynthesisRequest;
pub use synthesizer::{
    EvaluatorError, GeneratedRound, GeneratorError, GraphEvaluator, GraphGenerator, RoundPhase,
    RoundSynthesizer, StepOutcome,
};
