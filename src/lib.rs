//! # Graphtune: Round-based Optimizer Core for Graph Agent Workflows
//!
//! Graphtune implements the optimization feedback loop of an automated
//! graph-optimization harness: evaluate a candidate workflow graph, record
//! per-round success/failure experience keyed by the parent graph version,
//! synthesize that experience into a report for an LLM, and persist the
//! proposed graph/prompt pair as the next round.
//!
//! ## Core Concepts
//!
//! - **Round**: one numbered, immutable snapshot of a candidate graph+prompt
//! - **Experience**: the record of one attempted modification from a parent
//!   round, and whether it improved the score
//! - **Rollup**: the aggregated, per-parent view over all attempted children
//! - **Synthesis**: one optimization step: build the request, ask the
//!   generation collaborator, commit the new round
//!
//! ## Quick Start
//!
//! ### Recording and aggregating experience
//!
//! ```rust,no_run
//! use graphtune::experience::ExperienceAggregator;
//! use graphtune::rounds::RoundStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = RoundStore::new("runs/gsm8k");
//!
//! // Round 3 was derived from round 0, which scored 50.0 at branch time.
//! store.create_round_directory(3)?;
//! store.write_round(3, "graph source", "prompt source")?;
//! store.write_experience_stub(3, 0, "replaced the review operator", 50.0)?;
//!
//! // ... the external evaluator scores round 3 ...
//! store.finalize_experience(3, 61.5)?;
//!
//! // Rebuild the per-parent rollup from every round on disk.
//! let rollups = ExperienceAggregator::new("runs/gsm8k").aggregate()?;
//! assert!(rollups[&0].successes.contains_key(&3));
//! # Ok(())
//! # }
//! ```
//!
//! ### Driving one optimization step
//!
//! The generation collaborator sits behind [`synthesis::GraphGenerator`];
//! [`synthesis::RoundSynthesizer::submit`] retries a bounded number of times
//! and returns `None` rather than erroring when the collaborator cannot
//! produce a usable round, so one bad round never aborts a long optimization
//! sweep.
//!
//! ## Module Guide
//!
//! - [`rounds`] - Directory-per-round persistence of graph/prompt/experience
//! - [`experience`] - Experience records, per-parent rollups, aggregation,
//!   and report formatting
//! - [`graphs`] - Typed graph definitions and the round-indexed registry
//! - [`synthesis`] - Operator catalog, request assembly, and the round
//!   synthesizer with its generator/evaluator seams
//! - [`retry`] - Bounded fixed-delay retry combinator
//! - [`config`] - Optimizer configuration with environment resolution
//! - [`telemetry`] - Tracing/diagnostics bootstrap

pub mod config;
pub mod experience;
pub mod graphs;
pub mod retry;
pub mod rounds;
pub mod synthesis;
pub mod telemetry;
