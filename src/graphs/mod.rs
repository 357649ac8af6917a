//! Typed graph definitions and the round-indexed registry.
//!
//! A candidate graph is data, not code: an ordered list of operator
//! invocations with explicit input/output wiring, deserialized from the
//! round's graph source and validated against the operator catalog. The
//! [`GraphRegistry`] maps round numbers to validated definitions through an
//! explicit load step; there is no runtime module resolution.

mod registry;
mod spec;

pub use registry::{GraphRegistry, RegistryError};
pub use spec::{GRAPH_INPUT_BINDING, GraphError, GraphSpec, OperatorInvocation};
