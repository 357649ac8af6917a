use std::collections::BTreeMap;

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::graphs::{GraphError, GraphSpec};
use crate::rounds::{RoundStore, StoreError};
use crate::synthesis::OperatorCatalog;

/// Errors from loading a round's graph into the registry.
#[derive(Debug, Error, Diagnostic)]
pub enum RegistryError {
    /// The round's graph source could not be read.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// The graph source was read but is not a valid definition.
    #[error("round {round} graph is invalid: {source}")]
    #[diagnostic(code(graphtune::graphs::invalid_round))]
    Graph {
        round: u32,
        #[source]
        source: GraphError,
    },
}

/// Explicit map from round number to a loaded, validated [`GraphSpec`].
///
/// Population is an explicit load step: [`GraphRegistry::load_round`] reads
/// the round's graph source from the store, parses and validates it, then
/// caches it. Nothing is resolved implicitly and a registry never outlives
/// the run that built it.
#[derive(Debug, Default)]
pub struct GraphRegistry {
    entries: BTreeMap<u32, GraphSpec>,
}

impl GraphRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load round `n`'s graph from the store, validate it against the
    /// catalog, and register it. Re-loading an already registered round
    /// replaces the entry (rounds are immutable on disk, so the result is
    /// identical in practice).
    pub fn load_round(
        &mut self,
        store: &RoundStore,
        catalog: &OperatorCatalog,
        round: u32,
    ) -> Result<&GraphSpec, RegistryError> {
        let (graph_source, _prompt) = store.read_round(round)?;
        let spec = GraphSpec::parse(&graph_source)
            .and_then(|spec| spec.validate(catalog).map(|()| spec))
            .map_err(|source| RegistryError::Graph { round, source })?;
        debug!(round, graph = %spec.name, steps = spec.operators.len(), "graph registered");
        self.entries.insert(round, spec);
        Ok(&self.entries[&round])
    }

    /// Register an already validated definition (used for seeded rounds).
    pub fn insert(&mut self, round: u32, spec: GraphSpec) {
        self.entries.insert(round, spec);
    }

    #[must_use]
    pub fn get(&self, round: u32) -> Option<&GraphSpec> {
        self.entries.get(&round)
    }

    #[must_use]
    pub fn contains(&self, round: u32) -> bool {
        self.entries.contains_key(&round)
    }

    /// Registered rounds, ascending.
    pub fn rounds(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }
}
