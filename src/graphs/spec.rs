use serde::{Deserialize, Serialize};

use miette::Diagnostic;
use thiserror::Error;

use crate::synthesis::OperatorCatalog;

/// Name every graph's initial input is bound to. Invocations may wire their
/// inputs either to this binding or to the output of an earlier step.
pub const GRAPH_INPUT_BINDING: &str = "problem";

/// Errors from parsing or validating a graph definition.
#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    /// The graph source is not a valid definition document.
    #[error("cannot parse graph definition: {source}")]
    #[diagnostic(
        code(graphtune::graphs::parse),
        help("Structured graph sources are JSON: {{\"name\", \"operators\": [{{\"operator\", \"inputs\", \"output\"}}]}}.")
    )]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// A step names an operator the catalog does not know.
    #[error("step {step} uses unknown operator '{operator}'")]
    #[diagnostic(
        code(graphtune::graphs::unknown_operator),
        help("Every invocation must name an operator present in the catalog.")
    )]
    UnknownOperator { step: usize, operator: String },

    /// A step consumes a binding that no earlier step (or the graph input)
    /// provides.
    #[error("step {step} input '{input}' is not bound by the graph input or any earlier step")]
    #[diagnostic(code(graphtune::graphs::unbound_input))]
    UnboundInput { step: usize, input: String },

    /// Two steps write the same output binding.
    #[error("output binding '{output}' is produced twice (second time at step {step})")]
    #[diagnostic(code(graphtune::graphs::duplicate_output))]
    DuplicateOutput { step: usize, output: String },

    /// A graph with no steps cannot produce anything.
    #[error("graph '{name}' has no operator invocations")]
    #[diagnostic(code(graphtune::graphs::empty))]
    Empty { name: String },
}

/// One step of a graph: which operator runs, what it reads, what it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorInvocation {
    pub operator: String,
    pub inputs: Vec<String>,
    pub output: String,
}

/// A candidate computation graph as a validated data structure.
///
/// Steps execute in declaration order; wiring is by named bindings. This is
/// the registry-facing replacement for loading a graph "class" out of a
/// round's source module at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSpec {
    pub name: String,
    pub operators: Vec<OperatorInvocation>,
}

impl GraphSpec {
    /// Parse a structured graph source (JSON) into a definition.
    ///
    /// Parsing alone does not make the graph usable; see
    /// [`GraphSpec::validate`].
    pub fn parse(source: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Type-check the graph against an operator catalog.
    ///
    /// Checks, in step order: every invocation names a known operator, every
    /// input resolves to the graph input or an earlier step's output, and no
    /// output binding is produced twice.
    pub fn validate(&self, catalog: &OperatorCatalog) -> Result<(), GraphError> {
        if self.operators.is_empty() {
            return Err(GraphError::Empty {
                name: self.name.clone(),
            });
        }

        let mut bound = vec![GRAPH_INPUT_BINDING.to_string()];
        for (step, invocation) in self.operators.iter().enumerate() {
            if !catalog.contains(&invocation.operator) {
                return Err(GraphError::UnknownOperator {
                    step,
                    operator: invocation.operator.clone(),
                });
            }
            for input in &invocation.inputs {
                if !bound.contains(input) {
                    return Err(GraphError::UnboundInput {
                        step,
                        input: input.clone(),
                    });
                }
            }
            if bound.contains(&invocation.output) {
                return Err(GraphError::DuplicateOutput {
                    step,
                    output: invocation.output.clone(),
                });
            }
            bound.push(invocation.output.clone());
        }
        Ok(())
    }

    /// The binding the final step writes, i.e. the graph's answer.
    #[must_use]
    pub fn final_output(&self) -> Option<&str> {
        self.operators.last().map(|i| i.output.as_str())
    }
}
