use std::fmt::Write;

/// Fixed instructional preamble of every synthesis request.
const INSTRUCTION_TEMPLATE: &str = "You are optimizing an agent workflow graph. Propose exactly one modification to the referenced graph that is likely to improve its score on the dataset, then output the complete modified graph and its prompts. Reuse the listed operators; do not invent new ones. Respond with a `graph` section and a `prompt` section.";

/// The composite text handed to the generation collaborator, plus the
/// parent round it was derived from.
///
/// Composition is pure string assembly; the request carries everything the
/// collaborator needs and nothing is re-read from disk at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub parent_round: u32,
    pub content: String,
}

impl SynthesisRequest {
    /// Assemble the request from its parts, in fixed section order:
    /// instruction, experience report, parent score, parent graph source,
    /// parent prompt source, operator catalog text, evaluation-log excerpt.
    #[must_use]
    pub fn compose(
        parent_round: u32,
        experience: &str,
        score: f64,
        graph_source: &str,
        prompt_source: &str,
        operator_description: &str,
        log_excerpt: &str,
    ) -> Self {
        let mut content = String::new();
        content.push_str(INSTRUCTION_TEMPLATE);
        content.push_str("\n\n");
        let _ = write!(
            content,
            "<experience>\n{experience}\n</experience>\n\n\
             <score>{score}</score>\n\n\
             <graph round=\"{parent_round}\">\n{graph_source}\n</graph>\n\n\
             <prompt>\n{prompt_source}\n</prompt>\n\n\
             <operators>\n{operator_description}</operators>\n\n\
             <log>\n{log_excerpt}\n</log>"
        );
        Self {
            parent_round,
            content,
        }
    }
}
