use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

use crate::experience::ExperienceRecord;
use crate::rounds::round_dir_name;

/// File name of the experience record inside a round directory.
pub const EXPERIENCE_FILE: &str = "experience.json";

/// Errors from round-store operations.
///
/// Missing files are distinguished from other I/O failures so callers can
/// decide whether to skip a round or abort: a round without a graph file is
/// a caller-level decision, a permission error is not.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    /// A required round file does not exist.
    #[error("round file not found: {path}")]
    #[diagnostic(
        code(graphtune::rounds::not_found),
        help("Check that the round directory was committed before reading it.")
    )]
    NotFound { path: PathBuf },

    /// An experience stub was expected but the round has none.
    #[error("no experience record to finalize for round {round}")]
    #[diagnostic(
        code(graphtune::rounds::missing_stub),
        help("write_experience_stub must run at commit time, before finalization.")
    )]
    MissingStub { round: u32 },

    /// Underlying filesystem failure (read, write, or directory creation).
    #[error("I/O failure at {path}: {source}")]
    #[diagnostic(code(graphtune::rounds::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization of an experience record failed.
    #[error("malformed experience record: {source}")]
    #[diagnostic(
        code(graphtune::rounds::serde),
        help("The experience.json shape is {{\"father node\", \"modification\", \"before\", \"after\", \"succeed\"}}.")
    )]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Filesystem-backed storage of one directory per round.
///
/// Graph and prompt file names default to the external contract
/// (`graph.py` / `prompt.py`); rounds carrying structured graph specs use
/// [`RoundStore::with_graph_file`] to point at `graph.json` instead. The
/// store itself treats both as verbatim text.
///
/// No locking: at most one round is synthesized or finalized at a time per
/// rounds-root.
#[derive(Debug, Clone)]
pub struct RoundStore {
    root: PathBuf,
    graph_file: String,
    prompt_file: String,
}

impl RoundStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            graph_file: "graph.py".to_string(),
            prompt_file: "prompt.py".to_string(),
        }
    }

    /// Override the graph source file name (e.g. `graph.json`).
    #[must_use]
    pub fn with_graph_file(mut self, name: impl Into<String>) -> Self {
        self.graph_file = name.into();
        self
    }

    /// Override the prompt source file name.
    #[must_use]
    pub fn with_prompt_file(mut self, name: impl Into<String>) -> Self {
        self.prompt_file = name.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of round `n`'s directory (the directory may not exist yet).
    #[must_use]
    pub fn round_dir(&self, round: u32) -> PathBuf {
        self.root.join(round_dir_name(round))
    }

    /// Idempotently ensure round `n`'s directory exists.
    pub fn create_round_directory(&self, round: u32) -> Result<PathBuf> {
        let dir = self.round_dir(round);
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Write the round's graph and prompt sources verbatim, overwriting any
    /// previous content.
    pub fn write_round(&self, round: u32, graph_source: &str, prompt_source: &str) -> Result<()> {
        let dir = self.round_dir(round);
        write_text(&dir.join(&self.graph_file), graph_source)?;
        write_text(&dir.join(&self.prompt_file), prompt_source)
    }

    /// Read back the round's `(graph_source, prompt_source)` pair.
    ///
    /// Fails with [`StoreError::NotFound`] if either file is missing.
    pub fn read_round(&self, round: u32) -> Result<(String, String)> {
        let dir = self.round_dir(round);
        let graph = read_text(&dir.join(&self.graph_file))?;
        let prompt = read_text(&dir.join(&self.prompt_file))?;
        Ok((graph, prompt))
    }

    /// Write a fresh experience record linking `round` to its parent, with
    /// `after`/`succeed` unset until evaluation completes.
    pub fn write_experience_stub(
        &self,
        round: u32,
        father_round: u32,
        modification: &str,
        score_before: f64,
    ) -> Result<()> {
        let record = ExperienceRecord::stub(father_round, modification, score_before);
        self.write_experience(round, &record)
    }

    /// Load the round's experience record.
    pub fn read_experience(&self, round: u32) -> Result<ExperienceRecord> {
        let path = self.round_dir(round).join(EXPERIENCE_FILE);
        let text = read_text(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Finalize the round's experience after evaluation: sets `after` and
    /// computes `succeed = score_after > before` (strict; ties fail).
    ///
    /// Idempotent for a repeated identical `score_after`. Fails with
    /// [`StoreError::MissingStub`] if the round has no record.
    pub fn finalize_experience(&self, round: u32, score_after: f64) -> Result<ExperienceRecord> {
        let mut record = match self.read_experience(round) {
            Ok(record) => record,
            Err(StoreError::NotFound { .. }) => return Err(StoreError::MissingStub { round }),
            Err(e) => return Err(e),
        };
        record.finalize(score_after);
        self.write_experience(round, &record)?;
        Ok(record)
    }

    fn write_experience(&self, round: u32, record: &ExperienceRecord) -> Result<()> {
        let path = self.round_dir(round).join(EXPERIENCE_FILE);
        let json = serde_json::to_string_pretty(record)?;
        write_text(&path, &json)
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound {
            path: path.to_path_buf(),
        },
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
