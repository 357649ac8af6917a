use std::collections::BTreeMap;
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or querying the operator catalog.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("cannot read operator catalog {path}: {source}")]
    #[diagnostic(
        code(graphtune::synthesis::catalog_io),
        help("The catalog is a JSON file mapping operator name to {{description, interface}}.")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The catalog file is not valid JSON of the expected shape.
    #[error("malformed operator catalog: {source}")]
    #[diagnostic(code(graphtune::synthesis::catalog_parse))]
    Parse {
        #[from]
        source: serde_json::Error,
    },

    /// A requested operator is not in the catalog.
    #[error("unknown operator '{name}'")]
    #[diagnostic(
        code(graphtune::synthesis::unknown_operator),
        help("Operator names are case-sensitive and must match the catalog file.")
    )]
    Unknown { name: String },
}

/// Catalog entry: what an operator does and how it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSpec {
    pub description: String,
    pub interface: String,
}

/// The enumerated set of reusable building blocks the generation
/// collaborator may reference when proposing a new graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperatorCatalog {
    entries: BTreeMap<String, OperatorSpec>,
}

impl OperatorCatalog {
    /// Load the catalog from its JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let entries: BTreeMap<String, OperatorSpec> = serde_json::from_str(text)?;
        Ok(Self { entries })
    }

    /// Build a catalog in memory (tests, seeded templates).
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, OperatorSpec)>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OperatorSpec> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the human-readable description block for the given operators,
    /// one enumerated line each, in the order requested.
    ///
    /// Fails naming the first unknown operator.
    pub fn describe<S: AsRef<str>>(&self, names: &[S]) -> Result<String, CatalogError> {
        let mut out = String::new();
        for (id, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let spec = self.get(name).ok_or_else(|| CatalogError::Unknown {
                name: name.to_string(),
            })?;
            let _ = writeln!(
                out,
                "{}. {}: {}, with interface {}.",
                id + 1,
                name,
                spec.description,
                spec.interface
            );
        }
        Ok(out)
    }

    /// Render every catalog operator, in name order.
    pub fn describe_all(&self) -> String {
        let names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        // Infallible: every name comes from the map itself.
        self.describe(&names).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> OperatorCatalog {
        OperatorCatalog::from_json(
            r#"{
                "Custom": {
                    "description": "run a bespoke prompt",
                    "interface": "custom(input: str, instruction: str) -> str"
                },
                "ScEnsemble": {
                    "description": "self-consistency vote over candidate solutions",
                    "interface": "sc_ensemble(solutions: list[str]) -> str"
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn describe_enumerates_in_requested_order() {
        let text = catalog().describe(&["ScEnsemble", "Custom"]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("1. ScEnsemble: self-consistency vote"));
        assert!(lines[1].starts_with("2. Custom: run a bespoke prompt"));
        assert!(lines[1].ends_with("with interface custom(input: str, instruction: str) -> str."));
    }

    #[test]
    fn describe_fails_on_unknown_operator() {
        let err = catalog().describe(&["Custom", "Review"]).unwrap_err();
        assert!(matches!(err, CatalogError::Unknown { name } if name == "Review"));
    }
}
