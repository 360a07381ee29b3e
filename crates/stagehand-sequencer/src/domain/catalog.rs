//! The dialogue catalog.

use std::collections::BTreeMap;

use serde::Deserialize;
use stagehand_core::error::DomainError;

use super::entry::DialogueEntry;

const BUILTIN_CATALOG: &str = include_str!("builtin_catalog.yaml");

/// Immutable map from sequence name to its ordered entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    sequences: BTreeMap<String, Vec<DialogueEntry>>,
}

impl Catalog {
    /// Parses a YAML document mapping sequence names to entry lists.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCatalog` if the document is malformed or
    /// an entry carries an unusable duration.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        serde_yaml::from_str(source).map_err(|e| DomainError::InvalidCatalog(e.to_string()))
    }

    /// The catalog bundled with the crate (`Tutorial`, `Intro`, `Victory`).
    ///
    /// # Panics
    ///
    /// Panics if the bundled document is invalid, which the crate's tests
    /// rule out.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_yaml(BUILTIN_CATALOG).expect("bundled dialogue catalog is valid")
    }

    /// Borrows the entries of the named sequence.
    #[must_use]
    pub fn sequence(&self, key: &str) -> Option<&[DialogueEntry]> {
        self.sequences.get(key).map(Vec::as_slice)
    }

    /// Sequence names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }

    /// Number of sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the catalog holds no sequences.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}
