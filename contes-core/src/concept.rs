//! Ontology concepts.
//!
//! A [`Concept`] is a node of the domain ontology. Relations to other
//! concepts are stored as id sets rather than object links, so an ontology
//! with multiple inheritance (diamonds) is just a table of records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of a concept, unique within one ontology.
pub type ConceptId = String;

/// A node in the domain ontology representing a normalized category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier (e.g. `OBT:000001`).
    pub id: ConceptId,
    /// Human readable label.
    #[serde(default)]
    pub label: String,
    /// Direct parents (`is_a` targets).
    #[serde(default)]
    pub parents: BTreeSet<ConceptId>,
    /// Direct children.
    #[serde(default)]
    pub children: BTreeSet<ConceptId>,
    /// Alternative surface forms.
    #[serde(default)]
    pub synonyms: BTreeSet<String>,
}

impl Concept {
    /// Create a concept with no relations.
    #[must_use]
    pub fn new(id: impl Into<ConceptId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            parents: BTreeSet::new(),
            children: BTreeSet::new(),
            synonyms: BTreeSet::new(),
        }
    }

    /// Add a direct parent.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<ConceptId>) -> Self {
        self.parents.insert(parent.into());
        self
    }

    /// Add a direct child.
    #[must_use]
    pub fn with_child(mut self, child: impl Into<ConceptId>) -> Self {
        self.children.insert(child.into());
        self
    }

    /// Add a synonym.
    #[must_use]
    pub fn with_synonym(mut self, synonym: impl Into<String>) -> Self {
        self.synonyms.insert(synonym.into());
        self
    }

    /// True when the concept has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// True when the concept has no child.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
