//! Terms and attributions.

use crate::concept::ConceptId;
use serde::{Deserialize, Serialize};

/// Identifier of a term, unique within one term collection.
pub type TermId = String;

/// A surface-form expression made of one or more tokens.
///
/// Tokenization happens upstream; a `Term` only carries the resulting
/// tokens in their original order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// Unique term identifier.
    pub id: TermId,
    /// Tokens in surface order.
    pub tokens: Vec<String>,
}

impl Term {
    /// Create a term from already tokenized input.
    #[must_use]
    pub fn new<I, S>(id: impl Into<TermId>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a term by splitting a surface string on whitespace.
    ///
    /// ```
    /// use contes_core::Term;
    ///
    /// let t = Term::from_surface("t1", "  lactic   acid bacteria ");
    /// assert_eq!(t.tokens, vec!["lactic", "acid", "bacteria"]);
    /// ```
    #[must_use]
    pub fn from_surface(id: impl Into<TermId>, surface: &str) -> Self {
        Self::new(id, surface.split_whitespace())
    }

    /// The tokens joined by single spaces.
    #[must_use]
    pub fn surface(&self) -> String {
        self.tokens.join(" ")
    }

    /// True when the term carries no token at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A labeled (term, concept) training example.
///
/// A term may appear in several attributions when it is multi-labeled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribution {
    /// Term being labeled.
    pub term_id: TermId,
    /// Gold concept.
    pub concept_id: ConceptId,
}

impl Attribution {
    /// Create an attribution.
    #[must_use]
    pub fn new(term_id: impl Into<TermId>, concept_id: impl Into<ConceptId>) -> Self {
        Self {
            term_id: term_id.into(),
            concept_id: concept_id.into(),
        }
    }
}
