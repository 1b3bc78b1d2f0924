//! Error types for contes-core.

use thiserror::Error;

/// Result type for contes-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for contes-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The ontology source could not be turned into well-formed concept records.
    #[error("Ontology format error in {source_name}: {field}: {message}")]
    OntologyFormat {
        /// Path or name of the offending source.
        source_name: String,
        /// Field (or stanza) that failed validation.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// A record references a term or concept that does not exist.
    #[error("Dangling reference: {kind} '{id}' referenced from {referrer} does not exist")]
    DanglingReference {
        /// Kind of the missing entity ("concept", "term").
        kind: &'static str,
        /// The missing identifier.
        id: String,
        /// Who referenced it.
        referrer: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an ontology format error.
    #[must_use]
    pub fn ontology_format(
        source_name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::OntologyFormat {
            source_name: source_name.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a dangling concept reference error.
    #[must_use]
    pub fn dangling_concept(id: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::DanglingReference {
            kind: "concept",
            id: id.into(),
            referrer: referrer.into(),
        }
    }

    /// Create a dangling term reference error.
    #[must_use]
    pub fn dangling_term(id: impl Into<String>, referrer: impl Into<String>) -> Self {
        Self::DanglingReference {
            kind: "term",
            id: id.into(),
            referrer: referrer.into(),
        }
    }
}
