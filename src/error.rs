//! Error types for contes.

use thiserror::Error;

/// Result type for contes operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for contes operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Ontology, term or attribution integrity error.
    #[error(transparent)]
    Core(#[from] contes_core::Error),

    /// Word-vector source is malformed or has inconsistent vector lengths.
    #[error("Vocabulary format error in {source_name}: {message}")]
    VocabularyFormat {
        /// Path or name of the offending source.
        source_name: String,
        /// What was wrong.
        message: String,
    },

    /// Terms, attributions or predictions source is malformed.
    #[error("Dataset format error in {source_name}: {message}")]
    DatasetFormat {
        /// Path or name of the offending source.
        source_name: String,
        /// What was wrong.
        message: String,
    },

    /// None of the term's tokens has a word vector.
    #[error("Term '{term}' has no token with a known word vector")]
    EmptyTermEmbedding {
        /// Surface form of the term.
        term: String,
    },

    /// Training had no usable (term vector, concept vector) pair.
    #[error("Insufficient training data: {0}")]
    InsufficientTrainingData(String),

    /// The normal equations could not be solved.
    #[error("Ill-conditioned system: {0}")]
    IllConditionedSystem(String),

    /// Two artifacts disagree on a vector dimension.
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which dimension disagreed.
        what: String,
        /// Dimension required by the current context.
        expected: usize,
        /// Dimension found.
        got: usize,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error outside of a named source.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a vocabulary format error.
    pub fn vocabulary(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::VocabularyFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a dataset format error.
    pub fn dataset(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::DatasetFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an empty term embedding error.
    pub fn empty_term(term: impl Into<String>) -> Self {
        Error::EmptyTermEmbedding { term: term.into() }
    }

    /// Create an insufficient training data error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Error::InsufficientTrainingData(msg.into())
    }

    /// Create an ill-conditioned system error.
    pub fn ill_conditioned(msg: impl Into<String>) -> Self {
        Error::IllConditionedSystem(msg.into())
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(what: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::DimensionMismatch {
            what: what.into(),
            expected,
            got,
        }
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors scoped to a single item of a batch.
    ///
    /// A batch skips the item and carries on; every other error aborts
    /// the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::EmptyTermEmbedding { .. })
    }
}
