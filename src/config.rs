//! TOML configuration.
//!
//! ```toml
//! [embedding]
//! aggregation = "mean"
//! encoding = "ancestors"   # or "adjacency"
//!
//! [training]
//! lambda = 0.001
//!
//! [prediction]
//! top_k = 0                # 0 = all concepts
//! ```
//!
//! Every section and key is optional; missing values take their defaults.

use crate::concept_embedding::{ConceptEmbedder, ConceptEncoding};
use crate::error::{Error, Result};
use crate::term_embedding::{Aggregation, TermEmbedder};
use crate::training::{ProjectionTrainer, DEFAULT_LAMBDA};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "contes.toml";

/// Embedding policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Term aggregation.
    pub aggregation: Aggregation,
    /// Concept encoding.
    pub encoding: ConceptEncoding,
}

/// Regression settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Ridge regularization constant.
    pub lambda: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
        }
    }
}

/// Prediction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Number of concepts to keep per term, 0 for all.
    pub top_k: usize,
}

/// Complete configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `[embedding]`
    pub embedding: EmbeddingConfig,
    /// `[training]`
    pub training: TrainingConfig,
    /// `[prediction]`
    pub prediction: PredictionConfig,
}

impl Config {
    /// Parse and validate TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] on syntax errors, unknown enum values or invalid
    /// numbers.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| Error::config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// IO failures and every error of [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        log::debug!("[config] Loaded {}", path.display());
        Ok(config)
    }

    /// Load `path` when given, otherwise defaults.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(format!("serialize: {e}")))
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for a negative or non-finite lambda.
    pub fn validate(&self) -> Result<()> {
        let lambda = self.training.lambda;
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(Error::config(format!(
                "training.lambda must be finite and >= 0, got {lambda}"
            )));
        }
        Ok(())
    }

    /// Term embedder for these settings.
    #[must_use]
    pub fn term_embedder(&self) -> TermEmbedder {
        TermEmbedder::new().with_aggregation(self.embedding.aggregation)
    }

    /// Concept embedder for these settings.
    #[must_use]
    pub fn concept_embedder(&self) -> ConceptEmbedder {
        ConceptEmbedder::new().with_encoding(self.embedding.encoding)
    }

    /// Trainer for these settings.
    #[must_use]
    pub fn trainer(&self) -> ProjectionTrainer {
        ProjectionTrainer::new()
            .with_lambda(self.training.lambda)
            .with_embedder(self.term_embedder())
    }
}
