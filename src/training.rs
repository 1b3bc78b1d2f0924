//! Projection training.
//!
//! Fits the linear map `W` from term space to concept space by ridge
//! regression over the known attributions:
//!
//! ```text
//! minimize ‖XW − Y‖² + λ‖W‖²   ⇒   W = (XᵗX + λI)⁻¹ XᵗY
//! ```
//!
//! `X` stacks one term vector per attribution, `Y` the structural vector of
//! the attributed concept. λ keeps the system solvable when there are fewer
//! attributions than term dimensions, which is the usual situation.
//!
//! # Example
//!
//! ```
//! use contes::{ConceptEmbedder, ProjectionTrainer, TermEmbedder, TermSet, WordVectors};
//! use contes_core::{Attribution, Concept, OntologyGraph, Term};
//!
//! let ontology = OntologyGraph::from_concepts("inline", vec![
//!     Concept::new("A", "root"),
//!     Concept::new("B", "left").with_parent("A"),
//! ])?;
//! let concepts = ConceptEmbedder::new().embed(&ontology);
//! let vectors = WordVectors::from_entries("inline", vec![("x".to_string(), vec![1.0, 0.0])])?;
//! let terms = TermSet::from_terms("inline", vec![Term::new("t1", ["x"])])?;
//!
//! let projection = ProjectionTrainer::new().fit(
//!     &[Attribution::new("t1", "B")],
//!     &terms,
//!     &vectors,
//!     &concepts,
//! )?;
//! assert_eq!((projection.rows(), projection.cols()), (2, 2));
//! # Ok::<(), contes::Error>(())
//! ```

use crate::concept_embedding::ConceptEmbedding;
use crate::dataset::TermSet;
use crate::error::{Error, Result};
use crate::linalg;
use crate::projection::{ProjectionMatrix, ProjectionMeta};
use crate::term_embedding::TermEmbedder;
use crate::vocab::WordVectors;
use contes_core::{Attribution, Term, TermId};
use ndarray::{Array1, Array2};
use serde::Serialize;
use std::collections::HashMap;

/// Default ridge regularization constant.
pub const DEFAULT_LAMBDA: f64 = 1e-3;

/// An attribution left out of the fit.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedAttribution {
    /// Term of the attribution.
    pub term_id: TermId,
    /// Concept of the attribution.
    pub concept_id: String,
    /// Why it was skipped.
    pub reason: String,
}

/// Statistics of a successful fit.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Pairs used in the regression.
    pub pairs: usize,
    /// Attributions whose term could not be embedded.
    pub skipped: Vec<SkippedAttribution>,
    /// Term-vector dimension.
    pub term_dim: usize,
    /// Concept-vector dimension.
    pub concept_dim: usize,
    /// Regularization constant used.
    pub lambda: f64,
    /// Mean squared error of `XW` against `Y` over the training pairs.
    pub training_mse: f64,
}

/// Fits [`ProjectionMatrix`]es by ridge regression.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionTrainer {
    lambda: f64,
    embedder: TermEmbedder,
}

impl Default for ProjectionTrainer {
    fn default() -> Self {
        Self {
            lambda: DEFAULT_LAMBDA,
            embedder: TermEmbedder::default(),
        }
    }
}

impl ProjectionTrainer {
    /// Trainer with λ = [`DEFAULT_LAMBDA`] and mean term aggregation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ridge regularization constant.
    #[must_use]
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.lambda = lambda;
        self
    }

    /// Set the term embedder (must match the one used for prediction).
    #[must_use]
    pub fn with_embedder(mut self, embedder: TermEmbedder) -> Self {
        self.embedder = embedder;
        self
    }

    /// Regularization constant.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Term embedder.
    #[must_use]
    pub fn embedder(&self) -> &TermEmbedder {
        &self.embedder
    }

    /// Fit the projection.
    ///
    /// # Errors
    ///
    /// See [`Self::fit_with_report`].
    pub fn fit(
        &self,
        attributions: &[Attribution],
        terms: &TermSet,
        vectors: &WordVectors,
        concepts: &ConceptEmbedding,
    ) -> Result<ProjectionMatrix> {
        self.fit_with_report(attributions, terms, vectors, concepts)
            .map(|(projection, _)| projection)
    }

    /// Fit the projection and report what went into it.
    ///
    /// Attributions whose term has no known token are logged and skipped.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] for a negative or non-finite λ
    /// - [`contes_core::Error::DanglingReference`] for an unknown term or concept
    /// - [`Error::InsufficientTrainingData`] when no pair survives
    /// - [`Error::IllConditionedSystem`] when the normal equations are singular
    pub fn fit_with_report(
        &self,
        attributions: &[Attribution],
        terms: &TermSet,
        vectors: &WordVectors,
        concepts: &ConceptEmbedding,
    ) -> Result<(ProjectionMatrix, TrainingReport)> {
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(Error::config(format!(
                "lambda must be a finite non-negative number, got {}",
                self.lambda
            )));
        }

        // Resolve references before any numeric work.
        let mut unique: Vec<&Term> = Vec::new();
        let mut slot: HashMap<&str, usize> = HashMap::new();
        for (i, attribution) in attributions.iter().enumerate() {
            let term = terms.get(&attribution.term_id).ok_or_else(|| {
                contes_core::Error::dangling_term(&attribution.term_id, format!("attribution[{i}]"))
            })?;
            if concepts.index_of(&attribution.concept_id).is_none() {
                return Err(contes_core::Error::dangling_concept(
                    &attribution.concept_id,
                    format!("attribution[{i}] (term '{}')", attribution.term_id),
                )
                .into());
            }
            if !slot.contains_key(term.id.as_str()) {
                slot.insert(term.id.as_str(), unique.len());
                unique.push(term);
            }
        }

        let embedded = self.embedder.embed_batch(&unique, vectors);

        let mut rows: Vec<(&Array1<f64>, usize)> = Vec::with_capacity(attributions.len());
        let mut skipped = Vec::new();
        for attribution in attributions {
            let index = slot[attribution.term_id.as_str()];
            match &embedded[index] {
                Ok(vector) => {
                    // Checked above.
                    if let Some(concept_row) = concepts.index_of(&attribution.concept_id) {
                        rows.push((vector, concept_row));
                    }
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!(
                        "[trainer] Skipping attribution {} -> {}: {}",
                        attribution.term_id,
                        attribution.concept_id,
                        e
                    );
                    skipped.push(SkippedAttribution {
                        term_id: attribution.term_id.clone(),
                        concept_id: attribution.concept_id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    return Err(Error::insufficient_data(format!(
                        "term '{}' could not be embedded: {}",
                        attribution.term_id, e
                    )))
                }
            }
        }

        if rows.is_empty() {
            return Err(Error::insufficient_data(format!(
                "no usable (term, concept) pair among {} attributions ({} skipped)",
                attributions.len(),
                skipped.len()
            )));
        }

        let term_dim = vectors.dim();
        let concept_dim = concepts.dim();
        let n = rows.len();
        let mut x = Array2::<f64>::zeros((n, term_dim));
        for (i, (vector, _)) in rows.iter().enumerate() {
            x.row_mut(i).assign(*vector);
        }
        let targets: Vec<usize> = rows.iter().map(|(_, concept_row)| *concept_row).collect();
        let y = concepts.dense_rows(&targets);

        log::info!(
            "[trainer] Fitting {}x{} projection on {} pairs (lambda = {})",
            term_dim,
            concept_dim,
            n,
            self.lambda
        );
        let weights = linalg::ridge_solve(&x, &y, self.lambda)?;

        let residual = x.dot(&weights) - &y;
        let cells = (n * concept_dim).max(1) as f64;
        let training_mse = residual.iter().map(|r| r * r).sum::<f64>() / cells;
        log::info!("[trainer] Training MSE {:.6e}", training_mse);

        let projection = ProjectionMatrix::new(weights).with_meta(ProjectionMeta {
            lambda: self.lambda,
            encoding: concepts.encoding(),
            aggregation: self.embedder.aggregation(),
            training_pairs: n,
        });
        let report = TrainingReport {
            pairs: n,
            skipped,
            term_dim,
            concept_dim,
            lambda: self.lambda,
            training_mse,
        };
        Ok((projection, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept_embedding::ConceptEmbedder;
    use contes_core::{Concept, OntologyGraph};

    fn fixture() -> (ConceptEmbedding, WordVectors, TermSet) {
        let ontology = OntologyGraph::from_concepts(
            "abc",
            vec![
                Concept::new("A", "root"),
                Concept::new("B", "b").with_parent("A"),
                Concept::new("C", "c").with_parent("A"),
            ],
        )
        .unwrap();
        let vectors = WordVectors::from_entries(
            "xy",
            vec![
                ("x".to_string(), vec![1.0, 0.0]),
                ("y".to_string(), vec![0.0, 1.0]),
            ],
        )
        .unwrap();
        let terms = TermSet::from_terms(
            "terms",
            vec![
                Term::from_surface("t1", "x y"),
                Term::from_surface("t2", "x"),
                Term::from_surface("t3", "y"),
                Term::from_surface("oov", "nothing known"),
            ],
        )
        .unwrap();
        (ConceptEmbedder::new().embed(&ontology), vectors, terms)
    }

    #[test]
    fn test_fit_dimensions_and_meta() {
        let (concepts, vectors, terms) = fixture();
        let (w, report) = ProjectionTrainer::new()
            .fit_with_report(&[Attribution::new("t1", "B")], &terms, &vectors, &concepts)
            .unwrap();
        assert_eq!((w.rows(), w.cols()), (2, 3));
        assert_eq!(w.meta().training_pairs, 1);
        assert_eq!(report.pairs, 1);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_exact_fit_with_full_rank_data() {
        let (concepts, vectors, terms) = fixture();
        let attributions = [Attribution::new("t2", "B"), Attribution::new("t3", "C")];
        let (w, report) = ProjectionTrainer::new()
            .with_lambda(0.0)
            .fit_with_report(&attributions, &terms, &vectors, &concepts)
            .unwrap();
        // x -> B = [1,1,0], y -> C = [1,0,1]
        let expected = ndarray::array![[1.0, 1.0, 0.0], [1.0, 0.0, 1.0]];
        assert!((w.weights() - &expected).iter().all(|v| v.abs() < 1e-12));
        assert!(report.training_mse < 1e-20);
    }

    #[test]
    fn test_unembeddable_terms_are_skipped() {
        let (concepts, vectors, terms) = fixture();
        let attributions = [Attribution::new("oov", "A"), Attribution::new("t2", "B")];
        let (_, report) = ProjectionTrainer::new()
            .fit_with_report(&attributions, &terms, &vectors, &concepts)
            .unwrap();
        assert_eq!(report.pairs, 1);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].term_id, "oov");
    }

    #[test]
    fn test_no_valid_pair_is_insufficient() {
        let (concepts, vectors, terms) = fixture();
        let err = ProjectionTrainer::new()
            .fit(&[Attribution::new("oov", "A")], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientTrainingData(_)));

        let err = ProjectionTrainer::new()
            .fit(&[], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::InsufficientTrainingData(_)));
    }

    #[test]
    fn test_singular_without_regularization() {
        let (concepts, vectors, terms) = fixture();
        let err = ProjectionTrainer::new()
            .with_lambda(0.0)
            .fit(&[Attribution::new("t1", "B")], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::IllConditionedSystem(_)));
    }

    #[test]
    fn test_dangling_references() {
        let (concepts, vectors, terms) = fixture();
        let err = ProjectionTrainer::new()
            .fit(&[Attribution::new("t1", "Z")], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::Core(_)));
        let err = ProjectionTrainer::new()
            .fit(&[Attribution::new("nope", "A")], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::Core(_)));
    }

    #[test]
    fn test_negative_lambda_rejected() {
        let (concepts, vectors, terms) = fixture();
        let err = ProjectionTrainer::new()
            .with_lambda(-1.0)
            .fit(&[Attribution::new("t1", "B")], &terms, &vectors, &concepts)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
