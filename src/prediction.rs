//! Nearest-concept decoding.
//!
//! A term vector `v` is projected to `v' = v · W` and compared with every
//! concept vector by cosine similarity. Concepts are ranked by score
//! (descending), ties broken by concept id (ascending), so a ranking is
//! fully determined by its inputs.
//!
//! [`ConceptPredictor`] checks dimensions once and caches concept norms;
//! after construction it is immutable and can be shared across threads.

use crate::concept_embedding::ConceptEmbedding;
use crate::error::{Error, Result};
use crate::projection::ProjectionMatrix;
use crate::similarity::{cosine_from_dot, l2_norm};
use crate::term_embedding::TermEmbedder;
use crate::vocab::WordVectors;
use contes_core::{ConceptId, OntologyGraph, Term, TermId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// A concept with its similarity to a projected term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted concept.
    pub concept_id: ConceptId,
    /// Cosine similarity in [-1, 1].
    pub score: f64,
}

/// Ranks concepts for terms through a trained projection.
#[derive(Debug)]
pub struct ConceptPredictor<'a> {
    projection: &'a ProjectionMatrix,
    concepts: &'a ConceptEmbedding,
    embedder: TermEmbedder,
    norms: Vec<f64>,
}

impl<'a> ConceptPredictor<'a> {
    /// Bind a projection to the concept embedding it targets.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when the projection's columns do not
    /// match the concept vector dimension.
    pub fn new(projection: &'a ProjectionMatrix, concepts: &'a ConceptEmbedding) -> Result<Self> {
        if projection.cols() != concepts.dim() {
            return Err(Error::dimension_mismatch(
                "projection columns (concept vector dimension)",
                concepts.dim(),
                projection.cols(),
            ));
        }
        let norms = (0..concepts.len()).map(|row| concepts.norm_at(row)).collect();
        Ok(Self {
            projection,
            concepts,
            embedder: TermEmbedder::new().with_aggregation(projection.meta().aggregation),
            norms,
        })
    }

    /// Override the term embedder (defaults to the aggregation recorded in
    /// the projection).
    #[must_use]
    pub fn with_embedder(mut self, embedder: TermEmbedder) -> Self {
        self.embedder = embedder;
        self
    }

    /// Rank concepts for one term.
    ///
    /// `k == 0` returns every concept.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTermEmbedding`] when the term has no known token,
    /// [`Error::DimensionMismatch`] when the word vectors do not match the
    /// projection.
    pub fn predict(&self, term: &Term, vectors: &WordVectors, k: usize) -> Result<Vec<Prediction>> {
        if vectors.dim() != self.projection.rows() {
            return Err(Error::dimension_mismatch(
                "projection rows (term vector dimension)",
                vectors.dim(),
                self.projection.rows(),
            ));
        }
        let term_vector = self.embedder.embed(term, vectors)?;
        let projected = self.projection.project(term_vector.view())?;
        let projected_norm = l2_norm(projected.view());

        let mut ranked: Vec<Prediction> = self
            .concepts
            .concept_ids()
            .iter()
            .zip(&self.norms)
            .enumerate()
            .map(|(row, (id, &norm))| Prediction {
                concept_id: id.clone(),
                score: cosine_from_dot(
                    self.concepts.dot_at(row, projected.view()),
                    projected_norm,
                    norm,
                ),
            })
            .collect();

        rank(&mut ranked);
        if k > 0 {
            ranked.truncate(k);
        }
        log::debug!(
            "[predictor] {} -> {}",
            term.id,
            ranked
                .first()
                .map(|p| p.concept_id.as_str())
                .unwrap_or("-")
        );
        Ok(ranked)
    }

    /// Rank concepts for many terms, one result per term in input order.
    ///
    /// A term that fails does not affect the others. Runs on the rayon pool
    /// when the `parallel` feature is enabled.
    pub fn predict_batch(
        &self,
        terms: &[Term],
        vectors: &WordVectors,
        k: usize,
    ) -> Vec<Result<Vec<Prediction>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            terms
                .par_iter()
                .map(|term| self.predict(term, vectors, k))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            terms
                .iter()
                .map(|term| self.predict(term, vectors, k))
                .collect()
        }
    }
}

/// Rank concepts for one term without keeping a predictor around.
///
/// # Errors
///
/// See [`ConceptPredictor::new`] and [`ConceptPredictor::predict`].
pub fn predict(
    term: &Term,
    vectors: &WordVectors,
    projection: &ProjectionMatrix,
    concepts: &ConceptEmbedding,
    k: usize,
) -> Result<Vec<Prediction>> {
    ConceptPredictor::new(projection, concepts)?.predict(term, vectors, k)
}

/// Sort by score descending, then concept id ascending.
pub fn rank(predictions: &mut [Prediction]) {
    predictions.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.concept_id.cmp(&b.concept_id))
    });
}

/// One ranked concept of a [`TermPredictions`] record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredConcept {
    /// Concept id.
    pub concept_id: ConceptId,
    /// Concept label, empty when unknown.
    #[serde(default)]
    pub label: String,
    /// Cosine similarity.
    pub score: f64,
}

/// Ranked concepts of one term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermPredictions {
    /// Term id.
    pub term_id: TermId,
    /// Concepts, best first.
    pub predictions: Vec<ScoredConcept>,
}

/// A term that could not be predicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTerm {
    /// Term id.
    pub term_id: TermId,
    /// Error message.
    pub reason: String,
}

/// Output of a prediction run.
///
/// Persisted as `{"predictions": [...], "skipped": [...]}`. A bare array of
/// [`TermPredictions`] is accepted on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    /// Predicted terms in input order.
    pub predictions: Vec<TermPredictions>,
    /// Terms skipped because none of their tokens has a vector.
    #[serde(default)]
    pub skipped: Vec<SkippedTerm>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedPredictions {
    Set(PredictionSet),
    Bare(Vec<TermPredictions>),
}

impl PredictionSet {
    /// Collect batch results, attaching labels from the ontology.
    ///
    /// # Errors
    ///
    /// The first non-recoverable error of the batch. Recoverable errors
    /// become [`SkippedTerm`]s.
    pub fn from_results(
        terms: &[Term],
        results: Vec<Result<Vec<Prediction>>>,
        ontology: &OntologyGraph,
    ) -> Result<Self> {
        let mut set = Self::default();
        for (term, result) in terms.iter().zip(results) {
            match result {
                Ok(ranked) => set.predictions.push(TermPredictions {
                    term_id: term.id.clone(),
                    predictions: ranked
                        .into_iter()
                        .map(|p| ScoredConcept {
                            label: ontology.label_of(&p.concept_id).unwrap_or_default().to_string(),
                            concept_id: p.concept_id,
                            score: p.score,
                        })
                        .collect(),
                }),
                Err(e) if e.is_recoverable() => {
                    log::warn!("[predictor] Skipping term {}: {}", term.id, e);
                    set.skipped.push(SkippedTerm {
                        term_id: term.id.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
        Ok(set)
    }

    /// Ranked concepts of a term.
    #[must_use]
    pub fn get(&self, term_id: &str) -> Option<&TermPredictions> {
        self.predictions.iter().find(|p| p.term_id == term_id)
    }

    /// Term id → ranked concepts, for repeated lookups. When a term id
    /// appears twice the first record wins, as with [`Self::get`].
    #[must_use]
    pub fn by_term(&self) -> HashMap<&str, &TermPredictions> {
        let mut index = HashMap::with_capacity(self.predictions.len());
        for record in &self.predictions {
            index.entry(record.term_id.as_str()).or_insert(record);
        }
        index
    }

    /// Write as pretty JSON.
    ///
    /// # Errors
    ///
    /// IO and serialization failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()?;
        log::info!(
            "[predictor] Wrote {} predictions ({} skipped) to {}",
            self.predictions.len(),
            self.skipped.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a prediction file.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetFormat`] on malformed input.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let persisted: PersistedPredictions = serde_json::from_reader(reader).map_err(|e| {
            Error::dataset(path.display().to_string(), format!("invalid predictions: {e}"))
        })?;
        Ok(match persisted {
            PersistedPredictions::Set(set) => set,
            PersistedPredictions::Bare(predictions) => Self {
                predictions,
                skipped: Vec::new(),
            },
        })
    }
}
