//! # contes
//!
//! Concept normalization: map multi-word terms onto the concepts of a domain
//! ontology by projecting word embeddings into an ontology-structured space.
//!
//! ```text
//! word vectors ──► TermEmbedder ──► term vector ─┐
//!                                                 ├─► ProjectionTrainer ──► W
//! ontology ──► ConceptEmbedder ──► concept vectors┘
//!
//! term ──► term vector · W ──► cosine vs. every concept ──► ranked concepts
//! ```
//!
//! - [`OntologyGraph`] is the concept hierarchy (from `contes-core`)
//! - [`ConceptEmbedder`] turns it into one 0/1 vector per concept
//! - [`TermEmbedder`] averages word vectors over a term's tokens
//! - [`ProjectionTrainer`] fits `W` by ridge regression on attributions
//! - [`ConceptPredictor`] ranks concepts for new terms
//!
//! ## Quick Start
//!
//! ```
//! use contes::{ConceptEmbedder, ConceptPredictor, ProjectionTrainer, TermSet, WordVectors};
//! use contes_core::{Attribution, Concept, OntologyGraph, Term};
//!
//! let ontology = OntologyGraph::from_concepts("inline", vec![
//!     Concept::new("A", "bacteria"),
//!     Concept::new("B", "gram positive").with_parent("A"),
//!     Concept::new("C", "gram negative").with_parent("A"),
//! ])?;
//! let vectors = WordVectors::from_entries("inline", vec![
//!     ("x".to_string(), vec![1.0, 0.0]),
//!     ("y".to_string(), vec![0.0, 1.0]),
//! ])?;
//! let terms = TermSet::from_terms("inline", vec![Term::from_surface("t1", "x y")])?;
//!
//! let concepts = ConceptEmbedder::new().embed(&ontology);
//! let projection = ProjectionTrainer::new()
//!     .fit(&[Attribution::new("t1", "B")], &terms, &vectors, &concepts)?;
//!
//! let predictor = ConceptPredictor::new(&projection, &concepts)?;
//! let ranked = predictor.predict(&Term::from_surface("q", "x y"), &vectors, 1)?;
//! assert_eq!(ranked[0].concept_id, "B");
//! # Ok::<(), contes::Error>(())
//! ```
//!
//! ## Features
//!
//! - `cli` (default): the `contes` binary
//! - `parallel` (default): batch embedding and prediction on rayon

#![warn(missing_docs)]

pub mod concept_embedding;
pub mod config;
pub mod dataset;
mod error;
pub mod eval;
mod json;
pub mod linalg;
pub mod prediction;
pub mod projection;
pub mod similarity;
pub mod term_embedding;
pub mod training;
pub mod vocab;

#[cfg(feature = "cli")]
pub mod cli;

pub use concept_embedding::{ConceptEmbedder, ConceptEmbedding, ConceptEncoding};
pub use config::Config;
pub use dataset::TermSet;
pub use error::{Error, Result};
pub use eval::{evaluate, EvaluationReport};
pub use prediction::{ConceptPredictor, Prediction, PredictionSet};
pub use projection::{ProjectionMatrix, ProjectionMeta};
pub use term_embedding::{Aggregation, TermEmbedder};
pub use training::{ProjectionTrainer, TrainingReport};
pub use vocab::WordVectors;

pub use contes_core::{Attribution, Concept, ConceptId, OntologyGraph, Term, TermId};
