//! # contes-core
//!
//! Core types for contes: the data model shared by every stage of the
//! term-to-concept pipeline.
//!
//! This crate provides:
//! - **Concepts**: `Concept`, `ConceptId`
//! - **Ontology graph**: `OntologyGraph` with ancestor/descendant closures,
//!   loaded from OBO or JSON sources
//! - **Terms**: `Term`, `TermId`, `Attribution`
//!
//! The numeric side (embeddings, projection training, prediction) lives in
//! the `contes` crate.

#![warn(missing_docs)]

pub mod concept;
pub mod error;
pub mod obo;
pub mod ontology;
pub mod term;

pub use concept::{Concept, ConceptId};
pub use error::{Error, Result};
pub use ontology::OntologyGraph;
pub use term::{Attribution, Term, TermId};
