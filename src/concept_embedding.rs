//! Structural concept embeddings.
//!
//! Every concept becomes a 0/1 vector over the sorted concept ids of the
//! ontology. With the default [`ConceptEncoding::Ancestors`] encoding,
//! coordinate `j` of concept `c` is 1 when the `j`-th concept is an ancestor
//! of `c` (including `c` itself). Concepts sharing ancestors therefore have
//! a larger dot product, which nearest-neighbour decoding relies on.
//!
//! ```text
//!        A            A  B  C
//!       / \      A [1, 0, 0]
//!      B   C     B [1, 1, 0]
//!                C [1, 0, 1]
//! ```
//!
//! Vectors are stored as sorted sets of active coordinates, so memory grows
//! with the number of ancestor (or neighbour) links rather than with n².
//! Dense rows are built only on request: [`ConceptEmbedding::dense_rows`]
//! for regression targets, [`ConceptEmbedding::to_dense`] for small graphs.

use contes_core::{ConceptId, OntologyGraph};
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structural encoding used to turn the ontology into vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ConceptEncoding {
    /// 1 for every concept of the ancestor closure (self included).
    #[default]
    Ancestors,
    /// 1 for self, direct parents and direct children.
    Adjacency,
}

impl ConceptEncoding {
    /// Stable lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ancestors => "ancestors",
            Self::Adjacency => "adjacency",
        }
    }
}

/// Concept id → structural vector.
///
/// Rows follow [`OntologyGraph::all_concept_ids`], and so do the
/// coordinates: the embedding is square for both encodings.
#[derive(Debug, Clone)]
pub struct ConceptEmbedding {
    encoding: ConceptEncoding,
    ids: Vec<ConceptId>,
    index: HashMap<ConceptId, usize>,
    /// Active coordinates per row, sorted and unique.
    rows: Vec<Vec<usize>>,
}

impl ConceptEmbedding {
    /// Encoding that produced these vectors.
    #[must_use]
    pub fn encoding(&self) -> ConceptEncoding {
        self.encoding
    }

    /// Dimension of each concept vector.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.ids.len()
    }

    /// Number of embedded concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True for an empty ontology.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Concept ids in row order (sorted).
    #[must_use]
    pub fn concept_ids(&self) -> &[ConceptId] {
        &self.ids
    }

    /// Row index of a concept.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Active (value 1) coordinates of a concept, ascending.
    #[must_use]
    pub fn active(&self, id: &str) -> Option<&[usize]> {
        self.index_of(id).map(|i| self.rows[i].as_slice())
    }

    /// Active coordinates of the concept at row `row`.
    ///
    /// # Panics
    ///
    /// When `row >= len()`.
    #[must_use]
    pub fn active_at(&self, row: usize) -> &[usize] {
        &self.rows[row]
    }

    /// Dense vector of a concept.
    #[must_use]
    pub fn vector(&self, id: &str) -> Option<Array1<f64>> {
        self.index_of(id).map(|i| self.dense_row(i))
    }

    fn dense_row(&self, row: usize) -> Array1<f64> {
        let mut v = Array1::zeros(self.dim());
        for &j in &self.rows[row] {
            v[j] = 1.0;
        }
        v
    }

    /// Euclidean norm of the vector at row `row`.
    #[must_use]
    pub fn norm_at(&self, row: usize) -> f64 {
        (self.rows[row].len() as f64).sqrt()
    }

    /// Dot product of the vector at row `row` with a dense vector of
    /// length `dim()`.
    #[must_use]
    pub fn dot_at(&self, row: usize, v: ArrayView1<'_, f64>) -> f64 {
        self.rows[row].iter().map(|&j| v[j]).sum()
    }

    /// Dense `rows.len() x dim()` matrix of the given rows, in order.
    #[must_use]
    pub fn dense_rows(&self, rows: &[usize]) -> Array2<f64> {
        let mut out = Array2::zeros((rows.len(), self.dim()));
        for (i, &row) in rows.iter().enumerate() {
            for &j in &self.rows[row] {
                out[[i, j]] = 1.0;
            }
        }
        out
    }

    /// All vectors as a dense `len() x dim()` matrix.
    ///
    /// Allocates n² values; meant for small ontologies and inspection.
    #[must_use]
    pub fn to_dense(&self) -> Array2<f64> {
        let all: Vec<usize> = (0..self.len()).collect();
        self.dense_rows(&all)
    }

    /// Total number of active coordinates.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// `(id, active coordinates)` pairs in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.ids
            .iter()
            .zip(&self.rows)
            .map(|(id, row)| (id.as_str(), row.as_slice()))
    }
}

/// Builds [`ConceptEmbedding`]s from an ontology graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConceptEmbedder {
    encoding: ConceptEncoding,
}

impl ConceptEmbedder {
    /// Embedder using the default ancestor encoding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the structural encoding.
    #[must_use]
    pub fn with_encoding(mut self, encoding: ConceptEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Encoding in use.
    #[must_use]
    pub fn encoding(&self) -> ConceptEncoding {
        self.encoding
    }

    /// Embed every concept of the graph.
    ///
    /// Deterministic: the same graph always yields identical vectors.
    #[must_use]
    pub fn embed(&self, graph: &OntologyGraph) -> ConceptEmbedding {
        let ids: Vec<ConceptId> = graph
            .all_concept_ids()
            .into_iter()
            .map(str::to_string)
            .collect();
        let index: HashMap<ConceptId, usize> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let rows: Vec<Vec<usize>> = ids
            .iter()
            .map(|id| {
                let active: Vec<&str> = match self.encoding {
                    ConceptEncoding::Ancestors => graph
                        .ancestors_of(id)
                        .map(|set| set.into_iter().collect())
                        .unwrap_or_default(),
                    ConceptEncoding::Adjacency => {
                        let mut active = vec![id.as_str()];
                        if let Some(concept) = graph.get(id) {
                            active.extend(concept.parents.iter().map(String::as_str));
                            active.extend(concept.children.iter().map(String::as_str));
                        }
                        active
                    }
                };
                let mut cols: Vec<usize> = active
                    .into_iter()
                    .filter_map(|other| index.get(other).copied())
                    .collect();
                cols.sort_unstable();
                cols.dedup();
                cols
            })
            .collect();

        let embedding = ConceptEmbedding {
            encoding: self.encoding,
            ids,
            index,
            rows,
        };
        log::debug!(
            "[concept-embedding] {} concepts, {} encoding, {} non-zero coordinates",
            embedding.len(),
            self.encoding.name(),
            embedding.nnz()
        );
        embedding
    }
}
