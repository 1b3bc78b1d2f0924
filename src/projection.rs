//! The learned term-space → concept-space linear map.
//!
//! A [`ProjectionMatrix`] has one row per term-vector dimension and one
//! column per concept-vector dimension; a term vector `v` is projected as
//! `v · W`. The matrix is the only learned artifact of the pipeline and is
//! read-only once produced.
//!
//! # Persisted form
//!
//! ```json
//! { "rows": 2, "cols": 3, "data": [w00, w01, w02, w10, w11, w12],
//!   "meta": { "lambda": 0.001, "encoding": "ancestors", ... } }
//! ```
//!
//! `data` is row-major. Files ending in `.gz` are gzip-compressed.

use crate::concept_embedding::ConceptEncoding;
use crate::error::{Error, Result};
use crate::term_embedding::Aggregation;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Provenance recorded next to the weights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionMeta {
    /// Ridge regularization constant used by the fit.
    pub lambda: f64,
    /// Concept encoding of the target space.
    pub encoding: ConceptEncoding,
    /// Term aggregation of the source space.
    pub aggregation: Aggregation,
    /// Number of (term, concept) pairs the fit used.
    pub training_pairs: usize,
}

#[derive(Serialize, Deserialize)]
struct Persisted {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    #[serde(default)]
    meta: ProjectionMeta,
}

/// Linear map from term-embedding space to concept-embedding space.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionMatrix {
    weights: Array2<f64>,
    meta: ProjectionMeta,
}

impl ProjectionMatrix {
    /// Wrap a `term_dim x concept_dim` weight matrix.
    #[must_use]
    pub fn new(weights: Array2<f64>) -> Self {
        Self {
            weights,
            meta: ProjectionMeta::default(),
        }
    }

    /// Attach provenance.
    #[must_use]
    pub fn with_meta(mut self, meta: ProjectionMeta) -> Self {
        self.meta = meta;
        self
    }

    /// Term-vector dimension.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.weights.nrows()
    }

    /// Concept-vector dimension.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.weights.ncols()
    }

    /// The weights.
    #[must_use]
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Provenance of the weights.
    #[must_use]
    pub fn meta(&self) -> &ProjectionMeta {
        &self.meta
    }

    /// Check the matrix against the dimensions of the current vocabulary
    /// and concept embedding.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] naming the first dimension that differs.
    pub fn check_dims(&self, term_dim: usize, concept_dim: usize) -> Result<()> {
        if self.rows() != term_dim {
            return Err(Error::dimension_mismatch(
                "projection rows (term vector dimension)",
                term_dim,
                self.rows(),
            ));
        }
        if self.cols() != concept_dim {
            return Err(Error::dimension_mismatch(
                "projection columns (concept vector dimension)",
                concept_dim,
                self.cols(),
            ));
        }
        Ok(())
    }

    /// Project a term vector into concept space.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionMismatch`] when `term_vector` does not have
    /// [`Self::rows`] elements.
    pub fn project(&self, term_vector: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        if term_vector.len() != self.rows() {
            return Err(Error::dimension_mismatch(
                "term vector",
                self.rows(),
                term_vector.len(),
            ));
        }
        Ok(term_vector.dot(&self.weights))
    }

    /// Persist as JSON (gzip-compressed when the path ends in `.gz`).
    ///
    /// # Errors
    ///
    /// IO and serialization failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let persisted = Persisted {
            rows: self.rows(),
            cols: self.cols(),
            data: self.weights.iter().copied().collect(),
            meta: self.meta.clone(),
        };
        let file = BufWriter::new(File::create(path)?);
        if is_gz(path) {
            let mut encoder = GzEncoder::new(file, Compression::default());
            serde_json::to_writer(&mut encoder, &persisted)?;
            encoder.finish()?.flush()?;
        } else {
            let mut file = file;
            serde_json::to_writer(&mut file, &persisted)?;
            file.flush()?;
        }
        log::info!(
            "[projection] Saved {}x{} matrix to {}",
            self.rows(),
            self.cols(),
            path.display()
        );
        Ok(())
    }

    /// Load a persisted matrix.
    ///
    /// # Errors
    ///
    /// [`Error::DatasetFormat`] when the file is malformed or the payload
    /// length disagrees with the header.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path)?;
        let reader: Box<dyn Read> = if is_gz(path) {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        let persisted: Persisted = serde_json::from_reader(reader)
            .map_err(|e| Error::dataset(&name, format!("invalid projection file: {e}")))?;

        let expected = persisted.rows.checked_mul(persisted.cols).ok_or_else(|| {
            Error::dataset(&name, "projection header dimensions overflow")
        })?;
        if persisted.data.len() != expected {
            return Err(Error::dataset(
                &name,
                format!(
                    "payload has {} values, header declares {}x{}",
                    persisted.data.len(),
                    persisted.rows,
                    persisted.cols
                ),
            ));
        }
        let weights = Array2::from_shape_vec((persisted.rows, persisted.cols), persisted.data)
            .map_err(|e| Error::dataset(&name, e.to_string()))?;
        Ok(Self {
            weights,
            meta: persisted.meta,
        })
    }

    /// Load and validate against the current term and concept dimensions.
    ///
    /// # Errors
    ///
    /// Every error of [`Self::load`], plus [`Error::DimensionMismatch`].
    pub fn load_checked(path: impl AsRef<Path>, term_dim: usize, concept_dim: usize) -> Result<Self> {
        let projection = Self::load(path)?;
        projection.check_dims(term_dim, concept_dim)?;
        Ok(projection)
    }
}

fn is_gz(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_project() {
        let w = ProjectionMatrix::new(array![[1.0, 0.0, 2.0], [0.0, 1.0, -1.0]]);
        let v = w.project(array![1.0, 2.0].view()).unwrap();
        assert_eq!(v.to_vec(), vec![1.0, 2.0, 0.0]);
        assert!(matches!(
            w.project(array![1.0].view()),
            Err(Error::DimensionMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let w = ProjectionMatrix::new(array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).with_meta(
            ProjectionMeta {
                lambda: 0.5,
                training_pairs: 7,
                ..ProjectionMeta::default()
            },
        );
        for name in ["w.json", "w.json.gz"] {
            let path = dir.path().join(name);
            w.save(&path).unwrap();
            let loaded = ProjectionMatrix::load(&path).unwrap();
            assert_eq!(loaded, w, "{name}");
        }
    }

    #[test]
    fn test_load_checked_dimension_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("w.json");
        ProjectionMatrix::new(Array2::zeros((2, 3))).save(&path).unwrap();
        assert!(ProjectionMatrix::load_checked(&path, 2, 3).is_ok());
        let err = ProjectionMatrix::load_checked(&path, 2, 4).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 4, got: 3, .. }));
    }

    #[test]
    fn test_payload_length_checked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"rows": 2, "cols": 2, "data": [1.0, 2.0, 3.0]}"#).unwrap();
        let err = ProjectionMatrix::load(&path).unwrap_err();
        assert!(matches!(err, Error::DatasetFormat { .. }));
    }
}
