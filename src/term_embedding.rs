//! Term embeddings from word vectors.
//!
//! A term is embedded by aggregating the vectors of its known tokens.
//! Unknown tokens are skipped; a term with no known token cannot be
//! embedded and yields [`Error::EmptyTermEmbedding`], never a zero vector.
//!
//! Training and prediction both go through [`TermEmbedder::embed`], so the
//! two phases always see the same term space.

use crate::error::{Error, Result};
use crate::vocab::WordVectors;
use contes_core::Term;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// How token vectors are combined into a term vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Element-wise arithmetic mean of the known token vectors.
    #[default]
    Mean,
}

impl Aggregation {
    /// Stable lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
        }
    }
}

/// Turns terms into vectors of the word-vector space.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermEmbedder {
    aggregation: Aggregation,
}

impl TermEmbedder {
    /// Embedder using mean aggregation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the aggregation policy.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Aggregation in use.
    #[must_use]
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }

    /// Embed a term.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTermEmbedding`] when no token has a word vector.
    pub fn embed(&self, term: &Term, vectors: &WordVectors) -> Result<Array1<f64>> {
        self.embed_tokens(&term.tokens, vectors)
    }

    /// Embed an already tokenized surface form.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTermEmbedding`] when no token has a word vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use contes::{TermEmbedder, WordVectors};
    ///
    /// let vectors = WordVectors::from_entries(
    ///     "inline",
    ///     vec![("x".to_string(), vec![1.0, 0.0]), ("y".to_string(), vec![0.0, 1.0])],
    /// )?;
    /// let v = TermEmbedder::new().embed_tokens(&["x", "unknown", "y"], &vectors)?;
    /// assert_eq!(v.to_vec(), vec![0.5, 0.5]);
    /// # Ok::<(), contes::Error>(())
    /// ```
    pub fn embed_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        vectors: &WordVectors,
    ) -> Result<Array1<f64>> {
        match self.aggregation {
            Aggregation::Mean => {
                let mut sum = Array1::<f64>::zeros(vectors.dim());
                let mut known = 0usize;
                for token in tokens {
                    if let Some(v) = vectors.get(token.as_ref()) {
                        sum += &v;
                        known += 1;
                    }
                }
                if known == 0 {
                    return Err(Error::empty_term(surface(tokens)));
                }
                sum /= known as f64;
                Ok(sum)
            }
        }
    }

    /// Embed many terms, one result per term in input order.
    ///
    /// Runs on the rayon pool when the `parallel` feature is enabled.
    pub fn embed_batch(&self, terms: &[&Term], vectors: &WordVectors) -> Vec<Result<Array1<f64>>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            terms
                .par_iter()
                .map(|term| self.embed(term, vectors))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            terms.iter().map(|term| self.embed(term, vectors)).collect()
        }
    }
}

fn surface<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> WordVectors {
        WordVectors::from_entries(
            "inline",
            vec![
                ("x".to_string(), vec![1.0, 0.0]),
                ("y".to_string(), vec![0.0, 1.0]),
                ("z".to_string(), vec![3.0, -3.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_single_token_is_its_vector() {
        let v = TermEmbedder::new()
            .embed(&Term::new("t", ["z"]), &vectors())
            .unwrap();
        assert_eq!(v.to_vec(), vec![3.0, -3.0]);
    }

    #[test]
    fn test_mean_skips_unknown_tokens() {
        let v = TermEmbedder::new()
            .embed(&Term::from_surface("t", "x oov y"), &vectors())
            .unwrap();
        assert_eq!(v.to_vec(), vec![0.5, 0.5]);
    }

    #[test]
    fn test_repeated_token_counts_twice() {
        let v = TermEmbedder::new()
            .embed_tokens(&["x", "x", "y"], &vectors())
            .unwrap();
        assert!((v[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((v[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_unknown_is_error() {
        let err = TermEmbedder::new()
            .embed(&Term::from_surface("t", "foo bar"), &vectors())
            .unwrap_err();
        assert!(matches!(err, Error::EmptyTermEmbedding { ref term } if term == "foo bar"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_empty_term_is_error() {
        let empty: [&str; 0] = [];
        assert!(TermEmbedder::new().embed_tokens(&empty, &vectors()).is_err());
    }
}
