//! Ranking metrics for predicted concepts against gold attributions.
//!
//! Each term with at least one gold concept contributes the 1-indexed rank
//! of its best-ranked gold concept (0 when no gold concept was predicted).
//! Terms that were skipped or are absent from the predictions count as
//! misses.

use crate::prediction::PredictionSet;
use contes_core::{Attribution, ConceptId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ranking evaluation over a prediction set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Cut-off for [`Self::accuracy_at_k`].
    pub k: usize,
    /// Terms with at least one gold concept.
    pub total_terms: usize,
    /// Gold terms with no prediction at all.
    pub missing_predictions: usize,
    /// Proportion where a gold concept ranked first.
    pub accuracy_at_1: f64,
    /// Proportion where a gold concept ranked within the first `k`.
    pub accuracy_at_k: f64,
    /// Mean reciprocal rank of the first gold concept (0 for misses).
    pub mrr: f64,
    /// Mean rank of the first gold concept over terms where one was ranked.
    pub mean_rank: f64,
    /// Gold terms whose ranking contains a gold concept.
    pub ranked_terms: usize,
}

impl EvaluationReport {
    /// Compute metrics from 1-indexed gold ranks (0 = not ranked).
    #[must_use]
    pub fn from_ranks(ranks: &[usize], k: usize, missing_predictions: usize) -> Self {
        if ranks.is_empty() {
            return Self {
                k,
                ..Self::default()
            };
        }

        let total = ranks.len();
        let mut at_1 = 0usize;
        let mut at_k = 0usize;
        let mut reciprocal_sum = 0.0;
        let mut rank_sum = 0usize;
        let mut ranked = 0usize;

        for &rank in ranks {
            if rank == 0 {
                continue;
            }
            ranked += 1;
            rank_sum += rank;
            reciprocal_sum += 1.0 / rank as f64;
            if rank == 1 {
                at_1 += 1;
            }
            if rank <= k {
                at_k += 1;
            }
        }

        Self {
            k,
            total_terms: total,
            missing_predictions,
            accuracy_at_1: at_1 as f64 / total as f64,
            accuracy_at_k: at_k as f64 / total as f64,
            mrr: reciprocal_sum / total as f64,
            mean_rank: if ranked == 0 {
                0.0
            } else {
                rank_sum as f64 / ranked as f64
            },
            ranked_terms: ranked,
        }
    }

    /// Summary string.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Concept ranking ({} terms, {} without prediction):\n  Accuracy@1: {:.1}%\n  Accuracy@{}: {:.1}%\n  MRR: {:.3}\n  Mean rank: {:.2} ({} ranked)",
            self.total_terms,
            self.missing_predictions,
            self.accuracy_at_1 * 100.0,
            self.k,
            self.accuracy_at_k * 100.0,
            self.mrr,
            self.mean_rank,
            self.ranked_terms
        )
    }
}

/// Evaluate predictions against gold attributions.
///
/// `k == 0` is treated as 1.
#[must_use]
pub fn evaluate(predictions: &PredictionSet, gold: &[Attribution], k: usize) -> EvaluationReport {
    let k = k.max(1);
    let mut gold_sets: BTreeMap<&str, BTreeSet<&ConceptId>> = BTreeMap::new();
    for attribution in gold {
        gold_sets
            .entry(attribution.term_id.as_str())
            .or_default()
            .insert(&attribution.concept_id);
    }

    let by_term = predictions.by_term();
    let mut ranks = Vec::with_capacity(gold_sets.len());
    let mut missing = 0usize;
    for (term_id, concepts) in &gold_sets {
        match by_term.get(term_id) {
            Some(ranked) => {
                let rank = ranked
                    .predictions
                    .iter()
                    .position(|p| concepts.contains(&p.concept_id))
                    .map_or(0, |i| i + 1);
                ranks.push(rank);
            }
            None => {
                log::debug!("[eval] No prediction for term {}", term_id);
                missing += 1;
                ranks.push(0);
            }
        }
    }

    let report = EvaluationReport::from_ranks(&ranks, k, missing);
    log::info!(
        "[eval] {} terms, acc@1 {:.3}, MRR {:.3}",
        report.total_terms,
        report.accuracy_at_1,
        report.mrr
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::{ScoredConcept, TermPredictions};

    fn ranked(term_id: &str, concepts: &[&str]) -> TermPredictions {
        TermPredictions {
            term_id: term_id.to_string(),
            predictions: concepts
                .iter()
                .enumerate()
                .map(|(i, c)| ScoredConcept {
                    concept_id: c.to_string(),
                    label: String::new(),
                    score: 1.0 - i as f64 * 0.1,
                })
                .collect(),
        }
    }

    #[test]
    fn test_from_ranks() {
        let report = EvaluationReport::from_ranks(&[1, 2, 0, 4], 2, 1);
        assert_eq!(report.total_terms, 4);
        assert!((report.accuracy_at_1 - 0.25).abs() < 1e-12);
        assert!((report.accuracy_at_k - 0.5).abs() < 1e-12);
        assert!((report.mrr - (1.0 + 0.5 + 0.25) / 4.0).abs() < 1e-12);
        assert!((report.mean_rank - 7.0 / 3.0).abs() < 1e-12);
        assert_eq!(report.ranked_terms, 3);
    }

    #[test]
    fn test_empty() {
        let report = EvaluationReport::from_ranks(&[], 5, 0);
        assert_eq!(report.total_terms, 0);
        assert_eq!(report.mrr, 0.0);
        assert_eq!(report.k, 5);
    }

    #[test]
    fn test_evaluate_multi_label_and_missing() {
        let predictions = PredictionSet {
            predictions: vec![ranked("t1", &["B", "A", "C"]), ranked("t2", &["A", "C", "B"])],
            skipped: Vec::new(),
        };
        let gold = vec![
            Attribution::new("t1", "B"),
            // either concept counts; C is ranked 2nd
            Attribution::new("t2", "C"),
            Attribution::new("t2", "B"),
            Attribution::new("t3", "A"),
        ];
        let report = evaluate(&predictions, &gold, 2);
        assert_eq!(report.total_terms, 3);
        assert_eq!(report.missing_predictions, 1);
        assert!((report.accuracy_at_1 - 1.0 / 3.0).abs() < 1e-12);
        assert!((report.accuracy_at_k - 2.0 / 3.0).abs() < 1e-12);
        assert!((report.mrr - 1.5 / 3.0).abs() < 1e-12);
        assert!((report.mean_rank - 1.5).abs() < 1e-12);
        assert!(report.summary().contains("Accuracy@2"));
    }

    #[test]
    fn test_evaluate_repeated_term_uses_first_record() {
        let predictions = PredictionSet {
            predictions: vec![ranked("t1", &["A", "B"]), ranked("t1", &["B", "A"])],
            skipped: Vec::new(),
        };
        assert_eq!(predictions.by_term()["t1"].predictions[0].concept_id, "A");
        let report = evaluate(&predictions, &[Attribution::new("t1", "B")], 1);
        assert_eq!(report.accuracy_at_1, 0.0);
        assert!((report.mrr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_large_set() {
        let n = 20_000;
        let predictions = PredictionSet {
            predictions: (0..n)
                .map(|i| ranked(&format!("t{i}"), &["A", "B"]))
                .collect(),
            skipped: Vec::new(),
        };
        let gold: Vec<Attribution> = (0..n)
            .map(|i| Attribution::new(format!("t{i}"), if i % 2 == 0 { "A" } else { "B" }))
            .collect();
        let report = evaluate(&predictions, &gold, 2);
        assert_eq!(report.total_terms, n);
        assert_eq!(report.missing_predictions, 0);
        assert!((report.accuracy_at_1 - 0.5).abs() < 1e-12);
        assert!((report.accuracy_at_k - 1.0).abs() < 1e-12);
    }
}
