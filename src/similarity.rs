//! Vector similarity utilities for nearest-concept decoding.
//!
//! Cosine similarity is defined as 0 when either vector has zero norm, so a
//! degenerate projection never produces NaN scores.

use ndarray::ArrayView1;

/// Euclidean norm.
#[must_use]
pub fn l2_norm(v: ArrayView1<'_, f64>) -> f64 {
    v.dot(&v).sqrt()
}

/// Cosine similarity in [-1.0, 1.0].
///
/// Returns 0.0 when either vector has zero norm.
///
/// # Panics
///
/// When the vectors have different lengths.
///
/// # Examples
///
/// ```
/// use contes::similarity::cosine_similarity;
/// use ndarray::array;
///
/// let a = array![1.0, 0.0];
/// let b = array![1.0, 1.0];
/// let sim = cosine_similarity(a.view(), b.view());
/// assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// assert_eq!(cosine_similarity(a.view(), array![0.0, 0.0].view()), 0.0);
/// ```
#[must_use]
pub fn cosine_similarity(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    cosine_with_norms(a, l2_norm(a), b, l2_norm(b))
}

/// Cosine similarity with norms computed by the caller.
///
/// Lets a ranking loop pay for each concept norm once instead of once per
/// query.
#[must_use]
pub fn cosine_with_norms(
    a: ArrayView1<'_, f64>,
    norm_a: f64,
    b: ArrayView1<'_, f64>,
    norm_b: f64,
) -> f64 {
    cosine_from_dot(a.dot(&b), norm_a, norm_b)
}

/// Cosine similarity from a precomputed dot product and norms.
///
/// Used when one side is a sparse 0/1 concept vector and the dot product is
/// a sum over its active coordinates.
#[must_use]
pub fn cosine_from_dot(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 || !norm_a.is_finite() || !norm_b.is_finite() {
        return 0.0;
    }
    // Rounding can push |cos| marginally past 1.
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_identical_is_one() {
        let v = array![0.3, -1.2, 4.0];
        assert!((cosine_similarity(v.view(), v.view()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_opposite_is_minus_one() {
        let v = array![1.0, 2.0];
        let w = array![-1.0, -2.0];
        assert!((cosine_similarity(v.view(), w.view()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_is_zero() {
        let v = array![1.0, 0.0];
        let w = array![0.0, 5.0];
        assert_eq!(cosine_similarity(v.view(), w.view()), 0.0);
    }

    #[test]
    fn test_zero_norm_is_zero() {
        let z = array![0.0, 0.0];
        assert_eq!(cosine_similarity(z.view(), z.view()), 0.0);
    }

    #[test]
    fn test_scale_invariant() {
        let v = array![1.0, 2.0, 3.0];
        let w = array![2.0, 1.0, 0.5];
        let scaled = &v * 1000.0;
        let a = cosine_similarity(v.view(), w.view());
        let b = cosine_similarity(scaled.view(), w.view());
        assert!((a - b).abs() < 1e-12);
    }
}
