//! Ridge-regression solver.
//!
//! The normal equations `(XᵗX + λI) W = XᵗY` have a symmetric matrix that
//! is positive definite for λ > 0, so they are solved with nalgebra's
//! Cholesky decomposition. Arrays stay `ndarray` on both sides; the
//! conversion is a copy of the d×d Gram matrix and the d×n right-hand side.
//!
//! A factor whose squared diagonal is non-finite or not clearly positive
//! (relative to the largest diagonal entry of the Gram matrix) means the
//! system is singular in working precision.

use crate::error::{Error, Result};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Pivots at or below `PIVOT_TOLERANCE * max|diag|` are treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

fn to_nalgebra(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

fn to_ndarray(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Solve `A X = B` for a symmetric positive-definite `A`.
///
/// # Errors
///
/// [`Error::IllConditionedSystem`] when `a` is not square or not
/// numerically positive definite, [`Error::DimensionMismatch`] when `b`
/// has a different number of rows.
pub fn solve_spd(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(Error::ill_conditioned(format!(
            "matrix is {}x{}, not square",
            n,
            a.ncols()
        )));
    }
    if b.nrows() != n {
        return Err(Error::dimension_mismatch("right-hand side rows", n, b.nrows()));
    }

    let scale = a.diag().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let tolerance = scale * PIVOT_TOLERANCE;

    let cholesky = to_nalgebra(a)
        .cholesky()
        .ok_or_else(|| Error::ill_conditioned("matrix is not positive definite"))?;
    let l = cholesky.l_dirty();
    for j in 0..n {
        let pivot = l[(j, j)] * l[(j, j)];
        if !pivot.is_finite() || pivot <= tolerance {
            return Err(Error::ill_conditioned(format!(
                "pivot {pivot:e} at column {j} is not positive (tolerance {tolerance:e})"
            )));
        }
    }

    Ok(to_ndarray(&cholesky.solve(&to_nalgebra(b))))
}

/// Solve the ridge normal equations `(XᵗX + λI) W = XᵗY`.
///
/// # Errors
///
/// [`Error::IllConditionedSystem`] when the regularized Gram matrix cannot
/// be factorised, [`Error::DimensionMismatch`] when `x` and `y` have a
/// different number of rows.
pub fn ridge_solve(x: &Array2<f64>, y: &Array2<f64>, lambda: f64) -> Result<Array2<f64>> {
    if x.nrows() != y.nrows() {
        return Err(Error::dimension_mismatch(
            "target rows",
            x.nrows(),
            y.nrows(),
        ));
    }
    let mut gram = x.t().dot(x);
    for i in 0..gram.nrows() {
        gram[[i, i]] += lambda;
    }
    let rhs = x.t().dot(y);
    solve_spd(&gram, &rhs)
}
