//! Inversion routines shared by every [`DenseMatrix`] backend.
//!
//! Both routines copy the backend matrix into a `nalgebra::DMatrix`, factor it
//! there and copy the result back, so any backend gets the same numerics.
//!
//! [`invert`] is the exact inverse used by the strict affine pushforward. It
//! runs an LU decomposition with partial pivoting and reports
//! `SingularMatrix` as soon as a pivot of `U` falls under `SINGULAR_TOLERANCE`
//! relative to the largest entry, so callers never see NaN or infinite
//! results from a rank-deficient input.
//!
//! [`psd_generalized_inverse`] handles the symmetric positive semi-definite
//! matrices produced by rank-deficient maps. The matrix is first rescaled to
//! unit diagonal, `C = W S W` with `W = diag(S)^-1/2`, then `C` is
//! pseudo-inverted through its symmetric eigendecomposition and the result is
//! mapped back as `W C^+ W`. Eigenvalues at or below `RANK_TOLERANCE` times the
//! largest eigenvalue of `C` are dropped. Measuring rank on `C` keeps items
//! whose variances differ by many orders of magnitude from being cut off.
use nalgebra::{DMatrix, DVector};

use crate::error::{CsnError, CsnResult};
use crate::math::DenseMatrix;

/// Pivots at or below this fraction of the largest entry count as zero.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Eigenvalues of the unit-diagonal matrix at or below this fraction of the
/// largest one count as zero.
pub const RANK_TOLERANCE: f64 = 1e-10;

fn check_square<M: DenseMatrix>(operation: &'static str, matrix: &M) -> CsnResult<usize> {
    let (rows, cols) = matrix.dims();
    if rows != cols {
        return Err(CsnError::mismatch(operation, (rows, rows), (rows, cols)));
    }
    Ok(rows)
}

fn to_dmatrix<M: DenseMatrix>(operation: &'static str, matrix: &M) -> CsnResult<DMatrix<f64>> {
    let (rows, cols) = matrix.dims();
    let dense = DMatrix::from_fn(rows, cols, |r, c| matrix.entry(r, c));
    if dense.iter().any(|v| !v.is_finite()) {
        return Err(CsnError::NonFinite { operation });
    }
    Ok(dense)
}

fn from_dmatrix<M: DenseMatrix>(dense: &DMatrix<f64>) -> M {
    let mut out = M::zeros(dense.nrows(), dense.ncols());
    for r in 0..dense.nrows() {
        for c in 0..dense.ncols() {
            out.set_entry(r, c, dense[(r, c)]);
        }
    }
    out
}

/// Invert a square matrix through its LU decomposition.
pub fn invert<M: DenseMatrix>(matrix: &M) -> CsnResult<M> {
    let n = check_square("inverse", matrix)?;
    let dense = to_dmatrix("inverse", matrix)?;
    if n == 0 {
        return Ok(M::zeros(0, 0));
    }

    let threshold = SINGULAR_TOLERANCE * dense.amax();
    let lu = dense.lu();
    let smallest_pivot = lu.u().diagonal().amin();
    if smallest_pivot <= threshold {
        log::trace!(
            "pivot {:e} under {:e} in {}x{} matrix",
            smallest_pivot,
            threshold,
            n,
            n
        );
        return Err(CsnError::SingularMatrix { size: n });
    }

    let inverse = lu
        .try_inverse()
        .ok_or(CsnError::SingularMatrix { size: n })?;
    Ok(from_dmatrix(&inverse))
}

/// Symmetric generalized inverse `G` of a PSD matrix `S`.
///
/// `G` satisfies `S G S = S` and `G S G = G`. It equals the inverse when `S`
/// is invertible and the Moore-Penrose inverse when the diagonal of `S` is
/// constant. Rows and columns with a zero diagonal map to zero.
pub fn psd_generalized_inverse<M: DenseMatrix>(matrix: &M) -> CsnResult<M> {
    let n = check_square("generalized_inverse", matrix)?;
    let dense = to_dmatrix("generalized_inverse", matrix)?;
    if n == 0 {
        return Ok(M::zeros(0, 0));
    }

    let weights: DVector<f64> = dense
        .diagonal()
        .map(|v| if v > 0.0 { 1.0 / v.sqrt() } else { 0.0 });
    let scaling = DMatrix::from_diagonal(&weights);
    let unit_diagonal = &scaling * &dense * &scaling;

    // Symmetrize before the eigensolver; products leave rounding asymmetry.
    let unit_diagonal = (&unit_diagonal + unit_diagonal.transpose()) * 0.5;
    let eigen = unit_diagonal.symmetric_eigen();
    let largest = eigen.eigenvalues.iter().fold(0.0f64, |acc, &v| acc.max(v));
    let cutoff = RANK_TOLERANCE * largest;

    let rank = eigen.eigenvalues.iter().filter(|&&v| v > cutoff).count();
    log::trace!("generalized inverse of {}x{} matrix with rank {}", n, n, rank);

    let inverted = eigen
        .eigenvalues
        .map(|v| if v > cutoff { 1.0 / v } else { 0.0 });
    let core = &eigen.eigenvectors
        * DMatrix::from_diagonal(&inverted)
        * eigen.eigenvectors.transpose();
    Ok(from_dmatrix(&(&scaling * core * &scaling)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Array2;

    fn matrix(rows: usize, cols: usize, values: &[f64]) -> Array2<f64> {
        Array2::from_shape_vec((rows, cols), values.to_vec()).unwrap()
    }

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((x - y).abs() < tol, "{} != {}\n{}\n{}", x, y, a, b);
        }
    }

    #[test]
    fn test_invert_2x2() {
        let m = matrix(2, 2, &[4.0, 7.0, 2.0, 6.0]);
        let inv = invert(&m).unwrap();
        assert_close(&inv, &matrix(2, 2, &[0.6, -0.7, -0.2, 0.4]), 1e-12);
    }

    #[test]
    fn test_invert_needs_pivoting() {
        let m = matrix(3, 3, &[0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 2.0]);
        let inv = invert(&m).unwrap();
        let product = m.matmul(&inv).unwrap();
        assert_close(&product, &Array2::<f64>::eye(3), 1e-12);
    }

    #[test]
    fn test_invert_singular() {
        let m = matrix(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(invert(&m), Err(CsnError::SingularMatrix { size: 2 }));
        let zero = Array2::<f64>::zeros(3, 3);
        assert_eq!(invert(&zero), Err(CsnError::SingularMatrix { size: 3 }));
    }

    #[test]
    fn test_invert_non_square() {
        let m = matrix(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert!(matches!(invert(&m), Err(CsnError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_invert_non_finite() {
        let m = matrix(2, 2, &[1.0, f64::NAN, 0.0, 1.0]);
        assert_eq!(
            invert(&m),
            Err(CsnError::NonFinite {
                operation: "inverse"
            })
        );
        let m = matrix(2, 2, &[f64::INFINITY, 0.0, 0.0, 1.0]);
        assert!(matches!(
            psd_generalized_inverse(&m),
            Err(CsnError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_invert_empty() {
        let m = Array2::<f64>::zeros(0, 0);
        assert_eq!(invert(&m).unwrap().shape(), (0, 0));
    }

    #[test]
    fn test_generalized_inverse_matches_inverse_when_full_rank() {
        let m = matrix(2, 2, &[2.0, 0.5, 0.5, 1.0]);
        let pinv = psd_generalized_inverse(&m).unwrap();
        assert_close(&pinv, &invert(&m).unwrap(), 1e-10);
    }

    #[test]
    fn test_generalized_inverse_rank_deficient() {
        // 2 v v^T with v = (1, -1), pseudo-inverse is v v^T / 8
        let m = matrix(2, 2, &[2.0, -2.0, -2.0, 2.0]);
        let pinv = psd_generalized_inverse(&m).unwrap();
        assert_close(&pinv, &matrix(2, 2, &[0.125, -0.125, -0.125, 0.125]), 1e-12);

        // S G S = S
        let roundtrip = m.matmul(&pinv).unwrap().matmul(&m).unwrap();
        assert_close(&roundtrip, &m, 1e-12);
    }

    #[test]
    fn test_generalized_inverse_keeps_small_scales() {
        let m = matrix(2, 2, &[1e6, 0.0, 0.0, 1e-6]);
        let pinv = psd_generalized_inverse(&m).unwrap();
        assert!((pinv[(0, 0)] - 1e-6).abs() < 1e-18);
        assert!((pinv[(1, 1)] - 1e6).abs() < 1e-4);

        // Rank one direction next to a tiny independent variance.
        let m = matrix(
            3,
            3,
            &[
                1e6, 1e6, 0.0, //
                1e6, 1e6, 0.0, //
                0.0, 0.0, 1e-8,
            ],
        );
        let pinv = psd_generalized_inverse(&m).unwrap();
        let roundtrip = m.matmul(&pinv).unwrap().matmul(&m).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let scale = (m[(r, r)] * m[(c, c)]).sqrt().max(1e-300);
                assert!((roundtrip[(r, c)] - m[(r, c)]).abs() <= 1e-9 * scale);
            }
        }
        assert!((pinv[(2, 2)] - 1e8).abs() < 1e-2);
    }

    #[test]
    fn test_generalized_inverse_of_zero() {
        let m = Array2::<f64>::zeros(3, 3);
        assert_eq!(psd_generalized_inverse(&m).unwrap(), Array2::<f64>::zeros(3, 3));
    }
}
