//! Joint distribution of all ordered pairwise score differences.
//!
//! For `n` items the query map `A` has one row per ordered pair `(i, j)`,
//! stored at [`pair_index`]`(n, i, j) = i * n + j`, with `+1` in column `i`
//! and `-1` in column `j`. Rows with `i == j` are zero and row `(j, i)` is
//! the negation of row `(i, j)`, so `A Sigma A^T` has rank at most `n - 1`
//! and the pushforward goes through a generalized inverse.
//!
//! The map is `n^2 x n` and the transformed scale matrix is `n^2 x n^2`;
//! memory grows with `n^4`.
use crate::distribution::ClosedSkewNormal;
use crate::error::CsnResult;
use crate::math::{DenseMatrix, DenseVector};

/// Row of the query map holding `score_i - score_j`.
pub fn pair_index(items: usize, i: usize, j: usize) -> usize {
    i * items + j
}

/// Query map `A` (`n^2 x n`) and zero offset `b` (length `n^2`).
pub fn pairwise_difference_map<M: DenseMatrix>(items: usize) -> (M, M::Vector) {
    let pairs = items * items;
    let mut a = M::zeros(pairs, items);
    for i in 0..items {
        for j in 0..items {
            let row = pair_index(items, i, j);
            // Diagonal pairs cancel to a zero row.
            a.set_entry(row, i, a.entry(row, i) + 1.0);
            a.set_entry(row, j, a.entry(row, j) - 1.0);
        }
    }
    (a, M::Vector::zeros(pairs))
}

/// Distribution of `score_i - score_j` for every ordered pair of items.
///
/// Marginal `pair_index(n, i, j)` of the result is the posterior-shaped
/// distribution of the score difference that decides whether item `i` is
/// judged to beat item `j` under the probit link.
pub fn comparison_probit_distribution_from_model<M: DenseMatrix>(
    model: &ClosedSkewNormal<M>,
) -> CsnResult<ClosedSkewNormal<M>> {
    model.validate_shapes()?;
    let items = model.d().ncols();
    log::debug!(
        "building pairwise difference distribution for {} items ({} pairs, {} comparisons)",
        items,
        items * items,
        model.latent_dimension()
    );

    let (a, b) = pairwise_difference_map::<M>(items);
    model.affine_transform_generalized(&a, &b)
}
