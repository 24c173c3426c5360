use statrs::function::erf::erf;

use crate::distribution::{ClosedSkewNormal, NormalDistribution};
use crate::error::{CsnError, CsnResult};
use crate::math::{DenseMatrix, DenseVector};
use crate::model::check_probit_scale;

/// Squared norm of the skewing direction of every pairwise difference.
///
/// Entry `(i, j)` is `|D Sigma (e_i - e_j)|^2`: how strongly the observed
/// comparisons tilt the distribution of `score_i - score_j`. The result is
/// symmetric with a zero diagonal.
///
/// # Arguments
///
/// * `model` - A model over `n` items, typically from `model_comparisons`.
///
/// # Returns
///
/// An `n x n` matrix of squared skewness norms.
pub fn comparison_skewness_norms<M: DenseMatrix>(model: &ClosedSkewNormal<M>) -> CsnResult<M> {
    model.validate_shapes()?;
    let d_sigma = model.d().matmul(model.sigma())?;
    let (m, n) = d_sigma.dims();

    let mut norms = M::zeros(n, n);
    for i in 0..n {
        for j in 0..i {
            let norm: f64 = (0..m)
                .map(|r| {
                    let diff = d_sigma.entry(r, i) - d_sigma.entry(r, j);
                    diff * diff
                })
                .sum();
            norms.set_entry(i, j, norm);
            norms.set_entry(j, i, norm);
        }
    }
    Ok(norms)
}

fn standard_normal_cdf(x: f64) -> f64 {
    (1.0 + erf(x / std::f64::consts::SQRT_2)) / 2.0
}

/// Probability that item `i` beats item `j` under the prior and the probit link.
///
/// `P(i beats j) = Phi((mean_i - mean_j) / sqrt(1 / probit_scale + Var(s_i - s_j)))`
///
/// # Arguments
///
/// * `prior` - Normal prior over the item scores.
/// * `probit_scale` - Inverse comparison noise variance.
///
/// # Returns
///
/// An `n x n` matrix with `0.5` on the diagonal and `P[i][j] + P[j][i] = 1`.
pub fn prior_win_probabilities<M: DenseMatrix>(
    prior: &NormalDistribution<M>,
    probit_scale: f64,
) -> CsnResult<M> {
    check_probit_scale(probit_scale)?;
    let mean = prior.mean();
    let cov = prior.covariance();
    let n = prior.dimension();
    let noise = 1.0 / probit_scale;

    let mut probabilities = M::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            let p = if i == j {
                0.5
            } else {
                let variance =
                    cov.entry(i, i) + cov.entry(j, j) - cov.entry(i, j) - cov.entry(j, i);
                let scale = (noise + variance.max(0.0)).sqrt();
                standard_normal_cdf((mean.entry(i) - mean.entry(j)) / scale)
            };
            probabilities.set_entry(i, j, p);
        }
    }
    Ok(probabilities)
}

/// Binary entropy in nats, with `0 ln 0 = 0`.
pub fn binary_entropy(p: f64) -> f64 {
    let term = |q: f64| if q > 0.0 { -q * q.ln() } else { 0.0 };
    term(p) + term(1.0 - p)
}

/// Entropy summary over all matchups of distinct items.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntropyStats {
    /// Mean entropy over ordered pairs of distinct items.
    pub expected_entropy: f64,
    /// The favoured item of the most uncertain matchup.
    pub max_entropy_winner: usize,
    /// The other item of the most uncertain matchup.
    pub max_entropy_loser: usize,
    pub max_entropy: f64,
}

/// Summarize how uncertain each matchup is.
///
/// `probabilities[(i, j)]` is the probability that item `i` beats item `j`,
/// e.g. from [`prior_win_probabilities`]. Picking the matchup with the highest
/// entropy is the natural choice for the next comparison to ask about.
pub fn comparison_entropy_stats<M: DenseMatrix>(
    probabilities: &M,
) -> CsnResult<ComparisonEntropyStats> {
    let (rows, cols) = probabilities.dims();
    if rows != cols {
        return Err(CsnError::mismatch(
            "comparison_entropy_stats",
            (rows, rows),
            (rows, cols),
        ));
    }
    if rows < 2 {
        return Err(CsnError::InvalidParameter {
            name: "probabilities",
            reason: format!("entropy needs at least 2 items, got {}", rows),
        });
    }

    let mut sum_entropy = 0.0;
    let mut max_entropy = f64::NEG_INFINITY;
    let mut max_matchup = (0, 1);
    for i in 0..rows {
        for j in 0..rows {
            if i == j {
                continue;
            }
            let p_i_wins = probabilities.entry(i, j);
            let entropy = binary_entropy(p_i_wins);
            sum_entropy += entropy;
            if entropy > max_entropy {
                max_entropy = entropy;
                max_matchup = if p_i_wins >= 0.5 { (i, j) } else { (j, i) };
            }
        }
    }

    Ok(ComparisonEntropyStats {
        expected_entropy: sum_entropy / (rows * (rows - 1)) as f64,
        max_entropy_winner: max_matchup.0,
        max_entropy_loser: max_matchup.1,
        max_entropy,
    })
}
