//! Probit model of latent item scores from pairwise comparisons.
//!
//! Each comparison `winner > loser` adds one truncation dimension to the
//! prior: row `i` of the skewing matrix computes
//! `score[winner_i] - score[loser_i]`, and the comparison noise has variance
//! `1 / probit_scale`.
use serde::{Deserialize, Serialize};

use crate::distribution::{ClosedSkewNormal, NormalDistribution};
use crate::error::{CsnError, CsnResult};
use crate::math::{DenseMatrix, DenseVector};

/// A ranked entity. Only its index takes part in the model.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub text: String,
}

impl Item {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Observation that item `winner` scored higher than item `loser`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comparison {
    pub winner: usize,
    pub loser: usize,
}

impl Comparison {
    pub fn new(winner: usize, loser: usize) -> Self {
        Self { winner, loser }
    }
}

/// Reject probit scales that would not give a finite, PSD `Delta`.
pub(crate) fn check_probit_scale(probit_scale: f64) -> CsnResult<()> {
    if probit_scale == 0.0 || !probit_scale.is_finite() {
        return Err(CsnError::DivideByZero {
            name: "probit_scale",
        });
    }
    if probit_scale < 0.0 {
        return Err(CsnError::InvalidParameter {
            name: "probit_scale",
            reason: format!("must be positive, got {}", probit_scale),
        });
    }
    Ok(())
}

/// Skewing matrix with `+1` at `(i, winner_i)` and `-1` at `(i, loser_i)`.
pub fn comparison_matrix<M: DenseMatrix>(items: usize, comparisons: &[Comparison]) -> CsnResult<M> {
    let mut d = M::zeros(comparisons.len(), items);
    for (i, comparison) in comparisons.iter().enumerate() {
        for item in [comparison.winner, comparison.loser] {
            if item >= items {
                return Err(CsnError::ItemOutOfRange {
                    comparison: i,
                    item,
                    items,
                });
            }
        }
        if comparison.winner == comparison.loser {
            return Err(CsnError::SelfComparison {
                comparison: i,
                item: comparison.winner,
            });
        }
        d.set_entry(i, comparison.winner, 1.0);
        d.set_entry(i, comparison.loser, -1.0);
    }
    Ok(d)
}

/// Combine a `Normal(prior_mean, prior_covariance)` prior over `n` item
/// scores with `m` probit comparisons.
///
/// The result is `CSN(mu, Sigma, D, nu, Delta)` with `mu = prior_mean`,
/// `Sigma = prior_covariance`, `D` from [`comparison_matrix`],
/// `nu = -D prior_mean` and `Delta = I_m / probit_scale`.
pub fn model_comparisons<M: DenseMatrix>(
    prior_mean: &M::Vector,
    prior_covariance: &M,
    probit_scale: f64,
    comparisons: &[Comparison],
) -> CsnResult<ClosedSkewNormal<M>> {
    let n = prior_mean.len();
    let m = comparisons.len();
    if prior_covariance.dims() != (n, n) {
        return Err(CsnError::mismatch(
            "prior covariance",
            (n, n),
            prior_covariance.dims(),
        ));
    }
    check_probit_scale(probit_scale)?;

    let d: M = comparison_matrix(n, comparisons)?;
    let nu = d.matvec(prior_mean)?.scale(-1.0);
    let delta = M::identity(m).scale(1.0 / probit_scale);
    log::debug!(
        "modelled {} comparisons over {} items with probit scale {}",
        m,
        n,
        probit_scale
    );

    ClosedSkewNormal::new(prior_mean.clone(), prior_covariance.clone(), d, nu, delta)
}

/// [`model_comparisons`] taking the prior as a [`NormalDistribution`].
pub fn model_comparisons_with_prior<M: DenseMatrix>(
    prior: &NormalDistribution<M>,
    probit_scale: f64,
    comparisons: &[Comparison],
) -> CsnResult<ClosedSkewNormal<M>> {
    model_comparisons(prior.mean(), prior.covariance(), probit_scale, comparisons)
}
