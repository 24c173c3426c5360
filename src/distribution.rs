//! Normal and closed skew-normal distributions.
//!
//! `X ~ CSN(mu, Sigma, D, nu, Delta)` is `Normal(mu, Sigma)` reweighted by the
//! probability that a latent `m`-dimensional normal variable, with location
//! `nu` and scale `Delta` and coupled to `X` through `D (X - mu)`, falls in
//! the non-negative orthant. The family is closed under affine maps, which is
//! all the ranking model needs: observed comparisons become rows of `D`, and
//! queries about score differences are pushforwards.
//!
//! Both types are immutable values generic over a [`DenseMatrix`] backend.
//! Every transform returns a new instance.
use crate::error::{CsnError, CsnResult};
use crate::math::linalg;
use crate::math::{Array2, DenseMatrix, DenseVector};

/// Multivariate normal distribution `Normal(mean, covariance)`.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalDistribution<M: DenseMatrix = Array2<f64>> {
    mean: M::Vector,
    covariance: M,
}

impl<M: DenseMatrix> NormalDistribution<M> {
    pub fn new(mean: M::Vector, covariance: M) -> CsnResult<Self> {
        let n = mean.len();
        if covariance.dims() != (n, n) {
            return Err(CsnError::mismatch(
                "normal covariance",
                (n, n),
                covariance.dims(),
            ));
        }
        Ok(Self { mean, covariance })
    }

    /// Standard normal `Normal(0, I_n)`.
    pub fn standard(dimension: usize) -> Self {
        Self {
            mean: M::Vector::zeros(dimension),
            covariance: M::identity(dimension),
        }
    }

    /// Independent components sharing one mean and one variance.
    pub fn isotropic(dimension: usize, mean: f64, variance: f64) -> CsnResult<Self> {
        if !(variance.is_finite() && variance >= 0.0) {
            return Err(CsnError::InvalidParameter {
                name: "variance",
                reason: format!("must be finite and non-negative, got {}", variance),
            });
        }
        Ok(Self {
            mean: M::Vector::from_values(&vec![mean; dimension]),
            covariance: M::identity(dimension).scale(variance),
        })
    }

    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    pub fn mean(&self) -> &M::Vector {
        &self.mean
    }

    pub fn covariance(&self) -> &M {
        &self.covariance
    }
}

/// Closed skew-normal distribution `CSN(mu, Sigma, D, nu, Delta)`.
///
/// `mu` has length `n`, `Sigma` is `n x n`, `D` is `m x n`, `nu` has length
/// `m` and `Delta` is `m x m`. `Sigma` and `Delta` are expected to be
/// symmetric positive semi-definite; only the shapes are checked.
#[derive(Clone, Debug, PartialEq)]
pub struct ClosedSkewNormal<M: DenseMatrix = Array2<f64>> {
    mu: M::Vector,
    sigma: M,
    d: M,
    nu: M::Vector,
    delta: M,
}

impl<M: DenseMatrix> ClosedSkewNormal<M> {
    pub fn new(mu: M::Vector, sigma: M, d: M, nu: M::Vector, delta: M) -> CsnResult<Self> {
        let csn = Self {
            mu,
            sigma,
            d,
            nu,
            delta,
        };
        csn.validate_shapes()?;
        Ok(csn)
    }

    /// Check that all five parameters agree on `n` and `m`.
    pub fn validate_shapes(&self) -> CsnResult<()> {
        let n = self.mu.len();
        let m = self.nu.len();
        if self.sigma.dims() != (n, n) {
            return Err(CsnError::mismatch("csn sigma", (n, n), self.sigma.dims()));
        }
        if self.d.dims() != (m, n) {
            return Err(CsnError::mismatch("csn skewing matrix", (m, n), self.d.dims()));
        }
        if self.delta.dims() != (m, m) {
            return Err(CsnError::mismatch("csn delta", (m, m), self.delta.dims()));
        }
        Ok(())
    }

    /// Number of observed dimensions `n`.
    pub fn dimension(&self) -> usize {
        self.mu.len()
    }

    /// Number of truncation dimensions `m`.
    pub fn latent_dimension(&self) -> usize {
        self.nu.len()
    }

    pub fn mu(&self) -> &M::Vector {
        &self.mu
    }

    pub fn sigma(&self) -> &M {
        &self.sigma
    }

    pub fn d(&self) -> &M {
        &self.d
    }

    pub fn nu(&self) -> &M::Vector {
        &self.nu
    }

    pub fn delta(&self) -> &M {
        &self.delta
    }

    /// Distribution of `Y = A X + b`.
    ///
    /// ```text
    /// mu_Y    = A mu + b
    /// Sigma_Y = A Sigma A^T
    /// D_Y     = D Sigma A^T Sigma_Y^-1
    /// nu_Y    = nu
    /// Delta_Y = Delta + D Sigma D^T - D_Y A Sigma D^T
    /// ```
    ///
    /// Fails with `SingularMatrix` when `Sigma_Y` is not invertible, which
    /// happens whenever `A` has linearly dependent rows or more rows than the
    /// rank of `Sigma`.
    pub fn affine_transform(&self, a: &M, b: &M::Vector) -> CsnResult<Self> {
        self.pushforward(a, b, |sigma_y| sigma_y.inverse())
    }

    /// Same pushforward as [`affine_transform`](Self::affine_transform) with
    /// `Sigma_Y^-1` replaced by a symmetric generalized inverse
    /// ([`linalg::psd_generalized_inverse`]).
    ///
    /// `D_Y (Y - mu_Y)` is then the conditional mean of `D (X - mu)` given
    /// `Y` and `Delta_Y` its conditional covariance, so the result stays exact
    /// for rank-deficient `A` where `Y` lives on an affine subspace.
    pub fn affine_transform_generalized(&self, a: &M, b: &M::Vector) -> CsnResult<Self> {
        self.pushforward(a, b, linalg::psd_generalized_inverse::<M>)
    }

    fn pushforward<F>(&self, a: &M, b: &M::Vector, invert: F) -> CsnResult<Self>
    where
        F: Fn(&M) -> CsnResult<M>,
    {
        let n = self.dimension();
        let k = a.nrows();
        if a.ncols() != n {
            return Err(CsnError::mismatch("affine map", (k, n), a.dims()));
        }
        if b.len() != k {
            return Err(CsnError::mismatch("affine offset", (k, 1), (b.len(), 1)));
        }
        log::trace!(
            "pushing CSN(n={}, m={}) through a {}x{} affine map",
            n,
            self.latent_dimension(),
            k,
            n
        );

        let a_t = a.transpose();
        let sigma_a_t = self.sigma.matmul(&a_t)?;
        let d_sigma = self.d.matmul(&self.sigma)?;

        let mu_y = a.matvec(&self.mu)?.add(b)?;
        let sigma_y = a.matmul(&sigma_a_t)?;
        let d_y = d_sigma.matmul(&a_t)?.matmul(&invert(&sigma_y)?)?;
        let d_t = self.d.transpose();
        let a_sigma_d_t = a.matmul(&self.sigma)?.matmul(&d_t)?;
        let delta_y = self
            .delta
            .add(&d_sigma.matmul(&d_t)?)?
            .sub(&d_y.matmul(&a_sigma_d_t)?)?;

        Ok(Self {
            mu: mu_y,
            sigma: sigma_y,
            d: d_y,
            nu: self.nu.clone(),
            delta: delta_y,
        })
    }
}

impl<M: DenseMatrix> From<NormalDistribution<M>> for ClosedSkewNormal<M> {
    /// A normal distribution is a CSN without truncation dimensions.
    fn from(normal: NormalDistribution<M>) -> Self {
        let n = normal.dimension();
        Self {
            mu: normal.mean,
            sigma: normal.covariance,
            d: M::zeros(0, n),
            nu: M::Vector::zeros(0),
            delta: M::zeros(0, 0),
        }
    }
}
