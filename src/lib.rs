//! csn-rank: closed skew-normal models of item scores from pairwise comparisons.
//!
//! A Gaussian prior over latent item scores combined with probit observations
//! of the form "item A beats item B" has a closed skew-normal (CSN) posterior.
//! This crate builds that distribution in closed form
//! ([`model::model_comparisons`]), pushes it through affine maps
//! ([`distribution::ClosedSkewNormal::affine_transform`]) and derives the joint
//! distribution of all pairwise score differences
//! ([`pairwise::comparison_probit_distribution_from_model`]).
//!
//! All linear algebra goes through the [`math::DenseMatrix`] backend trait.
//! The crate's own `math::Array2<f64>` is the default backend and
//! `ndarray::Array2<f64>` is supported as well.
pub mod config;
pub mod distribution;
pub mod error;
pub mod math;
pub mod model;
pub mod pairwise;
pub mod stats;

pub use distribution::{ClosedSkewNormal, NormalDistribution};
pub use error::{CsnError, CsnResult};
pub use model::{model_comparisons, Comparison, Item};
pub use pairwise::comparison_probit_distribution_from_model;
