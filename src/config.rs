use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::distribution::{ClosedSkewNormal, NormalDistribution};
use crate::error::{CsnError, CsnResult};
use crate::math::{DenseMatrix, DenseVector};
use crate::model::{model_comparisons_with_prior, Comparison};

/// Central configuration for comparison models.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ModelConfig {
    /// Inverse variance of the comparison noise.
    pub probit_scale: f64,

    #[serde(flatten)]
    pub prior: PriorConfig,
}

/// Supported priors over the item scores.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub enum PriorConfig {
    /// Independent scores sharing one mean and variance.
    Isotropic { mean: f64, variance: f64 },
    /// Independent scores with one mean and variance per item.
    Independent { means: Vec<f64>, variances: Vec<f64> },
}

impl Default for PriorConfig {
    fn default() -> Self {
        PriorConfig::Isotropic {
            mean: 0.0,
            variance: 1.0,
        }
    }
}

impl PriorConfig {
    /// Materialize the prior for `items` scores.
    pub fn prior<M: DenseMatrix>(&self, items: usize) -> CsnResult<NormalDistribution<M>> {
        match self {
            PriorConfig::Isotropic { mean, variance } => {
                NormalDistribution::isotropic(items, *mean, *variance)
            }
            PriorConfig::Independent { means, variances } => {
                if means.len() != items || variances.len() != items {
                    return Err(CsnError::mismatch(
                        "independent prior",
                        (items, items),
                        (means.len(), variances.len()),
                    ));
                }
                let mut covariance = M::zeros(items, items);
                for (i, &variance) in variances.iter().enumerate() {
                    if !(variance.is_finite() && variance >= 0.0) {
                        return Err(CsnError::InvalidParameter {
                            name: "variances",
                            reason: format!("item {} has variance {}", i, variance),
                        });
                    }
                    covariance.set_entry(i, i, variance);
                }
                NormalDistribution::new(M::Vector::from_values(means), covariance)
            }
        }
    }
}

impl FromStr for PriorConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "isotropic" | "standard" => Ok(PriorConfig::default()),
            _ => Err(format!(
                "Unknown prior: {}. Independent priors need explicit means and variances",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(probit_scale: f64, prior: PriorConfig) -> Self {
        Self {
            probit_scale,
            prior,
        }
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config {}", path.display()))?;
        let config: ModelConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse model config {}", path.display()))?;
        log::debug!("Loaded model config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn prior<M: DenseMatrix>(&self, items: usize) -> CsnResult<NormalDistribution<M>> {
        self.prior.prior(items)
    }

    /// Build the comparison model for `items` items from this configuration.
    pub fn build_model<M: DenseMatrix>(
        &self,
        items: usize,
        comparisons: &[Comparison],
    ) -> CsnResult<ClosedSkewNormal<M>> {
        let prior = self.prior::<M>(items)?;
        model_comparisons_with_prior(&prior, self.probit_scale, comparisons)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            probit_scale: 1.0,
            prior: PriorConfig::default(),
        }
    }
}
