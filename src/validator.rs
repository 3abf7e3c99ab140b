//! Chi-square goodness-of-fit against a reference distribution.
//!
//! # Edge cases
//!
//! - A category with probability 0 that is never observed is left out of the
//!   statistic and of the degrees of freedom.
//! - A category with probability 0 that *is* observed makes the statistic
//!   undefined and raises [`MgatError::DegenerateDistribution`].
//! - Labels missing from the distribution are handled per
//!   [`UnknownCategoryPolicy`].

use crate::config::MgatConfig;
use crate::distribution::DistributionSpec;
use crate::error::{MgatError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::collections::BTreeMap;
use tracing::debug;

/// p-values below this are significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// What to do with an observed label that has no probability in the distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCategoryPolicy {
    /// Fail with [`MgatError::UnknownCategory`]
    #[default]
    Reject,
    /// Drop the label and count it in [`ValidationReport::unmatched`]
    Ignore,
}

/// Result of one goodness-of-fit test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub chi_square: f64,
    pub p_value: f64,
    pub significant: bool,
    pub degrees_of_freedom: usize,
    pub observed_counts: BTreeMap<String, usize>,
    pub expected_counts: BTreeMap<String, f64>,
    /// Labels dropped under [`UnknownCategoryPolicy::Ignore`]
    pub unmatched: usize,
}

/// Tests observed category labels against a reference distribution.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseValidator {
    unknown_categories: UnknownCategoryPolicy,
}

impl PhaseValidator {
    /// Create a validator that rejects unknown labels.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with an explicit unknown-label policy.
    pub fn with_policy(unknown_categories: UnknownCategoryPolicy) -> Self {
        Self { unknown_categories }
    }

    /// Create a validator using the policy from a loaded [`MgatConfig`].
    pub fn from_config(config: &MgatConfig) -> Self {
        Self::with_policy(config.unknown_categories)
    }

    /// Get the unknown-label policy.
    pub fn policy(&self) -> UnknownCategoryPolicy {
        self.unknown_categories
    }

    /// Pearson chi-square test of `observations` against `spec`.
    ///
    /// Expected counts are `n * p` where `n` is the number of observations
    /// matched to a category.
    pub fn validate<S: AsRef<str>>(
        &self,
        spec: &DistributionSpec,
        observations: &[S],
    ) -> Result<ValidationReport> {
        let mut observed_counts: BTreeMap<String, usize> =
            spec.categories().map(|c| (c.to_string(), 0)).collect();
        let mut unmatched = 0usize;

        for label in observations {
            let label = label.as_ref();
            match observed_counts.get_mut(label) {
                Some(count) => *count += 1,
                None => match self.unknown_categories {
                    UnknownCategoryPolicy::Reject => {
                        return Err(MgatError::UnknownCategory(label.to_string()));
                    }
                    UnknownCategoryPolicy::Ignore => {
                        debug!(label, "dropping observation outside the distribution");
                        unmatched += 1;
                    }
                },
            }
        }

        let n = observations.len() - unmatched;
        if n == 0 {
            return Err(MgatError::EmptyInput("no observations to validate".into()));
        }

        let expected_counts: BTreeMap<String, f64> = spec
            .iter()
            .map(|(c, p)| (c.to_string(), n as f64 * p))
            .collect();

        let mut chi_square = 0.0;
        let mut cells = 0usize;
        for (category, &expected) in &expected_counts {
            let observed = observed_counts.get(category).copied().unwrap_or(0);
            if expected <= 0.0 {
                if observed > 0 {
                    return Err(MgatError::DegenerateDistribution {
                        category: category.clone(),
                    });
                }
                continue;
            }
            let diff = observed as f64 - expected;
            chi_square += diff * diff / expected;
            cells += 1;
        }

        // n > 0 and the probabilities sum to 1, so at least one cell is included
        let degrees_of_freedom = cells.saturating_sub(1);
        let p_value = Self::chi_square_sf(chi_square, degrees_of_freedom)?;

        debug!(
            chi_square,
            p_value, degrees_of_freedom, n, unmatched, "phase distribution validated"
        );

        Ok(ValidationReport {
            chi_square,
            p_value,
            significant: p_value < SIGNIFICANCE_LEVEL,
            degrees_of_freedom,
            observed_counts,
            expected_counts,
            unmatched,
        })
    }

    /// Survival function of the chi-square distribution.
    ///
    /// With zero degrees of freedom the statistic is always 0 and p is 1.
    fn chi_square_sf(statistic: f64, degrees_of_freedom: usize) -> Result<f64> {
        if degrees_of_freedom == 0 {
            return Ok(1.0);
        }
        let dist = ChiSquared::new(degrees_of_freedom as f64)
            .map_err(|e| MgatError::Statistics(e.to_string()))?;
        Ok(dist.sf(statistic).clamp(0.0, 1.0))
    }
}
