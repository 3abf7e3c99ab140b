//! Reference categorical distributions.

use crate::error::{MgatError, Result};
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How far the probabilities may sum from 1.
pub const SUM_TOLERANCE: f64 = 1e-6;

/// A validated mapping from category label to expected probability.
///
/// Probabilities are finite, non-negative, and sum to 1 within
/// [`SUM_TOLERANCE`]. Deserializing runs the same checks as
/// [`DistributionSpec::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct DistributionSpec {
    probabilities: BTreeMap<String, f64>,
}

impl DistributionSpec {
    /// Validate and build a distribution.
    pub fn new<I, K>(probabilities: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let probabilities: BTreeMap<String, f64> = probabilities
            .into_iter()
            .map(|(k, p)| (k.into(), p))
            .collect();

        if probabilities.is_empty() {
            return Err(MgatError::InvalidDistribution("no categories".into()));
        }
        for (label, &p) in &probabilities {
            if !p.is_finite() || p < 0.0 {
                return Err(MgatError::InvalidDistribution(format!(
                    "category '{}' has probability {}",
                    label, p
                )));
            }
        }
        let total: f64 = probabilities.values().sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(MgatError::InvalidDistribution(format!(
                "probabilities sum to {}, expected 1",
                total
            )));
        }

        Ok(Self { probabilities })
    }

    /// The empirically observed phase distribution.
    pub fn empirical() -> Self {
        Self {
            probabilities: Phase::ALL
                .iter()
                .map(|p| (p.name().to_string(), p.empirical_probability()))
                .collect(),
        }
    }

    /// Parse a JSON object of `label: probability` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, f64> = serde_json::from_str(json)?;
        Self::new(raw)
    }

    pub fn probability(&self, label: &str) -> Option<f64> {
        self.probabilities.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.probabilities.contains_key(label)
    }

    /// Category labels in sorted order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.probabilities.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.probabilities.iter().map(|(k, &p)| (k.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }
}

impl TryFrom<BTreeMap<String, f64>> for DistributionSpec {
    type Error = MgatError;

    fn try_from(probabilities: BTreeMap<String, f64>) -> Result<Self> {
        Self::new(probabilities)
    }
}

impl From<DistributionSpec> for BTreeMap<String, f64> {
    fn from(spec: DistributionSpec) -> Self {
        spec.probabilities
    }
}
