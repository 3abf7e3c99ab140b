//! Configuration for the high-level API.

use crate::error::Result;
use crate::library::DEFAULT_SEED;
use crate::validator::UnknownCategoryPolicy;
use serde::{Deserialize, Serialize};

/// Settings for [`GeometricAttention`](crate::GeometricAttention) and
/// [`PhaseValidator`](crate::PhaseValidator).
///
/// Every field has a default, so `{}` is a valid JSON config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MgatConfig {
    /// Pattern dimension
    pub dimensions: usize,
    /// Seed for the creative pattern
    pub seed: u64,
    /// What the validator does with labels missing from the distribution
    pub unknown_categories: UnknownCategoryPolicy,
}

impl MgatConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for MgatConfig {
    fn default() -> Self {
        Self {
            dimensions: 8,
            seed: DEFAULT_SEED,
            unknown_categories: UnknownCategoryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(MgatConfig::from_json("{}").unwrap(), MgatConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            MgatConfig::from_json(r#"{"dimensions": 16, "unknown_categories": "ignore"}"#).unwrap();
        assert_eq!(config.dimensions, 16);
        assert_eq!(config.seed, DEFAULT_SEED);
        assert_eq!(config.unknown_categories, UnknownCategoryPolicy::Ignore);
    }

    #[test]
    fn test_bad_json() {
        assert!(MgatConfig::from_json(r#"{"dimensions": "eight"}"#).is_err());
    }
}
