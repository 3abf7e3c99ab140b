//! Neural state vectors.
//!
//! A [`NeuralState`] is a real-valued activation vector. Measuring a state
//! through an attention pattern always produces a new state; inputs are
//! never modified.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A real-valued activation vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NeuralState {
    data: Vec<f64>,
}

impl NeuralState {
    /// Create a zero state of given dimensionality.
    pub fn zeros(dimensions: usize) -> Self {
        Self {
            data: vec![0.0; dimensions],
        }
    }

    /// Create a state from raw values.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Draw a unit-norm state from a seeded standard normal.
    pub fn random_unit(dimensions: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data: Vec<f64> = (0..dimensions).map(|_| rng.sample(StandardNormal)).collect();
        Self::from_vec(data).normalized()
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Consume the state and return its values.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Compute the L2 norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|&x| x * x).sum::<f64>().sqrt()
    }

    /// Return a unit-normalized copy.
    ///
    /// A (near-)zero state stays zero.
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm < 1e-10 {
            return Self::zeros(self.dimensions());
        }
        Self::from_vec(self.data.iter().map(|&v| v / norm).collect())
    }
}

impl From<Vec<f64>> for NeuralState {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

impl Index<usize> for NeuralState {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let s = NeuralState::zeros(16);
        assert_eq!(s.dimensions(), 16);
        assert_eq!(s.norm(), 0.0);
    }

    #[test]
    fn test_normalized() {
        let s = NeuralState::from_vec(vec![3.0, 4.0]);
        let n = s.normalized();
        assert!((n[0] - 0.6).abs() < 1e-12);
        assert!((n[1] - 0.8).abs() < 1e-12);
        // Original untouched
        assert_eq!(s.data(), &[3.0, 4.0]);
    }

    #[test]
    fn test_random_unit() {
        let a = NeuralState::random_unit(16, 123);
        let b = NeuralState::random_unit(16, 123);
        assert_eq!(a, b);
        assert!((a.norm() - 1.0).abs() < 1e-12);
        assert_ne!(a, NeuralState::random_unit(16, 124));
    }

    #[test]
    fn test_serializes_as_array() {
        let s = NeuralState::from_vec(vec![1.0, -0.5]);
        assert_eq!(serde_json::to_string(&s).unwrap(), "[1.0,-0.5]");
    }
}
