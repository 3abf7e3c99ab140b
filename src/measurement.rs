//! Attention as a measurement operator, plus pattern diagnostics.
//!
//! When compiled with the `simd` feature, the row-by-state dot products in
//! [`AttentionMeasurement::measure`] use SIMD-accelerated kernels.

use crate::error::{MgatError, Result};
use crate::matrix::AttentionMatrix;
use crate::pattern::{AttentionPattern, Geometry};
use crate::state::NeuralState;
use serde::{Deserialize, Serialize};

/// Added to the output norm before dividing in [`AttentionMeasurement::measure`].
pub const NORM_EPSILON: f64 = 1e-8;

/// Added inside the logarithm in [`AttentionMeasurement::entropy`].
pub const LOG_EPSILON: f64 = 1e-10;

/// Entries strictly above this count as connected.
pub const CONNECTIVITY_THRESHOLD: f64 = 0.01;

/// Scalar diagnostics for one pattern.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometrySummary {
    pub geometry: Geometry,
    pub entropy: f64,
    pub connectivity: f64,
}

/// Measurement and diagnostics over attention patterns.
pub struct AttentionMeasurement;

impl AttentionMeasurement {
    /// Apply a pattern to a state: `A·v / (‖A·v‖ + ε)`.
    ///
    /// Returns a new state; `state` is not modified.
    pub fn measure(pattern: &AttentionPattern, state: &NeuralState) -> Result<NeuralState> {
        Self::measure_matrix(pattern.matrix(), state)
    }

    /// [`measure`](Self::measure) on a bare matrix.
    pub fn measure_matrix(matrix: &AttentionMatrix, state: &NeuralState) -> Result<NeuralState> {
        if state.dimensions() != matrix.dim() {
            return Err(MgatError::DimensionMismatch {
                expected: matrix.dim(),
                got: state.dimensions(),
            });
        }

        let projected: Vec<f64> = matrix.rows().map(|row| Self::dot(row, state.data())).collect();
        let norm = projected.iter().map(|&x| x * x).sum::<f64>().sqrt();
        let denom = norm + NORM_EPSILON;

        Ok(NeuralState::from_vec(
            projected.into_iter().map(|x| x / denom).collect(),
        ))
    }

    #[cfg(feature = "simd")]
    fn dot(row: &[f64], x: &[f64]) -> f64 {
        use simsimd::SpatialSimilarity;
        f64::dot(row, x).unwrap_or_else(|| Self::dot_raw(row, x))
    }

    #[cfg(not(feature = "simd"))]
    fn dot(row: &[f64], x: &[f64]) -> f64 {
        Self::dot_raw(row, x)
    }

    fn dot_raw(row: &[f64], x: &[f64]) -> f64 {
        row.iter().zip(x.iter()).map(|(&a, &b)| a * b).sum()
    }

    /// Shannon entropy (bits) over the positive entries of the flattened matrix.
    ///
    /// Computes `-Σ p·log2(p + 1e-10)`. An all-zero matrix has entropy 0.
    pub fn entropy(matrix: &AttentionMatrix) -> f64 {
        let h: f64 = -matrix
            .data()
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * (p + LOG_EPSILON).log2())
            .sum::<f64>();

        // The log epsilon makes an exact one-hot row contribute a tiny negative amount
        h.max(0.0)
    }

    /// Fraction of entries strictly greater than [`CONNECTIVITY_THRESHOLD`].
    ///
    /// Returns a value in [0, 1]; an empty matrix has connectivity 0.
    pub fn connectivity(matrix: &AttentionMatrix) -> f64 {
        let total = matrix.data().len();
        if total == 0 {
            return 0.0;
        }
        let connected = matrix
            .data()
            .iter()
            .filter(|&&v| v > CONNECTIVITY_THRESHOLD)
            .count();

        connected as f64 / total as f64
    }

    /// Entropy and connectivity of a pattern.
    pub fn describe(pattern: &AttentionPattern) -> GeometrySummary {
        GeometrySummary {
            geometry: pattern.geometry(),
            entropy: Self::entropy(pattern.matrix()),
            connectivity: Self::connectivity(pattern.matrix()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::PatternLibrary;

    #[test]
    fn test_measure_unit_norm() {
        let lib = PatternLibrary::new(8).unwrap();
        let state = NeuralState::from_vec(vec![1.0, -2.0, 0.5, 3.0, 0.0, -1.0, 2.0, 0.25]);
        for pattern in lib.iter() {
            let measured = AttentionMeasurement::measure(pattern, &state).unwrap();
            assert_eq!(measured.dimensions(), 8);
            assert!((measured.norm() - 1.0).abs() < 1e-4, "{}", pattern.name());
        }
    }

    #[test]
    fn test_measure_does_not_mutate() {
        let lib = PatternLibrary::new(4).unwrap();
        let state = NeuralState::from_vec(vec![1.0, 0.0, 0.0, 0.0]);
        let before = state.clone();
        AttentionMeasurement::measure(lib.pattern(Geometry::Associative), &state).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_measure_identity() {
        let m = AttentionMatrix::identity(3);
        let state = NeuralState::from_vec(vec![0.0, 3.0, 4.0]);
        let measured = AttentionMeasurement::measure_matrix(&m, &state).unwrap();
        assert!((measured[1] - 0.6).abs() < 1e-7);
        assert!((measured[2] - 0.8).abs() < 1e-7);
    }

    #[test]
    fn test_measure_zero_state() {
        let lib = PatternLibrary::new(8).unwrap();
        let measured =
            AttentionMeasurement::measure(lib.pattern(Geometry::Creative), &NeuralState::zeros(8))
                .unwrap();
        assert!(measured.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_measure_dimension_mismatch() {
        let lib = PatternLibrary::new(8).unwrap();
        let state = NeuralState::from_vec(vec![1.0; 5]);
        let err = AttentionMeasurement::measure(lib.pattern(Geometry::Sequential), &state)
            .unwrap_err();
        assert!(matches!(
            err,
            MgatError::DimensionMismatch {
                expected: 8,
                got: 5
            }
        ));
    }

    #[test]
    fn test_entropy_identity_is_zero() {
        assert_eq!(AttentionMeasurement::entropy(&AttentionMatrix::identity(8)), 0.0);
    }

    #[test]
    fn test_entropy_all_zero() {
        assert_eq!(AttentionMeasurement::entropy(&AttentionMatrix::zeros(8)), 0.0);
    }

    #[test]
    fn test_entropy_uniform_row() {
        // One row of four 0.25 entries: 4 * 0.25 * 2 bits = 2 bits
        let m = AttentionMatrix::from_rows(vec![
            vec![0.25, 0.25, 0.25, 0.25],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ])
        .unwrap();
        assert!((AttentionMeasurement::entropy(&m) - 2.0).abs() < 1e-8);
    }

    #[test]
    fn test_entropy_ordering() {
        let lib = PatternLibrary::new(8).unwrap();
        let seq = AttentionMeasurement::entropy(lib.pattern(Geometry::Sequential).matrix());
        let assoc = AttentionMeasurement::entropy(lib.pattern(Geometry::Associative).matrix());
        let creative = AttentionMeasurement::entropy(lib.pattern(Geometry::Creative).matrix());

        assert!(assoc > 0.0);
        assert!(seq < assoc);
        // A dense softmax of [0, 1] noise is close to uniform: 8 rows * 3 bits
        assert!(creative > assoc);
        assert!(creative <= 24.0 + 1e-9);
    }

    #[test]
    fn test_connectivity_hierarchical() {
        let lib = PatternLibrary::new(8).unwrap();
        let c = AttentionMeasurement::connectivity(lib.pattern(Geometry::Hierarchical).matrix());
        assert!((c - 36.0 / 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_connectivity_bounds() {
        let lib = PatternLibrary::new(8).unwrap();
        for pattern in lib.iter() {
            let c = AttentionMeasurement::connectivity(pattern.matrix());
            assert!((0.0..=1.0).contains(&c));
        }
        assert_eq!(
            AttentionMeasurement::connectivity(lib.pattern(Geometry::Creative).matrix()),
            1.0
        );
        // Tridiagonal band: 8 + 2 * 7 = 22 entries
        let seq = AttentionMeasurement::connectivity(lib.pattern(Geometry::Sequential).matrix());
        assert!((seq - 22.0 / 64.0).abs() < 1e-12);
    }

    #[test]
    fn test_describe() {
        let lib = PatternLibrary::new(8).unwrap();
        let summary = AttentionMeasurement::describe(lib.pattern(Geometry::Hierarchical));
        assert_eq!(summary.geometry, Geometry::Hierarchical);
        assert!((summary.connectivity - 0.5625).abs() < 1e-12);
        assert!(summary.entropy > 0.0);
    }
}
