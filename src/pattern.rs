//! The four canonical attention geometries.
//!
//! Each geometry is a fixed weighting scheme over positions:
//!
//! - **Sequential**: local, band-limited (tridiagonal) attention
//! - **Associative**: Gaussian kernel over ring distance (wraps around)
//! - **Hierarchical**: uniform attention over the causal prefix
//! - **Creative**: dense, symmetric, seeded-random softmax
//!
//! All constructors return row-stochastic matrices.

use crate::error::{MgatError, Result};
use crate::matrix::AttentionMatrix;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Epsilon added to the hierarchical row sums before dividing.
pub const HIERARCHICAL_EPSILON: f64 = 1e-8;

/// Names one of the four attention geometries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    Sequential,
    Associative,
    Hierarchical,
    Creative,
}

impl Geometry {
    /// All geometries in canonical order.
    pub const ALL: [Geometry; 4] = [
        Geometry::Sequential,
        Geometry::Associative,
        Geometry::Hierarchical,
        Geometry::Creative,
    ];

    /// Lowercase name used in lookups and serialized output.
    pub fn name(self) -> &'static str {
        match self {
            Geometry::Sequential => "sequential",
            Geometry::Associative => "associative",
            Geometry::Hierarchical => "hierarchical",
            Geometry::Creative => "creative",
        }
    }

    /// Position in [`Geometry::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Build this geometry's matrix.
    ///
    /// `seed` only affects [`Geometry::Creative`].
    pub fn build(self, dim: usize, seed: u64) -> AttentionMatrix {
        match self {
            Geometry::Sequential => sequential(dim),
            Geometry::Associative => associative(dim),
            Geometry::Hierarchical => hierarchical(dim),
            Geometry::Creative => creative(dim, seed),
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Geometry {
    type Err = MgatError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Geometry::ALL
            .into_iter()
            .find(|g| g.name() == lowered)
            .ok_or_else(|| MgatError::UnknownPattern(s.to_string()))
    }
}

/// A named, immutable attention matrix.
///
/// Only built through [`AttentionPattern::new`], so the matrix always matches
/// its geometry. Serializes for renderers but does not deserialize.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttentionPattern {
    geometry: Geometry,
    matrix: AttentionMatrix,
}

impl AttentionPattern {
    /// Build the pattern for `geometry` at `dim`.
    pub fn new(geometry: Geometry, dim: usize, seed: u64) -> Self {
        Self {
            geometry,
            matrix: geometry.build(dim, seed),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn name(&self) -> &'static str {
        self.geometry.name()
    }

    pub fn matrix(&self) -> &AttentionMatrix {
        &self.matrix
    }

    pub fn dim(&self) -> usize {
        self.matrix.dim()
    }
}

/// Distance between two indices on a ring of `dim` positions.
///
/// Both indices must be below `dim`.
pub fn circular_distance(i: usize, j: usize, dim: usize) -> usize {
    debug_assert!(i < dim && j < dim, "ring index out of range: ({}, {}) on {}", i, j, dim);
    let d = i.abs_diff(j);
    d.min(dim - d)
}

/// Band-limited attention: weight `1 / (1 + |i - j|)` for neighbours within one step.
pub fn sequential(dim: usize) -> AttentionMatrix {
    let mut m = AttentionMatrix::from_fn(dim, |i, j| {
        let d = i.abs_diff(j);
        if d <= 1 {
            1.0 / (1.0 + d as f64)
        } else {
            0.0
        }
    });
    m.normalize_rows(0.0);
    m
}

/// Periodic Gaussian kernel: weight `exp(-0.5 * (d / 2)^2)` on ring distance `d`.
pub fn associative(dim: usize) -> AttentionMatrix {
    let mut m = AttentionMatrix::from_fn(dim, |i, j| {
        let d = circular_distance(i, j, dim) as f64;
        (-0.5 * (d / 2.0).powi(2)).exp()
    });
    m.normalize_rows(0.0);
    m
}

/// Causal attention: row `i` spreads uniformly over positions `0..=i`.
pub fn hierarchical(dim: usize) -> AttentionMatrix {
    let mut m = AttentionMatrix::from_fn(dim, |i, j| if j <= i { 1.0 / (i + 1) as f64 } else { 0.0 });
    m.normalize_rows(HIERARCHICAL_EPSILON);
    m
}

/// Dense symmetric pattern from seeded uniform noise, softmax-normalized per row.
///
/// Values are drawn row-major from a ChaCha8 stream whose seed is derived from
/// `seed` and the geometry name, so the same `(seed, dim)` always yields the
/// same matrix.
pub fn creative(dim: usize, seed: u64) -> AttentionMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_seed(seed, Geometry::Creative));
    let noise = AttentionMatrix::from_fn(dim, |_, _| rng.gen::<f64>());
    let transposed = noise.transpose();
    let mut m = AttentionMatrix::from_fn(dim, |i, j| (noise[(i, j)] + transposed[(i, j)]) / 2.0);
    m.map_inplace(f64::exp);
    m.normalize_rows(0.0);
    m
}

/// Derive a per-geometry generator seed.
///
/// Uses SHA-256 of (seed || geometry name) and takes the first 8 bytes.
fn derive_seed(seed: u64, geometry: Geometry) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(geometry.name().as_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash[..8]);
    u64::from_le_bytes(bytes)
}
