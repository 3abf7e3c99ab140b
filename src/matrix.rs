//! Square matrix type for attention patterns.
//!
//! Matrices are stored row-major as f64. Every pattern built by
//! [`PatternLibrary`](crate::PatternLibrary) is row-stochastic: entries are
//! non-negative and each row sums to 1.

use crate::error::{MgatError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A dense `dim × dim` matrix of attention weights.
///
/// Deserializing checks that `data` holds exactly `dim * dim` entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct AttentionMatrix {
    dim: usize,
    /// Row-major entries, `dim * dim` long
    data: Vec<f64>,
}

impl AttentionMatrix {
    /// Create a zero matrix of given dimension.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            data: vec![0.0; dim * dim],
        }
    }

    /// Create the identity matrix.
    pub fn identity(dim: usize) -> Self {
        Self::from_fn(dim, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Build a matrix by evaluating `f(i, j)` for every entry.
    pub fn from_fn<F>(dim: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                data.push(f(i, j));
            }
        }
        Self { dim, data }
    }

    /// Create a matrix from explicit rows.
    ///
    /// Fails if there are no rows or the rows do not form a square.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let dim = rows.len();
        if dim == 0 {
            return Err(MgatError::EmptyInput("matrix has no rows".into()));
        }
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(MgatError::DimensionMismatch {
                    expected: dim,
                    got: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { dim, data })
    }

    /// Get the dimension (number of rows, equal to number of columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get the raw row-major entries.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Get one row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; a 0-dim matrix has no data anyway
        self.data.chunks_exact(self.dim.max(1))
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.rows().map(|row| row.iter().sum()).collect()
    }

    /// Return the transpose.
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.dim, |i, j| self[(j, i)])
    }

    /// Apply `f` to every entry in place.
    pub fn map_inplace<F>(&mut self, f: F)
    where
        F: Fn(f64) -> f64,
    {
        for v in self.data.iter_mut() {
            *v = f(*v);
        }
    }

    /// Divide every row by `row_sum + epsilon`.
    ///
    /// With `epsilon = 0.0` an all-zero row produces NaN; callers that can
    /// produce such rows pass a small positive epsilon.
    pub fn normalize_rows(&mut self, epsilon: f64) {
        let dim = self.dim.max(1);
        for row in self.data.chunks_exact_mut(dim) {
            let denom = row.iter().sum::<f64>() + epsilon;
            for v in row.iter_mut() {
                *v /= denom;
            }
        }
    }

    /// Check that entries are non-negative and every row sums to 1 within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        self.data.iter().all(|&v| v >= 0.0)
            && self.row_sums().iter().all(|s| (s - 1.0).abs() <= tolerance)
    }

    /// Check `m[i][j] == m[j][i]` within `tolerance`.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        (0..self.dim).all(|i| (0..i).all(|j| (self[(i, j)] - self[(j, i)]).abs() <= tolerance))
    }

    /// Count non-zero entries.
    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// Copy out as nested rows (for renderers that want a 2-D array).
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

#[derive(Deserialize)]
struct RawMatrix {
    dim: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for AttentionMatrix {
    type Error = MgatError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        if raw.dim.checked_mul(raw.dim) != Some(raw.data.len()) {
            return Err(MgatError::DimensionMismatch {
                expected: raw.dim.saturating_mul(raw.dim),
                got: raw.data.len(),
            });
        }
        Ok(Self {
            dim: raw.dim,
            data: raw.data,
        })
    }
}

impl Index<(usize, usize)> for AttentionMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.dim + j]
    }
}
