//! Pattern Library: deterministic geometry → matrix mapping.
//!
//! A [`PatternLibrary`] builds all four attention patterns for one dimension
//! up front and is read-only afterwards. [`PatternCache`] hands out shared
//! libraries for callers that work with several dimensions.

use crate::error::{MgatError, Result};
use crate::pattern::{AttentionPattern, Geometry};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Seed used when none is given.
pub const DEFAULT_SEED: u64 = 42;

/// The four canonical attention patterns for a fixed dimension.
///
/// Patterns are built once at construction and never change, so a library can
/// be shared across threads without locking.
#[derive(Clone, Debug)]
pub struct PatternLibrary {
    dimensions: usize,
    seed: u64,
    /// Indexed by [`Geometry::index`]
    patterns: Vec<AttentionPattern>,
}

impl PatternLibrary {
    /// Create a library with the default seed.
    pub fn new(dimensions: usize) -> Result<Self> {
        Self::with_seed(dimensions, DEFAULT_SEED)
    }

    /// Create a library with a specific seed.
    ///
    /// The same `(dimensions, seed)` always yields bit-identical patterns.
    pub fn with_seed(dimensions: usize, seed: u64) -> Result<Self> {
        if dimensions == 0 {
            return Err(MgatError::EmptyInput("pattern dimension must be positive".into()));
        }

        let patterns: Vec<AttentionPattern> = Geometry::ALL
            .iter()
            .map(|&g| AttentionPattern::new(g, dimensions, seed))
            .collect();
        debug!(dimensions, seed, "built attention pattern library");

        Ok(Self {
            dimensions,
            seed,
            patterns,
        })
    }

    /// Get the dimensions.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Get the seed used for the creative pattern.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Look up a pattern by name and dimension.
    ///
    /// The name is checked first, so an unknown name is reported even when
    /// the dimension is also wrong.
    pub fn get(&self, name: &str, dim: usize) -> Result<&AttentionPattern> {
        let geometry: Geometry = name.parse()?;
        if dim != self.dimensions {
            return Err(MgatError::DimensionMismatch {
                expected: self.dimensions,
                got: dim,
            });
        }
        Ok(self.pattern(geometry))
    }

    /// Get the pattern for a geometry.
    pub fn pattern(&self, geometry: Geometry) -> &AttentionPattern {
        &self.patterns[geometry.index()]
    }

    /// Iterate over all patterns in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &AttentionPattern> {
        self.patterns.iter()
    }
}

/// Thread-safe cache of pattern libraries keyed by dimension.
///
/// Cloning the cache shares the underlying map.
#[derive(Clone, Debug)]
pub struct PatternCache {
    seed: u64,
    libraries: Arc<RwLock<HashMap<usize, Arc<PatternLibrary>>>>,
}

impl PatternCache {
    /// Create an empty cache with the default seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an empty cache whose libraries use `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            libraries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get the library for `dimensions`, building it on first use.
    pub fn library(&self, dimensions: usize) -> Result<Arc<PatternLibrary>> {
        // Check cache first
        {
            let cache = self.libraries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(library) = cache.get(&dimensions) {
                return Ok(Arc::clone(library));
            }
        }

        let library = Arc::new(PatternLibrary::with_seed(dimensions, self.seed)?);

        let mut cache = self.libraries.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race; keep whichever landed first
        let entry = cache.entry(dimensions).or_insert(library);
        Ok(Arc::clone(entry))
    }

    /// Get a copy of the named pattern at `dim`.
    pub fn get(&self, name: &str, dim: usize) -> Result<AttentionPattern> {
        let geometry: Geometry = name.parse()?;
        Ok(self.library(dim)?.pattern(geometry).clone())
    }

    /// Drop all cached libraries.
    pub fn clear(&self) {
        self.libraries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get the number of cached dimensions.
    pub fn len(&self) -> usize {
        self.libraries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
