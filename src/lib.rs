//! # mgat: Multi-Geometric Attention
//!
//! mgat builds fixed attention-weight matrices ("geometries"), measures
//! activation vectors through them, and tests observed phase labels against a
//! reference distribution.
//!
//! ## Quick Start
//!
//! ```rust
//! use mgat::{Geometry, GeometricAttention, NeuralState};
//!
//! let attention = GeometricAttention::new(16)?;
//! let state = NeuralState::random_unit(16, 123);
//!
//! for geometry in Geometry::ALL {
//!     let measured = attention.measure(&state, geometry)?;
//!     let summary = attention.describe(geometry);
//!     println!("{geometry}: H={:.2} C={:.2} |v|={:.3}",
//!         summary.entropy, summary.connectivity, measured.norm());
//! }
//! # Ok::<(), mgat::MgatError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Patterns**: row-stochastic matrices for the sequential, associative,
//!   hierarchical and creative geometries ([`PatternLibrary`])
//! - **Measurement**: `A·v / ‖A·v‖`, plus entropy and connectivity
//!   ([`AttentionMeasurement`])
//! - **Validation**: chi-square goodness-of-fit of phase labels
//!   ([`PhaseValidator`])

pub mod config;
pub mod distribution;
pub mod dynamics;
pub mod error;
pub mod library;
pub mod mapping;
pub mod matrix;
pub mod measurement;
pub mod pattern;
pub mod phase;
pub mod state;
pub mod validator;

// Re-exports for convenience
pub use config::MgatConfig;
pub use distribution::DistributionSpec;
pub use dynamics::{AttentionDynamics, ModeSchedule, Trajectory};
pub use error::{MgatError, Result};
pub use library::{PatternCache, PatternLibrary};
pub use mapping::{GeometricMapper, Lattice};
pub use matrix::AttentionMatrix;
pub use measurement::{AttentionMeasurement, GeometrySummary};
pub use pattern::{AttentionPattern, Geometry};
pub use phase::{Phase, PhaseClassifier};
pub use state::NeuralState;
pub use validator::{PhaseValidator, UnknownCategoryPolicy, ValidationReport};

/// Convenience wrapper owning a [`PatternLibrary`].
///
/// Delegates to [`AttentionMeasurement`] and [`AttentionDynamics`]; it adds
/// no behaviour of its own.
///
/// # Example
///
/// ```rust
/// use mgat::{Geometry, GeometricAttention, NeuralState};
///
/// let attention = GeometricAttention::new(8)?;
/// let measured = attention.measure(&NeuralState::random_unit(8, 1), Geometry::Associative)?;
/// assert!((measured.norm() - 1.0).abs() < 1e-4);
/// # Ok::<(), mgat::MgatError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GeometricAttention {
    library: PatternLibrary,
}

impl GeometricAttention {
    /// Create an instance with the default seed.
    pub fn new(dimensions: usize) -> Result<Self> {
        Ok(Self {
            library: PatternLibrary::new(dimensions)?,
        })
    }

    /// Create an instance with a specific seed for the creative pattern.
    pub fn with_seed(dimensions: usize, seed: u64) -> Result<Self> {
        Ok(Self {
            library: PatternLibrary::with_seed(dimensions, seed)?,
        })
    }

    /// Create an instance from a loaded [`MgatConfig`].
    pub fn from_config(config: &MgatConfig) -> Result<Self> {
        Self::with_seed(config.dimensions, config.seed)
    }

    /// Get the dimension of every pattern.
    pub fn dimensions(&self) -> usize {
        self.library.dimensions()
    }

    /// Get the underlying pattern library.
    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Get the pattern for `geometry`.
    pub fn pattern(&self, geometry: Geometry) -> &AttentionPattern {
        self.library.pattern(geometry)
    }

    // =========================================================================
    // Measurement
    // =========================================================================

    /// Measure `state` through the pattern for `geometry`.
    pub fn measure(&self, state: &NeuralState, geometry: Geometry) -> Result<NeuralState> {
        AttentionMeasurement::measure(self.pattern(geometry), state)
    }

    /// Entropy of the pattern for `geometry`, in bits.
    pub fn entropy(&self, geometry: Geometry) -> f64 {
        AttentionMeasurement::entropy(self.pattern(geometry).matrix())
    }

    /// Fraction of entries above the connectivity threshold.
    pub fn connectivity(&self, geometry: Geometry) -> f64 {
        AttentionMeasurement::connectivity(self.pattern(geometry).matrix())
    }

    /// Entropy and connectivity of the pattern for `geometry`.
    pub fn describe(&self, geometry: Geometry) -> GeometrySummary {
        AttentionMeasurement::describe(self.pattern(geometry))
    }

    /// Summaries for all four geometries in canonical order.
    pub fn describe_all(&self) -> Vec<GeometrySummary> {
        self.library.iter().map(AttentionMeasurement::describe).collect()
    }

    // =========================================================================
    // Dynamics
    // =========================================================================

    /// Run `initial` through a schedule of geometries.
    pub fn evolve(&self, initial: &NeuralState, schedule: &ModeSchedule) -> Result<Trajectory> {
        AttentionDynamics::run(&self.library, initial, schedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation() {
        let attention = GeometricAttention::new(16).unwrap();
        assert_eq!(attention.dimensions(), 16);
        assert!(GeometricAttention::new(0).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = MgatConfig {
            dimensions: 12,
            seed: 7,
            ..Default::default()
        };
        let attention = GeometricAttention::from_config(&config).unwrap();
        assert_eq!(attention.dimensions(), 12);
        assert_eq!(attention.library().seed(), 7);
    }

    #[test]
    fn test_geometries_produce_distinct_states() {
        let attention = GeometricAttention::new(16).unwrap();
        let state = NeuralState::random_unit(16, 123);

        let measured: Vec<NeuralState> = Geometry::ALL
            .iter()
            .map(|&g| attention.measure(&state, g).unwrap())
            .collect();

        for i in 0..measured.len() {
            for j in (i + 1)..measured.len() {
                assert_ne!(measured[i], measured[j]);
            }
        }
    }

    #[test]
    fn test_describe_all() {
        let attention = GeometricAttention::new(8).unwrap();
        let summaries = attention.describe_all();
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[2].geometry, Geometry::Hierarchical);
        assert!((summaries[2].connectivity - 0.5625).abs() < 1e-12);
        assert_eq!(attention.connectivity(Geometry::Creative), 1.0);
        assert!(attention.entropy(Geometry::Associative) > 0.0);
    }

    #[test]
    fn test_evolve() {
        let attention = GeometricAttention::new(12).unwrap();
        let trajectory = attention
            .evolve(&NeuralState::random_unit(12, 0), &ModeSchedule::cognitive_task(3))
            .unwrap();
        assert_eq!(trajectory.len(), 12);
    }

    #[test]
    fn test_phase_pipeline() {
        // Classify texts, validate the labels, and map the dominant phase
        let classifier = PhaseClassifier::new();
        let texts = ["connect the pieces", "combine both", "build it", "aha, I see"];
        let labels: Vec<&str> = classifier
            .classify_all(&texts)
            .into_iter()
            .map(Phase::name)
            .collect();

        let report = PhaseValidator::new()
            .validate(&DistributionSpec::empirical(), &labels)
            .unwrap();
        assert_eq!(report.observed_counts["integration"], 2);
        assert_eq!(report.degrees_of_freedom, 3);

        let mapper = GeometricMapper::new();
        assert_eq!(mapper.phase_to_geometry(Phase::Integration), Geometry::Associative);
    }
}
