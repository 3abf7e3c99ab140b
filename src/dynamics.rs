//! Attention dynamics: repeated measurement under a schedule of geometries.
//!
//! Models shifts between attention modes over time (for example focus, then
//! insight, then memory, then abstraction). Each step measures the previous
//! state through the scheduled pattern.

use crate::error::{MgatError, Result};
use crate::library::PatternLibrary;
use crate::measurement::AttentionMeasurement;
use crate::pattern::Geometry;
use crate::state::NeuralState;
use serde::{Deserialize, Serialize};

/// Ordered sequence of geometries, one per time step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSchedule {
    modes: Vec<Geometry>,
}

impl ModeSchedule {
    pub fn new(modes: Vec<Geometry>) -> Self {
        Self { modes }
    }

    /// Concatenate `(geometry, steps)` blocks.
    pub fn from_blocks(blocks: &[(Geometry, usize)]) -> Self {
        let modes = blocks
            .iter()
            .flat_map(|&(g, steps)| std::iter::repeat(g).take(steps))
            .collect();
        Self { modes }
    }

    /// Focus, insight, consolidation, abstraction: sequential, creative,
    /// associative, then hierarchical, `steps` each.
    pub fn cognitive_task(steps: usize) -> Self {
        Self::from_blocks(&[
            (Geometry::Sequential, steps),
            (Geometry::Creative, steps),
            (Geometry::Associative, steps),
            (Geometry::Hierarchical, steps),
        ])
    }

    pub fn modes(&self) -> &[Geometry] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

/// States and pattern entropies recorded at every step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub modes: Vec<Geometry>,
    pub states: Vec<NeuralState>,
    pub entropies: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn final_state(&self) -> Option<&NeuralState> {
        self.states.last()
    }

    /// States as a `dimensions × steps` grid (one row per neuron), for heatmaps.
    pub fn state_matrix(&self) -> Vec<Vec<f64>> {
        let dims = self.states.first().map_or(0, NeuralState::dimensions);
        (0..dims)
            .map(|d| self.states.iter().map(|s| s[d]).collect())
            .collect()
    }
}

/// Runs a state through a schedule of attention patterns.
pub struct AttentionDynamics;

impl AttentionDynamics {
    pub fn run(
        library: &PatternLibrary,
        initial: &NeuralState,
        schedule: &ModeSchedule,
    ) -> Result<Trajectory> {
        if initial.dimensions() != library.dimensions() {
            return Err(MgatError::DimensionMismatch {
                expected: library.dimensions(),
                got: initial.dimensions(),
            });
        }

        let entropy_by_geometry =
            Geometry::ALL.map(|g| AttentionMeasurement::entropy(library.pattern(g).matrix()));

        let mut states = Vec::with_capacity(schedule.len());
        let mut entropies = Vec::with_capacity(schedule.len());
        let mut state = initial.clone();

        for &mode in schedule.modes() {
            state = AttentionMeasurement::measure(library.pattern(mode), &state)?;
            states.push(state.clone());
            entropies.push(entropy_by_geometry[mode.index()]);
        }

        Ok(Trajectory {
            modes: schedule.modes().to_vec(),
            states,
            entropies,
        })
    }
}
