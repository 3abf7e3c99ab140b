//! Hypothesized phase → geometry mapping.
//!
//! This mapping is a theoretical interpretation, not an empirical result. Each
//! [`GeometricMapper`] says so once, through a `tracing` warning, the first
//! time it is asked to map a phase.

use crate::error::Result;
use crate::pattern::Geometry;
use crate::phase::Phase;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// Lattice shape associated with each geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lattice {
    Square,
    Triangular,
    Hexagonal,
    Pentagonal,
}

impl Lattice {
    /// Number of neighbours per lattice site.
    pub fn connectivity(self) -> usize {
        match self {
            Lattice::Square => 4,
            Lattice::Triangular => 3,
            Lattice::Hexagonal => 6,
            Lattice::Pentagonal => 5,
        }
    }

    pub fn symmetry(self) -> &'static str {
        match self {
            Lattice::Square => "translational",
            Lattice::Triangular => "rigid",
            Lattice::Hexagonal => "optimal_packing",
            Lattice::Pentagonal => "aperiodic",
        }
    }

    pub fn geometry(self) -> Geometry {
        match self {
            Lattice::Square => Geometry::Sequential,
            Lattice::Triangular => Geometry::Hierarchical,
            Lattice::Hexagonal => Geometry::Associative,
            Lattice::Pentagonal => Geometry::Creative,
        }
    }
}

/// Maps phases to the geometry hypothesized to produce them.
///
/// The warning flag belongs to the instance: two mappers each warn once.
#[derive(Debug, Default)]
pub struct GeometricMapper {
    warning_shown: AtomicBool,
}

impl GeometricMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lattice hypothesized for a phase.
    pub fn lattice(phase: Phase) -> Lattice {
        match phase {
            Phase::Generation => Lattice::Square,
            Phase::Consumption => Lattice::Triangular,
            Phase::Integration => Lattice::Hexagonal,
            Phase::Transformation => Lattice::Pentagonal,
        }
    }

    /// Geometry hypothesized for a phase.
    pub fn phase_to_geometry(&self, phase: Phase) -> Geometry {
        if !self.warning_shown.swap(true, Ordering::Relaxed) {
            warn!("phase to geometry mapping is theoretical and not empirically validated");
        }
        Self::lattice(phase).geometry()
    }

    /// [`phase_to_geometry`](Self::phase_to_geometry) for a phase label.
    pub fn map_label(&self, label: &str) -> Result<Geometry> {
        Ok(self.phase_to_geometry(label.parse()?))
    }

    pub fn warning_shown(&self) -> bool {
        self.warning_shown.load(Ordering::Relaxed)
    }
}
