//! Conversational phases and keyword classification.
//!
//! Four phases were observed in language-model output with a stable
//! distribution. [`PhaseClassifier`] assigns a text to a phase by counting
//! marker phrases.

use crate::error::{MgatError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A conversational phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Transformation,
    Generation,
    Consumption,
    Integration,
}

impl Phase {
    /// All phases in classification priority order.
    pub const ALL: [Phase; 4] = [
        Phase::Transformation,
        Phase::Generation,
        Phase::Consumption,
        Phase::Integration,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Transformation => "transformation",
            Phase::Generation => "generation",
            Phase::Consumption => "consumption",
            Phase::Integration => "integration",
        }
    }

    /// Observed share of this phase.
    pub fn empirical_probability(self) -> f64 {
        match self {
            Phase::Transformation => 0.097,
            Phase::Generation => 0.218,
            Phase::Consumption => 0.299,
            Phase::Integration => 0.386,
        }
    }

    /// Marker phrases counted by the classifier.
    pub fn markers(self) -> &'static [&'static str] {
        match self {
            Phase::Transformation => &["breakthrough", "insight", "realize", "aha"],
            Phase::Generation => &["create", "generate", "produce", "build"],
            Phase::Consumption => &["analyze", "break down", "examine", "dissect"],
            Phase::Integration => &["connect", "combine", "synthesize", "merge"],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Phase {
    type Err = MgatError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Phase::ALL
            .into_iter()
            .find(|p| p.name() == lowered)
            .ok_or_else(|| MgatError::UnknownCategory(s.to_string()))
    }
}

/// Keyword-based phase classifier.
///
/// Each phase scores one point per marker phrase found (as a substring) in the
/// lowercased text. The highest score wins; ties go to the phase listed first
/// in [`Phase::ALL`]. Text with no markers is classified as
/// [`Phase::Integration`], the most common phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct PhaseClassifier;

impl PhaseClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Marker count per phase.
    pub fn scores(&self, text: &str) -> [(Phase, usize); 4] {
        let lowered = text.to_lowercase();
        Phase::ALL.map(|phase| {
            let score = phase
                .markers()
                .iter()
                .filter(|marker| lowered.contains(**marker))
                .count();
            (phase, score)
        })
    }

    pub fn classify(&self, text: &str) -> Phase {
        let mut best = (Phase::Integration, 0);
        for (phase, score) in self.scores(text) {
            if score > best.1 {
                best = (phase, score);
            }
        }
        best.0
    }

    pub fn classify_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Phase> {
        texts.iter().map(|t| self.classify(t.as_ref())).collect()
    }
}
