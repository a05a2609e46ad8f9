//! Scalarizing functions for decomposition-based algorithms.

use serde::{Deserialize, Serialize};

/// Weights equal to zero are replaced by this value in Tschebyscheff forms.
const MIN_WEIGHT: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalarizingFunction {
    Tschebyscheff,
    WeightedSum,
    PenaltyBoundaryIntersection { theta: f64 },
    ModifiedTschebyscheff,
}

/// A scalarizing function with optional objective normalization by the
/// ideal and nadir points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationFunction {
    function: ScalarizingFunction,
    normalization_epsilon: Option<f64>,
}

impl AggregationFunction {
    pub fn new(function: ScalarizingFunction) -> Self {
        Self {
            function,
            normalization_epsilon: None,
        }
    }

    pub fn with_normalization(mut self, epsilon: f64) -> Self {
        self.normalization_epsilon = Some(epsilon);
        self
    }

    pub fn function(&self) -> ScalarizingFunction {
        self.function
    }

    pub fn normalizes(&self) -> bool {
        self.normalization_epsilon.is_some()
    }

    /// Value of `objectives` for the sub-problem with `weights` (lower is better).
    pub fn compute(&self, objectives: &[f64], weights: &[f64], ideal: &[f64], nadir: &[f64]) -> f64 {
        // Distances to the ideal point, normalized when requested.
        let shifted: Vec<f64> = objectives
            .iter()
            .enumerate()
            .map(|(i, f)| match self.normalization_epsilon {
                Some(epsilon) => (f - ideal[i]) / (nadir[i] - ideal[i] + epsilon),
                None => f - ideal[i],
            })
            .collect();

        match self.function {
            ScalarizingFunction::Tschebyscheff => shifted
                .iter()
                .zip(weights)
                .map(|(d, w)| w.max(MIN_WEIGHT) * d.abs())
                .fold(f64::NEG_INFINITY, f64::max),
            ScalarizingFunction::ModifiedTschebyscheff => shifted
                .iter()
                .zip(weights)
                .map(|(d, w)| d.abs() / w.max(MIN_WEIGHT))
                .fold(f64::NEG_INFINITY, f64::max),
            ScalarizingFunction::WeightedSum => shifted.iter().zip(weights).map(|(d, w)| w * d).sum(),
            ScalarizingFunction::PenaltyBoundaryIntersection { theta } => {
                let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
                let d1 = shifted.iter().zip(weights).map(|(d, w)| d * w).sum::<f64>().abs() / norm;
                let d2 = shifted
                    .iter()
                    .zip(weights)
                    .map(|(d, w)| (d - d1 * w / norm).powi(2))
                    .sum::<f64>()
                    .sqrt();
                d1 + theta * d2
            }
        }
    }
}
