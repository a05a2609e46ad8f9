//! Quality indicators for approximation fronts. Every indicator is
//! minimized; fronts and reference fronts are expected to be normalized.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use ev_types::hypervolume;
use ev_types::{config_error, EvError};

/// Reference point coordinate used by the normalized hypervolume.
pub const HYPERVOLUME_REFERENCE: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QualityIndicator {
    /// Additive epsilon.
    Epsilon,
    GenerationalDistance,
    InvertedGenerationalDistance,
    InvertedGenerationalDistancePlus,
    /// `1 - HV(front) / HV(reference front)`.
    NormalizedHypervolume,
    /// The evaluation budget of the run.
    Evaluations,
}

impl QualityIndicator {
    pub fn name(self) -> &'static str {
        match self {
            Self::Epsilon => "EP",
            Self::GenerationalDistance => "GD",
            Self::InvertedGenerationalDistance => "IGD",
            Self::InvertedGenerationalDistancePlus => "IGD+",
            Self::NormalizedHypervolume => "NHV",
            Self::Evaluations => "Evaluations",
        }
    }

    pub fn compute(self, front: &[Vec<f64>], reference: &[Vec<f64>], evaluations: usize) -> f64 {
        match self {
            Self::Epsilon => additive_epsilon(front, reference),
            Self::GenerationalDistance => generational_distance(front, reference),
            Self::InvertedGenerationalDistance => generational_distance(reference, front),
            Self::InvertedGenerationalDistancePlus => inverted_generational_distance_plus(front, reference),
            Self::NormalizedHypervolume => normalized_hypervolume(front, reference),
            Self::Evaluations => evaluations as f64,
        }
    }
}

impl fmt::Display for QualityIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityIndicator {
    type Err = EvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EP" | "EPSILON" => Ok(Self::Epsilon),
            "GD" => Ok(Self::GenerationalDistance),
            "IGD" => Ok(Self::InvertedGenerationalDistance),
            "IGD+" | "IGDPLUS" => Ok(Self::InvertedGenerationalDistancePlus),
            "NHV" | "HV" => Ok(Self::NormalizedHypervolume),
            "EVALUATIONS" => Ok(Self::Evaluations),
            _ => Err(config_error!("Unknown quality indicator: {}", s)),
        }
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}

/// Smallest `eps` such that every reference point is weakly dominated by
/// some front point shifted by `-eps`.
pub fn additive_epsilon(front: &[Vec<f64>], reference: &[Vec<f64>]) -> f64 {
    reference
        .iter()
        .map(|r| {
            front
                .iter()
                .map(|a| a.iter().zip(r).map(|(x, y)| x - y).fold(f64::NEG_INFINITY, f64::max))
                .fold(f64::INFINITY, f64::min)
        })
        .fold(f64::NEG_INFINITY, f64::max)
}

/// `sqrt(sum of squared nearest distances) / |from|`.
pub fn generational_distance(from: &[Vec<f64>], to: &[Vec<f64>]) -> f64 {
    if from.is_empty() {
        return 0.0;
    }
    let sum: f64 = from
        .iter()
        .map(|a| {
            let nearest = to.iter().map(|b| euclidean(a, b)).fold(f64::INFINITY, f64::min);
            nearest * nearest
        })
        .sum();
    sum.sqrt() / from.len() as f64
}

pub fn inverted_generational_distance_plus(front: &[Vec<f64>], reference: &[Vec<f64>]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let total: f64 = reference
        .iter()
        .map(|r| {
            front
                .iter()
                .map(|a| {
                    a.iter()
                        .zip(r)
                        .map(|(x, y)| (x - y).max(0.0).powi(2))
                        .sum::<f64>()
                        .sqrt()
                })
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / reference.len() as f64
}

pub fn normalized_hypervolume(front: &[Vec<f64>], reference: &[Vec<f64>]) -> f64 {
    let objectives = reference.first().map(Vec::len).unwrap_or(0);
    let point = vec![HYPERVOLUME_REFERENCE; objectives];
    let reference_volume = hypervolume(reference, &point);
    if reference_volume <= 0.0 {
        return 0.0;
    }
    1.0 - hypervolume(front, &point) / reference_volume
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Vec<Vec<f64>> {
        vec![vec![0.0, 1.0], vec![0.5, 0.5], vec![1.0, 0.0]]
    }

    #[test]
    fn reference_front_scores_perfectly() {
        let front = reference();
        for indicator in [
            QualityIndicator::Epsilon,
            QualityIndicator::GenerationalDistance,
            QualityIndicator::InvertedGenerationalDistance,
            QualityIndicator::InvertedGenerationalDistancePlus,
            QualityIndicator::NormalizedHypervolume,
        ] {
            let value = indicator.compute(&front, &reference(), 100);
            assert!(value.abs() < 1e-12, "{indicator} = {value}");
        }
    }

    #[test]
    fn epsilon_of_shifted_front() {
        let front: Vec<Vec<f64>> = reference()
            .into_iter()
            .map(|p| p.into_iter().map(|v| v + 0.25).collect())
            .collect();
        assert!((additive_epsilon(&front, &reference()) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn igd_of_single_point() {
        let front = vec![vec![0.0, 0.0]];
        // distances 1, sqrt(0.5), 1 -> sqrt(2.5) / 3
        let expected = 2.5f64.sqrt() / 3.0;
        assert!((generational_distance(&reference(), &front) - expected).abs() < 1e-12);
        assert_eq!(inverted_generational_distance_plus(&front, &reference()), 0.0);
    }

    #[test]
    fn worse_front_has_larger_normalized_hypervolume() {
        let good = vec![vec![0.1, 0.6], vec![0.6, 0.1]];
        let bad = vec![vec![0.8, 0.9]];
        let good_score = normalized_hypervolume(&good, &reference());
        let bad_score = normalized_hypervolume(&bad, &reference());
        assert!(good_score < bad_score);
        assert!(bad_score <= 1.0);
    }

    #[test]
    fn names_parse_back() {
        for indicator in [
            QualityIndicator::Epsilon,
            QualityIndicator::GenerationalDistance,
            QualityIndicator::InvertedGenerationalDistance,
            QualityIndicator::InvertedGenerationalDistancePlus,
            QualityIndicator::NormalizedHypervolume,
            QualityIndicator::Evaluations,
        ] {
            assert_eq!(indicator.name().parse::<QualityIndicator>().unwrap(), indicator);
        }
        assert!("spread".parse::<QualityIndicator>().is_err());
        assert_eq!(QualityIndicator::Evaluations.compute(&[], &[], 5000), 5000.0);
    }
}
