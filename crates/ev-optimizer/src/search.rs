//! Outer search strategies over the normalized configuration space
//! `[0, 1]^d`.

use rand::Rng;

use ev_operators::{operator_rng, OperatorRng};
use ev_types::dominates;

/// Produces configuration vectors for the evaluator to score.
pub trait SearchStrategy: Send {
    /// Generate the next batch of vectors to evaluate.
    fn suggest(&mut self, count: usize) -> Vec<Vec<f64>>;

    /// Report the objectives of an evaluated vector so adaptive strategies
    /// can learn.
    fn report(&mut self, _vector: &[f64], _objectives: &[f64]) {}

    fn name(&self) -> &str;
}

/// Uniform sampling of the unit hypercube.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    dimension: usize,
    rng: OperatorRng,
}

impl RandomSearch {
    pub fn new(dimension: usize, seed: Option<u64>) -> Self {
        Self {
            dimension,
            rng: operator_rng(seed),
        }
    }

    fn sample_one(&mut self) -> Vec<f64> {
        (0..self.dimension).map(|_| self.rng.random::<f64>()).collect()
    }
}

impl SearchStrategy for RandomSearch {
    fn suggest(&mut self, count: usize) -> Vec<Vec<f64>> {
        (0..count).map(|_| self.sample_one()).collect()
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Random sampling biased toward the non-dominated vectors observed so far.
///
/// With probability `exploration_weight` a fresh uniform sample is drawn;
/// otherwise a non-dominated observation is perturbed coordinate-wise by at
/// most `step` and clamped back into the unit interval.
#[derive(Debug, Clone)]
pub struct PerturbationSearch {
    random: RandomSearch,
    observations: Vec<(Vec<f64>, Vec<f64>)>,
    exploration_weight: f64,
    step: f64,
}

impl PerturbationSearch {
    pub fn new(dimension: usize, exploration_weight: f64, seed: Option<u64>) -> Self {
        Self {
            random: RandomSearch::new(dimension, seed),
            observations: Vec::new(),
            exploration_weight,
            step: 0.1,
        }
    }

    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    fn non_dominated(&self) -> Vec<&Vec<f64>> {
        self.observations
            .iter()
            .filter(|(_, objectives)| {
                !self
                    .observations
                    .iter()
                    .any(|(_, other)| dominates(other, objectives))
            })
            .map(|(vector, _)| vector)
            .collect()
    }

    fn exploit(&mut self) -> Vec<f64> {
        let mut candidates: Vec<Vec<f64>> = self.non_dominated().into_iter().cloned().collect();
        if candidates.is_empty() {
            return self.random.sample_one();
        }
        let pick = self.random.rng.random_range(0..candidates.len());
        let base = candidates.swap_remove(pick);
        let step = self.step;
        base.into_iter()
            .map(|v| (v + self.random.rng.random_range(-step..=step)).clamp(0.0, 1.0))
            .collect()
    }
}

impl SearchStrategy for PerturbationSearch {
    fn suggest(&mut self, count: usize) -> Vec<Vec<f64>> {
        (0..count)
            .map(|_| {
                if self.observations.is_empty() || self.random.rng.random::<f64>() < self.exploration_weight {
                    self.random.sample_one()
                } else {
                    self.exploit()
                }
            })
            .collect()
    }

    fn report(&mut self, vector: &[f64], objectives: &[f64]) {
        self.observations.push((vector.to_vec(), objectives.to_vec()));
    }

    fn name(&self) -> &str {
        "perturbation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_search_stays_in_unit_cube() {
        let mut rs = RandomSearch::new(7, Some(1));
        let batch = rs.suggest(50);
        assert_eq!(batch.len(), 50);
        for vector in &batch {
            assert_eq!(vector.len(), 7);
            assert!(vector.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn seeded_searches_repeat() {
        let a = RandomSearch::new(4, Some(9)).suggest(3);
        let b = RandomSearch::new(4, Some(9)).suggest(3);
        assert_eq!(a, b);
    }

    #[test]
    fn perturbation_stays_near_non_dominated_observations() {
        let mut search = PerturbationSearch::new(3, 0.0, Some(2)).with_step(0.05);
        search.report(&[0.5, 0.5, 0.5], &[0.1, 0.1]);
        // dominated, never used as a base
        search.report(&[0.0, 0.0, 0.0], &[0.9, 0.9]);

        for vector in search.suggest(30) {
            assert!(vector.iter().all(|v| (v - 0.5).abs() <= 0.05 + 1e-12), "{vector:?}");
        }
    }

    #[test]
    fn perturbation_clamps_to_unit_interval() {
        let mut search = PerturbationSearch::new(2, 0.0, Some(4)).with_step(0.5);
        search.report(&[1.0, 0.0], &[0.2]);
        for vector in search.suggest(20) {
            assert!(vector.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}
