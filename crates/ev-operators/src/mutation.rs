//! Per-variable mutations for real-coded solutions.

use rand::Rng;
use std::fmt;

use ev_types::Solution;

use crate::repair::RepairStrategy;
use crate::OperatorRng;

pub trait Mutation: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Per-variable mutation probability.
    fn probability(&self) -> f64;

    /// Generation counter for operators whose strength decays over the run.
    fn set_iteration(&mut self, _iteration: usize) {}

    fn execute(&self, solution: &mut Solution, bounds: &[(f64, f64)], rng: &mut OperatorRng);
}

fn polynomial_delta(y: f64, low: f64, high: f64, rnd: f64, distribution_index: f64) -> f64 {
    let delta1 = (y - low) / (high - low);
    let delta2 = (high - y) / (high - low);
    let power = 1.0 / (distribution_index + 1.0);
    if rnd <= 0.5 {
        let xy = 1.0 - delta1;
        let val = 2.0 * rnd + (1.0 - 2.0 * rnd) * xy.powf(distribution_index + 1.0);
        val.powf(power) - 1.0
    } else {
        let xy = 1.0 - delta2;
        let val = 2.0 * (1.0 - rnd) + 2.0 * (rnd - 0.5) * xy.powf(distribution_index + 1.0);
        1.0 - val.powf(power)
    }
}

#[derive(Debug, Clone)]
pub struct PolynomialMutation {
    probability: f64,
    distribution_index: f64,
    repair: RepairStrategy,
}

impl PolynomialMutation {
    pub fn new(probability: f64, distribution_index: f64, repair: RepairStrategy) -> Self {
        Self {
            probability,
            distribution_index,
            repair,
        }
    }
}

impl Mutation for PolynomialMutation {
    fn name(&self) -> &str {
        "polynomial"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, solution: &mut Solution, bounds: &[(f64, f64)], rng: &mut OperatorRng) {
        for (i, (low, high)) in bounds.iter().copied().enumerate() {
            if rng.random::<f64>() > self.probability {
                continue;
            }
            let y = solution.variables[i];
            let value = if low == high {
                low
            } else {
                let rnd = rng.random::<f64>();
                y + polynomial_delta(y, low, high, rnd, self.distribution_index) * (high - low)
            };
            solution.variables[i] = self.repair.repair(value, low, high, rng);
        }
    }
}

/// Polynomial mutation sharing one random draw across all mutated variables.
#[derive(Debug, Clone)]
pub struct LinkedPolynomialMutation {
    probability: f64,
    distribution_index: f64,
    repair: RepairStrategy,
}

impl LinkedPolynomialMutation {
    pub fn new(probability: f64, distribution_index: f64, repair: RepairStrategy) -> Self {
        Self {
            probability,
            distribution_index,
            repair,
        }
    }
}

impl Mutation for LinkedPolynomialMutation {
    fn name(&self) -> &str {
        "linkedPolynomial"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, solution: &mut Solution, bounds: &[(f64, f64)], rng: &mut OperatorRng) {
        let rnd = rng.random::<f64>();
        for (i, (low, high)) in bounds.iter().copied().enumerate() {
            if rng.random::<f64>() > self.probability {
                continue;
            }
            let y = solution.variables[i];
            let value = if low == high {
                low
            } else {
                y + polynomial_delta(y, low, high, rnd, self.distribution_index) * (high - low)
            };
            solution.variables[i] = self.repair.repair(value, low, high, rng);
        }
    }
}

#[derive(Debug, Clone)]
pub struct UniformMutation {
    probability: f64,
    perturbation: f64,
    repair: RepairStrategy,
}

impl UniformMutation {
    pub fn new(probability: f64, perturbation: f64, repair: RepairStrategy) -> Self {
        Self {
            probability,
            perturbation,
            repair,
        }
    }
}

impl Mutation for UniformMutation {
    fn name(&self) -> &str {
        "uniform"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, solution: &mut Solution, bounds: &[(f64, f64)], rng: &mut OperatorRng) {
        for (i, (low, high)) in bounds.iter().copied().enumerate() {
            if rng.random::<f64>() > self.probability {
                continue;
            }
            let shift = (rng.random::<f64>() - 0.5) * self.perturbation;
            let value = solution.variables[i] + shift;
            solution.variables[i] = self.repair.repair(value, low, high, rng);
        }
    }
}

/// Mutation whose step size shrinks as `iteration` approaches `max_iterations`.
#[derive(Debug, Clone)]
pub struct NonUniformMutation {
    probability: f64,
    perturbation: f64,
    max_iterations: usize,
    iteration: usize,
    repair: RepairStrategy,
}

impl NonUniformMutation {
    pub fn new(probability: f64, perturbation: f64, max_iterations: usize, repair: RepairStrategy) -> Self {
        Self {
            probability,
            perturbation,
            max_iterations: max_iterations.max(1),
            iteration: 0,
            repair,
        }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    fn delta(&self, y: f64, rng: &mut OperatorRng) -> f64 {
        let progress = (self.iteration as f64 / self.max_iterations as f64).min(1.0);
        let rnd = rng.random::<f64>();
        y * (1.0 - rnd.powf((1.0 - progress).powf(self.perturbation)))
    }
}

impl Mutation for NonUniformMutation {
    fn name(&self) -> &str {
        "nonUniform"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn set_iteration(&mut self, iteration: usize) {
        self.iteration = iteration;
    }

    fn execute(&self, solution: &mut Solution, bounds: &[(f64, f64)], rng: &mut OperatorRng) {
        for (i, (low, high)) in bounds.iter().copied().enumerate() {
            if rng.random::<f64>() > self.probability {
                continue;
            }
            let y = solution.variables[i];
            let step = if rng.random::<f64>() <= 0.5 {
                self.delta(high - y, rng)
            } else {
                self.delta(low - y, rng)
            };
            solution.variables[i] = self.repair.repair(y + step, low, high, rng);
        }
    }
}
