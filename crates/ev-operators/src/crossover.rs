//! Two-parent crossovers for real-coded solutions.

use rand::Rng;
use std::fmt;

use ev_types::Solution;

use crate::repair::RepairStrategy;
use crate::OperatorRng;

const EPS: f64 = 1.0e-14;

pub trait Crossover: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn probability(&self) -> f64;

    fn number_of_parents(&self) -> usize {
        2
    }

    fn number_of_offspring(&self) -> usize {
        2
    }

    /// Children of `parents`, not yet evaluated. Variables stay within `bounds`.
    fn execute(&self, parents: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution>;
}

fn unevaluated(parent: &Solution, variables: Vec<f64>) -> Solution {
    Solution::new(variables, parent.number_of_objectives())
}

/// Simulated binary crossover.
#[derive(Debug, Clone)]
pub struct SbxCrossover {
    probability: f64,
    distribution_index: f64,
    repair: RepairStrategy,
}

impl SbxCrossover {
    pub fn new(probability: f64, distribution_index: f64, repair: RepairStrategy) -> Self {
        Self {
            probability,
            distribution_index,
            repair,
        }
    }

    fn spread(&self, beta: f64, rand: f64) -> f64 {
        let alpha = 2.0 - beta.powf(-(self.distribution_index + 1.0));
        if rand <= 1.0 / alpha {
            (rand * alpha).powf(1.0 / (self.distribution_index + 1.0))
        } else {
            (1.0 / (2.0 - rand * alpha)).powf(1.0 / (self.distribution_index + 1.0))
        }
    }
}

impl Crossover for SbxCrossover {
    fn name(&self) -> &str {
        "SBX"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, parents: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        let (p1, p2) = (parents[0], parents[1]);
        let mut c1 = p1.variables.clone();
        let mut c2 = p2.variables.clone();

        if rng.random::<f64>() <= self.probability {
            for (i, (low, high)) in bounds.iter().copied().enumerate() {
                let (x1, x2) = (p1.variables[i], p2.variables[i]);
                if rng.random::<f64>() > 0.5 || (x1 - x2).abs() <= EPS {
                    continue;
                }
                let (y1, y2) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
                let rand = rng.random::<f64>();

                let beta = 1.0 + 2.0 * (y1 - low) / (y2 - y1);
                let betaq = self.spread(beta, rand);
                let v1 = 0.5 * ((y1 + y2) - betaq * (y2 - y1));

                let beta = 1.0 + 2.0 * (high - y2) / (y2 - y1);
                let betaq = self.spread(beta, rand);
                let v2 = 0.5 * ((y1 + y2) + betaq * (y2 - y1));

                let v1 = self.repair.repair(v1, low, high, rng);
                let v2 = self.repair.repair(v2, low, high, rng);
                if rng.random::<f64>() <= 0.5 {
                    c1[i] = v2;
                    c2[i] = v1;
                } else {
                    c1[i] = v1;
                    c2[i] = v2;
                }
            }
        }
        vec![unevaluated(p1, c1), unevaluated(p2, c2)]
    }
}

/// Blend crossover: children sampled from the parents' interval widened by
/// `alpha` times its length on both sides.
#[derive(Debug, Clone)]
pub struct BlxAlphaCrossover {
    probability: f64,
    alpha: f64,
    repair: RepairStrategy,
}

impl BlxAlphaCrossover {
    pub fn new(probability: f64, alpha: f64, repair: RepairStrategy) -> Self {
        Self {
            probability,
            alpha,
            repair,
        }
    }
}

impl Crossover for BlxAlphaCrossover {
    fn name(&self) -> &str {
        "BLX_ALPHA"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, parents: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        let (p1, p2) = (parents[0], parents[1]);
        let mut c1 = p1.variables.clone();
        let mut c2 = p2.variables.clone();

        if rng.random::<f64>() <= self.probability {
            for (i, (low, high)) in bounds.iter().copied().enumerate() {
                let (x1, x2) = (p1.variables[i], p2.variables[i]);
                let (min, max) = (x1.min(x2), x1.max(x2));
                let range = max - min;
                let lower = min - range * self.alpha;
                let upper = max + range * self.alpha;

                let v1 = lower + rng.random::<f64>() * (upper - lower);
                let v2 = lower + rng.random::<f64>() * (upper - lower);
                c1[i] = self.repair.repair(v1, low, high, rng);
                c2[i] = self.repair.repair(v2, low, high, rng);
            }
        }
        vec![unevaluated(p1, c1), unevaluated(p2, c2)]
    }
}

/// Convex combination of the parents with one random weight per mating.
#[derive(Debug, Clone)]
pub struct WholeArithmeticCrossover {
    probability: f64,
    repair: RepairStrategy,
}

impl WholeArithmeticCrossover {
    pub fn new(probability: f64, repair: RepairStrategy) -> Self {
        Self { probability, repair }
    }
}

impl Crossover for WholeArithmeticCrossover {
    fn name(&self) -> &str {
        "wholeArithmetic"
    }

    fn probability(&self) -> f64 {
        self.probability
    }

    fn execute(&self, parents: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        let (p1, p2) = (parents[0], parents[1]);
        let mut c1 = p1.variables.clone();
        let mut c2 = p2.variables.clone();

        if rng.random::<f64>() <= self.probability {
            let weight = rng.random::<f64>();
            for (i, (low, high)) in bounds.iter().copied().enumerate() {
                let (x1, x2) = (p1.variables[i], p2.variables[i]);
                let v1 = weight * x1 + (1.0 - weight) * x2;
                let v2 = (1.0 - weight) * x1 + weight * x2;
                c1[i] = self.repair.repair(v1, low, high, rng);
                c2[i] = self.repair.repair(v2, low, high, rng);
            }
        }
        vec![unevaluated(p1, c1), unevaluated(p2, c2)]
    }
}
