use rand::Rng;
use serde::{Deserialize, Serialize};

use ev_types::Solution;

use crate::repair::RepairStrategy;
use crate::OperatorRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifferentialEvolutionVariant {
    Rand1Bin,
    Rand1Exp,
    Rand2Bin,
}

impl DifferentialEvolutionVariant {
    pub fn number_of_donors(self) -> usize {
        match self {
            Self::Rand1Bin | Self::Rand1Exp => 3,
            Self::Rand2Bin => 5,
        }
    }
}

/// DE crossover producing one trial vector from a current solution and
/// `number_of_donors()` distinct donors.
#[derive(Debug, Clone)]
pub struct DifferentialEvolutionCrossover {
    variant: DifferentialEvolutionVariant,
    cr: f64,
    f: f64,
}

impl DifferentialEvolutionCrossover {
    pub fn new(variant: DifferentialEvolutionVariant, cr: f64, f: f64) -> Self {
        Self { variant, cr, f }
    }

    pub fn variant(&self) -> DifferentialEvolutionVariant {
        self.variant
    }

    pub fn number_of_donors(&self) -> usize {
        self.variant.number_of_donors()
    }

    fn mutant(&self, donors: &[&Solution], i: usize) -> f64 {
        let x = |k: usize| donors[k].variables[i];
        match self.variant {
            DifferentialEvolutionVariant::Rand1Bin | DifferentialEvolutionVariant::Rand1Exp => {
                x(0) + self.f * (x(1) - x(2))
            }
            DifferentialEvolutionVariant::Rand2Bin => x(0) + self.f * (x(1) - x(2)) + self.f * (x(3) - x(4)),
        }
    }

    pub fn execute(
        &self,
        current: &Solution,
        donors: &[&Solution],
        bounds: &[(f64, f64)],
        rng: &mut OperatorRng,
    ) -> Solution {
        let n = bounds.len();
        let mut variables = current.variables.clone();
        let forced = rng.random_range(0..n.max(1));

        match self.variant {
            DifferentialEvolutionVariant::Rand1Bin | DifferentialEvolutionVariant::Rand2Bin => {
                for (i, variable) in variables.iter_mut().enumerate().take(n) {
                    if i == forced || rng.random::<f64>() < self.cr {
                        *variable = self.mutant(donors, i);
                    }
                }
            }
            DifferentialEvolutionVariant::Rand1Exp => {
                let mut i = forced;
                let mut copied = 0;
                loop {
                    variables[i] = self.mutant(donors, i);
                    i = (i + 1) % n;
                    copied += 1;
                    if copied >= n || rng.random::<f64>() >= self.cr {
                        break;
                    }
                }
            }
        }

        for (variable, (low, high)) in variables.iter_mut().zip(bounds.iter().copied()) {
            *variable = RepairStrategy::Bounds.repair(*variable, low, high, rng);
        }
        Solution::new(variables, current.number_of_objectives())
    }
}
