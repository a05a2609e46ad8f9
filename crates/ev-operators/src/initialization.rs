//! Creation of the initial population.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use ev_types::{Problem, Solution};

use crate::OperatorRng;

pub trait InitialSolutions: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// `count` unevaluated solutions inside the problem's bounds.
    fn create(&self, problem: &dyn Problem, count: usize, rng: &mut OperatorRng) -> Vec<Solution>;
}

#[derive(Debug, Clone, Default)]
pub struct RandomSolutions;

impl InitialSolutions for RandomSolutions {
    fn name(&self) -> &str {
        "random"
    }

    fn create(&self, problem: &dyn Problem, count: usize, rng: &mut OperatorRng) -> Vec<Solution> {
        (0..count)
            .map(|_| {
                let variables = problem
                    .bounds()
                    .iter()
                    .map(|(low, high)| low + rng.random::<f64>() * (high - low))
                    .collect();
                Solution::new(variables, problem.number_of_objectives())
            })
            .collect()
    }
}

/// Latin hypercube sampling: every variable's range is split into `count`
/// strata and each stratum is used exactly once.
#[derive(Debug, Clone, Default)]
pub struct LatinHypercubeSampling;

impl InitialSolutions for LatinHypercubeSampling {
    fn name(&self) -> &str {
        "latinHypercubeSampling"
    }

    fn create(&self, problem: &dyn Problem, count: usize, rng: &mut OperatorRng) -> Vec<Solution> {
        let mut variables = vec![Vec::with_capacity(problem.number_of_variables()); count];
        for (low, high) in problem.bounds().iter().copied() {
            let mut strata: Vec<usize> = (0..count).collect();
            strata.shuffle(rng);
            for (solution, stratum) in variables.iter_mut().zip(strata) {
                let u = (stratum as f64 + rng.random::<f64>()) / count as f64;
                solution.push(low + u * (high - low));
            }
        }
        variables
            .into_iter()
            .map(|v| Solution::new(v, problem.number_of_objectives()))
            .collect()
    }
}
