use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use ev_types::{validation_error, EvResult, Problem};

use crate::reference::ReferenceFront;

/// Evaluation budget of one inner run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationBudget {
    Fixed(usize),
    /// Drawn uniformly from `min..=max` for every run.
    RandomRange { min: usize, max: usize },
}

impl EvaluationBudget {
    pub fn evaluations<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            Self::Fixed(n) => n,
            Self::RandomRange { min, max } => min + rng.random_range(0..=max - min),
        }
    }

    pub fn validate(&self) -> EvResult<()> {
        match *self {
            Self::Fixed(0) => Err(validation_error!("Evaluation budget must be positive")),
            Self::RandomRange { min, max } if min == 0 || min > max => Err(validation_error!(
                "Invalid evaluation budget range {}..={}",
                min,
                max
            )),
            _ => Ok(()),
        }
    }
}

/// A training problem with its reference front, budget and number of
/// independent runs.
#[derive(Debug, Clone)]
pub struct TrainingSpec {
    pub problem: Arc<dyn Problem>,
    pub reference_front: ReferenceFront,
    pub budget: EvaluationBudget,
    pub independent_runs: usize,
}

impl TrainingSpec {
    pub fn new(problem: Arc<dyn Problem>, reference_front: ReferenceFront, budget: EvaluationBudget) -> Self {
        Self {
            problem,
            reference_front,
            budget,
            independent_runs: 1,
        }
    }

    pub fn with_independent_runs(mut self, runs: usize) -> Self {
        self.independent_runs = runs;
        self
    }

    pub fn validate(&self) -> EvResult<()> {
        self.budget.validate()?;
        if self.independent_runs == 0 {
            return Err(validation_error!(
                "Problem {} needs at least one independent run",
                self.problem.name()
            ));
        }
        Ok(())
    }
}
