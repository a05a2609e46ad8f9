use serde::{Deserialize, Serialize};

/// A real-coded candidate solution of a multi-objective problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub variables: Vec<f64>,
    pub objectives: Vec<f64>,
}

impl Solution {
    pub fn new(variables: Vec<f64>, number_of_objectives: usize) -> Self {
        Self {
            variables,
            objectives: vec![0.0; number_of_objectives],
        }
    }

    pub fn number_of_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn number_of_objectives(&self) -> usize {
        self.objectives.len()
    }
}

/// Objective values of a list of solutions, one row per solution.
pub fn objective_matrix(solutions: &[Solution]) -> Vec<Vec<f64>> {
    solutions.iter().map(|s| s.objectives.clone()).collect()
}
