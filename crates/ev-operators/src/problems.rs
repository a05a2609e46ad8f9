//! Benchmark problems with analytic Pareto fronts.

use std::f64::consts::PI;
use std::sync::Arc;

use ev_types::{config_error, EvResult, Problem, Solution};

use crate::neighborhood::uniform_weights;

fn zdt_g(variables: &[f64]) -> f64 {
    let tail = &variables[1..];
    1.0 + 9.0 * tail.iter().sum::<f64>() / tail.len().max(1) as f64
}

macro_rules! zdt_problem {
    ($name:ident, $label:expr, $default_vars:expr, $bounds:expr, $g:expr, $h:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            bounds: Vec<(f64, f64)>,
        }

        impl $name {
            pub fn new(number_of_variables: usize) -> Self {
                let n = number_of_variables.max(2);
                Self {
                    bounds: (0..n).map($bounds).collect(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new($default_vars)
            }
        }

        impl Problem for $name {
            fn name(&self) -> &str {
                $label
            }

            fn number_of_variables(&self) -> usize {
                self.bounds.len()
            }

            fn number_of_objectives(&self) -> usize {
                2
            }

            fn bounds(&self) -> &[(f64, f64)] {
                &self.bounds
            }

            fn evaluate(&self, solution: &mut Solution) {
                let f1 = solution.variables[0];
                let g: f64 = $g(&solution.variables);
                let h: f64 = $h(f1, g);
                solution.objectives[0] = f1;
                solution.objectives[1] = g * h;
            }
        }
    };
}

zdt_problem!(
    Zdt1,
    "ZDT1",
    30,
    |_| (0.0, 1.0),
    zdt_g,
    |f1: f64, g: f64| 1.0 - (f1 / g).sqrt()
);

zdt_problem!(
    Zdt2,
    "ZDT2",
    30,
    |_| (0.0, 1.0),
    zdt_g,
    |f1: f64, g: f64| 1.0 - (f1 / g).powi(2)
);

zdt_problem!(
    Zdt4,
    "ZDT4",
    10,
    |i| if i == 0 { (0.0, 1.0) } else { (-5.0, 5.0) },
    |variables: &[f64]| {
        let tail = &variables[1..];
        1.0 + 10.0 * tail.len() as f64
            + tail
                .iter()
                .map(|x| x * x - 10.0 * (4.0 * PI * x).cos())
                .sum::<f64>()
    },
    |f1: f64, g: f64| 1.0 - (f1 / g).sqrt()
);

/// Scalable sphere-front problem.
#[derive(Debug, Clone)]
pub struct Dtlz2 {
    objectives: usize,
    bounds: Vec<(f64, f64)>,
}

impl Dtlz2 {
    pub fn new(number_of_variables: usize, number_of_objectives: usize) -> Self {
        let objectives = number_of_objectives.max(2);
        let n = number_of_variables.max(objectives);
        Self {
            objectives,
            bounds: vec![(0.0, 1.0); n],
        }
    }
}

impl Default for Dtlz2 {
    fn default() -> Self {
        Self::new(12, 3)
    }
}

impl Problem for Dtlz2 {
    fn name(&self) -> &str {
        "DTLZ2"
    }

    fn number_of_variables(&self) -> usize {
        self.bounds.len()
    }

    fn number_of_objectives(&self) -> usize {
        self.objectives
    }

    fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    fn evaluate(&self, solution: &mut Solution) {
        let m = self.objectives;
        let x = &solution.variables;
        let g: f64 = x[m - 1..].iter().map(|v| (v - 0.5).powi(2)).sum();

        for i in 0..m {
            let mut f = 1.0 + g;
            for v in &x[..m - 1 - i] {
                f *= (v * PI / 2.0).cos();
            }
            if i > 0 {
                f *= (x[m - 1 - i] * PI / 2.0).sin();
            }
            solution.objectives[i] = f;
        }
    }
}

/// `points` samples of the Pareto front of a problem by name.
pub fn analytic_front(name: &str, objectives: usize, points: usize) -> EvResult<Vec<Vec<f64>>> {
    let points = points.max(2);
    let curve = |h: fn(f64) -> f64| -> Vec<Vec<f64>> {
        (0..points)
            .map(|i| {
                let f1 = i as f64 / (points - 1) as f64;
                vec![f1, h(f1)]
            })
            .collect()
    };
    match name.to_ascii_uppercase().as_str() {
        "ZDT1" | "ZDT4" => Ok(curve(|f1| 1.0 - f1.sqrt())),
        "ZDT2" => Ok(curve(|f1| 1.0 - f1 * f1)),
        "DTLZ2" => Ok(uniform_weights(points, objectives.max(2))
            .into_iter()
            .map(|w| {
                let norm = w.iter().map(|v| v * v).sum::<f64>().sqrt();
                w.into_iter().map(|v| v / norm).collect()
            })
            .collect()),
        _ => Err(config_error!("No analytic front for problem {}", name)),
    }
}

/// Problem instance with its default size, looked up by name.
pub fn problem_by_name(name: &str) -> EvResult<Arc<dyn Problem>> {
    match name.to_ascii_uppercase().as_str() {
        "ZDT1" => Ok(Arc::new(Zdt1::default())),
        "ZDT2" => Ok(Arc::new(Zdt2::default())),
        "ZDT4" => Ok(Arc::new(Zdt4::default())),
        "DTLZ2" => Ok(Arc::new(Dtlz2::default())),
        _ => Err(config_error!("Unknown problem: {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zdt1_optimum_lies_on_front() {
        let problem = Zdt1::default();
        let mut variables = vec![0.0; 30];
        variables[0] = 0.25;
        let mut solution = Solution::new(variables, 2);
        problem.evaluate(&mut solution);
        assert_eq!(solution.objectives, vec![0.25, 0.5]);
    }

    #[test]
    fn zdt2_and_zdt4_evaluate() {
        let mut solution = Solution::new(vec![0.5; 30], 2);
        Zdt2::default().evaluate(&mut solution);
        assert!(solution.objectives[1] > 0.0);

        let problem = Zdt4::default();
        assert_eq!(problem.bounds()[1], (-5.0, 5.0));
        let mut variables = vec![0.0; 10];
        variables[0] = 1.0;
        let mut solution = Solution::new(variables, 2);
        problem.evaluate(&mut solution);
        // g = 1 + 90 - 90 = 1
        assert!((solution.objectives[1] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn dtlz2_optimum_is_on_unit_sphere() {
        let problem = Dtlz2::default();
        let mut variables = vec![0.5; problem.number_of_variables()];
        variables[0] = 0.3;
        variables[1] = 0.8;
        let mut solution = Solution::new(variables, 3);
        problem.evaluate(&mut solution);
        let radius: f64 = solution.objectives.iter().map(|f| f * f).sum::<f64>().sqrt();
        assert!((radius - 1.0).abs() < 1e-12);
    }

    #[test]
    fn analytic_fronts() {
        let front = analytic_front("ZDT1", 2, 11).unwrap();
        assert_eq!(front.len(), 11);
        assert_eq!(front[0], vec![0.0, 1.0]);
        assert_eq!(front[10], vec![1.0, 0.0]);

        let sphere = analytic_front("dtlz2", 3, 15).unwrap();
        for point in sphere {
            let radius: f64 = point.iter().map(|f| f * f).sum::<f64>().sqrt();
            assert!((radius - 1.0).abs() < 1e-12);
        }
        assert!(analytic_front("UF1", 2, 10).is_err());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(problem_by_name("zdt4").unwrap().number_of_variables(), 10);
        assert_eq!(problem_by_name("DTLZ2").unwrap().number_of_objectives(), 3);
        assert!(problem_by_name("knapsack").is_err());
    }
}
