//! The bi-level objective function: a configuration vector is decoded,
//! assembled, run on every training problem and scored with quality
//! indicators.

use std::sync::Arc;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ev_engine::{AlgorithmAssembler, AssemblyContext};
use ev_operators::{operator_rng, OperatorRng};
use ev_params::decode_vector_to_configuration;
use ev_types::{internal_error, non_dominated, objective_matrix, EvResult, EvaluationError};

use crate::indicators::QualityIndicator;
use crate::stats::{mean, median};
use crate::training::TrainingSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Population size handed to the assembler.
    pub population_size: usize,
    /// Run the problem x run loop on rayon workers.
    pub parallel: bool,
    /// Size of a dedicated worker pool; `None` uses the global pool.
    pub threads: Option<usize>,
    /// Base seed for budgets and inner runs.
    pub seed: Option<u64>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            parallel: true,
            threads: None,
            seed: None,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// One inner run: which problem, its budget and its seed.
#[derive(Debug, Clone, Copy)]
struct RunSlot {
    problem: usize,
    evaluations: usize,
    seed: Option<u64>,
}

pub struct MetaOptimizationEvaluator {
    assembler: Arc<dyn AlgorithmAssembler>,
    training: Vec<TrainingSpec>,
    indicators: Vec<QualityIndicator>,
    config: EvaluatorConfig,
    pool: Option<rayon::ThreadPool>,
}

impl MetaOptimizationEvaluator {
    pub fn new(
        assembler: Arc<dyn AlgorithmAssembler>,
        training: Vec<TrainingSpec>,
        indicators: Vec<QualityIndicator>,
        config: EvaluatorConfig,
    ) -> EvResult<Self> {
        if training.is_empty() {
            return Err(invalid_setup("no training problems"));
        }
        if indicators.is_empty() {
            return Err(invalid_setup("no quality indicators"));
        }
        for spec in &training {
            spec.validate()?;
        }

        let pool = match config.threads {
            Some(threads) if config.parallel => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| internal_error!("Failed to build worker pool: {}", e))?,
            ),
            _ => None,
        };

        info!(
            "Meta-optimization evaluator for {}: {} problems, indicators [{}], {} variables",
            assembler.name(),
            training.len(),
            indicators.iter().map(|i| i.name()).collect::<Vec<_>>().join(", "),
            assembler.parameter_space().dimension()
        );

        Ok(Self {
            assembler,
            training,
            indicators,
            config,
            pool,
        })
    }

    pub fn number_of_variables(&self) -> usize {
        self.assembler.parameter_space().dimension()
    }

    pub fn number_of_objectives(&self) -> usize {
        self.indicators.len()
    }

    pub fn indicators(&self) -> &[QualityIndicator] {
        &self.indicators
    }

    pub fn training(&self) -> &[TrainingSpec] {
        &self.training
    }

    pub fn assembler(&self) -> &dyn AlgorithmAssembler {
        self.assembler.as_ref()
    }

    /// Objective vector of `vector`: for every indicator, the mean over
    /// training problems of the median over independent runs.
    pub fn evaluate(&self, vector: &[f64]) -> EvResult<Vec<f64>> {
        let configuration = decode_vector_to_configuration(self.assembler.parameter_space(), vector)?;
        let tokens = configuration.to_tokens();
        debug!("Evaluating configuration: {}", configuration);

        let slots = self.run_slots();
        let scores: Vec<Vec<f64>> = if !self.config.parallel {
            slots
                .iter()
                .map(|slot| self.run_once(&tokens, slot))
                .collect::<EvResult<_>>()?
        } else {
            let run_all = || {
                slots
                    .par_iter()
                    .map(|slot| self.run_once(&tokens, slot))
                    .collect::<EvResult<Vec<_>>>()
            };
            match &self.pool {
                Some(pool) => pool.install(run_all)?,
                None => run_all()?,
            }
        };

        let objectives = aggregate(&slots, &scores, self.training.len(), self.indicators.len());
        debug!("Objectives {:?} for {}", objectives, configuration);
        Ok(objectives)
    }

    /// Problem-major list of runs with their budgets and seeds drawn up
    /// front, so results do not depend on scheduling.
    fn run_slots(&self) -> Vec<RunSlot> {
        let mut rng: OperatorRng = operator_rng(self.config.seed);
        let mut slots = Vec::new();
        for (problem, spec) in self.training.iter().enumerate() {
            for _ in 0..spec.independent_runs {
                let evaluations = spec.budget.evaluations(&mut rng);
                let seed = self.config.seed.map(|_| rng.random::<u64>());
                slots.push(RunSlot {
                    problem,
                    evaluations,
                    seed,
                });
            }
        }
        slots
    }

    fn run_once(&self, tokens: &[String], slot: &RunSlot) -> EvResult<Vec<f64>> {
        let spec = &self.training[slot.problem];
        let problem_name = spec.problem.name().to_string();

        let mut space = self.assembler.parameter_space().create_instance();
        space.parse(tokens)?;
        let mut context = AssemblyContext::new(spec.problem.clone(), self.config.population_size, slot.evaluations);
        if let Some(seed) = slot.seed {
            context = context.with_seed(seed);
        }

        let mut algorithm = self.assembler.assemble(&mut space, &context)?;
        algorithm.run().map_err(|e| EvaluationError::RunFailed {
            problem: problem_name.clone(),
            message: e.to_string(),
        })?;

        let front = objective_matrix(&non_dominated(&algorithm.result()));
        let width = match front.first() {
            Some(point) => point.len(),
            None => {
                return Err(EvaluationError::EmptyResult {
                    algorithm: algorithm.name().to_string(),
                    problem: problem_name,
                }
                .into())
            }
        };
        let reference = &spec.reference_front;
        if width != reference.dimension() {
            return Err(EvaluationError::DimensionMismatch {
                front: width,
                reference: reference.dimension(),
            }
            .into());
        }

        let normalized = reference.normalize(&front);
        let scores = self
            .indicators
            .iter()
            .map(|indicator| indicator.compute(&normalized, reference.normalized(), slot.evaluations))
            .collect::<Vec<_>>();
        debug!(
            "Run on {} ({} evaluations, {} non-dominated): {:?}",
            problem_name,
            algorithm.evaluations(),
            front.len(),
            scores
        );
        Ok(scores)
    }
}

/// For every indicator, the mean over problems of the median over that
/// problem's runs. `scores[i]` belongs to `slots[i]`.
fn aggregate(slots: &[RunSlot], scores: &[Vec<f64>], problems: usize, indicators: usize) -> Vec<f64> {
    let per_problem: Vec<Vec<f64>> = (0..problems)
        .map(|problem| {
            let runs: Vec<&Vec<f64>> = slots
                .iter()
                .zip(scores)
                .filter(|(slot, _)| slot.problem == problem)
                .map(|(_, score)| score)
                .collect();
            (0..indicators)
                .map(|k| median(&runs.iter().map(|score| score[k]).collect::<Vec<_>>()))
                .collect()
        })
        .collect();

    (0..indicators)
        .map(|k| mean(&per_problem.iter().map(|values| values[k]).collect::<Vec<_>>()))
        .collect()
}

fn invalid_setup(message: &str) -> ev_types::EvError {
    EvaluationError::InvalidSetup {
        message: message.to_string(),
    }
    .into()
}
