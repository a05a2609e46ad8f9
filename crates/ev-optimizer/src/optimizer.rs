//! Outer driver: asks a search strategy for configuration vectors, scores
//! them with the evaluator and tracks the trials.

use std::collections::BTreeMap;

use tracing::{info, warn};

use ev_params::decode_vector_to_configuration;
use ev_types::{config_error, EvResult};

use crate::evaluator::MetaOptimizationEvaluator;
use crate::search::{PerturbationSearch, RandomSearch, SearchStrategy};
use crate::trial::{OptimizationConfig, OptimizationStatus, Trial, TrialResult};

pub struct MetaOptimizer {
    evaluator: MetaOptimizationEvaluator,
    strategy: Box<dyn SearchStrategy>,
    status: OptimizationStatus,
    trials: Vec<Trial>,
}

impl MetaOptimizer {
    /// Driver with the strategy named in `config`.
    pub fn new(evaluator: MetaOptimizationEvaluator, config: OptimizationConfig) -> EvResult<Self> {
        let dimension = evaluator.number_of_variables();
        let strategy: Box<dyn SearchStrategy> = match config.strategy.as_str() {
            "random" => Box::new(RandomSearch::new(dimension, config.seed)),
            "perturbation" => Box::new(PerturbationSearch::new(dimension, config.exploration_weight, config.seed)),
            other => return Err(config_error!("Unknown search strategy: {}", other)),
        };
        Ok(Self::with_strategy(evaluator, config, strategy))
    }

    pub fn with_strategy(
        evaluator: MetaOptimizationEvaluator,
        config: OptimizationConfig,
        strategy: Box<dyn SearchStrategy>,
    ) -> Self {
        Self {
            evaluator,
            strategy,
            status: OptimizationStatus::new(config),
            trials: Vec::new(),
        }
    }

    pub fn evaluator(&self) -> &MetaOptimizationEvaluator {
        &self.evaluator
    }

    pub fn status(&self) -> &OptimizationStatus {
        &self.status
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Completed trials whose results are in the non-dominated best set.
    pub fn best_trials(&self) -> Vec<&Trial> {
        self.trials
            .iter()
            .filter(|trial| {
                self.status
                    .best_trials
                    .iter()
                    .any(|best| Some(best.trial_id) == trial.result.as_ref().map(|r| r.trial_id))
            })
            .collect()
    }

    /// Run trials until `max_trials` is reached. The first failing trial
    /// stops the run.
    pub fn run(&mut self) -> EvResult<()> {
        let max_trials = self.status.config.max_trials;
        let batch_size = self.status.config.batch_size.max(1);
        info!(
            "Starting {} search for {} ({} trials)",
            self.strategy.name(),
            self.status.config.algorithm,
            max_trials
        );
        self.status.mark_running();

        while self.trials.len() < max_trials {
            let count = batch_size.min(max_trials - self.trials.len());
            let batch = self.strategy.suggest(count);
            if batch.is_empty() {
                warn!("{} search produced no more vectors", self.strategy.name());
                break;
            }
            for vector in batch {
                if let Err(e) = self.run_trial(vector) {
                    warn!("Trial {} failed: {}", self.trials.len() - 1, e);
                    self.status.mark_failed(e.to_string());
                    return Err(e);
                }
            }
        }

        self.status.mark_completed();
        info!(
            "Search finished: {} trials, {} non-dominated",
            self.status.trials_completed,
            self.status.best_trials.len()
        );
        Ok(())
    }

    fn run_trial(&mut self, vector: Vec<f64>) -> EvResult<()> {
        let number = self.trials.len();
        let configuration = match decode_vector_to_configuration(self.evaluator.assembler().parameter_space(), &vector)
        {
            Ok(configuration) => configuration.to_string(),
            Err(e) => {
                self.trials.push(Trial::new(self.status.id, number, vector, String::new()));
                return Err(self.fail_last(e.into()));
            }
        };
        let mut trial = Trial::new(self.status.id, number, vector, configuration);
        trial.mark_running();

        match self.evaluator.evaluate(&trial.vector) {
            Ok(objectives) => {
                let indicators: BTreeMap<String, f64> = self
                    .evaluator
                    .indicators()
                    .iter()
                    .map(|indicator| indicator.name().to_string())
                    .zip(objectives.iter().copied())
                    .collect();
                let result = TrialResult {
                    trial_id: trial.id,
                    objectives,
                    indicators,
                };
                self.strategy.report(&trial.vector, &result.objectives);
                if self.status.update_best(&result) {
                    info!("Trial {} is non-dominated: {:?}", number, result.objectives);
                }
                trial.mark_completed(result);
                self.status.trials_completed += 1;
                self.trials.push(trial);
                Ok(())
            }
            Err(e) => {
                self.trials.push(trial);
                Err(self.fail_last(e))
            }
        }
    }

    fn fail_last(&mut self, error: ev_types::EvError) -> ev_types::EvError {
        if let Some(trial) = self.trials.last_mut() {
            trial.mark_failed(error.to_string());
        }
        self.status.trials_failed += 1;
        error
    }
}
