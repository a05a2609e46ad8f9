//! Trial tracking and meta-optimization run management.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use ev_types::dominates;

/// Unique meta-optimization run identifier.
pub type OptimizationId = Uuid;

/// Top-level configuration for a meta-optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationConfig {
    pub id: OptimizationId,
    pub name: String,
    pub description: String,

    /// Algorithm family being configured.
    pub algorithm: String,

    /// Which search strategy to use: "random" or "perturbation".
    pub strategy: String,

    /// Maximum number of trials to run.
    pub max_trials: usize,

    /// Number of vectors requested from the strategy per round.
    pub batch_size: usize,

    /// Exploration weight for perturbation search (ignored for random).
    pub exploration_weight: f64,

    pub seed: Option<u64>,

    pub created_at: DateTime<Utc>,
}

impl OptimizationConfig {
    pub fn new(name: String, algorithm: &str, strategy: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description: String::new(),
            algorithm: algorithm.to_string(),
            strategy: strategy.to_string(),
            max_trials: 100,
            batch_size: 1,
            exploration_weight: 0.3,
            seed: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_max_trials(mut self, n: usize) -> Self {
        self.max_trials = n;
        self
    }

    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    pub fn with_exploration_weight(mut self, weight: f64) -> Self {
        self.exploration_weight = weight;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Lifecycle state for a meta-optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Aggregate status of a meta-optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStatus {
    pub id: OptimizationId,
    pub config: OptimizationConfig,
    pub state: OptimizationState,
    pub trials_completed: usize,
    pub trials_failed: usize,
    /// Non-dominated results seen so far.
    pub best_trials: Vec<TrialResult>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl OptimizationStatus {
    pub fn new(config: OptimizationConfig) -> Self {
        Self {
            id: config.id,
            config,
            state: OptimizationState::Pending,
            trials_completed: 0,
            trials_failed: 0,
            best_trials: Vec::new(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.state = OptimizationState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self) {
        self.state = OptimizationState::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: String) {
        self.state = OptimizationState::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error);
    }

    /// Add `result` to the best set unless it is dominated; results it
    /// dominates are dropped. Returns whether it was added.
    pub fn update_best(&mut self, result: &TrialResult) -> bool {
        if self
            .best_trials
            .iter()
            .any(|best| dominates(&best.objectives, &result.objectives) || best.objectives == result.objectives)
        {
            return false;
        }
        self.best_trials
            .retain(|best| !dominates(&result.objectives, &best.objectives));
        self.best_trials.push(result.clone());
        true
    }
}

/// A single trial: one configuration vector scored by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: Uuid,
    pub optimization_id: OptimizationId,
    pub trial_number: usize,
    pub vector: Vec<f64>,
    /// Decoded token form of `vector`.
    pub configuration: String,
    pub status: TrialStatus,
    pub result: Option<TrialResult>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Trial {
    pub fn new(optimization_id: OptimizationId, trial_number: usize, vector: Vec<f64>, configuration: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            optimization_id,
            trial_number,
            vector,
            configuration,
            status: TrialStatus::Pending,
            result: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = TrialStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self, result: TrialResult) {
        self.status = TrialStatus::Completed;
        self.finished_at = Some(Utc::now());
        self.result = Some(result);
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = TrialStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error);
    }

    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Result of a single trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial_id: Uuid,
    /// Evaluator objectives, one per indicator.
    pub objectives: Vec<f64>,
    /// The same values keyed by indicator name.
    pub indicators: BTreeMap<String, f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> OptimizationConfig {
        OptimizationConfig::new("test_opt".into(), "NSGAII", "random")
            .with_max_trials(50)
            .with_batch_size(4)
            .with_seed(3)
    }

    fn result(objectives: Vec<f64>) -> TrialResult {
        TrialResult {
            trial_id: Uuid::new_v4(),
            objectives,
            indicators: BTreeMap::new(),
        }
    }

    #[test]
    fn optimization_status_lifecycle() {
        let mut status = OptimizationStatus::new(sample_config());
        assert_eq!(status.state, OptimizationState::Pending);
        assert!(status.started_at.is_none());

        status.mark_running();
        assert_eq!(status.state, OptimizationState::Running);
        assert!(status.started_at.is_some());

        status.mark_completed();
        assert_eq!(status.state, OptimizationState::Completed);
        assert!(status.finished_at.is_some());
    }

    #[test]
    fn best_trials_keep_the_non_dominated_set() {
        let mut status = OptimizationStatus::new(sample_config());
        assert!(status.update_best(&result(vec![0.5, 0.5])));
        assert!(status.update_best(&result(vec![0.2, 0.8])));
        assert_eq!(status.best_trials.len(), 2);

        // Dominated result is not added
        assert!(!status.update_best(&result(vec![0.6, 0.9])));
        // Duplicate objectives are kept once
        assert!(!status.update_best(&result(vec![0.5, 0.5])));

        // Dominating result replaces both
        assert!(status.update_best(&result(vec![0.1, 0.4])));
        assert_eq!(status.best_trials.len(), 1);
        assert_eq!(status.best_trials[0].objectives, vec![0.1, 0.4]);
    }

    #[test]
    fn trial_lifecycle() {
        let mut trial = Trial::new(Uuid::new_v4(), 1, vec![0.5, 0.5], "--a 1".into());
        assert_eq!(trial.status, TrialStatus::Pending);
        assert!(trial.duration_ms().is_none());

        trial.mark_running();
        assert_eq!(trial.status, TrialStatus::Running);

        let outcome = result(vec![0.3]);
        trial.mark_completed(outcome);
        assert_eq!(trial.status, TrialStatus::Completed);
        assert!(trial.duration_ms().is_some());
        assert_eq!(trial.result.as_ref().unwrap().objectives, vec![0.3]);
    }

    #[test]
    fn trial_failure() {
        let mut trial = Trial::new(Uuid::new_v4(), 0, vec![], String::new());
        trial.mark_running();
        trial.mark_failed("inner run failed".into());
        assert_eq!(trial.status, TrialStatus::Failed);
        assert_eq!(trial.error.as_deref(), Some("inner run failed"));
    }

    #[test]
    fn trials_serialize_to_json() {
        let trial = Trial::new(Uuid::new_v4(), 2, vec![0.25], "--x 1".into());
        let json = serde_json::to_string(&trial).unwrap();
        let back: Trial = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trial);
    }
}
