//! # ev-optimizer
//!
//! Bi-level configuration search for Evolver: the meta-optimization
//! evaluator that turns a configuration vector into quality-indicator
//! objectives, reference fronts, outer search strategies, trial tracking
//! and result files.

pub mod evaluator;
pub mod indicators;
pub mod optimizer;
pub mod output;
pub mod reference;
pub mod search;
pub mod stats;
pub mod training;
pub mod trial;

pub use evaluator::{EvaluatorConfig, MetaOptimizationEvaluator};
pub use indicators::{
    additive_epsilon, generational_distance, hypervolume, inverted_generational_distance_plus,
    normalized_hypervolume, QualityIndicator, HYPERVOLUME_REFERENCE,
};
pub use optimizer::MetaOptimizer;
pub use output::{write_matrix, write_parameter_space, write_results};
pub use reference::ReferenceFront;
pub use search::{PerturbationSearch, RandomSearch, SearchStrategy};
pub use stats::{mean, median};
pub use training::{EvaluationBudget, TrainingSpec};
pub use trial::{
    OptimizationConfig, OptimizationId, OptimizationState, OptimizationStatus, Trial, TrialResult, TrialStatus,
};
