//! Operator library used by assembled algorithms.
//!
//! Every stochastic operator draws from an explicit [`OperatorRng`] owned by
//! the running algorithm, so a seeded run is reproducible.

pub mod aggregation;
pub mod archive;
pub mod crossover;
pub mod differential_evolution;
pub mod initialization;
pub mod mutation;
pub mod neighborhood;
pub mod problems;
pub mod ranking;
pub mod repair;
pub mod selection;
pub mod sequence;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use aggregation::{AggregationFunction, ScalarizingFunction};
pub use archive::{Archive, CrowdingDistanceArchive, UnboundedArchive};
pub use crossover::{BlxAlphaCrossover, Crossover, SbxCrossover, WholeArithmeticCrossover};
pub use differential_evolution::{DifferentialEvolutionCrossover, DifferentialEvolutionVariant};
pub use initialization::{InitialSolutions, LatinHypercubeSampling, RandomSolutions};
pub use mutation::{LinkedPolynomialMutation, Mutation, NonUniformMutation, PolynomialMutation, UniformMutation};
pub use neighborhood::WeightVectorNeighborhood;
pub use ranking::{
    hypervolume_contribution_replacement, rank_and_crowding, ranking_and_crowding_replacement, RankAndCrowding,
    Replacement,
};
pub use repair::RepairStrategy;
pub use selection::{MatingSelection, NeighborType, NeighborhoodSelection, RandomSelection, TournamentSelection};
pub use sequence::{CyclicIntegerSequence, RandomPermutationCycle, SequenceGenerator};

/// Random source handed to every operator.
pub type OperatorRng = ChaCha8Rng;

/// A seeded generator, or one seeded from the thread generator.
pub fn operator_rng(seed: Option<u64>) -> OperatorRng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
    }
}
