//! Assembly of runnable algorithms from resolved parameter spaces.
//!
//! The [`OperatorRegistry`] maps operator labels to factories; an
//! [`AlgorithmAssembler`] walks a resolved [`ev_params::ParameterSpace`],
//! injects the context constants and wires operators into an
//! [`Algorithm`].

pub mod algorithm;
pub mod archive_result;
pub mod assembler;
pub mod evolutionary;
pub mod moead;
pub mod registry;
pub mod variation;

pub use algorithm::{Algorithm, Evaluation, SharedArchive};
pub use archive_result::WithArchive;
pub use assembler::{AlgorithmAssembler, AssemblyContext, EvolutionaryAssembler, MoeadAssembler, SmsEmoaAssembler};
pub use evolutionary::EvolutionaryAlgorithm;
pub use moead::Moead;
pub use registry::{
    AggregationKind, ArchiveKind, CrossoverKind, DifferentialEvolutionKind, Factory, InitialSolutionsKind,
    MutationKind, OperatorArgs, OperatorKind, OperatorRegistry, SelectionKind, SequenceGeneratorKind,
};
pub use variation::{CrossoverAndMutationVariation, DifferentialEvolutionVariation, Variation};
