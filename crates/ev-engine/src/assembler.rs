//! Assemblers: from a resolved parameter space and a problem context to a
//! runnable algorithm.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use ev_operators::{operator_rng, MatingSelection, OperatorRng, Replacement, WeightVectorNeighborhood};
use ev_params::names::*;
use ev_params::{moead_space, nsgaii_space, smsemoa_space, ParameterSpace, Value};
use ev_types::{AssemblyError, EvResult, Problem};

use crate::algorithm::{Algorithm, Evaluation, SharedArchive};
use crate::archive_result::WithArchive;
use crate::evolutionary::EvolutionaryAlgorithm;
use crate::moead::Moead;
use crate::registry::{OperatorArgs, OperatorRegistry};
use crate::variation::{CrossoverAndMutationVariation, DifferentialEvolutionVariation, Variation};

/// What an assembled algorithm is run against.
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    problem: Arc<dyn Problem>,
    population_size: usize,
    max_evaluations: usize,
    seed: Option<u64>,
}

impl AssemblyContext {
    pub fn new(problem: Arc<dyn Problem>, population_size: usize, max_evaluations: usize) -> Self {
        Self {
            problem,
            population_size,
            max_evaluations,
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generator for one assembled algorithm.
    pub fn rng(&self) -> OperatorRng {
        operator_rng(self.seed)
    }

    pub fn validate(&self) -> EvResult<()> {
        if self.population_size == 0 {
            return Err(invalid_context("population size must be positive".to_string()));
        }
        if self.max_evaluations == 0 {
            return Err(invalid_context("evaluation budget must be positive".to_string()));
        }
        if self.problem.number_of_variables() == 0 || self.problem.number_of_objectives() == 0 {
            return Err(invalid_context(format!(
                "problem {} has no variables or no objectives",
                self.problem.name()
            )));
        }
        Ok(())
    }
}

/// Builds runnable algorithms of one family from resolved parameter spaces.
pub trait AlgorithmAssembler: Send + Sync {
    fn name(&self) -> &str;

    /// The family's template space. Callers resolve values on
    /// [`ParameterSpace::create_instance`] copies, never on the template.
    fn parameter_space(&self) -> &ParameterSpace;

    /// Assemble from a space whose values are resolved. Context constants
    /// are injected into `space` as non-configurable sub-parameters.
    fn assemble(&self, space: &mut ParameterSpace, context: &AssemblyContext) -> EvResult<Box<dyn Algorithm>>;
}

fn invalid_context(message: String) -> ev_types::EvError {
    AssemblyError::InvalidContext { message }.into()
}

fn missing(parameter: &str, required_by: &str) -> ev_types::EvError {
    AssemblyError::MissingDependency {
        parameter: parameter.to_string(),
        required_by: required_by.to_string(),
    }
    .into()
}

/// Resolved value of a top-level parameter.
fn top_level_value<'a>(space: &'a ParameterSpace, name: &str) -> EvResult<&'a Value> {
    space.get(name)?.value().ok_or_else(|| missing(name, space.name()))
}

fn top_level_count(space: &ParameterSpace, name: &str) -> EvResult<usize> {
    top_level_value(space, name)?
        .as_i64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| missing(name, space.name()))
}

fn uses_external_archive(space: &ParameterSpace) -> EvResult<bool> {
    match OperatorArgs::new(space, ALGORITHM_RESULT)?.label()? {
        POPULATION => Ok(false),
        EXTERNAL_ARCHIVE => Ok(true),
        other => Err(AssemblyError::UnknownOperator {
            family: ALGORITHM_RESULT.to_string(),
            name: other.to_string(),
        }
        .into()),
    }
}

/// Inject the context constants the variation operators read, then build
/// the variation strategy.
fn build_variation(
    registry: &OperatorRegistry,
    space: &mut ParameterSpace,
    problem: &dyn Problem,
    offspring_population_size: usize,
    max_iterations: usize,
) -> EvResult<Variation> {
    space.set_non_configurable_sub_parameter(MUTATION, NUMBER_OF_PROBLEM_VARIABLES, problem.number_of_variables())?;
    space.set_non_configurable_sub_parameter(MUTATION, MAX_ITERATIONS, max_iterations)?;
    space.set_non_configurable_sub_parameter(VARIATION, OFFSPRING_POPULATION_SIZE, offspring_population_size)?;

    let args = OperatorArgs::new(space, VARIATION)?;
    let offspring = args.constant_usize(OFFSPRING_POPULATION_SIZE)?;
    let mutation = registry.create_mutation(space)?;
    match args.label()? {
        CROSSOVER_AND_MUTATION_VARIATION => Ok(Variation::CrossoverAndMutation(CrossoverAndMutationVariation::new(
            registry.create_crossover(space)?,
            mutation,
            offspring,
        ))),
        DIFFERENTIAL_EVOLUTION_VARIATION => Ok(Variation::DifferentialEvolution(DifferentialEvolutionVariation::new(
            registry.create_differential_evolution(space)?,
            mutation,
            offspring,
        ))),
        other => Err(AssemblyError::UnknownOperator {
            family: VARIATION.to_string(),
            name: other.to_string(),
        }
        .into()),
    }
}

/// Archive sized to the requested population, shared between the
/// evaluation step and the result decorator.
fn build_archive(registry: &OperatorRegistry, space: &mut ParameterSpace, size: usize) -> EvResult<SharedArchive> {
    space.set_non_configurable_sub_parameter(ARCHIVE_TYPE, ARCHIVE_SIZE, size)?;
    let archive = registry.create_archive(space)?;
    Ok(Arc::new(Mutex::new(archive)))
}

fn selection_label(space: &ParameterSpace) -> String {
    space
        .get(SELECTION)
        .ok()
        .and_then(|p| p.value())
        .map(|v| v.to_string())
        .unwrap_or_default()
}

/// Generational ranking-and-crowding family (NSGA-II style).
#[derive(Debug)]
pub struct EvolutionaryAssembler {
    registry: Arc<OperatorRegistry>,
    template: ParameterSpace,
}

impl EvolutionaryAssembler {
    pub fn new(registry: Arc<OperatorRegistry>) -> EvResult<Self> {
        Ok(Self::with_space(registry, nsgaii_space()?))
    }

    /// An assembler over a custom space built from the same groups.
    pub fn with_space(registry: Arc<OperatorRegistry>, template: ParameterSpace) -> Self {
        Self { registry, template }
    }
}

impl AlgorithmAssembler for EvolutionaryAssembler {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn parameter_space(&self) -> &ParameterSpace {
        &self.template
    }

    fn assemble(&self, space: &mut ParameterSpace, context: &AssemblyContext) -> EvResult<Box<dyn Algorithm>> {
        let offspring = top_level_count(space, OFFSPRING_POPULATION_SIZE)?;
        assemble_evolutionary(
            &self.registry,
            self.name(),
            space,
            context,
            offspring,
            Replacement::RankingAndCrowding,
        )
    }
}

/// Steady-state hypervolume-contribution family (SMS-EMOA style).
#[derive(Debug)]
pub struct SmsEmoaAssembler {
    registry: Arc<OperatorRegistry>,
    template: ParameterSpace,
}

impl SmsEmoaAssembler {
    pub fn new(registry: Arc<OperatorRegistry>) -> EvResult<Self> {
        Ok(Self::with_space(registry, smsemoa_space()?))
    }

    pub fn with_space(registry: Arc<OperatorRegistry>, template: ParameterSpace) -> Self {
        Self { registry, template }
    }
}

impl AlgorithmAssembler for SmsEmoaAssembler {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn parameter_space(&self) -> &ParameterSpace {
        &self.template
    }

    fn assemble(&self, space: &mut ParameterSpace, context: &AssemblyContext) -> EvResult<Box<dyn Algorithm>> {
        assemble_evolutionary(
            &self.registry,
            self.name(),
            space,
            context,
            1,
            Replacement::HypervolumeContribution,
        )
    }
}

/// Wire an [`EvolutionaryAlgorithm`] producing `offspring` solutions per
/// step. Choosing the external archive re-sizes the population to
/// `populationSizeWithArchive` and the archive to the context population.
fn assemble_evolutionary(
    registry: &OperatorRegistry,
    name: &str,
    space: &mut ParameterSpace,
    context: &AssemblyContext,
    offspring: usize,
    replacement: Replacement,
) -> EvResult<Box<dyn Algorithm>> {
    context.validate()?;
    let problem = context.problem().clone();

    let archived = uses_external_archive(space)?;
    let population_size = if archived {
        let size = OperatorArgs::new(space, ALGORITHM_RESULT)?.integer(POPULATION_SIZE_WITH_ARCHIVE)?;
        usize::try_from(size).map_err(|_| invalid_context(format!("population size {size} is negative")))?
    } else {
        context.population_size()
    };
    let max_iterations = context.max_evaluations() / offspring.max(1);

    let variation = build_variation(registry, space, problem.as_ref(), offspring, max_iterations)?;
    space.set_non_configurable_sub_parameter(SELECTION, MATING_POOL_SIZE, variation.mating_pool_size())?;
    let selection = registry.create_selection(space)?;
    if matches!(selection, MatingSelection::PopulationAndNeighborhood(_)) {
        return Err(AssemblyError::UnknownOperator {
            family: SELECTION.to_string(),
            name: selection_label(space),
        }
        .into());
    }
    let initial_solutions = registry.create_initial_solutions(space)?;

    let mut evaluation = Evaluation::new(problem.clone());
    let archive = if archived {
        let archive = build_archive(registry, space, context.population_size())?;
        evaluation = evaluation.with_archive(archive.clone());
        Some(archive)
    } else {
        None
    };

    debug!(
        "Assembled {} for {}: population {}, offspring {}, budget {}, archive {}",
        name,
        problem.name(),
        population_size,
        offspring,
        context.max_evaluations(),
        archived
    );

    let algorithm = EvolutionaryAlgorithm::new(
        name,
        population_size,
        context.max_evaluations(),
        initial_solutions,
        evaluation,
        selection,
        variation,
        context.rng(),
    )
    .with_replacement(replacement);
    let algorithm: Box<dyn Algorithm> = match archive {
        Some(archive) => Box::new(WithArchive::new(algorithm, archive)),
        None => Box::new(algorithm),
    };
    Ok(algorithm)
}

/// Decomposition-based family (MOEA/D style).
#[derive(Debug)]
pub struct MoeadAssembler {
    registry: Arc<OperatorRegistry>,
    template: ParameterSpace,
}

impl MoeadAssembler {
    pub fn new(registry: Arc<OperatorRegistry>) -> EvResult<Self> {
        Ok(Self::with_space(registry, moead_space()?))
    }

    pub fn with_space(registry: Arc<OperatorRegistry>, template: ParameterSpace) -> Self {
        Self { registry, template }
    }
}

impl AlgorithmAssembler for MoeadAssembler {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn parameter_space(&self) -> &ParameterSpace {
        &self.template
    }

    fn assemble(&self, space: &mut ParameterSpace, context: &AssemblyContext) -> EvResult<Box<dyn Algorithm>> {
        context.validate()?;
        let population_size = context.population_size();
        if context.max_evaluations() <= population_size {
            return Err(invalid_context(format!(
                "evaluation budget {} must exceed the population size {}",
                context.max_evaluations(),
                population_size
            )));
        }
        let problem = context.problem().clone();

        let neighborhood_size = top_level_count(space, NEIGHBORHOOD_SIZE)?;
        let max_replaced = top_level_count(space, MAX_REPLACED_SOLUTIONS)?;
        let archived = uses_external_archive(space)?;
        let max_iterations = context.max_evaluations() / population_size;

        let variation = build_variation(&self.registry, space, problem.as_ref(), 1, max_iterations)?;
        let mating_pool_size = match &variation {
            Variation::DifferentialEvolution(v) => v.number_of_donors(),
            Variation::CrossoverAndMutation(v) => v.mating_pool_size(),
        };
        space.set_non_configurable_sub_parameter(SELECTION, MATING_POOL_SIZE, mating_pool_size)?;
        let selection = match self.registry.create_selection(space)? {
            MatingSelection::PopulationAndNeighborhood(selection) => selection,
            _ => {
                return Err(AssemblyError::UnknownOperator {
                    family: SELECTION.to_string(),
                    name: selection_label(space),
                }
                .into())
            }
        };

        let aggregation = self.registry.create_aggregation(space)?;
        space.set_non_configurable_sub_parameter(SUB_PROBLEM_ID_GENERATOR, POPULATION_SIZE, population_size)?;
        let sequence = self.registry.create_sequence_generator(space)?;
        let initial_solutions = self.registry.create_initial_solutions(space)?;
        let neighborhood =
            WeightVectorNeighborhood::new(population_size, problem.number_of_objectives(), neighborhood_size);

        let mut evaluation = Evaluation::new(problem.clone());
        let archive = if archived {
            let archive = build_archive(&self.registry, space, population_size)?;
            evaluation = evaluation.with_archive(archive.clone());
            Some(archive)
        } else {
            None
        };

        debug!(
            "Assembled {} for {}: population {}, neighborhood {}, budget {}, archive {}",
            self.name(),
            problem.name(),
            population_size,
            neighborhood_size,
            context.max_evaluations(),
            archived
        );

        let algorithm = Moead::new(
            self.name(),
            population_size,
            context.max_evaluations(),
            max_replaced,
            initial_solutions,
            evaluation,
            neighborhood,
            aggregation,
            sequence,
            selection,
            variation,
            context.rng(),
        );
        let algorithm: Box<dyn Algorithm> = match archive {
            Some(archive) => Box::new(WithArchive::new(algorithm, archive)),
            None => Box::new(algorithm),
        };
        Ok(algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MutationKind;
    use ev_operators::problems::{Dtlz2, Zdt1};
    use ev_operators::UniformMutation;
    use ev_params::tokenize;
    use ev_types::EvError;

    const NSGAII_CONFIGURATION: &str = "--algorithmResult population --createInitialSolutions random \
        --offspringPopulationSize 20 --variation crossoverAndMutationVariation \
        --mutation polynomial --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
        --polynomialMutationDistributionIndex 20.0 --crossover SBX --crossoverProbability 0.9 \
        --crossoverRepairStrategy bounds --sbxDistributionIndex 20.0 \
        --selection tournament --selectionTournamentSize 2";

    fn evolutionary(registry: OperatorRegistry) -> EvolutionaryAssembler {
        EvolutionaryAssembler::new(Arc::new(registry)).unwrap()
    }

    fn context(population_size: usize, max_evaluations: usize) -> AssemblyContext {
        AssemblyContext::new(Arc::new(Zdt1::new(10)), population_size, max_evaluations).with_seed(5)
    }

    fn resolve(assembler: &dyn AlgorithmAssembler, configuration: &str) -> ParameterSpace {
        let mut space = assembler.parameter_space().create_instance();
        space.parse(&tokenize(configuration)).unwrap();
        space
    }

    #[test]
    fn assembles_and_runs_from_tokens() {
        let assembler = evolutionary(OperatorRegistry::with_defaults());
        let mut space = resolve(&assembler, NSGAII_CONFIGURATION);
        let mut algorithm = assembler.assemble(&mut space, &context(20, 400)).unwrap();
        algorithm.run().unwrap();
        assert_eq!(algorithm.name(), "NSGA-II");
        assert_eq!(algorithm.evaluations(), 400);
        assert_eq!(algorithm.result().len(), 20);
        // the template is untouched by assembly
        assert!(assembler.parameter_space().get(MUTATION).unwrap().value().is_none());
    }

    #[test]
    fn external_archive_resizes_population_and_reports_archive() {
        let assembler = evolutionary(OperatorRegistry::with_defaults());
        let configuration = NSGAII_CONFIGURATION.replace(
            "--algorithmResult population",
            "--algorithmResult externalArchive --populationSizeWithArchive 40 --archiveType crowdingDistanceArchive",
        );
        let mut space = resolve(&assembler, &configuration);
        let mut algorithm = assembler.assemble(&mut space, &context(10, 400)).unwrap();
        algorithm.run().unwrap();
        assert_eq!(algorithm.evaluations(), 400);
        let result = algorithm.result();
        assert!(!result.is_empty() && result.len() <= 10);
        assert_eq!(
            space.get(ARCHIVE_TYPE).unwrap().non_configurable(ARCHIVE_SIZE),
            Some(&Value::Integer(10))
        );
    }

    #[test]
    fn unregistered_operator_is_rejected() {
        let mut registry = OperatorRegistry::default();
        registry.register_mutation(MutationKind::Polynomial, |_| {
            Ok(Box::new(UniformMutation::new(0.1, 0.5, ev_operators::RepairStrategy::Bounds)))
        });
        let assembler = evolutionary(registry);
        let mut space = resolve(&assembler, NSGAII_CONFIGURATION);
        match assembler.assemble(&mut space, &context(20, 400)) {
            Err(EvError::Assembly(AssemblyError::UnknownOperator { family, name })) => {
                assert_eq!(family, "crossover");
                assert_eq!(name, "SBX");
            }
            other => panic!("expected UnknownOperator, got {:?}", other.map(|a| a.name().to_string())),
        }
    }

    #[test]
    fn factory_reading_inactive_parameter_is_missing_dependency() {
        let mut registry = OperatorRegistry::with_defaults();
        registry.register_mutation(MutationKind::Uniform, |args| {
            let index = args.real(POLYNOMIAL_DISTRIBUTION_INDEX)?;
            Ok(Box::new(UniformMutation::new(0.1, index, ev_operators::RepairStrategy::Bounds)))
        });
        let assembler = evolutionary(registry);
        let configuration = NSGAII_CONFIGURATION.replace(
            "--mutation polynomial --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
        --polynomialMutationDistributionIndex 20.0",
            "--mutation uniform --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
        --uniformMutationPerturbation 0.5",
        );
        let mut space = resolve(&assembler, &configuration);
        match assembler.assemble(&mut space, &context(20, 400)) {
            Err(EvError::Assembly(AssemblyError::MissingDependency { parameter, required_by })) => {
                assert_eq!(parameter, "polynomialMutationDistributionIndex");
                assert_eq!(required_by, "mutation");
            }
            other => panic!("expected MissingDependency, got {:?}", other.map(|a| a.name().to_string())),
        }
    }

    #[test]
    fn invalid_contexts_are_rejected() {
        let assembler = evolutionary(OperatorRegistry::with_defaults());
        let mut space = resolve(&assembler, NSGAII_CONFIGURATION);
        assert!(matches!(
            assembler.assemble(&mut space, &context(0, 400)),
            Err(EvError::Assembly(AssemblyError::InvalidContext { .. }))
        ));

        let moead = MoeadAssembler::new(Arc::new(OperatorRegistry::with_defaults())).unwrap();
        let mut space = moead.parameter_space().create_instance();
        space.decode(&vec![0.5; moead.parameter_space().dimension()]).unwrap();
        assert!(matches!(
            moead.assemble(&mut space, &context(50, 50)),
            Err(EvError::Assembly(AssemblyError::InvalidContext { .. }))
        ));
    }

    #[test]
    fn decoded_vectors_assemble_for_both_families() {
        let registry = Arc::new(OperatorRegistry::with_defaults());
        let assemblers: Vec<Box<dyn AlgorithmAssembler>> = vec![
            Box::new(EvolutionaryAssembler::new(registry.clone()).unwrap()),
            Box::new(MoeadAssembler::new(registry).unwrap()),
        ];
        let problem: Arc<dyn Problem> = Arc::new(Dtlz2::new(7, 3));

        for assembler in &assemblers {
            let template = assembler.parameter_space();
            for u in [0.0, 0.3, 0.5, 0.8, 1.0] {
                let mut space = template.create_instance();
                space.decode(&vec![u; template.dimension()]).unwrap();
                let context = AssemblyContext::new(problem.clone(), 12, 1000).with_seed(9);
                let mut algorithm = assembler.assemble(&mut space, &context).unwrap();
                algorithm.run().unwrap();
                assert!(algorithm.evaluations() >= 1000, "{} at {u}", assembler.name());
                let result = algorithm.result();
                assert!(!result.is_empty());
                assert!(result.iter().all(|s| s.objectives.len() == 3));
            }
        }
    }

    #[test]
    fn smsemoa_runs_steady_state_from_tokens() {
        let assembler = SmsEmoaAssembler::new(Arc::new(OperatorRegistry::with_defaults())).unwrap();
        let configuration = NSGAII_CONFIGURATION.replace("--offspringPopulationSize 20 ", "");
        let mut space = resolve(&assembler, &configuration);
        let context = AssemblyContext::new(Arc::new(Dtlz2::new(7, 3)), 12, 301).with_seed(4);
        let mut algorithm = assembler.assemble(&mut space, &context).unwrap();
        algorithm.run().unwrap();

        assert_eq!(algorithm.name(), "SMS-EMOA");
        // one offspring per step spends the budget exactly
        assert_eq!(algorithm.evaluations(), 301);
        assert_eq!(algorithm.result().len(), 12);
        assert_eq!(
            space.get(VARIATION).unwrap().non_configurable(OFFSPRING_POPULATION_SIZE),
            Some(&Value::Integer(1))
        );
        assert_eq!(
            space.get(MUTATION).unwrap().non_configurable(MAX_ITERATIONS),
            Some(&Value::Integer(301))
        );
    }

    #[test]
    fn decoded_vectors_assemble_steady_state_family() {
        let assembler = SmsEmoaAssembler::new(Arc::new(OperatorRegistry::with_defaults())).unwrap();
        let template = assembler.parameter_space();
        let problem: Arc<dyn Problem> = Arc::new(Zdt1::new(6));

        for u in [0.0, 0.3, 0.5, 0.8, 1.0] {
            let mut space = template.create_instance();
            space.decode(&vec![u; template.dimension()]).unwrap();
            let context = AssemblyContext::new(problem.clone(), 12, 600).with_seed(9);
            let mut algorithm = assembler.assemble(&mut space, &context).unwrap();
            algorithm.run().unwrap();
            assert_eq!(algorithm.evaluations(), 600, "at {u}");
            let result = algorithm.result();
            assert!(!result.is_empty() && result.len() <= 12);
            assert!(result.iter().all(|s| s.objectives.len() == 2));
        }
    }
}
