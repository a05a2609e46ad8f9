//! Operator registry: enum-keyed factories turning resolved parameters into
//! operator instances.
//!
//! Each operator family is selected by one categorical parameter (the
//! family's [`OperatorKind::PARAMETER`]). A factory receives an
//! [`OperatorArgs`] view of that parameter and reads what it needs from its
//! active sub-parameters and non-configurable constants. Reading anything
//! that is not active yields [`AssemblyError::MissingDependency`].

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use ev_operators::{
    AggregationFunction, Archive, BlxAlphaCrossover, Crossover, CrowdingDistanceArchive, CyclicIntegerSequence,
    DifferentialEvolutionCrossover, DifferentialEvolutionVariant, InitialSolutions, LatinHypercubeSampling,
    LinkedPolynomialMutation, MatingSelection, Mutation, NeighborhoodSelection, NonUniformMutation,
    PolynomialMutation, RandomPermutationCycle, RandomSelection, RandomSolutions, RepairStrategy, SbxCrossover,
    ScalarizingFunction, SequenceGenerator, TournamentSelection, UnboundedArchive, UniformMutation,
    WholeArithmeticCrossover,
};
use ev_params::names::*;
use ev_params::{Parameter, ParameterId, ParameterSpace, Value};
use ev_types::{validation_error, AssemblyError, EvError, EvResult};

/// A closed set of operator identifiers selected by one parameter.
pub trait OperatorKind:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr<Err = AssemblyError> + Send + Sync + 'static
{
    /// Name of the categorical parameter whose value selects the operator.
    const PARAMETER: &'static str;

    fn all() -> &'static [Self];

    fn as_str(self) -> &'static str;
}

macro_rules! operator_kind {
    ($(#[$meta:meta])* $name:ident, $parameter:expr, { $($variant:ident => $label:expr),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl OperatorKind for $name {
            const PARAMETER: &'static str = $parameter;

            fn all() -> &'static [Self] {
                &[$($name::$variant),+]
            }

            fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = AssemblyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::all()
                    .iter()
                    .copied()
                    .find(|kind| kind.as_str() == s)
                    .ok_or_else(|| AssemblyError::UnknownOperator {
                        family: $parameter.to_string(),
                        name: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

operator_kind!(CrossoverKind, CROSSOVER, {
    Sbx => SBX,
    BlxAlpha => BLX_ALPHA,
    WholeArithmetic => WHOLE_ARITHMETIC,
});

operator_kind!(MutationKind, MUTATION, {
    Uniform => UNIFORM,
    Polynomial => POLYNOMIAL,
    LinkedPolynomial => LINKED_POLYNOMIAL,
    NonUniform => NON_UNIFORM,
});

operator_kind!(DifferentialEvolutionKind, DIFFERENTIAL_EVOLUTION_CROSSOVER, {
    Rand1Bin => RAND_1_BIN,
    Rand1Exp => RAND_1_EXP,
    Rand2Bin => RAND_2_BIN,
});

operator_kind!(ArchiveKind, ARCHIVE_TYPE, {
    CrowdingDistance => CROWDING_DISTANCE_ARCHIVE,
    Unbounded => UNBOUNDED_ARCHIVE,
});

operator_kind!(SelectionKind, SELECTION, {
    Tournament => TOURNAMENT,
    Random => RANDOM_SELECTION,
    PopulationAndNeighborhood => POPULATION_AND_NEIGHBORHOOD_SELECTION,
});

operator_kind!(AggregationKind, AGGREGATION_FUNCTION, {
    Tschebyscheff => TSCHEBYSCHEFF,
    WeightedSum => WEIGHTED_SUM,
    PenaltyBoundaryIntersection => PENALTY_BOUNDARY_INTERSECTION,
    ModifiedTschebyscheff => MODIFIED_TSCHEBYSCHEFF,
});

operator_kind!(SequenceGeneratorKind, SUB_PROBLEM_ID_GENERATOR, {
    RandomPermutationCycle => RANDOM_PERMUTATION_CYCLE,
    CyclicIntegerSequence => CYCLIC_INTEGER_SEQUENCE,
});

operator_kind!(InitialSolutionsKind, CREATE_INITIAL_SOLUTIONS, {
    Random => RANDOM_INITIALIZATION,
    LatinHypercubeSampling => LATIN_HYPERCUBE_SAMPLING,
});

/// Read access to an operator parameter, its active sub-parameters and its
/// non-configurable constants.
#[derive(Debug, Clone)]
pub struct OperatorArgs<'a> {
    space: &'a ParameterSpace,
    owner: &'a Parameter,
    active: Vec<ParameterId>,
}

impl<'a> OperatorArgs<'a> {
    pub fn new(space: &'a ParameterSpace, owner: &str) -> EvResult<Self> {
        let id = space.id(owner)?;
        Ok(Self {
            space,
            owner: space.parameter(id),
            active: space.active_sub_parameters(id),
        })
    }

    pub fn owner(&self) -> &'a Parameter {
        self.owner
    }

    /// The owner's resolved value as an operator label.
    pub fn label(&self) -> EvResult<&'a str> {
        self.owner
            .value()
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(self.owner.name()))
    }

    /// An active sub-parameter of the owner.
    pub fn child(&self, name: &str) -> EvResult<&'a Parameter> {
        let space = self.space;
        self.active
            .iter()
            .map(|id| space.parameter(*id))
            .find(|parameter| parameter.name() == name)
            .ok_or_else(|| self.missing(name))
    }

    /// Arguments rooted at an active sub-parameter.
    pub fn nested(&self, name: &str) -> EvResult<OperatorArgs<'a>> {
        self.child(name)?;
        OperatorArgs::new(self.space, name)
    }

    pub fn real(&self, name: &str) -> EvResult<f64> {
        let value = self.value(name)?;
        value
            .as_f64()
            .ok_or_else(|| validation_error!("{} of {} is not numeric: {}", name, self.owner.name(), value))
    }

    pub fn integer(&self, name: &str) -> EvResult<i64> {
        let value = self.value(name)?;
        value
            .as_i64()
            .ok_or_else(|| validation_error!("{} of {} is not an integer: {}", name, self.owner.name(), value))
    }

    pub fn boolean(&self, name: &str) -> EvResult<bool> {
        let value = self.value(name)?;
        value
            .as_bool()
            .ok_or_else(|| validation_error!("{} of {} is not a boolean: {}", name, self.owner.name(), value))
    }

    pub fn category(&self, name: &str) -> EvResult<&'a str> {
        let value = self.value(name)?;
        value
            .as_str()
            .ok_or_else(|| validation_error!("{} of {} is not a label: {}", name, self.owner.name(), value))
    }

    /// A non-configurable constant injected on the owner.
    pub fn constant(&self, key: &str) -> EvResult<&'a Value> {
        self.owner.non_configurable(key).ok_or_else(|| self.missing(key))
    }

    pub fn constant_usize(&self, key: &str) -> EvResult<usize> {
        let value = self.constant(key)?;
        value
            .as_i64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| validation_error!("{} of {} is not a count: {}", key, self.owner.name(), value))
    }

    fn value(&self, name: &str) -> EvResult<&'a Value> {
        self.child(name)?.value().ok_or_else(|| self.missing(name))
    }

    fn missing(&self, parameter: &str) -> EvError {
        AssemblyError::MissingDependency {
            parameter: parameter.to_string(),
            required_by: self.owner.name().to_string(),
        }
        .into()
    }
}

/// Builds one operator from its parameter view.
pub type Factory<T> = Arc<dyn Fn(&OperatorArgs<'_>) -> EvResult<T> + Send + Sync>;

/// Factories for every operator family, keyed by kind.
///
/// [`OperatorRegistry::default`] is empty; [`OperatorRegistry::with_defaults`]
/// registers the whole operator library.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    crossovers: HashMap<CrossoverKind, Factory<Box<dyn Crossover>>>,
    mutations: HashMap<MutationKind, Factory<Box<dyn Mutation>>>,
    differential_evolution: HashMap<DifferentialEvolutionKind, Factory<DifferentialEvolutionCrossover>>,
    archives: HashMap<ArchiveKind, Factory<Box<dyn Archive>>>,
    selections: HashMap<SelectionKind, Factory<MatingSelection>>,
    aggregations: HashMap<AggregationKind, Factory<AggregationFunction>>,
    sequence_generators: HashMap<SequenceGeneratorKind, Factory<Box<dyn SequenceGenerator>>>,
    initial_solutions: HashMap<InitialSolutionsKind, Factory<Box<dyn InitialSolutions>>>,
}

fn create<K: OperatorKind, T>(factories: &HashMap<K, Factory<T>>, space: &ParameterSpace) -> EvResult<T> {
    let args = OperatorArgs::new(space, K::PARAMETER)?;
    let label = args.label()?;
    let kind: K = label.parse()?;
    let factory = factories.get(&kind).ok_or_else(|| AssemblyError::UnknownOperator {
        family: K::PARAMETER.to_string(),
        name: label.to_string(),
    })?;
    factory(&args)
}

fn registered<K: OperatorKind, T>(factories: &HashMap<K, Factory<T>>) -> Vec<K> {
    K::all().iter().copied().filter(|kind| factories.contains_key(kind)).collect()
}

fn repair_strategy(args: &OperatorArgs<'_>, name: &str) -> EvResult<RepairStrategy> {
    let label = args.category(name)?;
    RepairStrategy::from_label(label).ok_or_else(|| {
        AssemblyError::UnknownOperator {
            family: name.to_string(),
            name: label.to_string(),
        }
        .into()
    })
}

/// `mutationProbabilityFactor / numberOfProblemVariables`, capped at one.
fn mutation_probability(args: &OperatorArgs<'_>) -> EvResult<f64> {
    let factor = args.real(MUTATION_PROBABILITY_FACTOR)?;
    let variables = args.constant_usize(NUMBER_OF_PROBLEM_VARIABLES)?.max(1);
    Ok((factor / variables as f64).min(1.0))
}

fn count(args: &OperatorArgs<'_>, name: &str) -> EvResult<usize> {
    let value = args.integer(name)?;
    usize::try_from(value).map_err(|_| validation_error!("{} must not be negative: {}", name, value))
}

impl OperatorRegistry {
    /// A registry holding every operator of the operator library.
    pub fn with_defaults() -> Self {
        let mut registry = Self::default();

        registry.register_crossover(CrossoverKind::Sbx, |args| {
            Ok(Box::new(SbxCrossover::new(
                args.real(CROSSOVER_PROBABILITY)?,
                args.real(SBX_DISTRIBUTION_INDEX)?,
                repair_strategy(args, CROSSOVER_REPAIR_STRATEGY)?,
            )))
        });
        registry.register_crossover(CrossoverKind::BlxAlpha, |args| {
            Ok(Box::new(BlxAlphaCrossover::new(
                args.real(CROSSOVER_PROBABILITY)?,
                args.real(BLX_ALPHA_VALUE)?,
                repair_strategy(args, CROSSOVER_REPAIR_STRATEGY)?,
            )))
        });
        registry.register_crossover(CrossoverKind::WholeArithmetic, |args| {
            Ok(Box::new(WholeArithmeticCrossover::new(
                args.real(CROSSOVER_PROBABILITY)?,
                repair_strategy(args, CROSSOVER_REPAIR_STRATEGY)?,
            )))
        });

        registry.register_mutation(MutationKind::Uniform, |args| {
            Ok(Box::new(UniformMutation::new(
                mutation_probability(args)?,
                args.real(UNIFORM_MUTATION_PERTURBATION)?,
                repair_strategy(args, MUTATION_REPAIR_STRATEGY)?,
            )))
        });
        registry.register_mutation(MutationKind::Polynomial, |args| {
            Ok(Box::new(PolynomialMutation::new(
                mutation_probability(args)?,
                args.real(POLYNOMIAL_DISTRIBUTION_INDEX)?,
                repair_strategy(args, MUTATION_REPAIR_STRATEGY)?,
            )))
        });
        registry.register_mutation(MutationKind::LinkedPolynomial, |args| {
            Ok(Box::new(LinkedPolynomialMutation::new(
                mutation_probability(args)?,
                args.real(LINKED_POLYNOMIAL_DISTRIBUTION_INDEX)?,
                repair_strategy(args, MUTATION_REPAIR_STRATEGY)?,
            )))
        });
        registry.register_mutation(MutationKind::NonUniform, |args| {
            Ok(Box::new(NonUniformMutation::new(
                mutation_probability(args)?,
                args.real(NON_UNIFORM_MUTATION_PERTURBATION)?,
                args.constant_usize(MAX_ITERATIONS)?,
                repair_strategy(args, MUTATION_REPAIR_STRATEGY)?,
            )))
        });

        for (kind, variant) in [
            (DifferentialEvolutionKind::Rand1Bin, DifferentialEvolutionVariant::Rand1Bin),
            (DifferentialEvolutionKind::Rand1Exp, DifferentialEvolutionVariant::Rand1Exp),
            (DifferentialEvolutionKind::Rand2Bin, DifferentialEvolutionVariant::Rand2Bin),
        ] {
            registry.register_differential_evolution(kind, move |args| {
                Ok(DifferentialEvolutionCrossover::new(variant, args.real(DE_CR)?, args.real(DE_F)?))
            });
        }

        registry.register_archive(ArchiveKind::CrowdingDistance, |args| {
            Ok(Box::new(CrowdingDistanceArchive::new(args.constant_usize(ARCHIVE_SIZE)?)))
        });
        registry.register_archive(ArchiveKind::Unbounded, |args| {
            Ok(Box::new(UnboundedArchive::new(args.constant_usize(ARCHIVE_SIZE)?)))
        });

        registry.register_selection(SelectionKind::Tournament, |args| {
            Ok(MatingSelection::Tournament(TournamentSelection::new(
                count(args, SELECTION_TOURNAMENT_SIZE)?,
                args.constant_usize(MATING_POOL_SIZE)?,
            )))
        });
        registry.register_selection(SelectionKind::Random, |args| {
            Ok(MatingSelection::Random(RandomSelection::new(
                args.constant_usize(MATING_POOL_SIZE)?,
            )))
        });
        registry.register_selection(SelectionKind::PopulationAndNeighborhood, |args| {
            Ok(MatingSelection::PopulationAndNeighborhood(NeighborhoodSelection::new(
                args.real(NEIGHBORHOOD_SELECTION_PROBABILITY)?,
                args.constant_usize(MATING_POOL_SIZE)?,
            )))
        });

        for (kind, function) in [
            (AggregationKind::Tschebyscheff, ScalarizingFunction::Tschebyscheff),
            (AggregationKind::WeightedSum, ScalarizingFunction::WeightedSum),
            (AggregationKind::ModifiedTschebyscheff, ScalarizingFunction::ModifiedTschebyscheff),
        ] {
            registry.register_aggregation(kind, move |args| normalized(args, AggregationFunction::new(function)));
        }
        registry.register_aggregation(AggregationKind::PenaltyBoundaryIntersection, |args| {
            let theta = args.real(PBI_THETA)?;
            normalized(
                args,
                AggregationFunction::new(ScalarizingFunction::PenaltyBoundaryIntersection { theta }),
            )
        });

        registry.register_sequence_generator(SequenceGeneratorKind::RandomPermutationCycle, |args| {
            Ok(Box::new(RandomPermutationCycle::new(args.constant_usize(POPULATION_SIZE)?)))
        });
        registry.register_sequence_generator(SequenceGeneratorKind::CyclicIntegerSequence, |args| {
            Ok(Box::new(CyclicIntegerSequence::new(args.constant_usize(POPULATION_SIZE)?)))
        });

        registry.register_initial_solutions(InitialSolutionsKind::Random, |_| Ok(Box::new(RandomSolutions)));
        registry.register_initial_solutions(InitialSolutionsKind::LatinHypercubeSampling, |_| {
            Ok(Box::new(LatinHypercubeSampling))
        });

        registry
    }

    pub fn register_crossover<F>(&mut self, kind: CrossoverKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<Box<dyn Crossover>> + Send + Sync + 'static,
    {
        self.crossovers.insert(kind, Arc::new(factory));
    }

    pub fn register_mutation<F>(&mut self, kind: MutationKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<Box<dyn Mutation>> + Send + Sync + 'static,
    {
        self.mutations.insert(kind, Arc::new(factory));
    }

    pub fn register_differential_evolution<F>(&mut self, kind: DifferentialEvolutionKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<DifferentialEvolutionCrossover> + Send + Sync + 'static,
    {
        self.differential_evolution.insert(kind, Arc::new(factory));
    }

    pub fn register_archive<F>(&mut self, kind: ArchiveKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<Box<dyn Archive>> + Send + Sync + 'static,
    {
        self.archives.insert(kind, Arc::new(factory));
    }

    pub fn register_selection<F>(&mut self, kind: SelectionKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<MatingSelection> + Send + Sync + 'static,
    {
        self.selections.insert(kind, Arc::new(factory));
    }

    pub fn register_aggregation<F>(&mut self, kind: AggregationKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<AggregationFunction> + Send + Sync + 'static,
    {
        self.aggregations.insert(kind, Arc::new(factory));
    }

    pub fn register_sequence_generator<F>(&mut self, kind: SequenceGeneratorKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<Box<dyn SequenceGenerator>> + Send + Sync + 'static,
    {
        self.sequence_generators.insert(kind, Arc::new(factory));
    }

    pub fn register_initial_solutions<F>(&mut self, kind: InitialSolutionsKind, factory: F)
    where
        F: Fn(&OperatorArgs<'_>) -> EvResult<Box<dyn InitialSolutions>> + Send + Sync + 'static,
    {
        self.initial_solutions.insert(kind, Arc::new(factory));
    }

    pub fn create_crossover(&self, space: &ParameterSpace) -> EvResult<Box<dyn Crossover>> {
        create(&self.crossovers, space)
    }

    pub fn create_mutation(&self, space: &ParameterSpace) -> EvResult<Box<dyn Mutation>> {
        create(&self.mutations, space)
    }

    pub fn create_differential_evolution(&self, space: &ParameterSpace) -> EvResult<DifferentialEvolutionCrossover> {
        create(&self.differential_evolution, space)
    }

    pub fn create_archive(&self, space: &ParameterSpace) -> EvResult<Box<dyn Archive>> {
        create(&self.archives, space)
    }

    pub fn create_selection(&self, space: &ParameterSpace) -> EvResult<MatingSelection> {
        create(&self.selections, space)
    }

    pub fn create_aggregation(&self, space: &ParameterSpace) -> EvResult<AggregationFunction> {
        create(&self.aggregations, space)
    }

    pub fn create_sequence_generator(&self, space: &ParameterSpace) -> EvResult<Box<dyn SequenceGenerator>> {
        create(&self.sequence_generators, space)
    }

    pub fn create_initial_solutions(&self, space: &ParameterSpace) -> EvResult<Box<dyn InitialSolutions>> {
        create(&self.initial_solutions, space)
    }
}

/// Apply `normalizeObjectives` and its epsilon when switched on.
fn normalized(args: &OperatorArgs<'_>, function: AggregationFunction) -> EvResult<AggregationFunction> {
    if args.boolean(NORMALIZE_OBJECTIVES)? {
        let epsilon = args.nested(NORMALIZE_OBJECTIVES)?.real(NORMALIZATION_EPSILON)?;
        Ok(function.with_normalization(epsilon))
    } else {
        Ok(function)
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("crossovers", &registered(&self.crossovers))
            .field("mutations", &registered(&self.mutations))
            .field("differential_evolution", &registered(&self.differential_evolution))
            .field("archives", &registered(&self.archives))
            .field("selections", &registered(&self.selections))
            .field("aggregations", &registered(&self.aggregations))
            .field("sequence_generators", &registered(&self.sequence_generators))
            .field("initial_solutions", &registered(&self.initial_solutions))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_params::{moead_space, nsgaii_space, tokenize};

    fn resolved(configuration: &str) -> ParameterSpace {
        let mut space = nsgaii_space().unwrap();
        space.parse(&tokenize(configuration)).unwrap();
        space
    }

    const SBX_POLYNOMIAL: &str = "--algorithmResult population --createInitialSolutions random \
        --offspringPopulationSize 100 --variation crossoverAndMutationVariation \
        --mutation polynomial --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
        --polynomialMutationDistributionIndex 20.0 --crossover SBX --crossoverProbability 0.9 \
        --crossoverRepairStrategy bounds --sbxDistributionIndex 20.0 \
        --selection tournament --selectionTournamentSize 2";

    #[test]
    fn kinds_parse_their_labels() {
        for kind in MutationKind::all() {
            assert_eq!(kind.as_str().parse::<MutationKind>().unwrap(), *kind);
        }
        assert_eq!("SBX".parse::<CrossoverKind>().unwrap(), CrossoverKind::Sbx);
        assert_eq!(SelectionKind::Random.to_string(), "random");
        assert_eq!(
            "gaussian".parse::<MutationKind>(),
            Err(AssemblyError::UnknownOperator {
                family: "mutation".to_string(),
                name: "gaussian".to_string(),
            })
        );
    }

    #[test]
    fn defaults_cover_every_kind() {
        let registry = OperatorRegistry::with_defaults();
        assert_eq!(registered(&registry.crossovers).len(), CrossoverKind::all().len());
        assert_eq!(registered(&registry.mutations).len(), MutationKind::all().len());
        assert_eq!(
            registered(&registry.differential_evolution).len(),
            DifferentialEvolutionKind::all().len()
        );
        assert_eq!(registered(&registry.archives).len(), ArchiveKind::all().len());
        assert_eq!(registered(&registry.selections).len(), SelectionKind::all().len());
        assert_eq!(registered(&registry.aggregations).len(), AggregationKind::all().len());
        assert_eq!(
            registered(&registry.sequence_generators).len(),
            SequenceGeneratorKind::all().len()
        );
        assert_eq!(
            registered(&registry.initial_solutions).len(),
            InitialSolutionsKind::all().len()
        );
    }

    #[test]
    fn mutation_reads_injected_constant() {
        let registry = OperatorRegistry::with_defaults();
        let mut space = resolved(SBX_POLYNOMIAL);
        assert!(matches!(
            registry.create_mutation(&space),
            Err(EvError::Assembly(AssemblyError::MissingDependency { .. }))
        ));

        space
            .set_non_configurable_sub_parameter(MUTATION, NUMBER_OF_PROBLEM_VARIABLES, 10usize)
            .unwrap();
        let mutation = registry.create_mutation(&space).unwrap();
        assert_eq!(mutation.name(), "polynomial");
        assert!((mutation.probability() - 0.1).abs() < 1e-12);

        let crossover = registry.create_crossover(&space).unwrap();
        assert!((crossover.probability() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn unregistered_kind_is_unknown_operator() {
        let space = resolved(SBX_POLYNOMIAL);
        let registry = OperatorRegistry::default();
        match registry.create_crossover(&space) {
            Err(EvError::Assembly(AssemblyError::UnknownOperator { family, name })) => {
                assert_eq!(family, "crossover");
                assert_eq!(name, "SBX");
            }
            other => panic!("expected UnknownOperator, got {other:?}"),
        }
    }

    #[test]
    fn inactive_parameter_is_missing_dependency() {
        let space = resolved(SBX_POLYNOMIAL);
        let args = OperatorArgs::new(&space, MUTATION).unwrap();
        assert_eq!(args.real(POLYNOMIAL_DISTRIBUTION_INDEX).unwrap(), 20.0);
        match args.real(UNIFORM_MUTATION_PERTURBATION) {
            Err(EvError::Assembly(AssemblyError::MissingDependency { parameter, required_by })) => {
                assert_eq!(parameter, "uniformMutationPerturbation");
                assert_eq!(required_by, "mutation");
            }
            other => panic!("expected MissingDependency, got {other:?}"),
        }

        // differential evolution is not active under crossoverAndMutationVariation
        let registry = OperatorRegistry::with_defaults();
        assert!(matches!(
            registry.create_differential_evolution(&space),
            Err(EvError::Assembly(AssemblyError::MissingDependency { .. }))
        ));
    }

    #[test]
    fn aggregation_reads_nested_normalization() {
        let mut space = moead_space().unwrap();
        space
            .parse(&tokenize(
                "--neighborhoodSize 20 --maximumNumberOfReplacedSolutions 2 \
                 --aggregationFunction penaltyBoundaryIntersection --normalizeObjectives true \
                 --epsilonParameterForNormalization 4.0 --pbiTheta 5.0 \
                 --algorithmResult population --subProblemIdGenerator randomPermutationCycle \
                 --createInitialSolutions random --variation differentialEvolutionVariation \
                 --mutation polynomial --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
                 --polynomialMutationDistributionIndex 20.0 \
                 --differentialEvolutionCrossover RAND_1_BIN --CR 0.5 --F 0.5 \
                 --selection populationAndNeighborhoodMatingPoolSelection \
                 --neighborhoodSelectionProbability 0.9",
            ))
            .unwrap();
        let registry = OperatorRegistry::with_defaults();

        let aggregation = registry.create_aggregation(&space).unwrap();
        assert!(aggregation.normalizes());
        assert_eq!(
            aggregation.function(),
            ScalarizingFunction::PenaltyBoundaryIntersection { theta: 5.0 }
        );

        let de = registry.create_differential_evolution(&space).unwrap();
        assert_eq!(de.variant(), DifferentialEvolutionVariant::Rand1Bin);
    }
}
