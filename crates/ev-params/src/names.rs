//! Parameter names and operator labels shared by the family spaces and the
//! assemblers.

// Top-level and group parameters
pub const ALGORITHM_RESULT: &str = "algorithmResult";
pub const POPULATION_SIZE_WITH_ARCHIVE: &str = "populationSizeWithArchive";
pub const ARCHIVE_TYPE: &str = "archiveType";
pub const CREATE_INITIAL_SOLUTIONS: &str = "createInitialSolutions";
pub const OFFSPRING_POPULATION_SIZE: &str = "offspringPopulationSize";
pub const VARIATION: &str = "variation";
pub const SELECTION: &str = "selection";
pub const SELECTION_TOURNAMENT_SIZE: &str = "selectionTournamentSize";
pub const NEIGHBORHOOD_SELECTION_PROBABILITY: &str = "neighborhoodSelectionProbability";

pub const CROSSOVER: &str = "crossover";
pub const CROSSOVER_PROBABILITY: &str = "crossoverProbability";
pub const CROSSOVER_REPAIR_STRATEGY: &str = "crossoverRepairStrategy";
pub const SBX_DISTRIBUTION_INDEX: &str = "sbxDistributionIndex";
pub const BLX_ALPHA_VALUE: &str = "blxAlphaCrossoverAlphaValue";

pub const MUTATION: &str = "mutation";
pub const MUTATION_PROBABILITY_FACTOR: &str = "mutationProbabilityFactor";
pub const MUTATION_REPAIR_STRATEGY: &str = "mutationRepairStrategy";
pub const UNIFORM_MUTATION_PERTURBATION: &str = "uniformMutationPerturbation";
pub const POLYNOMIAL_DISTRIBUTION_INDEX: &str = "polynomialMutationDistributionIndex";
pub const LINKED_POLYNOMIAL_DISTRIBUTION_INDEX: &str = "linkedPolynomialMutationDistributionIndex";
pub const NON_UNIFORM_MUTATION_PERTURBATION: &str = "nonUniformMutationPerturbation";

pub const DIFFERENTIAL_EVOLUTION_CROSSOVER: &str = "differentialEvolutionCrossover";
pub const DE_CR: &str = "CR";
pub const DE_F: &str = "F";

pub const NEIGHBORHOOD_SIZE: &str = "neighborhoodSize";
pub const MAX_REPLACED_SOLUTIONS: &str = "maximumNumberOfReplacedSolutions";
pub const AGGREGATION_FUNCTION: &str = "aggregationFunction";
pub const NORMALIZE_OBJECTIVES: &str = "normalizeObjectives";
pub const NORMALIZATION_EPSILON: &str = "epsilonParameterForNormalization";
pub const PBI_THETA: &str = "pbiTheta";
pub const SUB_PROBLEM_ID_GENERATOR: &str = "subProblemIdGenerator";

// Non-configurable keys injected at assembly time
pub const NUMBER_OF_PROBLEM_VARIABLES: &str = "numberOfProblemVariables";
pub const MAX_ITERATIONS: &str = "maxIterations";
pub const ARCHIVE_SIZE: &str = "archiveSize";
pub const MATING_POOL_SIZE: &str = "matingPoolSize";
pub const POPULATION_SIZE: &str = "populationSize";

// Labels
pub const POPULATION: &str = "population";
pub const EXTERNAL_ARCHIVE: &str = "externalArchive";
pub const CROSSOVER_AND_MUTATION_VARIATION: &str = "crossoverAndMutationVariation";
pub const DIFFERENTIAL_EVOLUTION_VARIATION: &str = "differentialEvolutionVariation";

pub const SBX: &str = "SBX";
pub const BLX_ALPHA: &str = "BLX_ALPHA";
pub const WHOLE_ARITHMETIC: &str = "wholeArithmetic";

pub const UNIFORM: &str = "uniform";
pub const POLYNOMIAL: &str = "polynomial";
pub const LINKED_POLYNOMIAL: &str = "linkedPolynomial";
pub const NON_UNIFORM: &str = "nonUniform";

pub const REPAIR_RANDOM: &str = "random";
pub const REPAIR_ROUND: &str = "round";
pub const REPAIR_BOUNDS: &str = "bounds";

pub const RAND_1_BIN: &str = "RAND_1_BIN";
pub const RAND_1_EXP: &str = "RAND_1_EXP";
pub const RAND_2_BIN: &str = "RAND_2_BIN";

pub const CROWDING_DISTANCE_ARCHIVE: &str = "crowdingDistanceArchive";
pub const UNBOUNDED_ARCHIVE: &str = "unboundedArchive";

pub const TOURNAMENT: &str = "tournament";
pub const RANDOM_SELECTION: &str = "random";
pub const POPULATION_AND_NEIGHBORHOOD_SELECTION: &str = "populationAndNeighborhoodMatingPoolSelection";

pub const RANDOM_INITIALIZATION: &str = "random";
pub const LATIN_HYPERCUBE_SAMPLING: &str = "latinHypercubeSampling";

pub const TSCHEBYSCHEFF: &str = "tschebyscheff";
pub const WEIGHTED_SUM: &str = "weightedSum";
pub const PENALTY_BOUNDARY_INTERSECTION: &str = "penaltyBoundaryIntersection";
pub const MODIFIED_TSCHEBYSCHEFF: &str = "modifiedTschebyscheff";

pub const RANDOM_PERMUTATION_CYCLE: &str = "randomPermutationCycle";
pub const CYCLIC_INTEGER_SEQUENCE: &str = "cyclicIntegerSequence";
