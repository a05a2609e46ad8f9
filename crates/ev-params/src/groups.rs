//! Reusable parameter groups.
//!
//! Each builder registers the parameters of one design concern, wires its
//! sub-parameters and returns the name of the group's root. Family spaces
//! compose groups and choose which roots are top-level. Conditional
//! sub-parameters are only wired for labels the caller enables.

use ev_types::ParameterError;

use crate::names::*;
use crate::parameter::Parameter;
use crate::space::ParameterSpace;

const REPAIR_STRATEGIES: [&str; 3] = [REPAIR_RANDOM, REPAIR_ROUND, REPAIR_BOUNDS];

/// Labels enabled for the variation group.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationOptions {
    pub strategies: Vec<&'static str>,
    pub crossovers: Vec<&'static str>,
    pub mutations: Vec<&'static str>,
    pub differential_evolution: Vec<&'static str>,
}

impl Default for VariationOptions {
    fn default() -> Self {
        Self {
            strategies: vec![CROSSOVER_AND_MUTATION_VARIATION, DIFFERENTIAL_EVOLUTION_VARIATION],
            crossovers: vec![SBX, BLX_ALPHA, WHOLE_ARITHMETIC],
            mutations: vec![UNIFORM, POLYNOMIAL, LINKED_POLYNOMIAL, NON_UNIFORM],
            differential_evolution: vec![RAND_1_BIN, RAND_1_EXP, RAND_2_BIN],
        }
    }
}

fn wire_if_enabled(
    space: &mut ParameterSpace,
    labels: &[&str],
    parent: &str,
    trigger: &str,
    child: Parameter,
) -> Result<(), ParameterError> {
    if labels.contains(&trigger) {
        let name = child.name().to_string();
        space.put(child)?;
        space.add_conditional_sub_parameter(parent, trigger, &name)?;
    }
    Ok(())
}

pub fn crossover_group(space: &mut ParameterSpace, labels: &[&str]) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(CROSSOVER, labels.iter().copied()))?;
    space.put(Parameter::probability(CROSSOVER_PROBABILITY))?;
    space.put(Parameter::categorical(CROSSOVER_REPAIR_STRATEGY, REPAIR_STRATEGIES))?;
    space.add_global_sub_parameter(CROSSOVER, CROSSOVER_PROBABILITY)?;
    space.add_global_sub_parameter(CROSSOVER, CROSSOVER_REPAIR_STRATEGY)?;

    wire_if_enabled(space, labels, CROSSOVER, SBX, Parameter::real(SBX_DISTRIBUTION_INDEX, 5.0, 400.0))?;
    wire_if_enabled(space, labels, CROSSOVER, BLX_ALPHA, Parameter::real(BLX_ALPHA_VALUE, 0.0, 1.0))?;
    Ok(CROSSOVER)
}

pub fn mutation_group(space: &mut ParameterSpace, labels: &[&str]) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(MUTATION, labels.iter().copied()))?;
    space.put(Parameter::real(MUTATION_PROBABILITY_FACTOR, 0.0, 2.0))?;
    space.put(Parameter::categorical(MUTATION_REPAIR_STRATEGY, REPAIR_STRATEGIES))?;
    space.add_global_sub_parameter(MUTATION, MUTATION_PROBABILITY_FACTOR)?;
    space.add_global_sub_parameter(MUTATION, MUTATION_REPAIR_STRATEGY)?;

    wire_if_enabled(space, labels, MUTATION, UNIFORM, Parameter::real(UNIFORM_MUTATION_PERTURBATION, 0.0, 1.0))?;
    wire_if_enabled(
        space,
        labels,
        MUTATION,
        POLYNOMIAL,
        Parameter::real(POLYNOMIAL_DISTRIBUTION_INDEX, 5.0, 400.0),
    )?;
    wire_if_enabled(
        space,
        labels,
        MUTATION,
        LINKED_POLYNOMIAL,
        Parameter::real(LINKED_POLYNOMIAL_DISTRIBUTION_INDEX, 5.0, 400.0),
    )?;
    wire_if_enabled(
        space,
        labels,
        MUTATION,
        NON_UNIFORM,
        Parameter::real(NON_UNIFORM_MUTATION_PERTURBATION, 0.0, 1.0),
    )?;
    Ok(MUTATION)
}

pub fn differential_evolution_group(
    space: &mut ParameterSpace,
    labels: &[&str],
) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(DIFFERENTIAL_EVOLUTION_CROSSOVER, labels.iter().copied()))?;
    space.put(Parameter::probability(DE_CR))?;
    space.put(Parameter::probability(DE_F))?;
    space.add_global_sub_parameter(DIFFERENTIAL_EVOLUTION_CROSSOVER, DE_CR)?;
    space.add_global_sub_parameter(DIFFERENTIAL_EVOLUTION_CROSSOVER, DE_F)?;
    Ok(DIFFERENTIAL_EVOLUTION_CROSSOVER)
}

/// `variation` with mutation as a global sub-parameter and the crossover or
/// differential-evolution operator as conditionals.
pub fn variation_group(space: &mut ParameterSpace, options: &VariationOptions) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(VARIATION, options.strategies.iter().copied()))?;
    let mutation = mutation_group(space, &options.mutations)?;
    space.add_global_sub_parameter(VARIATION, mutation)?;

    if options.strategies.contains(&CROSSOVER_AND_MUTATION_VARIATION) {
        let crossover = crossover_group(space, &options.crossovers)?;
        space.add_conditional_sub_parameter(VARIATION, CROSSOVER_AND_MUTATION_VARIATION, crossover)?;
    }
    if options.strategies.contains(&DIFFERENTIAL_EVOLUTION_VARIATION) {
        let de = differential_evolution_group(space, &options.differential_evolution)?;
        space.add_conditional_sub_parameter(VARIATION, DIFFERENTIAL_EVOLUTION_VARIATION, de)?;
    }
    Ok(VARIATION)
}

pub fn selection_group(space: &mut ParameterSpace, labels: &[&str]) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(SELECTION, labels.iter().copied()))?;
    wire_if_enabled(space, labels, SELECTION, TOURNAMENT, Parameter::integer(SELECTION_TOURNAMENT_SIZE, 2, 10))?;
    wire_if_enabled(
        space,
        labels,
        SELECTION,
        POPULATION_AND_NEIGHBORHOOD_SELECTION,
        Parameter::probability(NEIGHBORHOOD_SELECTION_PROBABILITY),
    )?;
    Ok(SELECTION)
}

/// `algorithmResult`: the final population, or an external archive of the
/// given types. With `population_with_archive`, choosing the archive also
/// re-sizes the population.
pub fn result_group(
    space: &mut ParameterSpace,
    archives: &[&str],
    population_with_archive: Option<(i64, i64)>,
) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(ALGORITHM_RESULT, [POPULATION, EXTERNAL_ARCHIVE]))?;
    if let Some((min, max)) = population_with_archive {
        space.put(Parameter::integer(POPULATION_SIZE_WITH_ARCHIVE, min, max))?;
        space.add_conditional_sub_parameter(ALGORITHM_RESULT, EXTERNAL_ARCHIVE, POPULATION_SIZE_WITH_ARCHIVE)?;
    }
    space.put(Parameter::categorical(ARCHIVE_TYPE, archives.iter().copied()))?;
    space.add_conditional_sub_parameter(ALGORITHM_RESULT, EXTERNAL_ARCHIVE, ARCHIVE_TYPE)?;
    Ok(ALGORITHM_RESULT)
}

pub fn initial_solutions_group(space: &mut ParameterSpace, labels: &[&str]) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(CREATE_INITIAL_SOLUTIONS, labels.iter().copied()))?;
    Ok(CREATE_INITIAL_SOLUTIONS)
}

/// `aggregationFunction` with the objective normalization switch as a global
/// sub-parameter.
pub fn aggregation_group(space: &mut ParameterSpace, labels: &[&str]) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(AGGREGATION_FUNCTION, labels.iter().copied()))?;
    space.put(Parameter::boolean(NORMALIZE_OBJECTIVES))?;
    space.put(Parameter::real(NORMALIZATION_EPSILON, 1e-8, 25.0))?;
    space.add_global_sub_parameter(AGGREGATION_FUNCTION, NORMALIZE_OBJECTIVES)?;
    space.add_conditional_sub_parameter(NORMALIZE_OBJECTIVES, true, NORMALIZATION_EPSILON)?;
    wire_if_enabled(
        space,
        labels,
        AGGREGATION_FUNCTION,
        PENALTY_BOUNDARY_INTERSECTION,
        Parameter::real(PBI_THETA, 1.0, 200.0),
    )?;
    Ok(AGGREGATION_FUNCTION)
}

/// `neighborhoodSize` and `maximumNumberOfReplacedSolutions`, both top-level.
pub fn neighborhood_group(space: &mut ParameterSpace) -> Result<[&'static str; 2], ParameterError> {
    space.put(Parameter::integer(NEIGHBORHOOD_SIZE, 5, 50))?;
    space.put(Parameter::integer(MAX_REPLACED_SOLUTIONS, 1, 5))?;
    Ok([NEIGHBORHOOD_SIZE, MAX_REPLACED_SOLUTIONS])
}

pub fn sub_problem_generator_group(
    space: &mut ParameterSpace,
    labels: &[&str],
) -> Result<&'static str, ParameterError> {
    space.put(Parameter::categorical(SUB_PROBLEM_ID_GENERATOR, labels.iter().copied()))?;
    Ok(SUB_PROBLEM_ID_GENERATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_labels_get_no_conditionals() {
        let mut space = ParameterSpace::new("crossover only");
        crossover_group(&mut space, &[WHOLE_ARITHMETIC, SBX]).unwrap();
        assert!(space.contains(SBX_DISTRIBUTION_INDEX));
        assert!(!space.contains(BLX_ALPHA_VALUE));
        assert_eq!(space.get(CROSSOVER).unwrap().conditional_sub_parameters().len(), 1);
    }

    #[test]
    fn variation_without_differential_evolution() {
        let mut space = ParameterSpace::new("variation");
        let options = VariationOptions {
            strategies: vec![CROSSOVER_AND_MUTATION_VARIATION],
            ..VariationOptions::default()
        };
        variation_group(&mut space, &options).unwrap();
        assert!(!space.contains(DIFFERENTIAL_EVOLUTION_CROSSOVER));
        let variation = space.get(VARIATION).unwrap();
        assert_eq!(variation.global_sub_parameters().len(), 1);
        assert_eq!(variation.conditional_sub_parameters().len(), 1);
    }

    #[test]
    fn groups_cannot_be_registered_twice() {
        let mut space = ParameterSpace::new("twice");
        initial_solutions_group(&mut space, &[RANDOM_INITIALIZATION]).unwrap();
        assert!(matches!(
            initial_solutions_group(&mut space, &[RANDOM_INITIALIZATION]),
            Err(ParameterError::Duplicate { .. })
        ));
    }

    #[test]
    fn normalization_epsilon_follows_switch() {
        let mut space = ParameterSpace::new("aggregation");
        aggregation_group(&mut space, &[TSCHEBYSCHEFF, PENALTY_BOUNDARY_INTERSECTION]).unwrap();
        space.add_top_level_parameter(AGGREGATION_FUNCTION).unwrap();

        space
            .parse(&["--aggregationFunction", "tschebyscheff", "--normalizeObjectives", "false"])
            .unwrap();
        assert_eq!(space.flatten().len(), 2);

        space
            .parse(&[
                "--aggregationFunction",
                "penaltyBoundaryIntersection",
                "--normalizeObjectives",
                "true",
                "--epsilonParameterForNormalization",
                "4.0",
                "--pbiTheta",
                "5.0",
            ])
            .unwrap();
        assert_eq!(space.flatten().len(), 4);
    }
}
