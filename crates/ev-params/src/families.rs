//! Parameter spaces of the supported algorithm families.

use ev_types::ParameterError;

use crate::groups::{
    aggregation_group, initial_solutions_group, neighborhood_group, result_group, selection_group,
    sub_problem_generator_group, variation_group, VariationOptions,
};
use crate::names::*;
use crate::parameter::Parameter;
use crate::space::ParameterSpace;

pub const NSGAII_OFFSPRING_SIZES: [i64; 9] = [1, 2, 5, 10, 20, 50, 100, 200, 400];

/// Generational ranking-and-crowding genetic algorithm (NSGA-II style).
pub fn nsgaii_space() -> Result<ParameterSpace, ParameterError> {
    let mut space = ParameterSpace::new("NSGA-II");

    let result = result_group(
        &mut space,
        &[CROWDING_DISTANCE_ARCHIVE, UNBOUNDED_ARCHIVE],
        Some((10, 200)),
    )?;
    let initial = initial_solutions_group(&mut space, &[RANDOM_INITIALIZATION, LATIN_HYPERCUBE_SAMPLING])?;
    space.put(Parameter::categorical_integer(OFFSPRING_POPULATION_SIZE, NSGAII_OFFSPRING_SIZES))?;
    let variation = variation_group(&mut space, &VariationOptions::default())?;
    let selection = selection_group(&mut space, &[TOURNAMENT, RANDOM_SELECTION])?;

    for name in [result, initial, OFFSPRING_POPULATION_SIZE, variation, selection] {
        space.add_top_level_parameter(name)?;
    }
    Ok(space)
}

/// Steady-state hypervolume-contribution algorithm (SMS-EMOA style). One
/// offspring per step, so there is no offspring size and no differential
/// evolution.
pub fn smsemoa_space() -> Result<ParameterSpace, ParameterError> {
    let mut space = ParameterSpace::new("SMS-EMOA");

    let result = result_group(
        &mut space,
        &[CROWDING_DISTANCE_ARCHIVE, UNBOUNDED_ARCHIVE],
        Some((10, 200)),
    )?;
    let initial = initial_solutions_group(&mut space, &[RANDOM_INITIALIZATION, LATIN_HYPERCUBE_SAMPLING])?;
    let options = VariationOptions {
        strategies: vec![CROSSOVER_AND_MUTATION_VARIATION],
        ..VariationOptions::default()
    };
    let variation = variation_group(&mut space, &options)?;
    let selection = selection_group(&mut space, &[TOURNAMENT, RANDOM_SELECTION])?;

    for name in [result, initial, variation, selection] {
        space.add_top_level_parameter(name)?;
    }
    Ok(space)
}

/// Decomposition-based algorithm (MOEA/D style).
pub fn moead_space() -> Result<ParameterSpace, ParameterError> {
    let mut space = ParameterSpace::new("MOEA/D");

    let [neighborhood, replaced] = neighborhood_group(&mut space)?;
    let aggregation = aggregation_group(
        &mut space,
        &[
            TSCHEBYSCHEFF,
            WEIGHTED_SUM,
            PENALTY_BOUNDARY_INTERSECTION,
            MODIFIED_TSCHEBYSCHEFF,
        ],
    )?;
    let result = result_group(&mut space, &[CROWDING_DISTANCE_ARCHIVE, UNBOUNDED_ARCHIVE], None)?;
    let generator = sub_problem_generator_group(&mut space, &[RANDOM_PERMUTATION_CYCLE, CYCLIC_INTEGER_SEQUENCE])?;
    let initial = initial_solutions_group(&mut space, &[RANDOM_INITIALIZATION, LATIN_HYPERCUBE_SAMPLING])?;
    let variation = variation_group(&mut space, &VariationOptions::default())?;
    let selection = selection_group(&mut space, &[POPULATION_AND_NEIGHBORHOOD_SELECTION])?;

    for name in [
        neighborhood,
        replaced,
        aggregation,
        result,
        generator,
        initial,
        variation,
        selection,
    ] {
        space.add_top_level_parameter(name)?;
    }
    Ok(space)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_vector_to_configuration, tokenize};
    use crate::parameter::Value;

    const NSGAII_CONFIGURATION: &str = "--algorithmResult population \
        --createInitialSolutions random \
        --offspringPopulationSize 100 \
        --variation crossoverAndMutationVariation \
        --mutation polynomial --mutationProbabilityFactor 1.0 --mutationRepairStrategy bounds \
        --polynomialMutationDistributionIndex 20.0 \
        --crossover SBX --crossoverProbability 0.9 --crossoverRepairStrategy bounds \
        --sbxDistributionIndex 20.0 \
        --selection tournament --selectionTournamentSize 2";

    #[test]
    fn family_dimensions() {
        assert_eq!(nsgaii_space().unwrap().dimension(), 23);
        assert_eq!(moead_space().unwrap().dimension(), 28);
        assert_eq!(smsemoa_space().unwrap().dimension(), 19);
    }

    #[test]
    fn smsemoa_parses_steady_state_configuration() {
        let mut space = smsemoa_space().unwrap();
        let configuration = NSGAII_CONFIGURATION.replace("--offspringPopulationSize 100 ", "");
        space.parse(&tokenize(&configuration)).unwrap();
        let configuration = space.configuration().unwrap();
        assert_eq!(configuration.len(), 13);
        assert!(configuration.get(OFFSPRING_POPULATION_SIZE).is_none());
        assert!(!space.contains(DIFFERENTIAL_EVOLUTION_CROSSOVER));

        let mut space = smsemoa_space().unwrap();
        let differential = tokenize("--algorithmResult population --createInitialSolutions random \
            --variation differentialEvolutionVariation");
        assert!(space.parse(&differential).is_err());
    }

    #[test]
    fn nsgaii_parses_canonical_configuration() {
        let mut space = nsgaii_space().unwrap();
        space.parse(&tokenize(NSGAII_CONFIGURATION)).unwrap();
        let configuration = space.configuration().unwrap();
        assert_eq!(configuration.len(), 14);
        assert_eq!(configuration.get(OFFSPRING_POPULATION_SIZE), Some(&Value::Integer(100)));
        assert_eq!(configuration.get(SELECTION_TOURNAMENT_SIZE), Some(&Value::Integer(2)));
        assert!(configuration.get(BLX_ALPHA_VALUE).is_none());
    }

    #[test]
    fn changing_a_parent_only_touches_its_subtree() {
        let template = nsgaii_space().unwrap();
        let dimension = template.dimension();
        let base = vec![0.1; dimension];

        let mut varied = base.clone();
        // 0: algorithmResult, 1: createInitialSolutions, 2: offspringPopulationSize,
        // 3: variation, 4..: mutation subtree then crossover subtree
        let crossover_position = {
            let mut space = template.create_instance();
            space.decode(&base).unwrap();
            space
                .flatten()
                .iter()
                .position(|id| space.parameter(*id).name() == CROSSOVER)
                .unwrap()
        };
        varied[crossover_position] = 0.5;

        let before = decode_vector_to_configuration(&template, &base).unwrap();
        let after = decode_vector_to_configuration(&template, &varied).unwrap();

        let outside = |c: &crate::codec::Configuration| -> Vec<(String, Value)> {
            c.entries()
                .iter()
                .filter(|(name, _)| {
                    ![CROSSOVER, CROSSOVER_PROBABILITY, CROSSOVER_REPAIR_STRATEGY, SBX_DISTRIBUTION_INDEX, BLX_ALPHA_VALUE]
                        .contains(&name.as_str())
                })
                .cloned()
                .collect()
        };
        assert_eq!(outside(&before), outside(&after));
        assert_eq!(before.get(CROSSOVER), Some(&Value::from(SBX)));
        assert_eq!(after.get(CROSSOVER), Some(&Value::from(BLX_ALPHA)));
    }

    #[test]
    fn shrinking_a_gated_subtree_shifts_only_the_suffix() {
        let template = nsgaii_space().unwrap();
        let base = vec![0.1; template.dimension()];
        let before = decode_vector_to_configuration(&template, &base).unwrap();
        let gate = before
            .entries()
            .iter()
            .position(|(name, _)| name == CROSSOVER)
            .unwrap();

        // 0.9 picks wholeArithmetic, which has no conditional children
        let mut varied = base.clone();
        varied[gate] = 0.9;
        let after = decode_vector_to_configuration(&template, &varied).unwrap();
        assert_eq!(after.len(), before.len() - 1);

        let (before, after) = (before.entries(), after.entries());
        assert_eq!(before[..gate], after[..gate]);

        let subtree = |entries: &[(String, Value)], len: usize| -> Vec<String> {
            entries[gate..gate + len].iter().map(|(name, _)| name.clone()).collect()
        };
        assert_eq!(
            subtree(before, 4),
            vec![CROSSOVER, CROSSOVER_PROBABILITY, CROSSOVER_REPAIR_STRATEGY, SBX_DISTRIBUTION_INDEX]
        );
        assert_eq!(subtree(after, 3), vec![CROSSOVER, CROSSOVER_PROBABILITY, CROSSOVER_REPAIR_STRATEGY]);
        assert_eq!(after[gate].1, Value::from(WHOLE_ARITHMETIC));

        assert_eq!(before[gate + 4..], after[gate + 3..]);
        assert_eq!(after[gate + 3].0, SELECTION);
    }

    #[test]
    fn moead_decodes_full_vector() {
        let template = moead_space().unwrap();
        for u in [0.0, 0.5, 1.0] {
            let configuration =
                decode_vector_to_configuration(&template, &vec![u; template.dimension()]).unwrap();
            assert!(configuration.len() <= template.dimension());
            assert!(configuration.get(NEIGHBORHOOD_SIZE).is_some());
            assert!(configuration.get(NEIGHBORHOOD_SELECTION_PROBABILITY).is_some());
        }
    }
}
