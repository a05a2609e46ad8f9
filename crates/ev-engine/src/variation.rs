//! Variation strategies: how a mating pool becomes offspring.

use ev_operators::{Crossover, DifferentialEvolutionCrossover, Mutation, OperatorRng};
use ev_types::Solution;

#[derive(Debug)]
pub struct CrossoverAndMutationVariation {
    crossover: Box<dyn Crossover>,
    mutation: Box<dyn Mutation>,
    offspring_population_size: usize,
}

impl CrossoverAndMutationVariation {
    pub fn new(crossover: Box<dyn Crossover>, mutation: Box<dyn Mutation>, offspring_population_size: usize) -> Self {
        Self {
            crossover,
            mutation,
            offspring_population_size: offspring_population_size.max(1),
        }
    }

    /// Enough parents for `ceil(offspring / children per mating)` matings.
    pub fn mating_pool_size(&self) -> usize {
        let per_mating = self.crossover.number_of_offspring().max(1);
        let matings = self.offspring_population_size.div_ceil(per_mating);
        matings * self.crossover.number_of_parents()
    }

    fn vary(&self, mating_pool: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        let mut offspring = Vec::with_capacity(self.offspring_population_size);
        for parents in mating_pool.chunks_exact(self.crossover.number_of_parents()) {
            for mut child in self.crossover.execute(parents, bounds, rng) {
                if offspring.len() == self.offspring_population_size {
                    return offspring;
                }
                self.mutation.execute(&mut child, bounds, rng);
                offspring.push(child);
            }
        }
        offspring
    }
}

/// DE crossover followed by mutation. Each mating uses the first pool entry
/// as the current solution and the following ones as donors.
#[derive(Debug)]
pub struct DifferentialEvolutionVariation {
    crossover: DifferentialEvolutionCrossover,
    mutation: Box<dyn Mutation>,
    offspring_population_size: usize,
}

impl DifferentialEvolutionVariation {
    pub fn new(
        crossover: DifferentialEvolutionCrossover,
        mutation: Box<dyn Mutation>,
        offspring_population_size: usize,
    ) -> Self {
        Self {
            crossover,
            mutation,
            offspring_population_size: offspring_population_size.max(1),
        }
    }

    pub fn number_of_donors(&self) -> usize {
        self.crossover.number_of_donors()
    }

    pub fn mating_pool_size(&self) -> usize {
        self.offspring_population_size * (1 + self.number_of_donors())
    }

    fn vary(&self, mating_pool: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        mating_pool
            .chunks_exact(1 + self.number_of_donors())
            .take(self.offspring_population_size)
            .map(|group| {
                let mut child = self.crossover.execute(group[0], &group[1..], bounds, rng);
                self.mutation.execute(&mut child, bounds, rng);
                child
            })
            .collect()
    }
}

#[derive(Debug)]
pub enum Variation {
    CrossoverAndMutation(CrossoverAndMutationVariation),
    DifferentialEvolution(DifferentialEvolutionVariation),
}

impl Variation {
    pub fn mating_pool_size(&self) -> usize {
        match self {
            Self::CrossoverAndMutation(v) => v.mating_pool_size(),
            Self::DifferentialEvolution(v) => v.mating_pool_size(),
        }
    }

    pub fn offspring_population_size(&self) -> usize {
        match self {
            Self::CrossoverAndMutation(v) => v.offspring_population_size,
            Self::DifferentialEvolution(v) => v.offspring_population_size,
        }
    }

    pub fn set_iteration(&mut self, iteration: usize) {
        match self {
            Self::CrossoverAndMutation(v) => v.mutation.set_iteration(iteration),
            Self::DifferentialEvolution(v) => v.mutation.set_iteration(iteration),
        }
    }

    /// Offspring of `mating_pool`, unevaluated; at most
    /// `offspring_population_size` of them.
    pub fn vary(&self, mating_pool: &[&Solution], bounds: &[(f64, f64)], rng: &mut OperatorRng) -> Vec<Solution> {
        match self {
            Self::CrossoverAndMutation(v) => v.vary(mating_pool, bounds, rng),
            Self::DifferentialEvolution(v) => v.vary(mating_pool, bounds, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ev_operators::{
        operator_rng, DifferentialEvolutionVariant, PolynomialMutation, RepairStrategy, SbxCrossover,
    };

    fn mutation() -> Box<dyn Mutation> {
        Box::new(PolynomialMutation::new(0.5, 20.0, RepairStrategy::Bounds))
    }

    #[test]
    fn odd_offspring_count_rounds_pool_up() {
        let variation = CrossoverAndMutationVariation::new(
            Box::new(SbxCrossover::new(0.9, 20.0, RepairStrategy::Bounds)),
            mutation(),
            5,
        );
        assert_eq!(variation.mating_pool_size(), 6);

        let parents: Vec<Solution> = (0..6).map(|i| Solution::new(vec![i as f64 / 6.0; 3], 2)).collect();
        let pool: Vec<&Solution> = parents.iter().collect();
        let offspring = Variation::CrossoverAndMutation(variation).vary(&pool, &[(0.0, 1.0); 3], &mut operator_rng(Some(1)));
        assert_eq!(offspring.len(), 5);
    }

    #[test]
    fn differential_evolution_groups_current_and_donors() {
        let variation = Variation::DifferentialEvolution(DifferentialEvolutionVariation::new(
            DifferentialEvolutionCrossover::new(DifferentialEvolutionVariant::Rand1Bin, 0.5, 0.5),
            mutation(),
            2,
        ));
        assert_eq!(variation.mating_pool_size(), 8);
        assert_eq!(variation.offspring_population_size(), 2);

        let parents: Vec<Solution> = (0..8).map(|i| Solution::new(vec![i as f64 / 8.0; 3], 2)).collect();
        let pool: Vec<&Solution> = parents.iter().collect();
        let offspring = variation.vary(&pool, &[(0.0, 1.0); 3], &mut operator_rng(Some(2)));
        assert_eq!(offspring.len(), 2);
    }
}
