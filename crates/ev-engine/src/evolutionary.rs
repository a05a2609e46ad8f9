//! Evolutionary loop shared by the ranking-based families: generational
//! ranking-and-crowding (NSGA-II style), or steady-state hypervolume
//! contribution (SMS-EMOA style) when the offspring batch is one solution.

use tracing::debug;

use ev_operators::{rank_and_crowding, InitialSolutions, MatingSelection, OperatorRng, Replacement};
use ev_types::{internal_error, EvResult, Solution};

use crate::algorithm::{Algorithm, Evaluation};
use crate::variation::Variation;

#[derive(Debug)]
pub struct EvolutionaryAlgorithm {
    name: String,
    population_size: usize,
    /// Checked before each generation, so the final count can pass it by up
    /// to one offspring batch minus one.
    max_evaluations: usize,
    initial_solutions: Box<dyn InitialSolutions>,
    evaluation: Evaluation,
    selection: MatingSelection,
    variation: Variation,
    replacement: Replacement,
    rng: OperatorRng,
    population: Vec<Solution>,
}

impl EvolutionaryAlgorithm {
    /// Whole offspring batches are evaluated until `max_evaluations` is
    /// reached; a budget that is not a multiple of the variation's offspring
    /// size is overshot by less than one batch.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        population_size: usize,
        max_evaluations: usize,
        initial_solutions: Box<dyn InitialSolutions>,
        evaluation: Evaluation,
        selection: MatingSelection,
        variation: Variation,
        rng: OperatorRng,
    ) -> Self {
        Self {
            name: name.into(),
            population_size,
            max_evaluations,
            initial_solutions,
            evaluation,
            selection,
            variation,
            replacement: Replacement::default(),
            rng,
            population: Vec::new(),
        }
    }

    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    pub fn replacement(&self) -> Replacement {
        self.replacement
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn variation(&self) -> &Variation {
        &self.variation
    }

    pub fn selection(&self) -> &MatingSelection {
        &self.selection
    }

    fn mating_pool(&mut self) -> EvResult<Vec<usize>> {
        match &self.selection {
            MatingSelection::Tournament(tournament) => {
                let fitness = rank_and_crowding(&self.population);
                Ok(tournament.select(&fitness, &mut self.rng))
            }
            MatingSelection::Random(random) => Ok(random.select(self.population.len(), &mut self.rng)),
            MatingSelection::PopulationAndNeighborhood(_) => Err(internal_error!(
                "{} cannot use neighborhood mating selection",
                self.name
            )),
        }
    }
}

impl Algorithm for EvolutionaryAlgorithm {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> EvResult<()> {
        let problem = self.evaluation.problem().clone();
        let mut population = self
            .initial_solutions
            .create(problem.as_ref(), self.population_size, &mut self.rng);
        self.evaluation.evaluate(&mut population);
        self.population = population;

        let mut generation = 0;
        while self.evaluation.count() < self.max_evaluations {
            generation += 1;
            self.variation.set_iteration(generation);

            let pool = self.mating_pool()?;
            let parents: Vec<&Solution> = pool.iter().map(|i| &self.population[*i]).collect();
            let mut offspring = self.variation.vary(&parents, problem.bounds(), &mut self.rng);
            if offspring.is_empty() {
                return Err(internal_error!("{} produced no offspring", self.name));
            }
            self.evaluation.evaluate(&mut offspring);

            let population = std::mem::take(&mut self.population);
            self.population = self.replacement.replace(population, offspring, self.population_size);
        }
        debug!(
            "{} finished after {} generations and {} evaluations",
            self.name,
            generation,
            self.evaluation.count()
        );
        Ok(())
    }

    fn result(&self) -> Vec<Solution> {
        self.population.clone()
    }

    fn evaluations(&self) -> usize {
        self.evaluation.count()
    }
}
