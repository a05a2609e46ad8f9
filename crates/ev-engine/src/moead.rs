//! Decomposition-based algorithm: one sub-problem per population member,
//! neighborhood-restricted mating and replacement.

use tracing::debug;

use ev_operators::{
    AggregationFunction, InitialSolutions, NeighborType, NeighborhoodSelection, OperatorRng, SequenceGenerator,
    WeightVectorNeighborhood,
};
use ev_types::{internal_error, EvResult, Solution};

use crate::algorithm::{Algorithm, Evaluation};
use crate::variation::Variation;

#[derive(Debug)]
pub struct Moead {
    name: String,
    population_size: usize,
    max_evaluations: usize,
    max_replaced: usize,
    initial_solutions: Box<dyn InitialSolutions>,
    evaluation: Evaluation,
    neighborhood: WeightVectorNeighborhood,
    aggregation: AggregationFunction,
    sequence: Box<dyn SequenceGenerator>,
    selection: NeighborhoodSelection,
    variation: Variation,
    rng: OperatorRng,
    population: Vec<Solution>,
    ideal: Vec<f64>,
    nadir: Vec<f64>,
}

impl Moead {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        population_size: usize,
        max_evaluations: usize,
        max_replaced: usize,
        initial_solutions: Box<dyn InitialSolutions>,
        evaluation: Evaluation,
        neighborhood: WeightVectorNeighborhood,
        aggregation: AggregationFunction,
        sequence: Box<dyn SequenceGenerator>,
        selection: NeighborhoodSelection,
        variation: Variation,
        rng: OperatorRng,
    ) -> Self {
        Self {
            name: name.into(),
            population_size,
            max_evaluations,
            max_replaced: max_replaced.max(1),
            initial_solutions,
            evaluation,
            neighborhood,
            aggregation,
            sequence,
            selection,
            variation,
            rng,
            population: Vec::new(),
            ideal: Vec::new(),
            nadir: Vec::new(),
        }
    }

    pub fn aggregation(&self) -> &AggregationFunction {
        &self.aggregation
    }

    pub fn neighborhood(&self) -> &WeightVectorNeighborhood {
        &self.neighborhood
    }

    fn update_reference_points(&mut self, objectives: &[f64]) {
        for (i, f) in objectives.iter().enumerate() {
            self.ideal[i] = self.ideal[i].min(*f);
            self.nadir[i] = self.nadir[i].max(*f);
        }
    }

    /// Replace up to `max_replaced` members of the mating source that the
    /// child improves on for their own sub-problem.
    fn replace(&mut self, sub_problem: usize, neighbor_type: NeighborType, child: &Solution) {
        let mut candidates: Vec<usize> = match neighbor_type {
            NeighborType::Neighbor => self.neighborhood.neighbors(sub_problem).to_vec(),
            NeighborType::Population => (0..self.population.len()).collect(),
        };
        rand::seq::SliceRandom::shuffle(candidates.as_mut_slice(), &mut self.rng);

        let mut replaced = 0;
        for k in candidates {
            let weights = self.neighborhood.weight(k);
            let current = self
                .aggregation
                .compute(&self.population[k].objectives, weights, &self.ideal, &self.nadir);
            let candidate = self.aggregation.compute(&child.objectives, weights, &self.ideal, &self.nadir);
            if candidate < current {
                self.population[k] = child.clone();
                replaced += 1;
            }
            if replaced >= self.max_replaced {
                break;
            }
        }
    }
}

impl Algorithm for Moead {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self) -> EvResult<()> {
        let problem = self.evaluation.problem().clone();
        if self.neighborhood.len() != self.population_size {
            return Err(internal_error!(
                "{} has {} weight vectors for a population of {}",
                self.name,
                self.neighborhood.len(),
                self.population_size
            ));
        }

        let mut population = self
            .initial_solutions
            .create(problem.as_ref(), self.population_size, &mut self.rng);
        self.evaluation.evaluate(&mut population);
        let objectives = problem.number_of_objectives();
        self.ideal = vec![f64::INFINITY; objectives];
        self.nadir = vec![f64::NEG_INFINITY; objectives];
        for solution in &population {
            self.update_reference_points(&solution.objectives);
        }
        self.population = population;

        let mut iteration = 0;
        while self.evaluation.count() < self.max_evaluations {
            iteration += 1;
            self.variation.set_iteration(iteration / self.population_size.max(1));
            let sub_problem = self.sequence.next_index(&mut self.rng);

            let (parents, neighbor_type) = self.mate(sub_problem);
            let pool: Vec<&Solution> = parents.iter().map(|i| &self.population[*i]).collect();
            let mut offspring = self.variation.vary(&pool, problem.bounds(), &mut self.rng);
            offspring.truncate(1);
            let Some(mut child) = offspring.pop() else {
                return Err(internal_error!("{} produced no offspring", self.name));
            };

            self.evaluation.evaluate(std::slice::from_mut(&mut child));
            self.update_reference_points(&child.objectives);
            self.replace(sub_problem, neighbor_type, &child);
        }
        debug!(
            "{} finished after {} evaluations",
            self.name,
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

impl Moead {
    /// Mating pool indices. Differential evolution uses the sub-problem's
    /// own solution as the current vector, followed by the selected donors.
    fn mate(&mut self, sub_problem: usize) -> (Vec<usize>, NeighborType) {
        let neighbors = self.neighborhood.neighbors(sub_problem).to_vec();
        let (selected, neighbor_type) = self
            .selection
            .select(&neighbors, self.population.len(), &mut self.rng);
        match &self.variation {
            Variation::DifferentialEvolution(_) => {
                let mut pool = Vec::with_capacity(selected.len() + 1);
                pool.push(sub_problem);
                pool.extend(selected);
                (pool, neighbor_type)
            }
            Variation::CrossoverAndMutation(_) => (selected, neighbor_type),
        }
    }
}
