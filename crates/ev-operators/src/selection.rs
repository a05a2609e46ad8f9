//! Mating selection. Selections return indices into the population.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ranking::RankAndCrowding;
use crate::OperatorRng;

/// Whether MOEA/D parents came from the neighborhood or the whole population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborType {
    Neighbor,
    Population,
}

/// N-ary tournament on rank and crowding distance.
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
    mating_pool_size: usize,
}

impl TournamentSelection {
    pub fn new(tournament_size: usize, mating_pool_size: usize) -> Self {
        Self {
            tournament_size: tournament_size.max(1),
            mating_pool_size,
        }
    }

    pub fn select(&self, fitness: &[RankAndCrowding], rng: &mut OperatorRng) -> Vec<usize> {
        let n = fitness.len();
        (0..self.mating_pool_size)
            .map(|_| {
                let contenders = distinct_indices(n, self.tournament_size.min(n), rng);
                contenders
                    .into_iter()
                    .reduce(|best, candidate| {
                        if fitness[candidate].compare(&fitness[best]).is_lt() {
                            candidate
                        } else {
                            best
                        }
                    })
                    .unwrap_or(0)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RandomSelection {
    mating_pool_size: usize,
}

impl RandomSelection {
    pub fn new(mating_pool_size: usize) -> Self {
        Self { mating_pool_size }
    }

    pub fn select(&self, population_size: usize, rng: &mut OperatorRng) -> Vec<usize> {
        (0..self.mating_pool_size)
            .map(|_| rng.random_range(0..population_size.max(1)))
            .collect()
    }
}

/// Parents drawn from the current sub-problem's neighborhood with
/// probability `neighborhood_probability`, otherwise from the population.
#[derive(Debug, Clone)]
pub struct NeighborhoodSelection {
    neighborhood_probability: f64,
    mating_pool_size: usize,
}

impl NeighborhoodSelection {
    pub fn new(neighborhood_probability: f64, mating_pool_size: usize) -> Self {
        Self {
            neighborhood_probability,
            mating_pool_size,
        }
    }

    pub fn select(
        &self,
        neighbors: &[usize],
        population_size: usize,
        rng: &mut OperatorRng,
    ) -> (Vec<usize>, NeighborType) {
        let neighbor_type = if rng.random::<f64>() < self.neighborhood_probability {
            NeighborType::Neighbor
        } else {
            NeighborType::Population
        };
        let candidates: Vec<usize> = match neighbor_type {
            NeighborType::Neighbor => neighbors.to_vec(),
            NeighborType::Population => (0..population_size).collect(),
        };
        let picks = if candidates.len() >= self.mating_pool_size {
            distinct_indices(candidates.len(), self.mating_pool_size, rng)
        } else {
            (0..self.mating_pool_size)
                .map(|_| rng.random_range(0..candidates.len().max(1)))
                .collect()
        };
        (picks.into_iter().map(|k| candidates[k]).collect(), neighbor_type)
    }
}

/// The mating selection strategies an algorithm can be assembled with.
#[derive(Debug, Clone)]
pub enum MatingSelection {
    Tournament(TournamentSelection),
    Random(RandomSelection),
    PopulationAndNeighborhood(NeighborhoodSelection),
}

impl MatingSelection {
    pub fn mating_pool_size(&self) -> usize {
        match self {
            Self::Tournament(s) => s.mating_pool_size,
            Self::Random(s) => s.mating_pool_size,
            Self::PopulationAndNeighborhood(s) => s.mating_pool_size,
        }
    }
}

/// `count` distinct indices in `0..n` (requires `count <= n`).
fn distinct_indices(n: usize, count: usize, rng: &mut OperatorRng) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let (chosen, _) = indices.partial_shuffle(rng, count);
    chosen.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator_rng;

    #[test]
    fn tournament_prefers_better_rank() {
        let fitness = vec![
            RankAndCrowding { rank: 1, crowding: 1.0 },
            RankAndCrowding { rank: 0, crowding: 1.0 },
        ];
        let selection = TournamentSelection::new(2, 10);
        let pool = selection.select(&fitness, &mut operator_rng(Some(3)));
        assert_eq!(pool, vec![1; 10]);
    }

    #[test]
    fn random_selection_fills_pool() {
        let pool = RandomSelection::new(6).select(4, &mut operator_rng(Some(3)));
        assert_eq!(pool.len(), 6);
        assert!(pool.iter().all(|i| *i < 4));
    }

    #[test]
    fn neighborhood_selection_respects_source() {
        let neighbors = [3, 4, 5];
        let mut rng = operator_rng(Some(8));

        let always = NeighborhoodSelection::new(1.0, 2);
        let (pool, kind) = always.select(&neighbors, 10, &mut rng);
        assert_eq!(kind, NeighborType::Neighbor);
        assert!(pool.iter().all(|i| neighbors.contains(i)));
        assert_ne!(pool[0], pool[1]);

        let never = NeighborhoodSelection::new(0.0, 5);
        let (pool, kind) = never.select(&neighbors, 10, &mut rng);
        assert_eq!(kind, NeighborType::Population);
        assert_eq!(pool.len(), 5);
        assert_eq!(MatingSelection::PopulationAndNeighborhood(never).mating_pool_size(), 5);
    }
}
