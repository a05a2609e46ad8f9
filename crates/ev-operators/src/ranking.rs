//! Fast non-dominated sorting, crowding distance and the environmental
//! replacements built on them.

use std::cmp::Ordering;

use ev_types::{dominance, hypervolume_contributions, Solution};

/// Distance of the contribution reference point beyond the worst value of
/// each objective in the front being reduced.
pub const CONTRIBUTION_REFERENCE_OFFSET: f64 = 1.0;

/// How survivors are chosen from the population and its offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Replacement {
    /// Whole fronts, then the least crowded members of the splitting front.
    #[default]
    RankingAndCrowding,
    /// Whole fronts, then the splitting front shrunk one member at a time by
    /// dropping the smallest hypervolume contribution.
    HypervolumeContribution,
}

impl Replacement {
    pub fn replace(self, population: Vec<Solution>, offspring: Vec<Solution>, size: usize) -> Vec<Solution> {
        match self {
            Self::RankingAndCrowding => ranking_and_crowding_replacement(population, offspring, size),
            Self::HypervolumeContribution => hypervolume_contribution_replacement(population, offspring, size),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankAndCrowding {
    pub rank: usize,
    pub crowding: f64,
}

impl RankAndCrowding {
    /// `Less` when `self` is preferred: lower rank, then larger crowding distance.
    pub fn compare(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| other.crowding.partial_cmp(&self.crowding).unwrap_or(Ordering::Equal))
    }
}

/// Indices of `solutions` grouped in successive non-dominated fronts.
pub fn fast_non_dominated_sort(solutions: &[Solution]) -> Vec<Vec<usize>> {
    let n = solutions.len();
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];

    for p in 0..n {
        for q in (p + 1)..n {
            match dominance(&solutions[p].objectives, &solutions[q].objectives) {
                Ordering::Less => {
                    dominated_by[p].push(q);
                    domination_count[q] += 1;
                }
                Ordering::Greater => {
                    dominated_by[q].push(p);
                    domination_count[p] += 1;
                }
                Ordering::Equal => {}
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|i| domination_count[*i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for p in &current {
            for q in &dominated_by[*p] {
                domination_count[*q] -= 1;
                if domination_count[*q] == 0 {
                    next.push(*q);
                }
            }
        }
        fronts.push(current);
        current = next;
    }
    fronts
}

/// Crowding distance of each member of `front`, aligned with `front`.
pub fn crowding_distances(solutions: &[Solution], front: &[usize]) -> Vec<f64> {
    let size = front.len();
    if size <= 2 {
        return vec![f64::INFINITY; size];
    }
    let objectives = solutions[front[0]].number_of_objectives();
    let mut distances = vec![0.0; size];
    let mut order: Vec<usize> = (0..size).collect();

    for m in 0..objectives {
        let value = |k: usize| solutions[front[k]].objectives[m];
        order.sort_by(|a, b| value(*a).partial_cmp(&value(*b)).unwrap_or(Ordering::Equal));
        let (first, last) = (order[0], order[size - 1]);
        let range = value(last) - value(first);
        distances[first] = f64::INFINITY;
        distances[last] = f64::INFINITY;
        if range <= 0.0 {
            continue;
        }
        for k in 1..size - 1 {
            let gap = value(order[k + 1]) - value(order[k - 1]);
            distances[order[k]] += gap / range;
        }
    }
    distances
}

/// Rank and crowding distance of every solution.
pub fn rank_and_crowding(solutions: &[Solution]) -> Vec<RankAndCrowding> {
    let mut attributes = vec![
        RankAndCrowding {
            rank: 0,
            crowding: 0.0
        };
        solutions.len()
    ];
    for (rank, front) in fast_non_dominated_sort(solutions).iter().enumerate() {
        for (index, crowding) in front.iter().zip(crowding_distances(solutions, front)) {
            attributes[*index] = RankAndCrowding { rank, crowding };
        }
    }
    attributes
}

/// Keep the best `size` solutions of `population ∪ offspring`: whole fronts
/// while they fit, then the least crowded members of the splitting front.
pub fn ranking_and_crowding_replacement(
    population: Vec<Solution>,
    offspring: Vec<Solution>,
    size: usize,
) -> Vec<Solution> {
    let mut union = population;
    union.extend(offspring);

    let mut selected: Vec<usize> = Vec::with_capacity(size);
    for front in fast_non_dominated_sort(&union) {
        if selected.len() + front.len() <= size {
            selected.extend(front);
            continue;
        }
        let distances = crowding_distances(&union, &front);
        let mut by_crowding: Vec<(usize, f64)> = front.into_iter().zip(distances).collect();
        by_crowding.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        let remaining = size - selected.len();
        selected.extend(by_crowding.into_iter().take(remaining).map(|(i, _)| i));
        break;
    }

    let mut slots: Vec<Option<Solution>> = union.into_iter().map(Some).collect();
    selected
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

/// Keep the best `size` solutions of `population ∪ offspring`: whole fronts
/// while they fit, then the members of the splitting front that add the most
/// hypervolume. Contributions are recomputed after every removal.
pub fn hypervolume_contribution_replacement(
    population: Vec<Solution>,
    offspring: Vec<Solution>,
    size: usize,
) -> Vec<Solution> {
    let mut union = population;
    union.extend(offspring);
    if union.len() <= size {
        return union;
    }

    let mut selected: Vec<usize> = Vec::with_capacity(size);
    for mut front in fast_non_dominated_sort(&union) {
        if selected.len() + front.len() <= size {
            selected.extend(front);
            continue;
        }
        let remaining = size - selected.len();
        while front.len() > remaining {
            let points: Vec<Vec<f64>> = front.iter().map(|i| union[*i].objectives.clone()).collect();
            let contributions = hypervolume_contributions(&points, CONTRIBUTION_REFERENCE_OFFSET);
            let least = contributions
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
                .map(|(k, _)| k)
                .unwrap_or(0);
            front.remove(least);
        }
        selected.extend(front);
        break;
    }

    let mut slots: Vec<Option<Solution>> = union.into_iter().map(Some).collect();
    selected
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
