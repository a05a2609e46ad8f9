//! Uniformly spread weight vectors and their Euclidean neighborhoods.

use std::cmp::Ordering;

/// `count` weight vectors of dimension `objectives` on the unit simplex.
///
/// Two objectives use an even grid; more objectives use a simplex-lattice
/// design thinned by farthest-point selection, starting from the axes.
pub fn uniform_weights(count: usize, objectives: usize) -> Vec<Vec<f64>> {
    if count == 0 || objectives == 0 {
        return Vec::new();
    }
    if objectives == 1 {
        return vec![vec![1.0]; count];
    }
    if count == 1 {
        return vec![vec![1.0 / objectives as f64; objectives]];
    }
    if objectives == 2 {
        return (0..count)
            .map(|i| {
                let w = i as f64 / (count - 1) as f64;
                vec![w, 1.0 - w]
            })
            .collect();
    }

    let mut divisions = 1;
    while lattice_size(divisions, objectives) < count {
        divisions += 1;
    }
    let lattice = simplex_lattice(divisions, objectives);
    farthest_point_subset(lattice, count, objectives)
}

fn lattice_size(divisions: usize, objectives: usize) -> usize {
    // C(divisions + objectives - 1, objectives - 1)
    let mut size = 1usize;
    for k in 1..objectives {
        size = size * (divisions + k) / k;
    }
    size
}

fn simplex_lattice(divisions: usize, objectives: usize) -> Vec<Vec<f64>> {
    fn fill(remaining: usize, depth: usize, current: &mut Vec<usize>, objectives: usize, out: &mut Vec<Vec<usize>>) {
        if depth == objectives - 1 {
            current.push(remaining);
            out.push(current.clone());
            current.pop();
            return;
        }
        for part in 0..=remaining {
            current.push(part);
            fill(remaining - part, depth + 1, current, objectives, out);
            current.pop();
        }
    }
    let mut points = Vec::new();
    fill(divisions, 0, &mut Vec::new(), objectives, &mut points);
    points
        .into_iter()
        .map(|p| p.into_iter().map(|k| k as f64 / divisions as f64).collect())
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt()
}

fn farthest_point_subset(candidates: Vec<Vec<f64>>, count: usize, objectives: usize) -> Vec<Vec<f64>> {
    if candidates.len() <= count {
        return candidates;
    }
    let mut chosen: Vec<usize> = Vec::with_capacity(count);
    for axis in 0..objectives.min(count) {
        if let Some(index) = candidates.iter().position(|c| c[axis] == 1.0) {
            chosen.push(index);
        }
    }
    let mut nearest: Vec<f64> = candidates
        .iter()
        .map(|c| {
            chosen
                .iter()
                .map(|k| distance(c, &candidates[*k]))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    while chosen.len() < count {
        let next = nearest
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        chosen.push(next);
        for (i, c) in candidates.iter().enumerate() {
            nearest[i] = nearest[i].min(distance(c, &candidates[next]));
        }
    }
    chosen.into_iter().map(|i| candidates[i].clone()).collect()
}

/// Weight vectors of a decomposition and, for each, the indices of its
/// `size` nearest weight vectors (itself included).
#[derive(Debug, Clone)]
pub struct WeightVectorNeighborhood {
    weights: Vec<Vec<f64>>,
    neighbors: Vec<Vec<usize>>,
}

impl WeightVectorNeighborhood {
    pub fn new(population_size: usize, objectives: usize, size: usize) -> Self {
        let weights = uniform_weights(population_size, objectives);
        let size = size.clamp(1, weights.len().max(1));
        let neighbors = weights
            .iter()
            .map(|w| {
                let mut order: Vec<(usize, f64)> = weights
                    .iter()
                    .enumerate()
                    .map(|(j, other)| (j, distance(w, other)))
                    .collect();
                order.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
                order.into_iter().take(size).map(|(j, _)| j).collect()
            })
            .collect();
        Self { weights, neighbors }
    }

    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }

    pub fn weight(&self, sub_problem: usize) -> &[f64] {
        &self.weights[sub_problem]
    }

    pub fn neighbors(&self, sub_problem: usize) -> &[usize] {
        &self.neighbors[sub_problem]
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
