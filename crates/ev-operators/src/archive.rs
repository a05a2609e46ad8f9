//! External archives of non-dominated solutions.

use std::cmp::Ordering;
use std::fmt;

use ev_types::{dominance, Solution};

use crate::ranking::crowding_distances;

pub trait Archive: Send + fmt::Debug {
    fn name(&self) -> &str;

    /// Offer a solution; returns whether it entered the archive.
    fn add(&mut self, solution: Solution) -> bool;

    /// The archive content reported as an algorithm result.
    fn solutions(&self) -> Vec<Solution>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Insert into a mutually non-dominated list. Dominated or duplicated
/// candidates are refused; members the candidate dominates are evicted.
fn insert_non_dominated(members: &mut Vec<Solution>, candidate: Solution) -> bool {
    let mut index = 0;
    while index < members.len() {
        match dominance(&candidate.objectives, &members[index].objectives) {
            Ordering::Greater => return false,
            Ordering::Equal if candidate.objectives == members[index].objectives => return false,
            Ordering::Less => {
                members.swap_remove(index);
            }
            Ordering::Equal => index += 1,
        }
    }
    members.push(candidate);
    true
}

/// Remove the most crowded members until `size` remain.
fn truncate_by_crowding(members: &mut Vec<Solution>, size: usize) {
    while members.len() > size {
        let all: Vec<usize> = (0..members.len()).collect();
        let distances = crowding_distances(members.as_slice(), &all);
        let most_crowded = distances
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);
        members.swap_remove(most_crowded);
    }
}

/// Bounded archive pruned by crowding distance on overflow.
#[derive(Debug, Clone)]
pub struct CrowdingDistanceArchive {
    max_size: usize,
    members: Vec<Solution>,
}

impl CrowdingDistanceArchive {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
            members: Vec::new(),
        }
    }
}

impl Archive for CrowdingDistanceArchive {
    fn name(&self) -> &str {
        "crowdingDistanceArchive"
    }

    fn add(&mut self, solution: Solution) -> bool {
        let added = insert_non_dominated(&mut self.members, solution);
        if added && self.members.len() > self.max_size {
            truncate_by_crowding(&mut self.members, self.max_size);
        }
        added
    }

    fn solutions(&self) -> Vec<Solution> {
        self.members.clone()
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

/// Keeps every non-dominated solution found; the reported result is a
/// crowding-based subset of `result_size` members.
#[derive(Debug, Clone)]
pub struct UnboundedArchive {
    result_size: usize,
    members: Vec<Solution>,
}

impl UnboundedArchive {
    pub fn new(result_size: usize) -> Self {
        Self {
            result_size: result_size.max(1),
            members: Vec::new(),
        }
    }
}

impl Archive for UnboundedArchive {
    fn name(&self) -> &str {
        "unboundedArchive"
    }

    fn add(&mut self, solution: Solution) -> bool {
        insert_non_dominated(&mut self.members, solution)
    }

    fn solutions(&self) -> Vec<Solution> {
        let mut subset = self.members.clone();
        truncate_by_crowding(&mut subset, self.result_size);
        subset
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution(f1: f64, f2: f64) -> Solution {
        Solution {
            variables: vec![],
            objectives: vec![f1, f2],
        }
    }

    #[test]
    fn archive_keeps_only_non_dominated() {
        let mut archive = CrowdingDistanceArchive::new(10);
        assert!(archive.add(solution(2.0, 2.0)));
        assert!(!archive.add(solution(3.0, 3.0)));
        assert!(!archive.add(solution(2.0, 2.0)));
        assert!(archive.add(solution(1.0, 3.0)));
        assert!(archive.add(solution(1.0, 1.0)));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.solutions()[0].objectives, vec![1.0, 1.0]);
    }

    #[test]
    fn bounded_archive_drops_crowded_points() {
        let mut archive = CrowdingDistanceArchive::new(3);
        for (f1, f2) in [(0.0, 4.0), (4.0, 0.0), (2.0, 2.0), (2.1, 1.9)] {
            archive.add(solution(f1, f2));
        }
        assert_eq!(archive.len(), 3);
        let objectives: Vec<Vec<f64>> = archive.solutions().iter().map(|s| s.objectives.clone()).collect();
        assert!(objectives.contains(&vec![0.0, 4.0]));
        assert!(objectives.contains(&vec![4.0, 0.0]));
    }

    #[test]
    fn unbounded_archive_grows_but_reports_subset() {
        let mut archive = UnboundedArchive::new(2);
        for i in 0..5 {
            let f1 = i as f64;
            archive.add(solution(f1, 4.0 - f1));
        }
        assert_eq!(archive.len(), 5);
        assert_eq!(archive.solutions().len(), 2);
        assert!(!archive.is_empty());
    }
}
