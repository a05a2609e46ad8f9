//! Order in which MOEA/D visits its sub-problems.

use rand::seq::SliceRandom;
use std::fmt;

use crate::OperatorRng;

pub trait SequenceGenerator: Send + fmt::Debug {
    fn name(&self) -> &str;

    /// Next sub-problem index.
    fn next_index(&mut self, rng: &mut OperatorRng) -> usize;
}

/// Visits every sub-problem once per cycle in a freshly shuffled order.
#[derive(Debug, Clone)]
pub struct RandomPermutationCycle {
    permutation: Vec<usize>,
    position: usize,
}

impl RandomPermutationCycle {
    pub fn new(size: usize) -> Self {
        let permutation: Vec<usize> = (0..size.max(1)).collect();
        let position = permutation.len();
        Self { permutation, position }
    }
}

impl SequenceGenerator for RandomPermutationCycle {
    fn name(&self) -> &str {
        "randomPermutationCycle"
    }

    fn next_index(&mut self, rng: &mut OperatorRng) -> usize {
        if self.position == self.permutation.len() {
            self.permutation.shuffle(rng);
            self.position = 0;
        }
        let index = self.permutation[self.position];
        self.position += 1;
        index
    }
}

/// 0, 1, ..., size - 1, 0, 1, ...
#[derive(Debug, Clone)]
pub struct CyclicIntegerSequence {
    size: usize,
    position: usize,
}

impl CyclicIntegerSequence {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            position: 0,
        }
    }
}

impl SequenceGenerator for CyclicIntegerSequence {
    fn name(&self) -> &str {
        "cyclicIntegerSequence"
    }

    fn next_index(&mut self, _rng: &mut OperatorRng) -> usize {
        let index = self.position;
        self.position = (self.position + 1) % self.size;
        index
    }
}
