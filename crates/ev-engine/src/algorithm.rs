use parking_lot::Mutex;
use std::sync::Arc;

use ev_operators::Archive;
use ev_types::{EvResult, Problem, Solution};

/// Archive shared between an algorithm's evaluation step and the
/// [`WithArchive`](crate::WithArchive) decorator reporting it.
pub type SharedArchive = Arc<Mutex<Box<dyn Archive>>>;

/// A fully assembled, runnable algorithm instance.
pub trait Algorithm: Send {
    fn name(&self) -> &str;

    /// Run until the evaluation budget is spent.
    fn run(&mut self) -> EvResult<()>;

    /// The solutions reported as the outcome of the run.
    fn result(&self) -> Vec<Solution>;

    /// Function evaluations performed so far.
    fn evaluations(&self) -> usize;
}

/// Evaluation step: calls the problem, counts evaluations and feeds the
/// optional external archive.
#[derive(Debug)]
pub struct Evaluation {
    problem: Arc<dyn Problem>,
    archive: Option<SharedArchive>,
    count: usize,
}

impl Evaluation {
    pub fn new(problem: Arc<dyn Problem>) -> Self {
        Self {
            problem,
            archive: None,
            count: 0,
        }
    }

    pub fn with_archive(mut self, archive: SharedArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    pub fn problem(&self) -> &Arc<dyn Problem> {
        &self.problem
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn evaluate(&mut self, solutions: &mut [Solution]) {
        for solution in solutions.iter_mut() {
            self.problem.evaluate(solution);
        }
        self.count += solutions.len();
        if let Some(archive) = &self.archive {
            let mut archive = archive.lock();
            for solution in solutions.iter() {
                archive.add(solution.clone());
            }
        }
    }
}
