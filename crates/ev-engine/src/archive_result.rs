use ev_types::{EvResult, Solution};

use crate::algorithm::{Algorithm, SharedArchive};

/// Reports the content of an external archive instead of the wrapped
/// algorithm's final population. The archive is fed by the wrapped
/// algorithm's [`Evaluation`](crate::Evaluation) step.
#[derive(Debug)]
pub struct WithArchive<A> {
    inner: A,
    archive: SharedArchive,
}

impl<A: Algorithm> WithArchive<A> {
    pub fn new(inner: A, archive: SharedArchive) -> Self {
        Self { inner, archive }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn archive(&self) -> &SharedArchive {
        &self.archive
    }
}

impl<A: Algorithm> Algorithm for WithArchive<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn run(&mut self) -> EvResult<()> {
        self.inner.run()
    }

    fn result(&self) -> Vec<Solution> {
        self.archive.lock().solutions()
    }

    fn evaluations(&self) -> usize {
        self.inner.evaluations()
    }
}
