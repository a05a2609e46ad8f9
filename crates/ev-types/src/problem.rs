use crate::solution::Solution;

/// A box-constrained, real-coded, multi-objective minimization problem.
///
/// Problems are opaque to the configuration engine: it only asks for their
/// shape and calls [`Problem::evaluate`] through the assembled algorithm.
pub trait Problem: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    fn number_of_variables(&self) -> usize;

    fn number_of_objectives(&self) -> usize;

    /// Lower and upper bound of every decision variable.
    fn bounds(&self) -> &[(f64, f64)];

    /// Compute the objective values of `solution` in place.
    fn evaluate(&self, solution: &mut Solution);

    /// A solution placed at the lower corner of the box, not yet evaluated.
    fn create_solution(&self) -> Solution {
        let variables = self.bounds().iter().map(|(low, _)| *low).collect();
        Solution::new(variables, self.number_of_objectives())
    }
}
