use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::dpll::Dpll;
use crate::sat::literal::Variable;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolutionStats {
    /// Branches opened on the first literal of the first clause.
    pub decisions: usize,
    /// Literals forced by unit clauses.
    pub propagations: usize,
    /// Nodes that ended with an empty clause.
    pub conflicts: usize,
    /// Deepest branching level reached.
    pub max_depth: usize,
}

/// A complete SAT search over formulas with variables of type `V`.
pub trait Solver<V: Variable> {
    /// Takes ownership of the formula to solve.
    fn new(cnf: Cnf<V>) -> Self;

    /// Searches for a model. `None` means the formula is unsatisfiable.
    fn solve(&mut self) -> Option<Assignment<V>>;

    /// Counters from the most recent call to [`Solver::solve`].
    fn stats(&self) -> SolutionStats;
}

/// Solves `cnf` with the backtracking solver.
///
/// Returns an assignment satisfying every clause, or `None` if there is none.
/// The same formula, in the same clause and literal order, always yields the
/// same assignment.
#[must_use]
pub fn solve<V: Variable>(cnf: &Cnf<V>) -> Option<Assignment<V>> {
    Dpll::new(cnf.clone()).solve()
}
