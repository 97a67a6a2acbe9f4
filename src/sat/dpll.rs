//! Defines the backtracking SAT solver.
//!
//! `Dpll` searches for a model of a CNF formula with unit propagation and
//! chronological backtracking. There is no clause learning, no restarts and no
//! branching heuristic: every decision is made on the first literal of the
//! first remaining clause, trying the literal as written before its negation.
//! This makes the returned model a pure function of the formula's clause and
//! literal order.
//!
//! The search is iterative. Instead of recursing into each branch it keeps:
//! 1.  **The current formula**, reduced by every literal fixed on the path so
//!     far. Reduction never touches a formula that is still referenced
//!     elsewhere; clauses are shared through `Rc`, so the copies are shallow.
//! 2.  **A stack of pending branches.** Each decision pushes the formula it was
//!     made on together with the negated literal. When a conflict is reached,
//!     the most recent pending branch is popped and resumed.
//! 3.  **The trail** of fixed literals. Backtracking truncates it to the
//!     branch's level before the negated literal is recorded.
//!
//! Stack depth therefore stays constant no matter how many variables the
//! formula has.

use crate::sat::assignment::Assignment;
use crate::sat::cnf::Cnf;
use crate::sat::literal::{Literal, Variable};
use crate::sat::solver::{SolutionStats, Solver};
use crate::sat::trail::{Reason, Trail};
use log::{debug, trace, warn};

/// An alternative not explored yet.
#[derive(Debug, Clone)]
struct Branch<V> {
    /// Formula the decision was made on.
    formula: Cnf<V>,
    /// The negation of the decision literal.
    literal: Literal<V>,
    level: usize,
}

/// Outcome of unit propagation at one search node.
#[derive(Debug)]
enum Propagation<V> {
    Satisfied,
    Conflict,
    /// No unit clause left; branch on this literal.
    Undecided(Literal<V>),
}

/// Solver state for one formula. [`Solver::solve`] may be called repeatedly
/// and always returns the same result.
#[derive(Debug, Clone)]
pub struct Dpll<V: Variable> {
    /// The formula being solved. Never modified by the search.
    pub cnf: Cnf<V>,
    /// Literals fixed on the current search path.
    pub trail: Trail<V>,
    branches: Vec<Branch<V>>,
    stats: SolutionStats,
}

impl<V: Variable> Solver<V> for Dpll<V> {
    fn new(cnf: Cnf<V>) -> Self {
        if cnf.has_empty_clause() {
            warn!("formula contains an empty clause and cannot be satisfied");
        }

        Self {
            cnf,
            trail: Trail::new(),
            branches: Vec::new(),
            stats: SolutionStats::default(),
        }
    }

    fn solve(&mut self) -> Option<Assignment<V>> {
        self.trail = Trail::new();
        self.branches.clear();
        self.stats = SolutionStats::default();

        debug!(
            "solving {} clauses over {} variables",
            self.cnf.len(),
            self.cnf.num_vars()
        );

        let mut formula = self.cnf.clone();
        let mut level = 0;

        loop {
            match self.propagate(&mut formula, level) {
                Propagation::Satisfied => {
                    debug!(
                        "satisfiable: {:?}, model path holds {} decided, {} flipped and {} forced literals",
                        self.stats,
                        self.trail.count(Reason::Decision),
                        self.trail.count(Reason::Flipped),
                        self.trail.count(Reason::Unit)
                    );
                    return Some(self.trail.to_assignment());
                }
                Propagation::Conflict => {
                    self.stats.conflicts += 1;

                    let Some(branch) = self.branches.pop() else {
                        debug!("unsatisfiable: {:?}", self.stats);
                        return None;
                    };

                    trace!("conflict, resuming level {} with {:?}", branch.level, branch.literal);

                    level = branch.level;
                    self.trail.backstep_to(level);
                    self.trail.push(branch.literal.clone(), level, Reason::Flipped);

                    formula = branch.formula;
                    formula.assume(&branch.literal);
                }
                Propagation::Undecided(literal) => {
                    level += 1;
                    self.stats.decisions += 1;
                    self.stats.max_depth = self.stats.max_depth.max(level);

                    trace!("level {level}: deciding {literal:?}");

                    self.branches.push(Branch {
                        formula: formula.clone(),
                        literal: literal.negated(),
                        level,
                    });
                    self.trail.push(literal.clone(), level, Reason::Decision);

                    formula.assume(&literal);
                }
            }
        }
    }

    fn stats(&self) -> SolutionStats {
        self.stats
    }
}

impl<V: Variable> Dpll<V> {
    /// Runs unit propagation on `formula` to a fixed point.
    ///
    /// Every pass takes the first unit clause in formula order, so the forced
    /// literals land on the trail in a deterministic order. An empty clause
    /// survives any further reduction, so propagation stops at the first one.
    fn propagate(&mut self, formula: &mut Cnf<V>, level: usize) -> Propagation<V> {
        if formula.has_empty_clause() {
            return Propagation::Conflict;
        }

        while let Some(unit) = formula.first_unit().cloned() {
            self.stats.propagations += 1;

            let conflict = formula.assume(&unit);
            self.trail.push(unit, level, Reason::Unit);

            if conflict {
                return Propagation::Conflict;
            }
        }

        match formula.first_literal() {
            None => Propagation::Satisfied,
            Some(literal) => Propagation::Undecided(literal.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;
    use crate::sat::solver::solve;

    fn cnf(clauses: &[&[i32]]) -> Cnf<u32> {
        Cnf::from(clauses.iter().map(|c| c.to_vec()).collect::<Vec<_>>())
    }

    /// Brute force over every assignment of `num_vars` variables numbered from 1.
    fn brute_force(f: &Cnf<u32>, num_vars: u32) -> bool {
        (0u32..1 << num_vars).any(|bits| {
            let a: Assignment<u32> = (1..=num_vars).map(|v| (v, bits >> (v - 1) & 1 == 1)).collect();
            f.verify(&a)
        })
    }

    fn random_cnf(rng: &mut fastrand::Rng, num_vars: u32) -> Cnf<u32> {
        let num_clauses = rng.usize(1..=4 * num_vars as usize);
        (0..num_clauses)
            .map(|_| {
                let width = rng.usize(1..=3);
                (0..width)
                    .map(|_| Literal::new(rng.u32(1..=num_vars), rng.bool()))
                    .collect::<Clause<u32>>()
            })
            .collect()
    }

    #[test]
    fn test_empty_formula() {
        let sol = solve(&Cnf::<&str>::default()).unwrap();
        assert!(sol.is_empty());
    }

    #[test]
    fn test_direct_contradiction() {
        let f: Cnf<&str> = Cnf::from(vec![
            vec![Literal::positive("a")],
            vec![Literal::negative("a")],
        ]);
        assert!(solve(&f).is_none());
    }

    #[test]
    fn test_single_clause() {
        let f: Cnf<&str> = Cnf::from(vec![vec![
            Literal::positive("a"),
            Literal::negative("b"),
            Literal::positive("c"),
        ]]);
        let x = solve(&f).unwrap();

        assert!(
            x.var_value(&"a") == Some(true)
                || x.var_value(&"b") == Some(false)
                || x.var_value(&"c") == Some(true)
        );
        // first literal of the first clause is tried first
        assert_eq!(x.var_value(&"a"), Some(true));
        assert_eq!(x.len(), 1);
    }

    #[test]
    fn test_empty_clause_is_unsat() {
        assert!(solve(&cnf(&[&[1, 2], &[]])).is_none());
    }

    #[test]
    fn test_tautology_is_satisfied() {
        let f = cnf(&[&[1, -1], &[2, -2, 3]]);
        let sol = solve(&f).unwrap();
        assert!(f.verify(&sol));
    }

    #[test]
    fn test_units_only() {
        let mut solver = Dpll::new(cnf(&[&[1], &[-1, 2], &[-2, -3]]));
        let sol = solver.solve().unwrap();

        assert_eq!(sol.var_value(&1), Some(true));
        assert_eq!(sol.var_value(&2), Some(true));
        assert_eq!(sol.var_value(&3), Some(false));
        assert_eq!(solver.stats().decisions, 0);
        assert_eq!(solver.stats().propagations, 3);
    }

    #[test]
    fn test_backtracks_to_negation() {
        // deciding 1 = true leads to a conflict, 1 = false does not
        let f = cnf(&[&[1, 2], &[-1, 3], &[-1, -3]]);
        let mut solver = Dpll::new(f.clone());
        let sol = solver.solve().unwrap();

        assert!(f.verify(&sol));
        assert_eq!(sol.var_value(&1), Some(false));
        assert_eq!(sol.var_value(&2), Some(true));
        assert_eq!(solver.stats().conflicts, 1);
        assert_eq!(solver.stats().decisions, 1);
        // 1 was flipped after the conflict, then 2 was forced
        assert_eq!(solver.trail.count(Reason::Flipped), 1);
        assert_eq!(solver.trail.count(Reason::Unit), 1);
        assert_eq!(solver.trail.count(Reason::Decision), 0);
    }

    #[test]
    fn test_pigeonhole_unsat() {
        // three pigeons, two holes: p(i,h) = 2 * i + h + 1
        let p = |i: i32, h: i32| 2 * i + h + 1;
        let mut clauses: Vec<Vec<i32>> = (0..3).map(|i| vec![p(i, 0), p(i, 1)]).collect();
        for h in 0..2 {
            for i in 0..3 {
                for j in i + 1..3 {
                    clauses.push(vec![-p(i, h), -p(j, h)]);
                }
            }
        }
        let mut solver = Dpll::new(Cnf::from(clauses));

        assert!(solver.solve().is_none());
        assert!(solver.stats().conflicts > 1);
    }

    #[test]
    fn test_deterministic() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let f = random_cnf(&mut rng, 8);
            assert_eq!(solve(&f), solve(&f));
        }
    }

    #[test]
    fn test_solver_is_reusable() {
        let mut solver = Dpll::new(cnf(&[&[1, 2], &[-1, 3], &[-1, -3]]));
        let first = solver.solve();
        let stats = solver.stats();
        assert_eq!(solver.solve(), first);
        assert_eq!(solver.stats(), stats);
    }

    #[test]
    fn test_sound_and_complete_on_small_formulas() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        for _ in 0..300 {
            let num_vars = rng.u32(1..=12);
            let f = random_cnf(&mut rng, num_vars);

            match solve(&f) {
                Some(sol) => assert!(f.verify(&sol), "unsound model for {f}"),
                None => assert!(!brute_force(&f, num_vars), "missed a model for {f}"),
            }
        }
    }

    #[test]
    fn test_long_implication_chain() {
        // x1 and x1 -> x2 -> ... -> x5000, solved without deep recursion
        let n = 5000;
        let mut clauses = vec![vec![1]];
        clauses.extend((1..n).map(|i| vec![-i, i + 1]));
        let sol = solve(&Cnf::from(clauses)).unwrap();
        assert!(sol.is_true(&5000));
    }

    #[test]
    fn test_many_decisions_without_recursion() {
        // every clause needs its own decision: (x_i ∨ y_i) for i in 1..=2000
        let clauses: Vec<Vec<i32>> = (1..=2000).map(|i| vec![2 * i, 2 * i + 1]).collect();
        let mut solver = Dpll::new(Cnf::from(clauses));
        let sol = solver.solve().unwrap();

        assert_eq!(sol.len(), 2000);
        assert_eq!(solver.stats().max_depth, 2000);
    }
}
