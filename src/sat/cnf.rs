//! Formulas in conjunctive normal form.
//!
//! A `Cnf` is an ordered list of clauses. Order never changes satisfiability
//! but the solver branches on the first literal of the first clause, so it
//! does decide which model comes back.

use crate::sat::assignment::Assignment;
use crate::sat::clause::{Clause, Reduced};
use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt::{self, Display};

/// A conjunction of clauses over variables of type `V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cnf<V> {
    clauses: Vec<Clause<V>>,
}

impl<V: Variable> Default for Cnf<V> {
    fn default() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }
}

impl<V: Variable> Cnf<V> {
    /// Wraps `clauses`, keeping their order.
    #[must_use]
    pub fn new(clauses: Vec<Clause<V>>) -> Self {
        Self { clauses }
    }

    /// Appends a clause at the end.
    pub fn add_clause(&mut self, clause: impl Into<Clause<V>>) {
        self.clauses.push(clause.into());
    }

    /// All clauses, in order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause<V>] {
        &self.clauses
    }

    /// Iterates over the clauses in order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause<V>> {
        self.clauses.iter()
    }

    /// Number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// A formula without clauses is trivially satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Total number of literal occurrences.
    #[must_use]
    pub fn num_literals(&self) -> usize {
        self.clauses.iter().map(Clause::len).sum()
    }

    /// Distinct variables mentioned by the formula, in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> Vec<V> {
        self.clauses
            .iter()
            .flat_map(Clause::iter)
            .map(|l| l.variable().clone())
            .unique()
            .collect()
    }

    /// Number of distinct variables.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(Clause::iter)
            .map(Literal::variable)
            .collect::<FxHashSet<_>>()
            .len()
    }

    /// A formula holding the empty clause is unsatisfiable.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// The literal of the first unit clause, if any.
    #[must_use]
    pub fn first_unit(&self) -> Option<&Literal<V>> {
        self.clauses
            .iter()
            .find(|c| c.is_unit())
            .and_then(Clause::first)
    }

    /// The first literal of the first clause.
    #[must_use]
    pub fn first_literal(&self) -> Option<&Literal<V>> {
        self.clauses.first().and_then(Clause::first)
    }

    /// Simplifies the formula in place under `literal = true`.
    ///
    /// Clauses holding the literal are dropped and the negation is removed
    /// from the rest, keeping clause order. Returns `true` if this produced an
    /// empty clause.
    pub fn assume(&mut self, literal: &Literal<V>) -> bool {
        let mut conflict = false;

        self.clauses.retain_mut(|clause| match clause.reduce(literal) {
            Reduced::Satisfied => false,
            Reduced::Unchanged => true,
            Reduced::Shrunk(shrunk) => {
                conflict |= shrunk.is_empty();
                *clause = shrunk;
                true
            }
        });

        conflict
    }

    /// Checks that every clause has a literal made true by `assignment`.
    #[must_use]
    pub fn verify(&self, assignment: &Assignment<V>) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied_by(assignment))
    }

    /// Renames every variable through `f`, keeping clause and literal order.
    #[must_use]
    pub fn map_variables<W: Variable>(&self, mut f: impl FnMut(&V) -> W) -> Cnf<W> {
        Cnf::new(
            self.clauses
                .iter()
                .map(|c| c.map_variables(&mut f))
                .collect(),
        )
    }
}

impl<V: Variable> From<Vec<Clause<V>>> for Cnf<V> {
    fn from(clauses: Vec<Clause<V>>) -> Self {
        Self::new(clauses)
    }
}

impl<V: Variable> From<Vec<Vec<Literal<V>>>> for Cnf<V> {
    fn from(clauses: Vec<Vec<Literal<V>>>) -> Self {
        clauses.into_iter().map(Clause::new).collect()
    }
}

impl From<Vec<Vec<i32>>> for Cnf<u32> {
    fn from(clauses: Vec<Vec<i32>>) -> Self {
        clauses.into_iter().map(Clause::from).collect()
    }
}

impl<V: Variable> FromIterator<Clause<V>> for Cnf<V> {
    fn from_iter<I: IntoIterator<Item = Clause<V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<V: Variable + Display> Display for Cnf<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clauses.iter().join(" ∧ "))
    }
}
