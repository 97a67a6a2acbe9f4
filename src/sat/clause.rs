//! A clause is a disjunction of literals.
//!
//! Clauses are immutable once built and their literals live behind an `Rc`, so
//! cloning a clause (and therefore a whole formula) only bumps reference
//! counts. Reduction hands out fresh clauses for the ones it shrinks and shares
//! the rest with the formula it came from.

use crate::sat::assignment::Assignment;
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;
use std::fmt::{self, Display};
use std::rc::Rc;

/// A disjunction of literals in a fixed order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clause<V> {
    literals: Rc<[Literal<V>]>,
}

/// What assuming a literal does to a single clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduced<V> {
    /// The clause contains the literal and drops out of the formula.
    Satisfied,
    /// The clause never mentions the literal's variable.
    Unchanged,
    /// The clause contained the negation, which has been removed.
    Shrunk(Clause<V>),
}

impl<V: Variable> Clause<V> {
    /// Builds a clause, keeping duplicates and literal order as given.
    #[must_use]
    pub fn new(literals: Vec<Literal<V>>) -> Self {
        Self {
            literals: literals.into(),
        }
    }

    /// The empty clause, a contradiction.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of literals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// The empty clause can never be satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// A unit clause forces its only literal.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// Literals in clause order.
    pub fn iter(&self) -> impl Iterator<Item = &Literal<V>> {
        self.literals.iter()
    }

    /// The first literal, which the solver branches on.
    #[must_use]
    pub fn first(&self) -> Option<&Literal<V>> {
        self.literals.first()
    }

    /// Whether `literal` occurs with the same polarity.
    #[must_use]
    pub fn contains(&self, literal: &Literal<V>) -> bool {
        self.literals.contains(literal)
    }

    /// True if the clause holds some literal together with its negation.
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        self.literals
            .iter()
            .enumerate()
            .any(|(i, a)| self.literals[i + 1..].iter().any(|b| a.is_complement_of(b)))
    }

    /// Applies `literal = true` to this clause.
    ///
    /// A clause holding the literal is satisfied even if it also holds the
    /// negation. Every copy of the negation is removed otherwise; the result
    /// may be the empty clause.
    #[must_use]
    pub fn reduce(&self, literal: &Literal<V>) -> Reduced<V> {
        if self.contains(literal) {
            return Reduced::Satisfied;
        }

        let negation = literal.negated();
        if !self.contains(&negation) {
            return Reduced::Unchanged;
        }

        Reduced::Shrunk(Self::new(
            self.literals
                .iter()
                .filter(|&l| *l != negation)
                .cloned()
                .collect(),
        ))
    }

    /// Whether at least one literal is true under `assignment`.
    #[must_use]
    pub fn is_satisfied_by(&self, assignment: &Assignment<V>) -> bool {
        self.literals
            .iter()
            .any(|l| assignment.literal_value(l) == Some(true))
    }

    /// Rebuilds the clause over a different variable type.
    #[must_use]
    pub fn map_variables<W: Variable>(&self, mut f: impl FnMut(&V) -> W) -> Clause<W> {
        Clause::new(
            self.literals
                .iter()
                .map(|l| Literal::new(f(l.variable()), l.polarity()))
                .collect(),
        )
    }
}

impl<V> Index<usize> for Clause<V> {
    type Output = Literal<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.literals[index]
    }
}

impl<V: Variable> From<Vec<Literal<V>>> for Clause<V> {
    fn from(literals: Vec<Literal<V>>) -> Self {
        Self::new(literals)
    }
}

impl<V: Variable> FromIterator<Literal<V>> for Clause<V> {
    fn from_iter<I: IntoIterator<Item = Literal<V>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<i32>> for Clause<u32> {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().map(Literal::from_i32).collect()
    }
}

impl From<&Clause<u32>> for Vec<i32> {
    fn from(clause: &Clause<u32>) -> Self {
        clause.iter().map(|l| l.to_i32()).collect()
    }
}

impl<V: Variable + Display> Display for Clause<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;

        let mut iter = self.literals.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
        }
        for literal in iter {
            write!(f, " ∨ {literal}")?;
        }

        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimacs_clause(literals: &[i32]) -> Clause<u32> {
        Clause::from(literals.to_vec())
    }

    #[test]
    fn test_new() {
        let clause = dimacs_clause(&[1, -2, 3]);
        assert_eq!(clause.len(), 3);
        assert!(!clause.is_unit());
        assert_eq!(clause[1], Literal::negative(2));
        assert!(Clause::<u32>::empty().is_empty());
    }

    #[test]
    fn test_reduce_satisfied() {
        let clause = dimacs_clause(&[1, -2]);
        assert_eq!(clause.reduce(&Literal::positive(1)), Reduced::Satisfied);
        assert_eq!(clause.reduce(&Literal::negative(2)), Reduced::Satisfied);
    }

    #[test]
    fn test_reduce_unchanged() {
        let clause = dimacs_clause(&[1, -2]);
        assert_eq!(clause.reduce(&Literal::positive(3)), Reduced::Unchanged);
    }

    #[test]
    fn test_reduce_shrinks_to_empty() {
        let clause = dimacs_clause(&[-4, -4]);
        assert_eq!(
            clause.reduce(&Literal::positive(4)),
            Reduced::Shrunk(Clause::empty())
        );
    }

    #[test]
    fn test_reduce_keeps_order() {
        let clause = dimacs_clause(&[3, -1, 2]);
        let Reduced::Shrunk(reduced) = clause.reduce(&Literal::positive(1)) else {
            panic!("expected the clause to shrink");
        };
        assert_eq!(Vec::<i32>::from(&reduced), vec![3, 2]);
    }

    #[test]
    fn test_tautology() {
        assert!(dimacs_clause(&[1, 2, -1]).is_tautology());
        assert!(!dimacs_clause(&[1, 2, 3]).is_tautology());
        // satisfied by either polarity
        let clause = dimacs_clause(&[5, -5]);
        assert_eq!(clause.reduce(&Literal::positive(5)), Reduced::Satisfied);
        assert_eq!(clause.reduce(&Literal::negative(5)), Reduced::Satisfied);
    }

    #[test]
    fn test_display() {
        assert_eq!(dimacs_clause(&[1, -2]).to_string(), "(1 ∨ ¬2)");
    }
}
