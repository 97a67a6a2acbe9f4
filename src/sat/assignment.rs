//! Variable assignments produced by the solver.

use crate::sat::literal::{Literal, Variable};
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt::{self, Display};

/// A mapping from variable to truth value.
///
/// Only the variables the search actually fixed are present; anything absent
/// is a "don't care" for the formula that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<V: Variable>(FxHashMap<V, bool>);

impl<V: Variable> Default for Assignment<V> {
    fn default() -> Self {
        Self(FxHashMap::default())
    }
}

impl<V: Variable> Assignment<V> {
    /// An assignment with no variables set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `variable = value`, replacing any previous value.
    pub fn set(&mut self, variable: V, value: bool) {
        self.0.insert(variable, value);
    }

    /// Records the value that makes `literal` true.
    pub fn assign(&mut self, literal: Literal<V>) {
        let (variable, value) = literal.into_pair();
        self.set(variable, value);
    }

    /// Value of `variable`, or `None` if it is unassigned.
    #[must_use]
    pub fn var_value(&self, variable: &V) -> Option<bool> {
        self.0.get(variable).copied()
    }

    /// Truth value of `literal`, or `None` if its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, literal: &Literal<V>) -> Option<bool> {
        self.var_value(literal.variable())
            .map(|value| value == literal.polarity())
    }

    /// Unassigned variables count as false here.
    #[must_use]
    pub fn is_true(&self, variable: &V) -> bool {
        self.var_value(variable) == Some(true)
    }

    /// Number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no variable is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every `(variable, value)` pair, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&V, bool)> {
        self.0.iter().map(|(v, &b)| (v, b))
    }

    /// Variables assigned `true`, in ascending order.
    pub fn true_variables(&self) -> impl Iterator<Item = &V> {
        self.0
            .iter()
            .filter_map(|(v, &b)| b.then_some(v))
            .sorted()
    }
}

impl<V: Variable> FromIterator<(V, bool)> for Assignment<V> {
    fn from_iter<I: IntoIterator<Item = (V, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Variable> FromIterator<Literal<V>> for Assignment<V> {
    fn from_iter<I: IntoIterator<Item = Literal<V>>>(iter: I) -> Self {
        iter.into_iter().map(Literal::into_pair).collect()
    }
}

impl<V: Variable> Extend<Literal<V>> for Assignment<V> {
    fn extend<I: IntoIterator<Item = Literal<V>>>(&mut self, iter: I) {
        for literal in iter {
            self.assign(literal);
        }
    }
}

/// DIMACS-style model line: signed variables in ascending order.
impl Display for Assignment<u32> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = self
            .0
            .iter()
            .sorted_by_key(|(v, _)| **v)
            .map(|(&v, &b)| Literal::new(v, b).to_i32())
            .join(" ");
        write!(f, "{line}")
    }
}
