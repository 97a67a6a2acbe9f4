#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The trail records every literal fixed on the current search path, in the
//! order it was fixed, tagged with the branching depth it belongs to.
//! Backtracking truncates it, which is all the undo the search needs.

use crate::sat::assignment::Assignment;
use crate::sat::literal::{Literal, Variable};
use core::ops::Index;

/// Why a literal was fixed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Copy, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// First polarity tried at a branch.
    #[default]
    Decision,
    /// Second polarity, tried after the first one failed.
    Flipped,
    /// Forced by a unit clause.
    Unit,
}

/// One fixed literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<V> {
    /// The literal made true.
    pub lit: Literal<V>,
    /// Branching depth the literal was fixed at.
    pub decision_level: usize,
    /// How the literal came to be fixed.
    pub reason: Reason,
}

/// Literals fixed on the current search path, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail<V> {
    t: Vec<Step<V>>,
}

impl<V> Default for Trail<V> {
    fn default() -> Self {
        Self { t: Vec::new() }
    }
}

impl<V> Index<usize> for Trail<V> {
    type Output = Step<V>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.t[index]
    }
}

impl<V: Variable> Trail<V> {
    /// An empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth of the most recent step, 0 when nothing was decided yet.
    #[must_use]
    pub fn decision_level(&self) -> usize {
        self.t.last().map_or(0, |step| step.decision_level)
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Whether nothing is fixed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Steps in the order they were made.
    pub fn iter(&self) -> impl Iterator<Item = &Step<V>> {
        self.t.iter()
    }

    /// Number of steps fixed for `reason`.
    #[must_use]
    pub fn count(&self, reason: Reason) -> usize {
        self.iter().filter(|step| step.reason == reason).count()
    }

    /// Records `lit` at `decision_level`, which must not be shallower than the
    /// last step.
    pub fn push(&mut self, lit: Literal<V>, decision_level: usize, reason: Reason) {
        debug_assert!(decision_level >= self.decision_level());

        self.t.push(Step {
            lit,
            decision_level,
            reason,
        });
    }

    /// Drops every step made at `level` or deeper.
    pub fn backstep_to(&mut self, level: usize) {
        // levels never decrease along the trail
        let keep = self.t.partition_point(|step| step.decision_level < level);
        self.t.truncate(keep);
    }

    /// Collects the steps into an assignment.
    #[must_use]
    pub fn to_assignment(&self) -> Assignment<V> {
        self.t.iter().map(|step| step.lit.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backstep_truncates_deeper_levels() {
        let mut trail = Trail::new();
        trail.push(Literal::positive(1u32), 0, Reason::Unit);
        trail.push(Literal::positive(2), 1, Reason::Decision);
        trail.push(Literal::negative(3), 1, Reason::Unit);
        trail.push(Literal::positive(4), 2, Reason::Decision);

        trail.backstep_to(1);

        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].lit, Literal::positive(1));
        assert_eq!(trail.decision_level(), 0);
    }

    #[test]
    fn test_count_by_reason() {
        let mut trail = Trail::new();
        trail.push(Literal::positive(1u32), 0, Reason::Unit);
        trail.push(Literal::negative(2), 1, Reason::Flipped);
        trail.push(Literal::positive(3), 1, Reason::Unit);
        trail.push(Literal::positive(4), 2, Reason::Decision);

        assert_eq!(trail.count(Reason::Unit), 2);
        assert_eq!(trail.count(Reason::Flipped), 1);
        assert_eq!(trail.count(Reason::Decision), 1);

        trail.backstep_to(1);
        assert_eq!(trail.count(Reason::Flipped), 0);
    }

    #[test]
    fn test_to_assignment() {
        let mut trail = Trail::new();
        trail.push(Literal::negative("a"), 0, Reason::Unit);
        trail.push(Literal::positive("b"), 1, Reason::Flipped);

        let a = trail.to_assignment();
        assert_eq!(a.var_value(&"a"), Some(false));
        assert_eq!(a.var_value(&"b"), Some(true));
        assert_eq!(a.len(), 2);
    }
}
