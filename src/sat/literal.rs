#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Variables and literals.
//!
//! The solver never looks inside a variable: anything that can be cloned,
//! compared and hashed can name a boolean unknown. DIMACS formulas use `u32`,
//! the sudoku encoder uses `Placement`.

use core::ops::Not;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

/// An opaque token identifying a boolean unknown.
pub trait Variable: Clone + Debug + Eq + Hash + Ord {}

impl<T: Clone + Debug + Eq + Hash + Ord> Variable for T {}

/// A variable together with the polarity it asserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Literal<V> {
    variable: V,
    polarity: bool,
}

impl<V: Variable> Literal<V> {
    /// Creates a literal asserting `variable == polarity`.
    #[must_use]
    pub const fn new(variable: V, polarity: bool) -> Self {
        Self { variable, polarity }
    }

    /// Positive literal of `variable`.
    #[must_use]
    pub const fn positive(variable: V) -> Self {
        Self::new(variable, true)
    }

    /// Negative literal of `variable`.
    #[must_use]
    pub const fn negative(variable: V) -> Self {
        Self::new(variable, false)
    }

    /// The variable this literal talks about.
    #[must_use]
    pub const fn variable(&self) -> &V {
        &self.variable
    }

    /// `true` for a positive literal.
    #[must_use]
    pub const fn polarity(&self) -> bool {
        self.polarity
    }

    /// The same variable with the opposite polarity.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            variable: self.variable.clone(),
            polarity: !self.polarity,
        }
    }

    /// Whether `other` is the negation of this literal.
    #[must_use]
    pub fn is_complement_of(&self, other: &Self) -> bool {
        self.variable == other.variable && self.polarity != other.polarity
    }

    /// Consumes the literal, returning the `(variable, value)` pair that makes it true.
    #[must_use]
    pub fn into_pair(self) -> (V, bool) {
        (self.variable, self.polarity)
    }
}

impl Literal<u32> {
    /// Builds a literal from a signed DIMACS integer.
    ///
    /// # Panics
    ///
    /// `0` is the DIMACS clause terminator and never names a variable.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        assert_ne!(value, 0, "0 does not name a DIMACS variable");
        Self::new(value.unsigned_abs(), value.is_positive())
    }

    /// The signed DIMACS integer for this literal.
    ///
    /// # Panics
    ///
    /// If the variable index does not fit in an `i32`.
    #[must_use]
    pub fn to_i32(self) -> i32 {
        let var = i32::try_from(self.variable).expect("DIMACS variable overflowed i32");
        if self.polarity { var } else { -var }
    }
}

impl<V: Variable> Not for Literal<V> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self {
            polarity: !self.polarity,
            ..self
        }
    }
}

impl<V: Variable> Not for &Literal<V> {
    type Output = Literal<V>;

    fn not(self) -> Self::Output {
        self.negated()
    }
}

impl<V: Variable + Display> Display for Literal<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.polarity { "" } else { "¬" }, self.variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_neg() {
        assert_eq!(Literal::new(1u32, false).negated(), Literal::new(1, true));
        assert_eq!(!Literal::new(1u32, true), Literal::new(1, false));
        assert_eq!(!&Literal::new("a", true), Literal::negative("a"));
    }

    #[test]
    fn test_complement() {
        let a = Literal::positive('a');
        assert!(a.is_complement_of(&!a));
        assert!(!a.is_complement_of(&a));
        assert!(!a.is_complement_of(&Literal::negative('b')));
    }

    #[test]
    fn test_dimacs_conversion() {
        assert_eq!(Literal::from_i32(-7), Literal::negative(7));
        assert_eq!(Literal::from_i32(3).to_i32(), 3);
        assert_eq!(Literal::negative(12u32).to_i32(), -12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Literal::positive(4u32).to_string(), "4");
        assert_eq!(Literal::negative(4u32).to_string(), "¬4");
    }
}
