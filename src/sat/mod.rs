#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! CNF formulas and the backtracking solver.

/// Variable to truth value maps.
pub mod assignment;
/// Disjunctions of literals.
pub mod clause;
/// Conjunctions of clauses.
pub mod cnf;
/// Reading and writing the DIMACS CNF format.
pub mod dimacs;
/// The backtracking search.
pub mod dpll;
/// Variables and literals.
pub mod literal;
/// The `Solver` trait and its statistics.
pub mod solver;
/// The record of literals fixed during search.
pub mod trail;

pub use solver::solve;
