#![deny(missing_docs)]
//! A deterministic backtracking SAT solver and a sudoku encoder built on it.
//!
//! [`sat`] solves formulas in conjunctive normal form over any variable type.
//! [`sudoku`] turns an N×N board into such a formula and a model back into a
//! filled board:
//!
//! ```
//! use sat_sudoku::sat::solve;
//! use sat_sudoku::sudoku::{Board, decode, encode, EXAMPLE_FOUR};
//!
//! let board = Board::try_from(EXAMPLE_FOUR).unwrap();
//! let model = solve(&encode(&board));
//! let solved = decode(model.as_ref(), board.size()).unwrap();
//! assert!(solved.is_solved());
//! ```

/// The `sat` module holds the CNF data types, the DIMACS reader and writer,
/// and the backtracking solver.
pub mod sat;

/// The `sudoku` module encodes sudoku boards of any perfect-square size as
/// CNF formulas and decodes models back into boards.
pub mod sudoku;
