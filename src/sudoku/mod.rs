#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Sudoku boards and their CNF encoding.

/// Validated boards, their text form and rule checks.
pub mod board;
/// Board to formula and model to board.
pub mod solver;

pub use board::{Board, BoardError, Size};
pub use solver::{EXAMPLE_FOUR, EXAMPLE_NINE, Placement, Sudoku, decode, encode, parse_sudoku_file};
