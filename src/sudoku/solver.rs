#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Encoding of sudoku boards as CNF formulas and decoding of models back into
//! boards.
//!
//! Every (value, row, col) triple becomes one boolean [`Placement`]. The
//! encoding is the plain pairwise one: each row, column, sub-block and cell
//! gets an at-most-one clause for every pair of its placements followed by a
//! single at-least-one clause. Clause order is fixed, so a board always
//! encodes to the same formula and solves to the same completion.

use crate::sat::assignment::Assignment;
use crate::sat::clause::Clause;
use crate::sat::cnf::Cnf;
use crate::sat::literal::Literal;
use crate::sat::solver::solve;
use crate::sudoku::board::{Board, BoardError, Size};
use itertools::Itertools;
use log::{debug, warn};
use std::fmt::{self, Display};
use std::path::Path;

/// Puzzle with a unique completion, `[[1,2,3,4],[3,4,1,2],[2,1,4,3],[4,3,2,1]]`.
pub const EXAMPLE_FOUR: [[usize; 4]; 4] = [[0, 0, 0, 0], [0, 4, 1, 0], [2, 0, 0, 3], [0, 0, 0, 0]];

/// A classic 9×9 puzzle with a unique completion.
pub const EXAMPLE_NINE: [[usize; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// "Cell (`row`, `col`) holds `value`". Rows and columns count from 0, values
/// from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placement {
    /// Value placed, in `1..=N`.
    pub value: usize,
    /// 0-based row.
    pub row: usize,
    /// 0-based column.
    pub col: usize,
}

impl Placement {
    /// Value `value` at (`row`, `col`).
    #[must_use]
    pub const fn new(value: usize, row: usize, col: usize) -> Self {
        Self { value, row, col }
    }

    /// DIMACS variable id, `row·N² + col·N + (value − 1) + 1`.
    ///
    /// Ids of one board are dense in `1..=N³`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn encode(&self, size: Size) -> u32 {
        let n = size.n();
        // N is capped so that N³ fits into an i32
        (self.row * n * n + self.col * n + (self.value - 1) + 1) as u32
    }

    /// Inverse of [`Placement::encode`]. `None` for ids outside `1..=N³`.
    #[must_use]
    pub const fn decode(id: u32, size: Size) -> Option<Self> {
        let n = size.n();
        let id = id as usize;
        if id == 0 || id > n * n * n {
            return None;
        }

        let index = id - 1;
        Some(Self {
            value: index % n + 1,
            row: index / (n * n),
            col: (index / n) % n,
        })
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@({},{})", self.value, self.row, self.col)
    }
}

/// Pairwise at-most-one clauses over `placements`, then the at-least-one clause.
fn exactly_one(placements: &[Placement]) -> impl Iterator<Item = Clause<Placement>> + '_ {
    placements
        .iter()
        .tuple_combinations()
        .map(|(&a, &b)| Clause::new(vec![Literal::negative(a), Literal::negative(b)]))
        .chain(std::iter::once(
            placements
                .iter()
                .copied()
                .map(Literal::positive)
                .collect::<Clause<Placement>>(),
        ))
}

fn generate_pre_filled_clauses(board: &Board) -> Vec<Clause<Placement>> {
    board
        .givens()
        .map(|(row, col, value)| Clause::new(vec![Literal::positive(Placement::new(value, row, col))]))
        .collect()
}

fn generate_row_clauses(n: usize) -> Vec<Clause<Placement>> {
    let mut clauses = Vec::new();
    for value in 1..=n {
        for row in 0..n {
            let placements = (0..n).map(|col| Placement::new(value, row, col)).collect_vec();
            clauses.extend(exactly_one(&placements));
        }
    }
    clauses
}

fn generate_col_clauses(n: usize) -> Vec<Clause<Placement>> {
    let mut clauses = Vec::new();
    for value in 1..=n {
        for col in 0..n {
            let placements = (0..n).map(|row| Placement::new(value, row, col)).collect_vec();
            clauses.extend(exactly_one(&placements));
        }
    }
    clauses
}

/// Every distinct pair of cells in a sub-block is constrained, including the
/// pairs that already share a row or column.
fn generate_block_clauses(n: usize, block_size: usize) -> Vec<Clause<Placement>> {
    let mut clauses = Vec::new();
    for value in 1..=n {
        for top in (0..n).step_by(block_size) {
            for left in (0..n).step_by(block_size) {
                let placements = (top..top + block_size)
                    .cartesian_product(left..left + block_size)
                    .map(|(row, col)| Placement::new(value, row, col))
                    .collect_vec();
                clauses.extend(exactly_one(&placements));
            }
        }
    }
    clauses
}

fn generate_cell_clauses(n: usize) -> Vec<Clause<Placement>> {
    let mut clauses = Vec::new();
    for row in 0..n {
        for col in 0..n {
            let placements = (1..=n).map(|value| Placement::new(value, row, col)).collect_vec();
            clauses.extend(exactly_one(&placements));
        }
    }
    clauses
}

/// Encodes `board` as a formula whose models are exactly its valid completions.
///
/// Clauses come in this order: the filled cells as unit clauses (row-major),
/// then the row, column, sub-block and cell constraints. A board with `k`
/// filled cells yields `4·N²·(N(N−1)/2 + 1) + k` clauses.
#[must_use]
pub fn encode(board: &Board) -> Cnf<Placement> {
    let size = board.size();
    let n = size.n();

    let clauses = generate_pre_filled_clauses(board)
        .into_iter()
        .chain(generate_row_clauses(n))
        .chain(generate_col_clauses(n))
        .chain(generate_block_clauses(n, size.block_size()))
        .chain(generate_cell_clauses(n))
        .collect_vec();

    debug!("encoded {size} board into {} clauses", clauses.len());

    Cnf::new(clauses)
}

/// Turns a model back into a board.
///
/// `None` (unsatisfiable) stays `None`. Otherwise every placement assigned
/// `true` is written to an empty board of `size`; `false` entries are ignored.
#[must_use]
pub fn decode(assignment: Option<&Assignment<Placement>>, size: Size) -> Option<Board> {
    let assignment = assignment?;
    let n = size.n();
    let mut cells = vec![vec![0; n]; n];

    for placement in assignment.true_variables() {
        if placement.row >= n || placement.col >= n || !(1..=n).contains(&placement.value) {
            warn!("ignoring placement {placement} outside a {size} board");
            continue;
        }
        cells[placement.row][placement.col] = placement.value;
    }

    Some(Board::from_grid(cells, size))
}

/// A puzzle ready to be encoded and solved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sudoku {
    /// The puzzle, 0 for empty cells.
    pub board: Board,
    /// Dimension of `board`.
    pub size: Size,
}

impl Sudoku {
    /// Wraps a validated board.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        let size = board.size();
        Self { board, size }
    }

    /// The formula over [`Placement`] variables, see [`encode`].
    #[must_use]
    pub fn to_cnf(&self) -> Cnf<Placement> {
        encode(&self.board)
    }

    /// The formula over DIMACS ids, see [`Placement::encode`].
    #[must_use]
    pub fn to_dimacs_cnf(&self) -> Cnf<u32> {
        self.to_cnf().map_variables(|p| p.encode(self.size))
    }

    /// Decodes a model of [`Sudoku::to_cnf`].
    #[must_use]
    pub fn decode(&self, assignment: Option<&Assignment<Placement>>) -> Option<Board> {
        decode(assignment, self.size)
    }

    /// Decodes a model of [`Sudoku::to_dimacs_cnf`].
    #[must_use]
    pub fn decode_dimacs(&self, assignment: Option<&Assignment<u32>>) -> Option<Board> {
        let placements: Assignment<Placement> = assignment?
            .iter()
            .filter_map(|(&id, value)| Placement::decode(id, self.size).map(|p| (p, value)))
            .collect();
        self.decode(Some(&placements))
    }

    /// Encodes, solves and decodes. `None` if the puzzle has no completion.
    #[must_use]
    pub fn solve(&self) -> Option<Board> {
        let model = solve(&self.to_cnf());
        self.decode(model.as_ref())
    }
}

impl From<Board> for Sudoku {
    fn from(board: Board) -> Self {
        Self::new(board)
    }
}

impl From<Sudoku> for Board {
    fn from(sudoku: Sudoku) -> Self {
        sudoku.board
    }
}

impl Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

/// Reads a puzzle file in the text form accepted by [`Board::parse`].
///
/// # Errors
///
/// Fails if the file cannot be read or does not hold a valid board.
pub fn parse_sudoku_file(path: impl AsRef<Path>) -> Result<Sudoku, BoardError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Sudoku::new(text.parse()?))
}
