#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Validated sudoku boards and their text form.
//!
//! A board is an N×N grid where N is a perfect square. Cells hold values in
//! `1..=N`, or `0` when empty. Everything that builds a `Board` goes through
//! [`Board::new`], so code downstream of it never re-checks dimensions.

use itertools::Itertools;
use std::fmt::{self, Display};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Largest supported dimension. Placements of a 1024×1024 board still fit
/// into positive `i32` DIMACS ids.
pub const MAX_DIMENSION: usize = 1024;

/// Reasons a board is rejected.
#[derive(Debug, Error)]
pub enum BoardError {
    /// There are no rows.
    #[error("Board has no cells")]
    Empty,

    /// The number of rows has no integer square root.
    #[error("Board dimension {size} is not a perfect square")]
    NotSquareDimension {
        /// Number of rows.
        size: usize,
    },

    /// The board is larger than [`MAX_DIMENSION`].
    #[error("Board dimension {size} exceeds the supported maximum of {max}")]
    TooLarge {
        /// Number of rows.
        size: usize,
        /// Always [`MAX_DIMENSION`].
        max: usize,
    },

    /// A row's length differs from the number of rows.
    #[error("Row {row} has {len} cells, expected {expected}")]
    RaggedRow {
        /// 0-based row index.
        row: usize,
        /// Cells found in the row.
        len: usize,
        /// Cells required, N.
        expected: usize,
    },

    /// A cell holds a value above N.
    #[error("Cell ({row}, {col}) holds {value}, expected 0..={max}")]
    ValueOutOfRange {
        /// 0-based row index.
        row: usize,
        /// 0-based column index.
        col: usize,
        /// The value found.
        value: usize,
        /// Largest allowed value, N.
        max: usize,
    },

    /// A token in the text form is not a cell.
    #[error("Line {line}: invalid cell '{token}'")]
    InvalidToken {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A sudoku file could not be read.
    #[error("Failed to read sudoku file '{}'", .path.display())]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// The error returned by the OS.
        source: io::Error,
    },
}

/// Dimension of a board together with its sub-block side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Size {
    n: usize,
    block: usize,
}

impl Size {
    /// Side length of the board.
    #[must_use]
    pub const fn n(self) -> usize {
        self.n
    }

    /// Side length of a sub-block, `√N`.
    #[must_use]
    pub const fn block_size(self) -> usize {
        self.block
    }

    /// Number of cells on the board.
    #[must_use]
    pub const fn cells(self) -> usize {
        self.n * self.n
    }
}

impl TryFrom<usize> for Size {
    type Error = BoardError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        if n == 0 {
            return Err(BoardError::Empty);
        }
        if n > MAX_DIMENSION {
            return Err(BoardError::TooLarge {
                size: n,
                max: MAX_DIMENSION,
            });
        }

        let block = n.isqrt();
        if block * block != n {
            return Err(BoardError::NotSquareDimension { size: n });
        }

        Ok(Self { n, block })
    }
}

impl From<Size> for usize {
    fn from(size: Size) -> Self {
        size.n
    }
}

impl Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{n}x{n}", n = self.n)
    }
}

/// An N×N grid of values in `0..=N`, 0 marking an empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: Vec<Vec<usize>>,
    size: Size,
}

impl Board {
    /// Validates `rows` and builds a board from them.
    ///
    /// # Errors
    ///
    /// Fails if there are no rows, if the dimension is not a perfect square,
    /// if a row's length differs from the number of rows, or if a cell holds a
    /// value above N.
    pub fn new(rows: Vec<Vec<usize>>) -> Result<Self, BoardError> {
        let size = Size::try_from(rows.len())?;
        let n = size.n();

        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != n {
                return Err(BoardError::RaggedRow {
                    row,
                    len: cells.len(),
                    expected: n,
                });
            }
            if let Some((col, &value)) = cells.iter().find_position(|&&value| value > n) {
                return Err(BoardError::ValueOutOfRange {
                    row,
                    col,
                    value,
                    max: n,
                });
            }
        }

        Ok(Self { cells: rows, size })
    }

    /// An empty board of the given size.
    #[must_use]
    pub fn empty(size: Size) -> Self {
        Self::from_grid(vec![vec![0; size.n()]; size.n()], size)
    }

    /// Wraps a grid already known to match `size`.
    pub(crate) fn from_grid(cells: Vec<Vec<usize>>, size: Size) -> Self {
        Self { cells, size }
    }

    /// Parses the text form of a board. See [`FromStr`] for the accepted syntax.
    ///
    /// # Errors
    ///
    /// Fails on unknown tokens and on anything [`Board::new`] rejects.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        text.parse()
    }

    /// Dimension of the board.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Value at `(row, col)`, 0 if the cell is empty.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the board.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> usize {
        self.cells[row][col]
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Filled cells as `(row, col, value)`, row-major.
    pub fn givens(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|&(_, &value)| value != 0)
                .map(move |(col, &value)| (row, col, value))
        })
    }

    /// Number of filled cells.
    #[must_use]
    pub fn num_givens(&self) -> usize {
        self.givens().count()
    }

    /// True when every cell is filled and no row, column or sub-block repeats
    /// a value.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let n = self.size.n();
        let b = self.size.block_size();

        let complete = self.rows().flatten().all(|&value| value != 0);
        let rows = (0..n).all(|r| (0..n).map(|c| self.cells[r][c]).all_unique());
        let cols = (0..n).all(|c| (0..n).map(|r| self.cells[r][c]).all_unique());
        let blocks = (0..n).all(|block| {
            let (top, left) = ((block / b) * b, (block % b) * b);
            (top..top + b)
                .cartesian_product(left..left + b)
                .map(|(r, c)| self.cells[r][c])
                .all_unique()
        });

        complete && rows && cols && blocks
    }

    /// True when `self` keeps every value filled in on `puzzle`.
    #[must_use]
    pub fn is_consistent_with(&self, puzzle: &Self) -> bool {
        self.size == puzzle.size
            && puzzle
                .givens()
                .all(|(row, col, value)| self.cells[row][col] == value)
    }
}

impl TryFrom<Vec<Vec<usize>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<usize>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl<const N: usize> TryFrom<[[usize; N]; N]> for Board {
    type Error = BoardError;

    fn try_from(rows: [[usize; N]; N]) -> Result<Self, Self::Error> {
        Self::new(rows.iter().map(|row| row.to_vec()).collect())
    }
}

impl From<Board> for Vec<Vec<usize>> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

/// Reads a board from text.
///
/// One row per line. Cells are separated by whitespace or commas; `0`, `.`
/// and `_` mark an empty cell. A line holding a single token of several
/// characters is read one character per cell, so `53..7....` works for boards
/// up to 9×9. Blank lines, lines starting with `#` or `c`, `|` tokens and
/// `-+` separator lines are skipped, which lets the output of `Display` be
/// read back.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut rows = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = line.trim();

            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with('c')
                || line.chars().all(|ch| ch == '-' || ch == '+')
            {
                continue;
            }

            let tokens = line
                .split(|ch: char| ch.is_whitespace() || ch == ',')
                .filter(|token| !token.is_empty() && *token != "|")
                .collect_vec();

            let row = match tokens.as_slice() {
                [compact] if compact.chars().count() > 1 => compact
                    .chars()
                    .map(|ch| parse_compact_cell(ch, line_no))
                    .collect::<Result<Vec<_>, _>>()?,
                _ => tokens
                    .iter()
                    .map(|token| parse_cell(token, line_no))
                    .collect::<Result<Vec<_>, _>>()?,
            };

            rows.push(row);
        }

        Self::new(rows)
    }
}

fn parse_cell(token: &str, line: usize) -> Result<usize, BoardError> {
    match token {
        "." | "_" => Ok(0),
        _ => token.parse().map_err(|_| BoardError::InvalidToken {
            line,
            token: token.to_string(),
        }),
    }
}

fn parse_compact_cell(ch: char, line: usize) -> Result<usize, BoardError> {
    match ch {
        '.' | '_' => Ok(0),
        _ => ch
            .to_digit(10)
            .map(|digit| digit as usize)
            .ok_or_else(|| BoardError::InvalidToken {
                line,
                token: ch.to_string(),
            }),
    }
}

/// Rows on separate lines, sub-blocks split by `|` and `-+-` rules, empty
/// cells as `.`.
impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.size.block_size();
        let width = self.size.n().to_string().len();

        let lines = self
            .cells
            .iter()
            .map(|row| {
                row.chunks(b)
                    .map(|block| {
                        block
                            .iter()
                            .map(|&value| match value {
                                0 => format!("{:>width$}", "."),
                                _ => format!("{value:>width$}"),
                            })
                            .join(" ")
                    })
                    .join(" | ")
            })
            .collect_vec();

        for (index, line) in lines.iter().enumerate() {
            if index > 0 && index % b == 0 {
                let rule: String = line
                    .chars()
                    .map(|ch| if ch == '|' { '+' } else { '-' })
                    .collect();
                writeln!(f, "{rule}")?;
            }
            writeln!(f, "{line}")?;
        }

        Ok(())
    }
}
