#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A parser and writer for the DIMACS CNF file format.
//!
//! The format is line based:
//! - Comment lines start with `c`.
//! - The problem line `p cnf <num_variables> <num_clauses>` announces the
//!   formula's size. The counts are checked against the clauses actually read
//!   and a mismatch is logged, not rejected.
//! - Every other line holds literals as signed integers, terminated by `0`. A
//!   line that holds only `0` is the empty clause.
//! - A `%` line marks the end of data (some benchmark sets append junk after it).

use crate::sat::cnf::Cnf;
use itertools::Itertools;
use log::warn;
use std::fmt::Write as _;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading DIMACS input.
#[derive(Debug, Error)]
pub enum DimacsError {
    /// Reading from the underlying reader failed.
    #[error("I/O error while reading DIMACS input")]
    Io(#[from] io::Error),

    /// The input file could not be opened.
    #[error("Failed to open DIMACS file '{}'", .path.display())]
    Open {
        /// The file that was requested.
        path: PathBuf,
        /// The error returned by the OS.
        source: io::Error,
    },

    /// A token is not a literal.
    #[error("Line {line}: failed to parse literal '{token}'")]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },

    /// A `p` line that is not `p cnf <int> <int>`.
    #[error("Line {line}: malformed problem line '{content}', expected 'p cnf <variables> <clauses>'")]
    InvalidProblemLine {
        /// 1-based line number.
        line: usize,
        /// The whole line.
        content: String,
    },
}

/// Parses DIMACS formatted data from `reader`.
///
/// Literals of a clause may span several lines; a clause ends at each `0`.
/// Trailing literals without a terminating `0` form a final clause.
///
/// # Errors
///
/// Fails on read errors, on tokens that are not integers in `-i32::MAX..=i32::MAX`,
/// and on a problem line that is not `p cnf <int> <int>`.
pub fn parse_dimacs<R: BufRead>(reader: R) -> Result<Cnf<u32>, DimacsError> {
    let mut cnf = Cnf::default();
    let mut header: Option<(usize, usize)> = None;
    let mut pending: Vec<i32> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let mut parts = line.split_whitespace().peekable();

        match parts.peek() {
            Some(&"%") => break,
            None | Some(&"c") => {}
            Some(token) if token.starts_with('c') => {}
            Some(&"p") => header = Some(parse_problem_line(&line, line_no)?),
            Some(_) => {
                for token in parts {
                    // i32::MIN has no positive counterpart to name a variable
                    let literal = token
                        .parse::<i32>()
                        .ok()
                        .filter(|&literal| literal != i32::MIN)
                        .ok_or_else(|| DimacsError::InvalidLiteral {
                            line: line_no,
                            token: token.to_string(),
                        })?;

                    if literal == 0 {
                        cnf.add_clause(std::mem::take(&mut pending));
                    } else {
                        pending.push(literal);
                    }
                }
            }
        }
    }

    if !pending.is_empty() {
        cnf.add_clause(pending);
    }

    if let Some((num_vars, num_clauses)) = header {
        if num_clauses != cnf.len() {
            warn!(
                "problem line declares {num_clauses} clauses but {} were read",
                cnf.len()
            );
        }
        let max_var = cnf.variables().into_iter().max().unwrap_or(0) as usize;
        if max_var > num_vars {
            warn!("problem line declares {num_vars} variables but variable {max_var} is used");
        }
    }

    Ok(cnf)
}

fn parse_problem_line(line: &str, line_no: usize) -> Result<(usize, usize), DimacsError> {
    let invalid = || DimacsError::InvalidProblemLine {
        line: line_no,
        content: line.to_string(),
    };

    match line.split_whitespace().collect_vec().as_slice() {
        ["p", "cnf", vars, clauses] => Ok((
            vars.parse().map_err(|_| invalid())?,
            clauses.parse().map_err(|_| invalid())?,
        )),
        _ => Err(invalid()),
    }
}

/// Parses a DIMACS CNF file.
///
/// # Errors
///
/// See [`parse_dimacs`]; additionally fails if the file cannot be opened.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Cnf<u32>, DimacsError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DimacsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dimacs(io::BufReader::new(file))
}

/// Renders `cnf` as DIMACS text with a `p cnf` header.
#[must_use]
pub fn to_dimacs(cnf: &Cnf<u32>) -> String {
    let num_vars = cnf.variables().into_iter().max().unwrap_or(0);
    let mut out = format!("p cnf {num_vars} {}\n", cnf.len());

    for clause in cnf.iter() {
        let literals = Vec::<i32>::from(clause);
        if literals.is_empty() {
            out.push_str("0\n");
        } else {
            // writing to a String cannot fail
            let _ = writeln!(out, "{} 0", literals.iter().join(" "));
        }
    }

    out
}

/// Parses whitespace separated clauses given inline, e.g. `"1 -2 0\n2 3 0"`.
///
/// # Errors
///
/// Same as [`parse_dimacs`].
pub fn parse_text(input: &str) -> Result<Cnf<u32>, DimacsError> {
    parse_dimacs(io::Cursor::new(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause::Clause;
    use crate::sat::literal::Literal;
    use std::io::Cursor;

    fn clauses(cnf: &Cnf<u32>) -> Vec<Vec<i32>> {
        cnf.iter().map(Vec::<i32>::from).collect()
    }

    #[test]
    fn test_parse_simple_dimacs() {
        let dimacs_content = "c This is a comment\n\
                              p cnf 3 2\n\
                              1 -2 0\n\
                              2 3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(clauses(&cnf), vec![vec![1, -2], vec![2, 3]]);
        assert_eq!(cnf.num_vars(), 3);
        assert_eq!(cnf.clauses()[0][1], Literal::negative(2));
    }

    #[test]
    fn test_parse_dimacs_with_empty_lines_and_end_marker() {
        let dimacs_content = "p cnf 2 2\n\
                              \n\
                              1 0\n\
                              \n\
                              -2 0\n\
                              %\n\
                              c this should be ignored\n\
                              3 0\n";
        let cnf = parse_dimacs(Cursor::new(dimacs_content)).unwrap();

        assert_eq!(clauses(&cnf), vec![vec![1], vec![-2]]);
    }

    #[test]
    fn test_parse_dimacs_empty_clause() {
        let cnf = parse_text("p cnf 1 1\n0\n").unwrap();
        assert_eq!(cnf.len(), 1);
        assert!(cnf.has_empty_clause());
    }

    #[test]
    fn test_parse_dimacs_clause_across_lines() {
        let cnf = parse_text("1 2\n-3 0 4 0\n5").unwrap();
        assert_eq!(clauses(&cnf), vec![vec![1, 2, -3], vec![4], vec![5]]);
    }

    #[test]
    fn test_parse_dimacs_malformed_literal() {
        let err = parse_text("1 0\n1 abc 0\n").unwrap_err();
        assert!(matches!(
            err,
            DimacsError::InvalidLiteral { line: 2, ref token } if token == "abc"
        ));
    }

    #[test]
    fn test_parse_dimacs_literal_out_of_range() {
        let err = parse_text("1 0\n-2147483648 0\n").unwrap_err();
        assert!(matches!(
            err,
            DimacsError::InvalidLiteral { line: 2, ref token } if token == "-2147483648"
        ));
        assert!(matches!(
            parse_text("2147483648 0\n"),
            Err(DimacsError::InvalidLiteral { line: 1, .. })
        ));

        let widest = parse_text("-2147483647 2147483647 0\n").unwrap();
        assert_eq!(to_dimacs(&widest), "p cnf 2147483647 1\n-2147483647 2147483647 0\n");
    }

    #[test]
    fn test_parse_dimacs_malformed_problem_line() {
        let err = parse_text("p dnf 1 1\n1 0\n").unwrap_err();
        assert!(matches!(err, DimacsError::InvalidProblemLine { line: 1, .. }));
    }

    #[test]
    fn test_parse_dimacs_no_clauses() {
        let cnf = parse_text("p cnf 0 0\n").unwrap();
        assert!(cnf.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file("does/not/exist.cnf").unwrap_err();
        assert!(matches!(err, DimacsError::Open { .. }));
    }

    #[test]
    fn test_to_dimacs_parses_back() {
        let mut cnf = Cnf::default();
        cnf.add_clause(Clause::from(vec![1i32, -4]));
        cnf.add_clause(Clause::<u32>::empty());
        cnf.add_clause(Clause::from(vec![2i32]));

        let text = to_dimacs(&cnf);
        assert_eq!(text, "p cnf 4 3\n1 -4 0\n0\n2 0\n");
        assert_eq!(parse_text(&text).unwrap(), cnf);
    }
}
