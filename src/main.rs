//! # sat-sudoku
//!
//! A command-line front end for the backtracking SAT solver in `sat_sudoku`.
//! It solves CNF problems in DIMACS format, CNF given as plain text, and
//! sudoku puzzles of any perfect-square size by encoding them as CNF.
//!
//! ## Usage
//!
//! ```sh
//! sat-sudoku [OPTIONS] [PATH] [SUBCOMMAND]
//! ```
//!
//! `PATH` alone may be a `.cnf` file, a `.sudoku` file or a directory, in
//! which case every `.cnf` and `.sudoku` file below it is solved.
//!
//! ### Subcommands
//!
//! 1.  **`file`**: Solve a CNF file in DIMACS format.
//!     ```sh
//!     sat-sudoku file --path <path_to_cnf_file> [OPTIONS]
//!     ```
//!
//! 2.  **`text`**: Solve a CNF formula provided as plain text.
//!     ```sh
//!     sat-sudoku text --input "1 -2 0\n2 3 0" [OPTIONS]
//!     ```
//!
//! 3.  **`sudoku`**: Solve a sudoku puzzle, optionally writing the generated
//!     formula to `<path>.cnf`.
//!     ```sh
//!     sat-sudoku sudoku --path <path_to_sudoku_file> --export-dimacs [OPTIONS]
//!     ```
//!
//! 4.  **`completions`**: Print a shell completion script.
//!
//! ### Common Options
//!
//! -   `-d, --debug`: Log at debug level unless `RUST_LOG` says otherwise.
//! -   `-v, --verify`: Check the model against the formula.
//! -   `-s, --stats`: Print problem and search statistics.
//! -   `-p, --print-solution`: Print the satisfying assignment.

use clap::Parser;
use std::process::ExitCode;

mod command_line;

use command_line::cli::{Cli, run};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
