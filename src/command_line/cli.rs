#![allow(clippy::cast_precision_loss)]

use clap::{Args, CommandFactory, Parser, Subcommand};
use itertools::Itertools;
use log::{debug, info};
use pretty_env_logger::formatted_builder;
use sat_sudoku::sat::assignment::Assignment;
use sat_sudoku::sat::cnf::Cnf;
use sat_sudoku::sat::dimacs::{self, DimacsError};
use sat_sudoku::sat::dpll::Dpll;
use sat_sudoku::sat::literal::Variable;
use sat_sudoku::sat::solver::{SolutionStats, Solver};
use sat_sudoku::sudoku::board::BoardError;
use sat_sudoku::sudoku::solver::parse_sudoku_file;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tikv_jemalloc_ctl::{epoch, stats};

/// Defines the command-line interface for the sat-sudoku application.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(
    name = "sat-sudoku",
    version,
    about = "A backtracking SAT solver with a sudoku front end"
)]
pub(crate) struct Cli {
    /// A `.cnf` file, a `.sudoku` file or a directory holding either, solved
    /// when no subcommand is given.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `sudoku`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Solve a CNF file in DIMACS format.
    File {
        /// Path to the DIMACS .cnf file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a CNF formula provided as plain text.
    Text {
        /// Literal CNF input as a string (e.g. "1 -2 0\n2 3 0").
        /// Literals are space-separated and 0 terminates a clause. A literal `\n` counts as a line break.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a Sudoku puzzle.
    /// The puzzle is converted into a CNF formula, which is then solved.
    Sudoku {
        /// Path to the Sudoku file, one row per line, `0` or `.` for empty cells.
        #[arg(long)]
        path: PathBuf,

        /// Write the DIMACS form of the generated formula next to the puzzle as `<path>.cnf`.
        #[arg(short, long, default_value_t = false)]
        export_dimacs: bool,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct CommonOptions {
    /// Enable debug output. `RUST_LOG` takes precedence when set.
    #[arg(short, long, default_value_t = false)]
    pub(crate) debug: bool,

    /// Check the found model against the formula, and a decoded sudoku against its rules.
    #[arg(short, long, default_value_t = false)]
    pub(crate) verify: bool,

    /// Print problem and search statistics after solving.
    #[arg(short, long, default_value_t = false)]
    pub(crate) stats: bool,

    /// Print the satisfying assignment if the formula is satisfiable.
    #[arg(short, long, default_value_t = false)]
    pub(crate) print_solution: bool,
}

impl CommonOptions {
    /// Options set either before or after the subcommand name.
    #[must_use]
    pub(crate) const fn or(self, other: Self) -> Self {
        Self {
            debug: self.debug || other.debug,
            verify: self.verify || other.verify,
            stats: self.stats || other.stats,
            print_solution: self.print_solution || other.print_solution,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Dimacs(#[from] DimacsError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("Failed to write '{}'", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to walk directory")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to read jemalloc statistics: {0}")]
    Memory(tikv_jemalloc_ctl::Error),

    #[error("Model for '{label}' does not satisfy the formula")]
    VerificationFailed { label: String },

    #[error("Decoded board for '{}' breaks the sudoku rules", .path.display())]
    InvalidSudoku { path: PathBuf },

    #[error("No input given. Use --help for more information.")]
    MissingInput,
}

/// Sets up `pretty_env_logger`. `RUST_LOG` wins; otherwise the crate logs at
/// `warn`, or `debug` with `--debug`.
pub(crate) fn init_logging(debug: bool) {
    let mut builder = formatted_builder();

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    } else if debug {
        builder.parse_filters("sat_sudoku=debug");
    } else {
        builder.parse_filters("sat_sudoku=warn");
    }

    // a logger may already be installed, e.g. under test
    let _ = builder.try_init();
}

/// Dispatches a parsed command line.
///
/// # Errors
///
/// Any parse, I/O or verification failure of the selected command.
pub(crate) fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        None => {
            let path = cli.path.ok_or(CliError::MissingInput)?;
            init_logging(cli.common.debug);
            solve_path(&path, &cli.common)
        }
        Some(Commands::File { path, common }) => {
            let common = cli.common.or(common);
            init_logging(common.debug);
            solve_cnf_file(&path, &common)
        }
        Some(Commands::Text { input, common }) => {
            let common = cli.common.or(common);
            init_logging(common.debug);

            let time = Instant::now();
            let cnf = parse_text_input(&input)?;
            let elapsed = time.elapsed();

            solve_and_report(&cnf, &common, None, elapsed)
        }
        Some(Commands::Sudoku {
            path,
            export_dimacs,
            common,
        }) => {
            let common = cli.common.or(common);
            init_logging(common.debug);
            solve_sudoku(&path, export_dimacs, &common)
        }
        Some(Commands::Completions { shell }) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Parses the `text` subcommand's input, turning escaped `\n` into line breaks.
pub(crate) fn parse_text_input(input: &str) -> Result<Cnf<u32>, DimacsError> {
    dimacs::parse_text(&input.replace("\\n", "\n"))
}

fn solve_path(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    if path.is_dir() {
        return solve_dir(path, common);
    }

    if path.extension().is_some_and(|ext| ext == "sudoku") {
        solve_sudoku(path, false, common)
    } else {
        solve_cnf_file(path, common)
    }
}

fn solve_cnf_file(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    let time = Instant::now();
    let cnf = dimacs::parse_file(path)?;
    let elapsed = time.elapsed();

    solve_and_report(&cnf, common, Some(path), elapsed)
}

/// Solves every `.cnf` and `.sudoku` file below `path`, in file name order.
///
/// # Errors
///
/// Stops at the first file that fails to parse or verify.
pub(crate) fn solve_dir(path: &Path, common: &CommonOptions) -> Result<(), CliError> {
    for entry in walkdir::WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let file_path = entry.path();

        if !entry.file_type().is_file() {
            continue;
        }

        match file_path.extension().and_then(|ext| ext.to_str()) {
            Some("sudoku") => solve_sudoku(file_path, false, common)?,
            Some("cnf") => solve_cnf_file(file_path, common)?,
            _ => info!("skipping {}", file_path.display()),
        }
    }

    Ok(())
}

/// Runs the solver on `cnf`, timing the search.
pub(crate) fn solve<V: Variable + Display>(
    cnf: &Cnf<V>,
    label: Option<&Path>,
) -> (Option<Assignment<V>>, Duration, SolutionStats) {
    if let Some(name) = label {
        println!("Solving: {}", name.display());
    }

    debug!("CNF: {cnf}");
    debug!("Variables: {}", cnf.num_vars());
    debug!("Clauses: {}", cnf.len());
    debug!("Literals: {}", cnf.num_literals());

    let time = Instant::now();

    let mut solver = Dpll::new(cnf.clone());
    let sol = solver.solve();

    let elapsed = time.elapsed();
    debug!("Time: {elapsed:?}");

    (sol, elapsed, solver.stats())
}

/// Checks `sol` against `cnf` and prints the outcome.
///
/// # Errors
///
/// If the model leaves a clause unsatisfied.
pub(crate) fn verify_solution<V: Variable>(
    cnf: &Cnf<V>,
    sol: Option<&Assignment<V>>,
    label: Option<&Path>,
) -> Result<(), CliError> {
    let Some(sol) = sol else {
        println!("UNSAT");
        return Ok(());
    };

    let ok = cnf.verify(sol);
    println!("Verified: {ok:?}");

    if ok {
        Ok(())
    } else {
        Err(CliError::VerificationFailed {
            label: label.map_or_else(|| "<text>".to_string(), |p| p.display().to_string()),
        })
    }
}

/// Solves a DIMACS formula and reports the results.
///
/// # Errors
///
/// See [`verify_solution`] and [`memory_usage`].
pub(crate) fn solve_and_report(
    cnf: &Cnf<u32>,
    common: &CommonOptions,
    label: Option<&Path>,
    parse_time: Duration,
) -> Result<(), CliError> {
    let (sol, elapsed, solver_stats) = solve(cnf, label);

    if common.verify {
        verify_solution(cnf, sol.as_ref(), label)?;
    }

    if common.stats {
        print_stats(parse_time, elapsed, cnf, &solver_stats, memory_usage()?);
    }

    if let Some(model) = sol.as_ref().filter(|_| common.print_solution) {
        println!("Solution: {model}");
    }

    print_result(sol.is_some());
    Ok(())
}

/// Solve a sudoku file.
///
/// # Errors
///
/// If the file cannot be read or parsed, the DIMACS export cannot be written,
/// or verification fails.
pub(crate) fn solve_sudoku(
    path: &Path,
    export_dimacs: bool,
    common: &CommonOptions,
) -> Result<(), CliError> {
    let time = Instant::now();
    let sudoku = parse_sudoku_file(path)?;
    println!("Parsed Sudoku:\n{sudoku}");

    let cnf = sudoku.to_cnf();

    if export_dimacs {
        let dimacs = dimacs::to_dimacs(&sudoku.to_dimacs_cnf());
        let dimacs_path = PathBuf::from(format!("{}.cnf", path.display()));

        std::fs::write(&dimacs_path, dimacs).map_err(|source| CliError::Write {
            path: dimacs_path.clone(),
            source,
        })?;
        println!("DIMACS written to: {}", dimacs_path.display());
    }

    let parse_time = time.elapsed();
    let (sol, elapsed, solver_stats) = solve(&cnf, Some(path));

    if common.verify {
        verify_solution(&cnf, sol.as_ref(), Some(path))?;
    }

    if common.stats {
        print_stats(parse_time, elapsed, &cnf, &solver_stats, memory_usage()?);
    }

    if let Some(model) = sol.as_ref().filter(|_| common.print_solution) {
        println!("Placements: {}", model.true_variables().join(" "));
    }

    match sudoku.decode(sol.as_ref()) {
        Some(board) => {
            if common.verify && !(board.is_solved() && board.is_consistent_with(&sudoku.board)) {
                return Err(CliError::InvalidSudoku {
                    path: path.to_path_buf(),
                });
            }
            println!("Solution:\n{board}");
        }
        None => println!("No solution found"),
    }

    print_result(sol.is_some());
    Ok(())
}

/// Allocated and resident memory in MiB.
///
/// # Errors
///
/// If jemalloc statistics cannot be read.
pub(crate) fn memory_usage() -> Result<(f64, f64), CliError> {
    epoch::advance().map_err(CliError::Memory)?;

    let allocated = stats::allocated::read().map_err(CliError::Memory)?;
    let resident = stats::resident::read().map_err(CliError::Memory)?;

    Ok((
        allocated as f64 / (1024.0 * 1024.0),
        resident as f64 / (1024.0 * 1024.0),
    ))
}

/// Helper function to print a single statistic line in a formatted table row.
pub(crate) fn stat_line(label: &str, value: impl Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
pub(crate) fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
pub(crate) fn print_stats<V: Variable>(
    parse_time: Duration,
    elapsed: Duration,
    cnf: &Cnf<V>,
    s: &SolutionStats,
    (allocated, resident): (f64, f64),
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]=========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Variables", cnf.num_vars());
    stat_line("Clauses", cnf.len());
    stat_line("Literals", cnf.num_literals());

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Conflicts", s.conflicts, elapsed_secs);
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Propagations", s.propagations, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

fn print_result(satisfiable: bool) {
    if satisfiable {
        println!("\nSATISFIABLE");
    } else {
        println!("\nUNSATISFIABLE");
    }
}
