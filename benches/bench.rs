use criterion::{Criterion, criterion_group, criterion_main};
use sat_sudoku::sat::clause::Clause;
use sat_sudoku::sat::cnf::Cnf;
use sat_sudoku::sat::dpll::Dpll;
use sat_sudoku::sat::literal::Literal;
use sat_sudoku::sat::solver::Solver;
use sat_sudoku::sudoku::{Board, EXAMPLE_FOUR, EXAMPLE_NINE, Sudoku, encode};
use std::hint::black_box;
use std::time::Duration;

/// Uniform random 3-SAT in the shape of the uf20-91 benchmark set.
fn random_3sat(rng: &mut fastrand::Rng, num_vars: u32, num_clauses: usize) -> Cnf<u32> {
    (0..num_clauses)
        .map(|_| {
            (0..3)
                .map(|_| Literal::new(rng.u32(1..=num_vars), rng.bool()))
                .collect::<Clause<u32>>()
        })
        .collect()
}

fn bench_sudoku(c: &mut Criterion) {
    let four = Board::try_from(EXAMPLE_FOUR).unwrap();
    let nine = Board::try_from(EXAMPLE_NINE).unwrap();
    let cnf = encode(&nine);

    c.bench_function("sudoku - encode 9x9", |b| {
        b.iter(|| black_box(encode(black_box(&nine))));
    });

    c.bench_function("sudoku - solve 4x4", |b| {
        let sudoku = Sudoku::new(four.clone());
        b.iter(|| black_box(sudoku.solve()));
    });

    c.bench_function("sudoku - solve 9x9 formula", |b| {
        b.iter(|| {
            let mut state = Dpll::new(cnf.clone());
            black_box(state.solve())
        });
    });
}

fn bench_3sat(c: &mut Criterion) {
    let mut rng = fastrand::Rng::with_seed(91);
    let cnfs = (0..100).map(|_| random_3sat(&mut rng, 20, 91)).collect::<Vec<_>>();

    let mut group = c.benchmark_group("3sat");
    group.sample_size(50);
    group.measurement_time(Duration::from_secs(10));

    group.bench_function("uf20-91 shaped", |b| {
        b.iter(|| {
            for cnf in &cnfs {
                let mut state = Dpll::new(cnf.clone());
                black_box(state.solve());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_sudoku, bench_3sat);

criterion_main!(benches);
