use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use roster_balance::buckets::partition;
use roster_balance::evaluate::evaluate_assignment;
use roster_balance::matrix::{PlayerMatrix, PlayerRow};
use roster_balance::roster::{PlayerId, Sex};
use roster_balance::sampler::sample_assignment;
use roster_balance::search::{SearchConfig, compute_assignments};

fn sample_matrix(players: u32) -> PlayerMatrix {
    let rows = (0..players)
        .map(|idx| PlayerRow {
            id: PlayerId(idx),
            sex: if idx % 5 < 3 { Sex::Male } else { Sex::Female },
            skills: [
                (idx * 7 % 5 + 1) as u8,
                (idx * 3 % 5 + 1) as u8,
                (idx * 11 % 5 + 1) as u8,
            ],
        })
        .collect();
    PlayerMatrix::from_rows(rows).expect("valid matrix")
}

fn bench_single_trial(c: &mut Criterion) {
    let matrix = sample_matrix(40);
    let buckets = partition(matrix.count(Sex::Male), matrix.count(Sex::Female), 6).expect("buckets");
    c.bench_function("sample_and_evaluate", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let assignment = sample_assignment(&matrix, &buckets, black_box(seed)).unwrap();
            let ev = evaluate_assignment(&assignment, &matrix, 6).unwrap();
            black_box(ev.overall_outer_var);
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let matrix = sample_matrix(40);
    let config = SearchConfig {
        max_tries: 2_000,
        parallelism: 4,
        ..SearchConfig::new(6)
    };
    c.bench_function("search_2000_trials", |b| {
        b.iter(|| {
            let ranked = compute_assignments(black_box(&matrix), &config).unwrap();
            black_box(ranked[0].score);
        })
    });
}

criterion_group!(benches, bench_single_trial, bench_search);
criterion_main!(benches);
