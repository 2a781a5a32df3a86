use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lance::search::{iterative_deepening, static_exchange_evaluation, MaterialEvaluator, SearchContext};
use lance::{Board, START_FEN};

const POSITIONS: &[(&str, &str)] = &[
    ("startpos", START_FEN),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_fixed_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_fixed_depth");
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for &(name, fen) in POSITIONS {
        let board = Board::from_fen(fen).expect("FEN do benchmark");
        group.bench_with_input(BenchmarkId::from_parameter(name), &board, |b, board| {
            b.iter(|| {
                let mut local = board.clone();
                let mut ctx = SearchContext::new(Arc::new(MaterialEvaluator));
                let result = iterative_deepening(&mut ctx, &mut local, black_box(4), |_| {});
                black_box(result.map(|r| r.score))
            });
        });
    }

    group.finish();
}

fn bench_see(c: &mut Criterion) {
    let mut board = Board::from_fen(POSITIONS[1].1).expect("FEN do benchmark");
    let captures = lance::moves::generate_moves(&board, lance::moves::MoveGenMode::Violent);
    let legal = lance::moves::generate_legal_moves(&mut board);
    let captures: Vec<_> = captures.into_iter().filter(|mv| legal.contains(mv)).collect();

    c.bench_function("see_kiwipete_captures", |b| {
        b.iter(|| captures.iter().map(|&mv| static_exchange_evaluation(black_box(&board), mv)).sum::<i32>())
    });
}

criterion_group!(search_benches, bench_fixed_depth, bench_see);
criterion_main!(search_benches);
