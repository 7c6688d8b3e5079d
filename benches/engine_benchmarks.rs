//! Benchmarks for search performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chess_search::search::MoveOrderer;
use chess_search::{
    ChessPosition, Engine, Evaluator, MaterialEvaluator, Position, SearchConfig, SearchParams,
    ZobristKeys, INF_SCORE,
};

const POSITIONS: [(&str, &str); 3] = [
    (
        "startpos",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "middlegame",
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
];

fn position(fen: &str) -> ChessPosition {
    ChessPosition::from_fen(fen).expect("valid FEN")
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10); // Fewer samples for slower benchmarks

    // Starting position search
    for depth in [3, 4, 5] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos = ChessPosition::startpos();
                let mut engine = Engine::new().with_tt_capacity(1 << 18);
                engine.search(&mut pos, SearchConfig::depth(depth))
            })
        });
    }

    // Tactical position
    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("tactical", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut pos =
                    position("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4");
                let mut engine = Engine::new().with_tt_capacity(1 << 18);
                engine.search(&mut pos, SearchConfig::depth(depth))
            })
        });
    }

    // Pruning off, for comparison
    group.bench_function("middlegame_unpruned_4", |b| {
        b.iter(|| {
            let mut pos = position(POSITIONS[1].1);
            let mut engine = Engine::new()
                .with_tt_capacity(1 << 18)
                .with_params(SearchParams::unpruned());
            engine.search(&mut pos, SearchConfig::depth(4))
        })
    });

    group.finish();
}

fn bench_quiescence(c: &mut Criterion) {
    let mut group = c.benchmark_group("quiescence");
    let mut engine = Engine::new().with_tt_capacity(1 << 10);

    for (name, fen) in POSITIONS {
        let mut pos = position(fen);
        group.bench_function(name, |b| {
            b.iter(|| black_box(engine.quiescence(&mut pos, -INF_SCORE, INF_SCORE)))
        });
    }

    group.finish();
}

fn bench_zobrist(c: &mut Criterion) {
    let mut group = c.benchmark_group("zobrist");
    let keys = ZobristKeys::new();

    for (name, fen) in POSITIONS {
        let pos = position(fen);
        group.bench_with_input(BenchmarkId::new("hash", name), &pos, |b, pos| {
            b.iter(|| black_box(keys.hash(pos)))
        });
    }

    group.finish();
}

fn bench_ordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordering");
    let orderer = MoveOrderer::new();

    for (name, fen) in POSITIONS {
        let mut pos = position(fen);
        let moves = pos.legal_moves();
        group.bench_function(name, |b| {
            b.iter(|| black_box(orderer.order(&mut pos, &moves, None, 0)))
        });
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    let evaluator = MaterialEvaluator::new();

    for (name, fen) in POSITIONS {
        let pos = position(fen);
        group.bench_with_input(BenchmarkId::new("position", name), &pos, |b, pos| {
            b.iter(|| black_box(evaluator.evaluate(pos)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_search,
    bench_quiescence,
    bench_zobrist,
    bench_ordering,
    bench_eval
);
criterion_main!(benches);
