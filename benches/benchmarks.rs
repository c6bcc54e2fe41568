use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_rules::board::Board;
use chess_rules::game::Game;
use chess_rules::notation::uci_to_move;
use chess_rules::perft::{perft, perft_divide};
use chess_rules::types::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

pub fn bench_legal_moves_from_start(c: &mut Criterion) {
    let bo = Board::new();
    c.bench_function("get legal moves from start", |b| {
        b.iter(|| bo.legal_moves(black_box(Color::White)))
    });
}

pub fn bench_legal_moves_from_kiwipete(c: &mut Criterion) {
    let Ok(bo) = Board::from_fen(KIWIPETE_FEN) else {
        return;
    };
    c.bench_function("get legal moves from kiwipete", |b| {
        b.iter(|| bo.legal_moves(black_box(Color::White)))
    });
}

pub fn bench_is_valid_move(c: &mut Criterion) {
    let Ok(bo) = Board::from_fen(KIWIPETE_FEN) else {
        return;
    };
    let Some(castle) = uci_to_move("e1g1") else {
        return;
    };
    c.bench_function("validate castle in kiwipete", |b| {
        b.iter(|| bo.is_valid_move(black_box(&castle), Color::White))
    });
}

pub fn bench_perft_3(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);

    let bo = Board::new();
    group.bench_function("perft from start 3 ply", |b| {
        b.iter(|| perft(black_box(&bo), Color::White, black_box(3)))
    });
    group.bench_function("perft divide from start 3 ply", |b| {
        b.iter(|| perft_divide(black_box(&bo), Color::White, black_box(3)))
    });
    group.finish();
}

pub fn bench_random_game(c: &mut Criterion) {
    c.bench_function("random game 40 moves", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(black_box(3));
            Game::new_silent().play_random(black_box(40), &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_legal_moves_from_start,
    bench_legal_moves_from_kiwipete,
    bench_is_valid_move,
    bench_perft_3,
    bench_random_game,
);
criterion_main!(benches);
