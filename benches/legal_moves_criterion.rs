use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sparring_chess::game_state::game_state::GameState;
use sparring_chess::move_generation::legal_move_generator::{candidate_moves, legal_moves};
use sparring_chess::utils::san::move_to_san;

const POSITIONS: &[(&str, &str)] = &[
    ("opening", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_generation");
    for (name, fen) in POSITIONS {
        let game = GameState::from_fen(fen).expect("benchmark FEN should parse");
        let side = game.side_to_move;

        group.bench_function(format!("candidates_{name}"), |b| {
            b.iter(|| black_box(candidate_moves(black_box(&game), side).len()));
        });

        let mut legal_game = game.clone();
        group.bench_function(format!("legal_{name}"), |b| {
            b.iter(|| {
                let moves = legal_moves(black_box(&mut legal_game), side).expect("legal moves");
                black_box(moves.len())
            });
        });

        let mut san_game = game.clone();
        let moves = san_game.legal_moves().expect("legal moves");
        group.bench_function(format!("san_{name}"), |b| {
            b.iter(|| {
                for mv in &moves {
                    black_box(move_to_san(&mut san_game, mv).expect("san"));
                }
            });
        });
    }
    group.finish();
}

criterion_group!(legal_move_benches, bench_generation);
criterion_main!(legal_move_benches);
