use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;

use cyvasse::audit::{run_audit, AuditConfig};
use cyvasse::board::{BoardState, Side};
use cyvasse::config::{GameConfig, RulesConfig};
use cyvasse::game::Game;
use cyvasse::placement::{AutomaticPlacement, PlacementStrategy};
use cyvasse::protocol::{encode_position, parse_position};
use cyvasse::rules;

fn seeded_config() -> GameConfig {
    GameConfig {
        seed: 7,
        ..GameConfig::default()
    }
}

/// Both sides laid out automatically with the default mountain count.
fn laid_out_board() -> BoardState {
    let config = seeded_config();
    let mountains = config.mountains_per_side;
    let mut game = Game::new(config).unwrap();
    game.auto_place(Side::Side1, mountains).unwrap();
    game.auto_place(Side::Side2, mountains).unwrap();
    game.board().clone()
}

fn bench_valid_moves_all(c: &mut Criterion) {
    let board = laid_out_board();
    let config = RulesConfig::default();
    let pieces = board.pieces();
    c.bench_function("valid_moves_all_pieces", |b| {
        b.iter(|| {
            pieces
                .iter()
                .map(|p| rules::valid_moves(black_box(&board), p, &config).len())
                .sum::<usize>()
        })
    });
}

fn bench_attack_moves_all(c: &mut Criterion) {
    let board = laid_out_board();
    let config = RulesConfig::default();
    let pieces = board.pieces();
    c.bench_function("attack_and_threat_cells_all_pieces", |b| {
        b.iter(|| {
            pieces
                .iter()
                .map(|p| {
                    rules::attack_moves(black_box(&board), p, &config).len()
                        + rules::potential_attack_cells(black_box(&board), p, &config).len()
                })
                .sum::<usize>()
        })
    });
}

fn bench_automatic_placement(c: &mut Criterion) {
    let config = seeded_config();
    let mut board = BoardState::new(config.board_size).unwrap();
    let mut auto = AutomaticPlacement::new(Side::Side1, &config);
    c.bench_function("automatic_placement_one_side", |b| {
        b.iter(|| auto.initialize(black_box(&mut board), config.mountains_per_side))
    });
}

fn bench_notation(c: &mut Criterion) {
    let board = laid_out_board();
    let text = encode_position(&board);
    c.bench_function("encode_position", |b| b.iter(|| encode_position(black_box(&board))));
    c.bench_function("parse_position", |b| b.iter(|| parse_position(black_box(&text))));
}

fn bench_audit(c: &mut Criterion) {
    let config = AuditConfig {
        games: 64,
        threads: 4,
        seed: 11,
        quiet: true,
        ..AuditConfig::default()
    };
    let mut group = c.benchmark_group("audit");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.bench_function("audit_64_games_4_threads", |b| {
        b.iter(|| run_audit(black_box(&config)))
    });
    group.finish();
}

fn bench_board_state_clone(c: &mut Criterion) {
    let board = laid_out_board();
    c.bench_function("board_state_clone", |b| b.iter(|| black_box(&board).clone()));
}

criterion_group!(
    benches,
    bench_valid_moves_all,
    bench_attack_moves_all,
    bench_automatic_placement,
    bench_notation,
    bench_audit,
    bench_board_state_clone,
);
criterion_main!(benches);
