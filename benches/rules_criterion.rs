use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plum_duel::game_state::chess_types::Team;
use plum_duel::game_state::game_state::GameState;
use plum_duel::move_generation::legal_move_apply::apply_move;
use plum_duel::move_generation::legal_move_generator::resolution_set;
use plum_duel::move_generation::perft::perft;
use plum_duel::network::remote_inference::infer_remote_move;
use plum_duel::network::wire_format::{decode_board, encode_board};
use plum_duel::utils::algebraic::parse_coordinate_move;
use plum_duel::utils::self_play::{play_random_game, SelfPlayConfig};

/// Italian opening, White about to castle.
const OPENING: [&str; 6] = ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"];

fn opening_state() -> GameState {
    let mut game = GameState::new_game();
    for text in OPENING {
        let (from, to, promo) = parse_coordinate_move(text).expect("bench move parses");
        apply_move(&mut game, from, to, promo).expect("bench move is legal");
    }
    game
}

fn bench_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("legal_moves");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));

    let start = GameState::new_game();
    group.bench_function("resolution_set_start", |b| {
        b.iter(|| black_box(resolution_set(black_box(&start), Team::White).move_count()))
    });

    let opening = opening_state();
    group.bench_function("resolution_set_opening", |b| {
        b.iter(|| black_box(resolution_set(black_box(&opening), Team::White).move_count()))
    });

    group.sample_size(10);
    group.bench_function("perft_start_d3", |b| {
        b.iter(|| {
            let counts = perft(black_box(&start), 3).expect("perft runs");
            assert_eq!(counts.nodes, 8902);
            black_box(counts.nodes)
        })
    });
    group.finish();
}

fn bench_reconciliation(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconciliation");

    let before = opening_state();
    let mut after = before.clone();
    let (from, to, _) = parse_coordinate_move("e1g1").expect("castle parses");
    apply_move(&mut after, from, to, None).expect("castling is legal");

    group.bench_function("infer_castle", |b| {
        b.iter(|| {
            infer_remote_move(black_box(&before.board), black_box(&after.board), Team::White)
                .expect("castle is inferred")
        })
    });

    let wire = encode_board(&after.board, '|');
    group.bench_function("decode_board", |b| {
        b.iter(|| decode_board(black_box(&wire), '|').expect("snapshot decodes"))
    });

    group.sample_size(10);
    group.bench_function("self_play_100_plies", |b| {
        let config = SelfPlayConfig {
            seed: 7,
            max_plies: 100,
            ..SelfPlayConfig::default()
        };
        b.iter(|| play_random_game(black_box(&config)).expect("self-play stays consistent"))
    });
    group.finish();
}

criterion_group!(rules_benches, bench_legal_moves, bench_reconciliation);
criterion_main!(rules_benches);
