//! Crate root module declarations for the Plum Duel two-player chess core.
//!
//! Exposes the rule engine (board, piece register, move generation, check
//! and draw resolution), the networked session layer that reconciles the
//! peer's board snapshots, and the command-line front end.

pub mod chess_errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_config;
    pub mod game_events;
    pub mod game_state;
    pub mod game_status;
    pub mod piece_register;
}

pub mod moves {
    pub mod move_directions;
    pub mod move_record;
    pub mod pawn_moves;
    pub mod raw_destinations;
    pub mod sliding_moves;
    pub mod step_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_castling;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_pins;
    pub mod perft;
}

pub mod resolution {
    pub mod check_resolver;
    pub mod draw_rules;
}

pub mod network {
    pub mod peer_messages;
    pub mod remote_inference;
    pub mod session;
    pub mod session_log;
    pub mod transport;
    pub mod wire_format;
}

pub mod cli {
    pub mod command_loop;
}

pub mod utils {
    pub mod algebraic;
    pub mod render_game_state;
    pub mod self_play;
}
