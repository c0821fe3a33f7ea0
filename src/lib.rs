//! Crate root module declarations for the Sparring Chess engine.
//!
//! Exposes the board model, move generation, search workers, the game
//! session state machine and notation helpers so the demo binary, tests and
//! benchmarks import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod history;
    pub mod piece;
    pub mod position_grid;
    pub mod undo_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod move_descriptions;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod perft;
    pub mod terminal;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod search_worker;
    pub mod threading;
}

pub mod tables {
    pub mod piece_square_tables;
}

pub mod engines {
    pub mod engine_alpha_beta;
    pub mod engine_random;
    pub mod engine_trait;
}

pub mod session {
    pub mod display;
    pub mod game_record;
    pub mod game_session;
    pub mod player;
    pub mod session_config;
    pub mod transport;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
    pub mod san;
}
