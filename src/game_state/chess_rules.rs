//! Canonical chess-rule constants.
//!
//! Stores the opening layout and the named draw threshold used to
//! initialize and evaluate game state.

use crate::game_state::chess_types::PieceKind;

/// Back-rank piece order from the a-file to the h-file.
pub const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Half-moves without a capture or pawn move after which the game is drawn.
///
/// This is the fifty-move rule counted in plies (50 moves per side).
pub const DEFAULT_DRAW_HALF_MOVE_LIMIT: u16 = 100;

/// Files the King travels when castling.
pub const CASTLING_KING_STEP: u8 = 2;
