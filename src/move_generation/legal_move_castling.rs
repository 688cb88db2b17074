//! Castling eligibility.
//!
//! Castling is available with any unmoved Rook on the King's rank when:
//! - the King has never moved;
//! - every square between King and Rook is empty;
//! - the King's square, the square it passes and the square it lands on
//!   are all free of enemy attack.
//!
//! The King travels two files toward the Rook and the Rook lands on the
//! square the King passed. `moved` is monotonic, so a Rook that left its
//! square and came back stays ineligible, and promoted Rooks start as moved.

use crate::game_state::chess_rules::CASTLING_KING_STEP;
use crate::game_state::chess_types::{PieceId, PieceKind, Position};
use crate::game_state::game_state::GameState;
use crate::game_state::piece_register::Piece;
use crate::move_generation::legal_move_checks::is_threatened;
use crate::moves::move_record::CastleRecord;
use crate::moves::sliding_moves::squares_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingOption {
    pub king_to: Position,
    pub rook: CastleRecord,
}

pub fn castling_options(game: &GameState, king: &Piece) -> Vec<CastlingOption> {
    let mut out = Vec::new();
    if king.kind() != PieceKind::King || king.moved || !king.is_alive() {
        return out;
    }

    let board = &game.board;
    let enemy = king.team().opposite();
    if is_threatened(board, king.position, enemy) {
        return out;
    }

    let rooks: Vec<&Piece> = game
        .pieces
        .living(king.team())
        .filter(|p| {
            p.kind() == PieceKind::Rook && !p.moved && p.position.rank() == king.position.rank()
        })
        .collect();

    for rook in rooks {
        if let Some(option) = castling_with(game, king, rook.id, rook.position) {
            out.push(option);
        }
    }
    out
}

fn castling_with(
    game: &GameState,
    king: &Piece,
    rook_id: PieceId,
    rook_from: Position,
) -> Option<CastlingOption> {
    let board = &game.board;
    let enemy = king.team().opposite();
    let file_gap = rook_from.file() as i8 - king.position.file() as i8;
    if file_gap.abs() <= CASTLING_KING_STEP as i8 {
        return None;
    }
    let direction = file_gap.signum();

    let between = squares_between(king.position, rook_from)?;
    if between.iter().any(|square| !board.is_empty_at(*square)) {
        return None;
    }

    let passing = king.position.offset(direction, 0)?;
    let king_to = king
        .position
        .offset(direction * CASTLING_KING_STEP as i8, 0)?;
    if is_threatened(board, passing, enemy) || is_threatened(board, king_to, enemy) {
        return None;
    }

    Some(CastlingOption {
        king_to,
        rook: CastleRecord {
            rook_id,
            rook_from,
            rook_to: passing,
        },
    })
}
