//! Threat engine.
//!
//! Answers "is this square attacked by that team" from the board alone. The
//! same query decides whether a King is in check, whether a King may step
//! onto a square, and whether castling passes through attacked squares.
//!
//! The scan works outward from the target square:
//! - each of the 8 ray directions up to the first occupied square, which
//!   counts when it holds a hostile slider able to move along that ray;
//! - the 8 knight jumps, for hostile Knights;
//! - the 2 forward diagonals as seen by the defender, for hostile Pawns;
//! - the 8 adjacent squares, for the hostile King.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Position, Team};
use crate::game_state::game_status::CheckState;
use crate::moves::move_directions::{slides_along, KING_OFFSETS, KNIGHT_OFFSETS, QUEEN_DIRECTIONS};
use crate::moves::sliding_moves::first_piece_along;

#[inline]
pub fn is_threatened(board: &Board, position: Position, by_team: Team) -> bool {
    !scan_attackers(board, position, by_team, true).is_empty()
}

/// Squares of every `by_team` piece attacking `position`, row-major.
pub fn threatening_squares(board: &Board, position: Position, by_team: Team) -> Vec<Position> {
    let mut out = scan_attackers(board, position, by_team, false);
    out.sort_by_key(|pos| pos.index());
    out
}

/// Check status of `team`'s King on this board.
pub fn check_state_for(board: &Board, team: Team) -> CheckState {
    let Some(king_square) = board.king_position(team) else {
        return CheckState::clear();
    };
    let threatening_squares = threatening_squares(board, king_square, team.opposite());
    CheckState {
        in_check: !threatening_squares.is_empty(),
        threatening_squares,
    }
}

#[inline]
pub fn is_king_in_check(board: &Board, team: Team) -> bool {
    board
        .king_position(team)
        .is_some_and(|king_square| is_threatened(board, king_square, team.opposite()))
}

fn scan_attackers(
    board: &Board,
    position: Position,
    by_team: Team,
    stop_at_first: bool,
) -> Vec<Position> {
    let mut attackers = Vec::new();
    let hostile = |square: Position, kind: PieceKind| {
        board
            .piece_at(square)
            .is_some_and(|id| id.team == by_team && id.kind == kind)
    };

    for direction in QUEEN_DIRECTIONS {
        if let Some(square) = first_piece_along(board, position, direction) {
            if let Some(id) = board.piece_at(square) {
                if id.team == by_team && slides_along(id.kind, direction) {
                    attackers.push(square);
                    if stop_at_first {
                        return attackers;
                    }
                }
            }
        }
    }

    for (d_file, d_rank) in KNIGHT_OFFSETS {
        if let Some(square) = position.offset(d_file, d_rank) {
            if hostile(square, PieceKind::Knight) {
                attackers.push(square);
                if stop_at_first {
                    return attackers;
                }
            }
        }
    }

    // An attacking pawn stands one step behind the target, from its own point of view.
    for d_file in [-1i8, 1i8] {
        if let Some(square) = position.offset(d_file, -by_team.forward()) {
            if hostile(square, PieceKind::Pawn) {
                attackers.push(square);
                if stop_at_first {
                    return attackers;
                }
            }
        }
    }

    for (d_file, d_rank) in KING_OFFSETS {
        if let Some(square) = position.offset(d_file, d_rank) {
            if hostile(square, PieceKind::King) {
                attackers.push(square);
                if stop_at_first {
                    return attackers;
                }
            }
        }
    }

    attackers
}
