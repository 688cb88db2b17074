//! Pawn pushes, diagonal captures and en passant.

use crate::game_state::chess_types::{PieceId, PieceKind, Position};
use crate::game_state::game_state::GameState;
use crate::game_state::piece_register::Piece;

/// Raw pawn destinations, ignoring pins and check.
///
/// The double-step flag is set when the move is applied, not here.
pub fn pawn_destinations(game: &GameState, pawn: &Piece) -> Vec<Position> {
    let board = &game.board;
    let team = pawn.team();
    let forward = team.forward();
    let from = pawn.position;
    let mut out = Vec::with_capacity(4);

    if let Some(one_step) = from.offset(0, forward) {
        if board.is_empty_at(one_step) {
            out.push(one_step);

            if from.rank() == team.pawn_start_rank() {
                if let Some(two_step) = one_step.offset(0, forward) {
                    if board.is_empty_at(two_step) {
                        out.push(two_step);
                    }
                }
            }
        }
    }

    for file_delta in [-1i8, 1i8] {
        let Some(to) = from.offset(file_delta, forward) else {
            continue;
        };
        match board.team_at(to) {
            Some(occupant) if occupant != team => out.push(to),
            Some(_) => {}
            None => {
                if en_passant_victim(game, pawn, to).is_some() {
                    out.push(to);
                }
            }
        }
    }

    out
}

/// The enemy pawn captured if `pawn` moves diagonally onto the empty `to`.
///
/// Only a pawn whose double-step flag is still set, standing beside the
/// mover on the same rank, can be taken this way.
pub fn en_passant_victim(game: &GameState, pawn: &Piece, to: Position) -> Option<PieceId> {
    if pawn.kind() != PieceKind::Pawn {
        return None;
    }
    let from = pawn.position;
    let team = pawn.team();
    let rank_delta = to.rank() as i8 - from.rank() as i8;
    let file_delta = to.file() as i8 - from.file() as i8;
    if rank_delta != team.forward() || file_delta.abs() != 1 || !game.board.is_empty_at(to) {
        return None;
    }

    let victim_square = Position::new(to.file(), from.rank())?;
    let victim_id = game.board.piece_at(victim_square)?;
    if victim_id.team == team || victim_id.kind != PieceKind::Pawn {
        return None;
    }
    let victim = game.piece(victim_id)?;
    (victim.is_alive() && victim.double_stepped).then_some(victim_id)
}
