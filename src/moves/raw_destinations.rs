//! Raw destinations per piece, before pin and check filtering.

use crate::game_state::chess_types::{PieceKind, Position};
use crate::game_state::game_state::GameState;
use crate::game_state::piece_register::Piece;
use crate::move_generation::legal_move_castling::castling_options;
use crate::moves::move_directions::{movement_rule, MovementRule};
use crate::moves::pawn_moves::pawn_destinations;
use crate::moves::sliding_moves::slide_destinations;
use crate::moves::step_moves::step_destinations;

/// Movement rules only: no pin or check constraints.
///
/// Kings also get castling destinations, which carry their own threat
/// conditions. Captured pieces have no destinations.
pub fn raw_destinations(game: &GameState, piece: &Piece) -> Vec<Position> {
    if !piece.is_alive() {
        return Vec::new();
    }

    match movement_rule(piece.kind()) {
        MovementRule::Slide(directions) => {
            slide_destinations(&game.board, piece.position, piece.team(), directions)
        }
        MovementRule::Step(offsets) => {
            let mut out = step_destinations(&game.board, piece.position, piece.team(), offsets);
            if piece.kind() == PieceKind::King {
                out.extend(castling_options(game, piece).iter().map(|x| x.king_to));
            }
            out
        }
        MovementRule::Pawn => pawn_destinations(game, piece),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Team;

    #[test]
    fn start_position_has_twenty_raw_moves_for_white() {
        let game = GameState::new_game();
        let total: usize = game
            .pieces
            .living(Team::White)
            .map(|p| raw_destinations(&game, p).len())
            .sum();
        assert_eq!(total, 20);
    }

    #[test]
    fn captured_piece_has_no_moves() {
        let game = GameState::new_game();
        let mut knight = *game
            .pieces
            .living(Team::White)
            .find(|p| p.kind() == PieceKind::Knight)
            .expect("white knight");
        knight.captured = true;
        assert!(raw_destinations(&game, &knight).is_empty());
    }
}
