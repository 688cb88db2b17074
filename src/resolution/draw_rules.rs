//! Draw detection for the side to move.

use crate::game_state::chess_types::PieceKind;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::{CheckState, DrawReason};
use crate::move_generation::legal_move_generator::ResolutionSet;

/// Nothing but the two Kings is left on the board.
pub fn only_kings_remain(game: &GameState) -> bool {
    game.board
        .occupied()
        .all(|(_, id)| id.kind == PieceKind::King)
}

/// No capture or pawn move within the configured number of plies.
#[inline]
pub fn half_move_limit_reached(game: &GameState) -> bool {
    game.counters.is_exhausted()
}

/// Not in check and without a single legal move.
#[inline]
pub fn is_stalemate(check_state: &CheckState, moves: &ResolutionSet) -> bool {
    !check_state.in_check && moves.is_exhausted()
}

/// First draw condition that holds, in a fixed priority order.
pub fn draw_reason(
    game: &GameState,
    check_state: &CheckState,
    moves: &ResolutionSet,
) -> Option<DrawReason> {
    if only_kings_remain(game) {
        Some(DrawReason::OnlyKingsRemain)
    } else if is_stalemate(check_state, moves) {
        Some(DrawReason::Stalemate)
    } else if half_move_limit_reached(game) {
        Some(DrawReason::HalfMoveLimit)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Team;
    use crate::move_generation::legal_move_checks::check_state_for;
    use crate::move_generation::legal_move_generator::resolution_set;

    fn reason_for(game: &GameState) -> Option<DrawReason> {
        let team = game.side_to_move;
        let check_state = check_state_for(&game.board, team);
        let moves = resolution_set(game, team);
        draw_reason(game, &check_state, &moves)
    }

    #[test]
    fn starting_position_is_not_drawn() {
        assert_eq!(reason_for(&GameState::new_game()), None);
    }

    #[test]
    fn bare_kings_are_drawn() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::Black, PieceKind::King, "e8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        assert_eq!(reason_for(&game), Some(DrawReason::OnlyKingsRemain));
    }

    #[test]
    fn cornered_king_without_moves_is_stalemate() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Queen, "b6"),
                (Team::Black, PieceKind::King, "a8"),
            ],
            Team::Black,
        )
        .expect("valid placements");
        assert_eq!(reason_for(&game), Some(DrawReason::Stalemate));
    }

    #[test]
    fn exhausted_counter_is_drawn() {
        let mut game = GameState::new_game();
        game.counters.half_moves_since_progress = game.counters.limit;
        assert_eq!(reason_for(&game), Some(DrawReason::HalfMoveLimit));
    }
}
