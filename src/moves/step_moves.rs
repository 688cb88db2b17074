//! Fixed-offset movement for Knights and Kings.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Position, Team};
use crate::moves::move_directions::Direction;

/// Offsets that stay on the board and do not land on an own piece.
pub fn step_destinations(
    board: &Board,
    from: Position,
    team: Team,
    offsets: &[Direction],
) -> Vec<Position> {
    offsets
        .iter()
        .filter_map(|(d_file, d_rank)| from.offset(*d_file, *d_rank))
        .filter(|to| board.team_at(*to) != Some(team))
        .collect()
}
