//! Ray walking for Bishops, Rooks and Queens.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Position, Team};
use crate::moves::move_directions::Direction;

/// Walk every direction from `from` until the edge, an own piece
/// (excluded) or an enemy piece (included as a capture).
pub fn slide_destinations(
    board: &Board,
    from: Position,
    team: Team,
    directions: &[Direction],
) -> Vec<Position> {
    let mut out = Vec::with_capacity(14);
    for direction in directions {
        let mut cursor = from;
        while let Some(next) = cursor.offset(direction.0, direction.1) {
            match board.team_at(next) {
                None => out.push(next),
                Some(occupant) => {
                    if occupant != team {
                        out.push(next);
                    }
                    break;
                }
            }
            cursor = next;
        }
    }
    out
}

/// First occupied square along `direction`, if any.
pub fn first_piece_along(board: &Board, from: Position, direction: Direction) -> Option<Position> {
    let mut cursor = from;
    while let Some(next) = cursor.offset(direction.0, direction.1) {
        if !board.is_empty_at(next) {
            return Some(next);
        }
        cursor = next;
    }
    None
}

/// Squares strictly between two aligned positions, `None` if not aligned.
pub fn squares_between(a: Position, b: Position) -> Option<Vec<Position>> {
    let df = b.file() as i8 - a.file() as i8;
    let dr = b.rank() as i8 - a.rank() as i8;
    let aligned = (df == 0) != (dr == 0) || (df != 0 && df.abs() == dr.abs());
    if !aligned {
        return None;
    }

    let step = (df.signum(), dr.signum());
    let mut out = Vec::new();
    let mut cursor = a.offset(step.0, step.1)?;
    while cursor != b {
        out.push(cursor);
        cursor = cursor.offset(step.0, step.1)?;
    }
    Some(out)
}
