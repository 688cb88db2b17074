//! Pin detection.
//!
//! A piece is pinned when it is the only piece between its own King and an
//! enemy slider that attacks along that line. A pinned piece may only move
//! along the pin ray, which includes capturing the pinner.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceId, Position, Team};
use crate::moves::move_directions::{slides_along, QUEEN_DIRECTIONS};
use crate::moves::sliding_moves::first_piece_along;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub piece: PieceId,
    pub pinner: Position,
    /// Squares from the King (exclusive) to the pinner (inclusive).
    pub ray: Vec<Position>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSet {
    pins: Vec<Pin>,
}

impl PinSet {
    pub fn pin_for(&self, piece: PieceId) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.piece == piece)
    }

    #[inline]
    pub fn is_pinned(&self, piece: PieceId) -> bool {
        self.pin_for(piece).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

/// Pins against `team`'s King.
pub fn find_pins(board: &Board, team: Team) -> PinSet {
    let mut pins = Vec::new();
    let Some(king_square) = board.king_position(team) else {
        return PinSet { pins };
    };

    for direction in QUEEN_DIRECTIONS {
        let Some(shield_square) = first_piece_along(board, king_square, direction) else {
            continue;
        };
        let Some(shield) = board.piece_at(shield_square) else {
            continue;
        };
        if shield.team != team {
            continue;
        }
        let Some(pinner_square) = first_piece_along(board, shield_square, direction) else {
            continue;
        };
        let Some(pinner) = board.piece_at(pinner_square) else {
            continue;
        };
        if pinner.team == team || !slides_along(pinner.kind, direction) {
            continue;
        }

        let mut ray = Vec::new();
        let mut cursor = king_square;
        while let Some(next) = cursor.offset(direction.0, direction.1) {
            ray.push(next);
            if next == pinner_square {
                break;
            }
            cursor = next;
        }
        pins.push(Pin {
            piece: shield,
            pinner: pinner_square,
            ray,
        });
    }

    PinSet { pins }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::game_state::game_state::GameState;
    use crate::utils::algebraic::algebraic_to_position;

    fn pos(s: &str) -> Position {
        algebraic_to_position(s).expect("test square parses")
    }

    #[test]
    fn bishop_pins_knight_to_king() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Knight, "d2"),
                (Team::Black, PieceKind::Bishop, "b4"),
                (Team::Black, PieceKind::King, "e8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        let pins = find_pins(&game.board, Team::White);
        assert_eq!(pins.len(), 1);
        let knight = game.board.piece_at(pos("d2")).expect("knight on d2");
        let pin = pins.pin_for(knight).expect("knight is pinned");
        assert_eq!(pin.pinner, pos("b4"));
        assert_eq!(pin.ray, vec![pos("d2"), pos("c3"), pos("b4")]);
    }

    #[test]
    fn two_shields_mean_no_pin() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Rook, "e2"),
                (Team::White, PieceKind::Pawn, "e3"),
                (Team::Black, PieceKind::Queen, "e7"),
                (Team::Black, PieceKind::King, "a8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        assert!(find_pins(&game.board, Team::White).is_empty());
    }

    #[test]
    fn rook_cannot_pin_on_diagonal() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Bishop, "f2"),
                (Team::Black, PieceKind::Rook, "h4"),
                (Team::Black, PieceKind::King, "a8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        assert!(find_pins(&game.board, Team::White).is_empty());
    }
}
