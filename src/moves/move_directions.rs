//! Movement tables keyed by piece kind.
//!
//! One table drives raw move generation, the threat engine and the pin
//! scan, so the three can never disagree about how a kind moves.

use crate::game_state::chess_types::PieceKind;

pub type Direction = (i8, i8);

pub const ROOK_DIRECTIONS: [Direction; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const BISHOP_DIRECTIONS: [Direction; 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
pub const QUEEN_DIRECTIONS: [Direction; 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];
pub const KNIGHT_OFFSETS: [Direction; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
pub const KING_OFFSETS: [Direction; 8] = QUEEN_DIRECTIONS;

/// How a kind moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementRule {
    /// Repeat each direction until blocked.
    Slide(&'static [Direction]),
    /// Single jump per offset.
    Step(&'static [Direction]),
    /// Forward pushes, diagonal captures, en passant.
    Pawn,
}

pub const fn movement_rule(kind: PieceKind) -> MovementRule {
    match kind {
        PieceKind::Pawn => MovementRule::Pawn,
        PieceKind::Knight => MovementRule::Step(&KNIGHT_OFFSETS),
        PieceKind::Bishop => MovementRule::Slide(&BISHOP_DIRECTIONS),
        PieceKind::Rook => MovementRule::Slide(&ROOK_DIRECTIONS),
        PieceKind::Queen => MovementRule::Slide(&QUEEN_DIRECTIONS),
        PieceKind::King => MovementRule::Step(&KING_OFFSETS),
    }
}

#[inline]
pub const fn is_diagonal(direction: Direction) -> bool {
    direction.0 != 0 && direction.1 != 0
}

/// Whether a slider of `kind` attacks along `direction`.
#[inline]
pub const fn slides_along(kind: PieceKind, direction: Direction) -> bool {
    match kind {
        PieceKind::Queen => true,
        PieceKind::Rook => !is_diagonal(direction),
        PieceKind::Bishop => is_diagonal(direction),
        _ => false,
    }
}
