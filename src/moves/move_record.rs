//! Description of one applied half-move.
//!
//! Produced by `apply_move` and by `infer_remote_move`, and replayed by
//! `apply_record`. Both producers must yield identical records for the same
//! move so a received snapshot reconstructs exactly what the sender played.

use std::fmt;

use crate::game_state::chess_types::{PieceId, PieceKind, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastleRecord {
    pub rook_id: PieceId,
    pub rook_from: Position,
    pub rook_to: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub piece_id: PieceId,
    pub from: Position,
    pub to: Position,
    pub captured_piece_id: Option<PieceId>,
    pub is_double_step: bool,
    pub is_en_passant: bool,
    pub castle: Option<CastleRecord>,
    pub promotion_kind: Option<PieceKind>,
}

impl MoveRecord {
    /// Plain move with no side effects.
    pub fn simple(piece_id: PieceId, from: Position, to: Position) -> Self {
        Self {
            piece_id,
            from,
            to,
            captured_piece_id: None,
            is_double_step: false,
            is_en_passant: false,
            castle: None,
            promotion_kind: None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured_piece_id.is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.castle.is_some()
    }

    /// Square the captured piece stood on.
    pub fn capture_square(&self) -> Option<Position> {
        self.captured_piece_id?;
        if self.is_en_passant {
            Position::new(self.to.file(), self.from.rank())
        } else {
            Some(self.to)
        }
    }

    /// Resets the no-progress draw counter.
    #[inline]
    pub fn is_progress(&self) -> bool {
        self.is_capture() || self.piece_id.kind == PieceKind::Pawn
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion_kind {
            let c = match kind {
                PieceKind::Queen => 'q',
                PieceKind::Rook => 'r',
                PieceKind::Bishop => 'b',
                PieceKind::Knight => 'n',
                PieceKind::Pawn | PieceKind::King => '?',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
