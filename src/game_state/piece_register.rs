//! Piece model records.
//!
//! Every piece that ever stood on the board has a `Piece` record here,
//! captured ones included. The board answers "what is on this square"; the
//! register answers "what has this piece done" (moved, just double-stepped,
//! captured, promoted from).

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceId, PieceKind, Position, Team};

/// Per-piece state and move-history flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub position: Position,
    /// Monotonic: once set it is never cleared. Governs castling eligibility.
    pub moved: bool,
    /// Pawn only. Set right after a two-square advance, cleared once the
    /// opponent's reply ply has been played.
    pub double_stepped: bool,
    pub captured: bool,
    /// Pawn this piece was promoted from, if any.
    pub promoted_from: Option<PieceId>,
}

impl Piece {
    #[inline]
    pub fn new(id: PieceId, position: Position) -> Self {
        Self {
            id,
            position,
            moved: false,
            double_stepped: false,
            captured: false,
            promoted_from: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> PieceKind {
        self.id.kind
    }

    #[inline]
    pub fn team(&self) -> Team {
        self.id.team
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !self.captured
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceRegister {
    pieces: Vec<Piece>,
}

impl PieceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// One unmoved record per occupied cell.
    pub fn from_board(board: &Board) -> Self {
        Self {
            pieces: board.occupied().map(|(pos, id)| Piece::new(id, pos)).collect(),
        }
    }

    pub fn add_piece_record(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// Drop a record entirely; used when a pawn is replaced on promotion.
    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        let index = self.pieces.iter().position(|p| p.id == id)?;
        Some(self.pieces.remove(index))
    }

    pub fn view(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn edit(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.iter_mut().find(|p| p.id == id)
    }

    pub fn all(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.iter_mut()
    }

    /// Non-captured pieces of one team.
    pub fn living(&self, team: Team) -> impl Iterator<Item = &Piece> {
        self.pieces
            .iter()
            .filter(move |p| p.team() == team && p.is_alive())
    }

    pub fn living_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_alive()).count()
    }
}
