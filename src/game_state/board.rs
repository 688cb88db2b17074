//! 8x8 occupancy grid.
//!
//! The board is the single source of truth for which piece stands where.
//! Each cell holds at most one `PieceId`; the identity carries team and kind,
//! so threat queries and snapshot diffs can work from the board alone.

use crate::game_state::chess_rules::BACK_RANK_LAYOUT;
use crate::game_state::chess_types::{PieceId, PieceKind, Position, Team};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<PieceId>; 64],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    #[inline]
    pub const fn empty() -> Self {
        Self { cells: [None; 64] }
    }

    /// Standard opening layout with identities numbered per team and kind
    /// in a-to-h file order.
    pub fn starting_layout() -> Self {
        let mut board = Self::empty();
        for team in [Team::White, Team::Black] {
            let mut counts = [0u8; 6];
            for (file, kind) in BACK_RANK_LAYOUT.iter().copied().enumerate() {
                counts[kind.index()] += 1;
                let id = PieceId::new(team, kind, counts[kind.index()]);
                board.set(Position::new_unchecked(file as u8, team.home_rank()), Some(id));
            }
            for file in 0..8u8 {
                let id = PieceId::new(team, PieceKind::Pawn, file + 1);
                board.set(Position::new_unchecked(file, team.pawn_start_rank()), Some(id));
            }
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, position: Position) -> Option<PieceId> {
        self.cells[position.index()]
    }

    #[inline]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.cells[position.index()].is_none()
    }

    #[inline]
    pub fn team_at(&self, position: Position) -> Option<Team> {
        self.cells[position.index()].map(|id| id.team)
    }

    #[inline]
    pub fn set(&mut self, position: Position, piece: Option<PieceId>) {
        self.cells[position.index()] = piece;
    }

    /// Empty the cell and return its former occupant.
    #[inline]
    pub fn take(&mut self, position: Position) -> Option<PieceId> {
        self.cells[position.index()].take()
    }

    /// Occupied cells in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, PieceId)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| Some((Position::from_index(index)?, (*cell)?)))
    }

    pub fn position_of(&self, id: PieceId) -> Option<Position> {
        self.occupied().find(|(_, x)| *x == id).map(|(pos, _)| pos)
    }

    pub fn king_position(&self, team: Team) -> Option<Position> {
        self.occupied()
            .find(|(_, id)| id.team == team && id.kind == PieceKind::King)
            .map(|(pos, _)| pos)
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Cells whose contents differ between `self` and `other`, row-major.
    pub fn diff(&self, other: &Board) -> Vec<Position> {
        Position::all()
            .filter(|pos| self.piece_at(*pos) != other.piece_at(*pos))
            .collect()
    }

    /// Raw cell slice in row-major order, used by the wire codec.
    #[inline]
    pub fn cells(&self) -> &[Option<PieceId>; 64] {
        &self.cells
    }

    #[inline]
    pub fn from_cells(cells: [Option<PieceId>; 64]) -> Self {
        Self { cells }
    }
}
