//! Owned game state.
//!
//! `GameState` bundles the board, the piece register, turn and draw
//! counters, per-team check status and the outcome. Every component takes
//! it by reference; there is no ambient global state. Mutation happens only
//! through `legal_move_apply` (local moves) and `remote_inference` (moves
//! reconstructed from a received snapshot).

use std::collections::HashSet;

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::DEFAULT_DRAW_HALF_MOVE_LIMIT;
use crate::game_state::chess_types::{PieceId, PieceKind, Position, Team};
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_status::{CheckState, GameOutcome, TurnStatus};
use crate::game_state::piece_register::{Piece, PieceRegister};
use crate::moves::move_record::MoveRecord;
use crate::resolution::check_resolver::refresh_check_states;
use crate::utils::algebraic::algebraic_to_position;

/// Half-move counter for the no-progress draw rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCounters {
    /// Plies since the last capture or pawn move.
    pub half_moves_since_progress: u16,
    pub limit: u16,
}

impl Default for DrawCounters {
    fn default() -> Self {
        Self {
            half_moves_since_progress: 0,
            limit: DEFAULT_DRAW_HALF_MOVE_LIMIT,
        }
    }
}

impl DrawCounters {
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.half_moves_since_progress >= self.limit
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub pieces: PieceRegister,
    pub side_to_move: Team,
    pub counters: DrawCounters,
    pub ply: u16,
    /// Indexed by `Team::index()`.
    pub check_states: [CheckState; 2],
    pub status: TurnStatus,
    pub outcome: Option<GameOutcome>,
    pub history: Vec<MoveRecord>,
}

impl GameState {
    /// Standard opening position, White to move.
    pub fn new_game() -> Self {
        Self::from_board(Board::starting_layout(), Team::White)
    }

    pub fn new_game_with_config(config: &GameConfig) -> Self {
        let mut game = Self::new_game();
        game.counters.limit = config.draw_half_move_limit;
        game
    }

    /// Build a state from an arbitrary board with every piece unmoved.
    pub fn from_board(board: Board, side_to_move: Team) -> Self {
        let pieces = PieceRegister::from_board(&board);
        let mut game = Self {
            board,
            pieces,
            side_to_move,
            counters: DrawCounters::default(),
            ply: 0,
            check_states: [CheckState::default(), CheckState::default()],
            status: TurnStatus::Normal,
            outcome: None,
            history: Vec::new(),
        };
        refresh_check_states(&mut game);
        game
    }

    /// Build a position from `(team, kind, "e4")` placements.
    ///
    /// Instances are numbered per team and kind in the order given.
    pub fn from_placements(
        placements: &[(Team, PieceKind, &str)],
        side_to_move: Team,
    ) -> Result<Self, ChessErrors> {
        let mut board = Board::empty();
        let mut counts = [[0u8; 6]; 2];
        for (team, kind, square) in placements {
            let position = algebraic_to_position(square)?;
            if !board.is_empty_at(position) {
                return Err(ChessErrors::InvariantViolation(format!(
                    "two placements on {position}"
                )));
            }
            counts[team.index()][kind.index()] += 1;
            let id = PieceId::new(*team, *kind, counts[team.index()][kind.index()]);
            board.set(position, Some(id));
        }
        Ok(Self::from_board(board, side_to_move))
    }

    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.view(id)
    }

    /// Living piece standing on `position`.
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        let id = self.board.piece_at(position)?;
        self.pieces.view(id).filter(|p| p.is_alive())
    }

    #[inline]
    pub fn check_state(&self, team: Team) -> &CheckState {
        &self.check_states[team.index()]
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn king(&self, team: Team) -> Option<&Piece> {
        self.pieces
            .living(team)
            .find(|p| p.kind() == PieceKind::King)
    }

    /// Verify that board and register agree.
    ///
    /// - every living piece sits on a cell holding its id;
    /// - every occupied cell names a living piece at that position;
    /// - ids are unique;
    /// - each team has exactly one living King.
    pub fn check_invariants(&self) -> Result<(), ChessErrors> {
        let mut seen = HashSet::new();
        for piece in self.pieces.all() {
            if !seen.insert(piece.id) {
                return Err(ChessErrors::InvariantViolation(format!(
                    "piece id {} registered twice",
                    piece.id
                )));
            }
            if piece.is_alive() && self.board.piece_at(piece.position) != Some(piece.id) {
                return Err(ChessErrors::InvariantViolation(format!(
                    "{} claims {} but the board disagrees",
                    piece.id, piece.position
                )));
            }
        }

        for (position, id) in self.board.occupied() {
            match self.pieces.view(id) {
                Some(piece) if piece.is_alive() && piece.position == position => {}
                _ => {
                    return Err(ChessErrors::InvariantViolation(format!(
                        "cell {position} holds {id} with no matching living piece"
                    )))
                }
            }
        }

        for team in [Team::White, Team::Black] {
            let kings = self
                .pieces
                .living(team)
                .filter(|p| p.kind() == PieceKind::King)
                .count();
            if kings != 1 {
                return Err(ChessErrors::InvariantViolation(format!(
                    "{team} has {kings} living kings"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_satisfies_invariants() {
        let game = GameState::new_game();
        assert_eq!(game.side_to_move, Team::White);
        assert!(game.check_invariants().is_ok());
        assert!(!game.check_state(Team::White).in_check);
    }

    #[test]
    fn placements_number_instances_per_kind() {
        let game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Rook, "a1"),
                (Team::White, PieceKind::Rook, "h1"),
                (Team::Black, PieceKind::King, "e8"),
            ],
            Team::White,
        )
        .expect("placements are valid");
        let h1 = algebraic_to_position("h1").expect("h1 parses");
        assert_eq!(
            game.board.piece_at(h1),
            Some(PieceId::new(Team::White, PieceKind::Rook, 2))
        );
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn invariant_check_flags_board_register_mismatch() {
        let mut game = GameState::new_game();
        let e2 = algebraic_to_position("e2").expect("e2 parses");
        let e4 = algebraic_to_position("e4").expect("e4 parses");
        let pawn = game.board.take(e2);
        game.board.set(e4, pawn);
        assert!(matches!(
            game.check_invariants(),
            Err(ChessErrors::InvariantViolation(_))
        ));
    }

    #[test]
    fn invariant_check_flags_duplicate_ids() {
        let mut game = GameState::new_game();
        let e2 = algebraic_to_position("e2").expect("e2 parses");
        let e4 = algebraic_to_position("e4").expect("e4 parses");
        let pawn = game.board.piece_at(e2).expect("pawn on e2");
        game.board.set(e4, Some(pawn));
        game.pieces.add_piece_record(Piece::new(pawn, e4));
        assert!(game.check_invariants().is_err());
    }

    #[test]
    fn invariant_check_flags_missing_king() {
        let mut game = GameState::new_game();
        let e1 = algebraic_to_position("e1").expect("e1 parses");
        let king = game.board.take(e1).expect("king on e1");
        game.pieces.edit(king).expect("king registered").captured = true;
        assert!(game.check_invariants().is_err());
    }

    #[test]
    fn duplicate_placement_is_rejected() {
        let result = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::Black, PieceKind::King, "e1"),
            ],
            Team::White,
        );
        assert!(result.is_err());
    }
}
