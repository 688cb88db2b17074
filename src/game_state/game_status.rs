//! Per-turn check status and terminal outcomes.

use std::fmt;

use crate::game_state::chess_types::{Position, Team};

/// Check status of one team, recomputed every half-move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckState {
    pub in_check: bool,
    /// Squares of the pieces attacking the King, row-major.
    pub threatening_squares: Vec<Position>,
}

impl CheckState {
    #[inline]
    pub fn clear() -> Self {
        Self::default()
    }

    /// Two or more attackers: only King moves can answer.
    #[inline]
    pub fn is_double_check(&self) -> bool {
        self.threatening_squares.len() >= 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    OnlyKingsRemain,
    HalfMoveLimit,
    Stalemate,
    Agreement,
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawReason::OnlyKingsRemain => write!(f, "only the kings remain"),
            DrawReason::HalfMoveLimit => write!(f, "half-move limit without capture or pawn move"),
            DrawReason::Stalemate => write!(f, "stalemate"),
            DrawReason::Agreement => write!(f, "draw agreed"),
        }
    }
}

/// Resolver state for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    Normal,
    /// In check with at least one resolving move available.
    Resolved,
    Checkmate { winner: Team },
    Draw(DrawReason),
}

/// How a game ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Team },
    Draw(DrawReason),
    Resignation { winner: Team },
    ConnectionLost,
    SynchronizationFault(String),
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            GameOutcome::Draw(reason) => write!(f, "draw: {reason}"),
            GameOutcome::Resignation { winner } => write!(f, "resignation, {winner} wins"),
            GameOutcome::ConnectionLost => write!(f, "connection lost"),
            GameOutcome::SynchronizationFault(msg) => {
                write!(f, "boards out of sync: {msg}")
            }
        }
    }
}
