//! Notifications the core hands to the UI collaborator.
//!
//! Operations return these values directly; nothing is broadcast.

use crate::game_state::chess_types::{PieceId, Position, Team};
use crate::game_state::game_status::{DrawReason, GameOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// `team`'s King is attacked from `threatening_squares`.
    CheckDetected {
        team: Team,
        threatening_squares: Vec<Position>,
    },
    Checkmate { winner: Team },
    Draw { reason: DrawReason },
    Resignation { winner: Team },
    ConnectionLost,
    SynchronizationFault { message: String },
    /// Highlight set for a selected piece.
    LegalDestinations {
        piece: PieceId,
        destinations: Vec<Position>,
    },
}

impl GameEvent {
    /// Terminal event for an outcome.
    pub fn from_outcome(outcome: &GameOutcome) -> Self {
        match outcome {
            GameOutcome::Checkmate { winner } => GameEvent::Checkmate { winner: *winner },
            GameOutcome::Draw(reason) => GameEvent::Draw { reason: *reason },
            GameOutcome::Resignation { winner } => GameEvent::Resignation { winner: *winner },
            GameOutcome::ConnectionLost => GameEvent::ConnectionLost,
            GameOutcome::SynchronizationFault(message) => GameEvent::SynchronizationFault {
                message: message.clone(),
            },
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(
            self,
            GameEvent::CheckDetected { .. } | GameEvent::LegalDestinations { .. }
        )
    }
}
