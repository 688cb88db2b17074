//! Errors used throughout the rule engine and the networked session.
//!
//! `ChessErrors` is the single error type across the crate. Variants fall
//! into four groups:
//! - illegal requests from the UI collaborator (`IllegalMove`, `NoPieceAt`,
//!   `NotYourTurn`, `GameAlreadyOver`). These are rejected without touching
//!   the game state.
//! - synchronization faults, raised when a received board cannot be
//!   reconciled into exactly one move. These end the session.
//! - transport faults (`TransportFault`, `ConnectionLost`). These also end
//!   the session, with a "connection lost" result.
//! - `InvariantViolation`, produced only by `GameState::check_invariants`.
//!   Legal play never reaches it.

use thiserror::Error;

use crate::game_state::chess_types::{Position, Team};

/// Unified error type for the chess engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessErrors {
    /// Requested destination is not in the computed legal set.
    #[error("illegal move {from} -> {to}")]
    IllegalMove { from: Position, to: Position },

    /// Tried to move from a square that holds no living piece.
    #[error("no piece at {0}")]
    NoPieceAt(Position),

    /// A move was requested for the team that does not hold the turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(Team),

    /// The game already reached a terminal outcome.
    #[error("game is already over")]
    GameAlreadyOver,

    /// A received board snapshot could not be classified as one coherent move.
    #[error("synchronization fault: {0}")]
    SynchronizationFault(String),

    /// The transport collaborator failed to send or receive.
    #[error("transport fault: {0}")]
    TransportFault(String),

    /// No message from the peer within the liveness window.
    #[error("connection lost")]
    ConnectionLost,

    /// Board or piece register disagree with each other.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// Board-state or piece-identity text could not be parsed.
    #[error("invalid wire format: {0}")]
    InvalidWireFormat(String),

    /// A square name such as `e4` could not be parsed.
    #[error("invalid algebraic square: {0}")]
    InvalidAlgebraic(String),

    /// Unknown option name or unparsable option value.
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
