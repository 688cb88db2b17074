//! Per-half-move resolver: check, checkmate and draw.
//!
//! Runs once after every applied move, for the side now on move:
//! `Normal` when not in check, `Resolved` when in check with at least one
//! answering move, `Checkmate` when the resolution set is empty, and a
//! `Draw` whenever a draw rule holds. Terminal states are written into
//! `GameState::outcome`.

use crate::game_state::chess_types::Team;
use crate::game_state::game_events::GameEvent;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::{CheckState, GameOutcome, TurnStatus};
use crate::move_generation::legal_move_checks::check_state_for;
use crate::move_generation::legal_move_generator::{resolution_set, ResolutionSet};
use crate::resolution::draw_rules::draw_reason;

/// Snapshot of the resolver's view of the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnEvaluation {
    pub team: Team,
    pub check_state: CheckState,
    pub resolution: ResolutionSet,
    pub status: TurnStatus,
}

/// Recompute both teams' check state from the board.
pub fn refresh_check_states(game: &mut GameState) {
    for team in [Team::White, Team::Black] {
        game.check_states[team.index()] = check_state_for(&game.board, team);
    }
}

/// Classify the position for the side to move without changing it.
pub fn evaluate_turn(game: &GameState) -> TurnEvaluation {
    let team = game.side_to_move;
    let check_state = check_state_for(&game.board, team);
    let resolution = resolution_set(game, team);

    let status = if check_state.in_check && resolution.is_exhausted() {
        TurnStatus::Checkmate {
            winner: team.opposite(),
        }
    } else if let Some(reason) = draw_reason(game, &check_state, &resolution) {
        TurnStatus::Draw(reason)
    } else if check_state.in_check {
        TurnStatus::Resolved
    } else {
        TurnStatus::Normal
    };

    TurnEvaluation {
        team,
        check_state,
        resolution,
        status,
    }
}

/// Update check states, status and outcome after a move, returning the
/// events the UI should hear about.
pub fn resolve_after_move(game: &mut GameState) -> Vec<GameEvent> {
    refresh_check_states(game);
    let evaluation = evaluate_turn(game);
    game.status = evaluation.status;

    let mut events = Vec::new();
    if evaluation.check_state.in_check {
        events.push(GameEvent::CheckDetected {
            team: evaluation.team,
            threatening_squares: evaluation.check_state.threatening_squares.clone(),
        });
    }

    let outcome = match evaluation.status {
        TurnStatus::Checkmate { winner } => Some(GameOutcome::Checkmate { winner }),
        TurnStatus::Draw(reason) => Some(GameOutcome::Draw(reason)),
        TurnStatus::Normal | TurnStatus::Resolved => None,
    };
    if let Some(outcome) = outcome {
        events.push(GameEvent::from_outcome(&outcome));
        game.outcome = Some(outcome);
    }
    events
}
