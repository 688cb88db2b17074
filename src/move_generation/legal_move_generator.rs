//! Legal move generation.
//!
//! Pipeline per piece:
//! 1. raw destinations from the movement rules;
//! 2. pinned pieces keep only squares on their pin ray;
//! 3. under check, keep only squares that block the checking ray or take
//!    the checker (nothing but King moves under double check);
//! 4. Kings keep only squares the enemy does not attack, judged with the
//!    King lifted off the board so it cannot hide behind itself.
//!
//! En passant removes two pieces from one rank, which the pin scan cannot
//! see, so those captures are confirmed by simulating the resulting board.

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceId, PieceKind, Position, Team};
use crate::game_state::game_events::GameEvent;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::CheckState;
use crate::game_state::piece_register::Piece;
use crate::move_generation::legal_move_castling::castling_options;
use crate::move_generation::legal_move_checks::{check_state_for, is_king_in_check, is_threatened};
use crate::move_generation::legal_move_pins::{find_pins, PinSet};
use crate::moves::pawn_moves::en_passant_victim;
use crate::moves::raw_destinations::raw_destinations;
use crate::moves::sliding_moves::squares_between;

/// Legal destinations per living piece of one team.
///
/// While the team is in check these are exactly the moves that resolve the
/// check, so an empty set everywhere means checkmate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionSet {
    entries: Vec<(PieceId, Vec<Position>)>,
}

impl ResolutionSet {
    pub fn get(&self, piece: PieceId) -> Option<&[Position]> {
        self.entries
            .iter()
            .find(|(id, _)| *id == piece)
            .map(|(_, moves)| moves.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &(PieceId, Vec<Position>)> {
        self.entries.iter()
    }

    /// No piece has any legal destination.
    pub fn is_exhausted(&self) -> bool {
        self.entries.iter().all(|(_, moves)| moves.is_empty())
    }

    pub fn move_count(&self) -> usize {
        self.entries.iter().map(|(_, moves)| moves.len()).sum()
    }
}

/// Legal destinations for one piece under the given constraints.
pub fn legal_moves(
    game: &GameState,
    piece_id: PieceId,
    check_state: &CheckState,
    pins: &PinSet,
) -> Vec<Position> {
    let Some(piece) = game.piece(piece_id).filter(|p| p.is_alive()) else {
        return Vec::new();
    };
    let raw = raw_destinations(game, piece);

    if piece.kind() == PieceKind::King {
        return king_legal_moves(game, piece, raw);
    }

    let mut out = raw;
    if let Some(pin) = pins.pin_for(piece_id) {
        out.retain(|to| pin.ray.contains(to));
    }

    if check_state.in_check {
        if check_state.is_double_check() {
            return Vec::new();
        }
        let resolving = resolving_squares(game, piece.team(), check_state);
        out.retain(|to| {
            resolving.contains(to) || captures_checker_en_passant(game, piece, *to, check_state)
        });
    }

    out.retain(|to| {
        en_passant_victim(game, piece, *to).is_none() || !move_exposes_king(game, piece, *to)
    });
    out
}

/// `legal_moves` with check state and pins computed from the current board.
pub fn legal_moves_for(game: &GameState, piece_id: PieceId) -> Vec<Position> {
    let Some(team) = game.piece(piece_id).map(|p| p.team()) else {
        return Vec::new();
    };
    let check_state = check_state_for(&game.board, team);
    let pins = find_pins(&game.board, team);
    legal_moves(game, piece_id, &check_state, &pins)
}

/// Highlight set for the piece standing on `square`, sorted a1 first.
pub fn legal_destinations_at(game: &GameState, square: Position) -> Result<GameEvent, ChessErrors> {
    let piece = game.piece_at(square).ok_or(ChessErrors::NoPieceAt(square))?;
    let mut destinations = legal_moves_for(game, piece.id);
    destinations.sort_by_key(|p| p.index());
    Ok(GameEvent::LegalDestinations {
        piece: piece.id,
        destinations,
    })
}

/// Legal destinations of every living piece of `team`.
pub fn resolution_set(game: &GameState, team: Team) -> ResolutionSet {
    let check_state = check_state_for(&game.board, team);
    let pins = find_pins(&game.board, team);
    let entries = game
        .pieces
        .living(team)
        .map(|p| (p.id, legal_moves(game, p.id, &check_state, &pins)))
        .collect();
    ResolutionSet { entries }
}

/// Board after moving `piece` to `to`, including en passant and castling
/// side effects. Promotion does not change occupancy so it is ignored.
pub fn simulate_board(game: &GameState, piece: &Piece, to: Position) -> Board {
    let mut board = game.board.clone();
    if let Some(victim) = en_passant_victim(game, piece, to) {
        if let Some(victim_square) = game.piece(victim).map(|v| v.position) {
            board.take(victim_square);
        }
    }
    let moving = board.take(piece.position);
    board.set(to, moving);

    if piece.kind() == PieceKind::King {
        let castle = castling_options(game, piece)
            .into_iter()
            .find(|option| option.king_to == to);
        if let Some(option) = castle {
            let rook = board.take(option.rook.rook_from);
            board.set(option.rook.rook_to, rook);
        }
    }
    board
}

/// Whether playing `piece` to `to` leaves its own King attacked.
pub fn move_exposes_king(game: &GameState, piece: &Piece, to: Position) -> bool {
    is_king_in_check(&simulate_board(game, piece, to), piece.team())
}

fn king_legal_moves(game: &GameState, king: &Piece, raw: Vec<Position>) -> Vec<Position> {
    let enemy = king.team().opposite();
    let mut lifted = game.board.clone();
    lifted.take(king.position);

    raw.into_iter()
        .filter(|to| {
            let castling = (to.file() as i8 - king.position.file() as i8).abs() == 2;
            castling || !is_threatened(&lifted, *to, enemy)
        })
        .collect()
}

/// Squares a non-King piece may occupy to answer a single check.
fn resolving_squares(game: &GameState, team: Team, check_state: &CheckState) -> Vec<Position> {
    let Some(&checker) = check_state.threatening_squares.first() else {
        return Vec::new();
    };
    let Some(king_square) = game.board.king_position(team) else {
        return Vec::new();
    };

    let checker_is_slider = game
        .board
        .piece_at(checker)
        .is_some_and(|id| id.kind.is_slider());
    let mut out = if checker_is_slider {
        squares_between(king_square, checker).unwrap_or_default()
    } else {
        Vec::new()
    };
    out.push(checker);
    out
}

/// En passant lands behind the checker rather than on it.
fn captures_checker_en_passant(
    game: &GameState,
    piece: &Piece,
    to: Position,
    check_state: &CheckState,
) -> bool {
    en_passant_victim(game, piece, to)
        .and_then(|victim| game.piece(victim))
        .is_some_and(|victim| check_state.threatening_squares.contains(&victim.position))
}
