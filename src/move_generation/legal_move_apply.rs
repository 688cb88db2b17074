//! Applying moves to the game state.
//!
//! `apply_move` validates a UI request against the legal set, builds the
//! `MoveRecord` and replays it. `apply_record` is the shared replay step:
//! it performs every side effect of a record (capture, en passant removal,
//! castling rook hop, promotion, flag and counter bookkeeping) without
//! re-deriving legality, so remote moves reconstructed from a snapshot go
//! through exactly the same code as local ones.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{PieceId, PieceKind, Position};
use crate::game_state::game_events::GameEvent;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::TurnStatus;
use crate::game_state::piece_register::Piece;
use crate::move_generation::legal_move_castling::castling_options;
use crate::move_generation::legal_move_generator::legal_moves_for;
use crate::moves::move_record::MoveRecord;
use crate::moves::pawn_moves::en_passant_victim;
use crate::resolution::check_resolver::resolve_after_move;

/// Result of one applied half-move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub record: MoveRecord,
    pub events: Vec<GameEvent>,
    pub status: TurnStatus,
}

/// Validate and apply a move requested by the side to move.
///
/// Illegal requests return an error and leave `game` untouched. A pawn
/// reaching the back rank without an explicit choice becomes a Queen.
pub fn apply_move(
    game: &mut GameState,
    from: Position,
    to: Position,
    promotion: Option<PieceKind>,
) -> Result<TurnReport, ChessErrors> {
    let record = build_move_record(game, from, to, promotion)?;
    apply_record(game, &record)?;
    let events = resolve_after_move(game);
    Ok(TurnReport {
        record,
        events,
        status: game.status,
    })
}

/// Classify a requested move into a `MoveRecord` without changing state.
pub fn build_move_record(
    game: &GameState,
    from: Position,
    to: Position,
    promotion: Option<PieceKind>,
) -> Result<MoveRecord, ChessErrors> {
    if game.is_over() {
        return Err(ChessErrors::GameAlreadyOver);
    }
    let piece = *game.piece_at(from).ok_or(ChessErrors::NoPieceAt(from))?;
    if piece.team() != game.side_to_move {
        return Err(ChessErrors::NotYourTurn(piece.team()));
    }
    if !legal_moves_for(game, piece.id).contains(&to) {
        return Err(ChessErrors::IllegalMove { from, to });
    }

    let mut record = MoveRecord::simple(piece.id, from, to);
    match piece.kind() {
        PieceKind::Pawn => {
            if let Some(victim) = en_passant_victim(game, &piece, to) {
                record.captured_piece_id = Some(victim);
                record.is_en_passant = true;
            } else {
                record.captured_piece_id = game.board.piece_at(to);
            }
            record.is_double_step = (to.rank() as i8 - from.rank() as i8).abs() == 2;
            if to.rank() == piece.team().promotion_rank() {
                let kind = promotion.unwrap_or(PieceKind::Queen);
                if !PieceKind::PROMOTIONS.contains(&kind) {
                    return Err(ChessErrors::IllegalMove { from, to });
                }
                record.promotion_kind = Some(kind);
            }
        }
        PieceKind::King => {
            record.captured_piece_id = game.board.piece_at(to);
            record.castle = castling_options(game, &piece)
                .into_iter()
                .find(|option| option.king_to == to)
                .map(|option| option.rook);
        }
        _ => record.captured_piece_id = game.board.piece_at(to),
    }
    Ok(record)
}

/// Replay a record's side effects. All checks run before any mutation, so
/// an inconsistent record leaves `game` unchanged.
pub fn apply_record(game: &mut GameState, record: &MoveRecord) -> Result<(), ChessErrors> {
    verify_record(game, record)?;
    let mover = record.piece_id.team;

    if let (Some(victim), Some(victim_square)) = (record.captured_piece_id, record.capture_square())
    {
        game.board.take(victim_square);
        if let Some(captured) = game.pieces.edit(victim) {
            captured.captured = true;
        }
    }

    game.board.take(record.from);
    game.board.set(record.to, Some(record.piece_id));
    if let Some(piece) = game.pieces.edit(record.piece_id) {
        piece.position = record.to;
        piece.moved = true;
    }

    if let Some(castle) = record.castle {
        game.board.take(castle.rook_from);
        game.board.set(castle.rook_to, Some(castle.rook_id));
        if let Some(rook) = game.pieces.edit(castle.rook_id) {
            rook.position = castle.rook_to;
            rook.moved = true;
        }
    }

    if let Some(kind) = record.promotion_kind {
        let promoted_id = PieceId::promoted_from(record.piece_id, kind);
        game.pieces.remove(record.piece_id);
        game.board.set(record.to, Some(promoted_id));
        game.pieces.add_piece_record(Piece {
            moved: true,
            promoted_from: Some(record.piece_id),
            ..Piece::new(promoted_id, record.to)
        });
    }

    // The previous double step has had its one reply.
    for piece in game.pieces.all_mut() {
        piece.double_stepped = false;
    }
    if record.is_double_step {
        if let Some(pawn) = game.pieces.edit(record.piece_id) {
            pawn.double_stepped = true;
        }
    }

    if record.is_progress() {
        game.counters.half_moves_since_progress = 0;
    } else {
        game.counters.half_moves_since_progress =
            game.counters.half_moves_since_progress.saturating_add(1);
    }
    game.ply = game.ply.saturating_add(1);
    game.side_to_move = mover.opposite();
    game.history.push(*record);
    Ok(())
}

fn verify_record(game: &GameState, record: &MoveRecord) -> Result<(), ChessErrors> {
    let mismatch = |what: String| ChessErrors::InvariantViolation(what);

    if game.side_to_move != record.piece_id.team {
        return Err(ChessErrors::NotYourTurn(record.piece_id.team));
    }
    match game.piece(record.piece_id) {
        Some(piece) if piece.is_alive() && piece.position == record.from => {}
        _ => {
            return Err(mismatch(format!(
                "{} is not standing on {}",
                record.piece_id, record.from
            )))
        }
    }
    if game.board.piece_at(record.from) != Some(record.piece_id) {
        return Err(mismatch(format!("board has no {} on {}", record.piece_id, record.from)));
    }

    match (record.captured_piece_id, record.capture_square()) {
        (Some(victim), Some(square)) => {
            let on_board = game.board.piece_at(square) == Some(victim);
            let alive = game.piece(victim).is_some_and(|p| p.is_alive());
            if !on_board || !alive || victim.team == record.piece_id.team {
                return Err(mismatch(format!("cannot capture {victim} on {square}")));
            }
            if victim.kind == PieceKind::King {
                return Err(mismatch(format!("record captures King {victim}")));
            }
            if record.is_en_passant && !game.board.is_empty_at(record.to) {
                return Err(mismatch(format!("en passant target {} is occupied", record.to)));
            }
        }
        _ => {
            if !game.board.is_empty_at(record.to) {
                return Err(mismatch(format!("{} is occupied but no capture recorded", record.to)));
            }
        }
    }

    if let Some(castle) = record.castle {
        let rook_ok = game
            .piece(castle.rook_id)
            .is_some_and(|r| r.is_alive() && r.position == castle.rook_from)
            && game.board.piece_at(castle.rook_from) == Some(castle.rook_id);
        if !rook_ok || !game.board.is_empty_at(castle.rook_to) {
            return Err(mismatch(format!(
                "castling rook {} cannot move {} -> {}",
                castle.rook_id, castle.rook_from, castle.rook_to
            )));
        }
    }

    if let Some(kind) = record.promotion_kind {
        let promoted = PieceId::promoted_from(record.piece_id, kind);
        if record.piece_id.kind != PieceKind::Pawn || game.piece(promoted).is_some() {
            return Err(mismatch(format!("cannot promote {} to {kind:?}", record.piece_id)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Team;
    use crate::utils::algebraic::{algebraic_to_position, parse_coordinate_move};

    fn pos(s: &str) -> Position {
        algebraic_to_position(s).expect("test square parses")
    }

    fn play(game: &mut GameState, text: &str) -> TurnReport {
        let (from, to, promo) = parse_coordinate_move(text).expect("move text parses");
        apply_move(game, from, to, promo).expect("move should be legal")
    }

    #[test]
    fn illegal_request_leaves_state_untouched() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let result = apply_move(&mut game, pos("e2"), pos("e5"), None);
        assert_eq!(
            result,
            Err(ChessErrors::IllegalMove {
                from: pos("e2"),
                to: pos("e5")
            })
        );
        assert_eq!(game, before);
        assert_eq!(
            apply_move(&mut game, pos("e7"), pos("e5"), None),
            Err(ChessErrors::NotYourTurn(Team::Black))
        );
        assert_eq!(
            apply_move(&mut game, pos("e4"), pos("e5"), None),
            Err(ChessErrors::NoPieceAt(pos("e4")))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn double_step_sets_flag_until_reply_is_played() {
        let mut game = GameState::new_game();
        let report = play(&mut game, "e2e4");
        assert!(report.record.is_double_step);
        let pawn = game.piece_at(pos("e4")).expect("pawn on e4");
        assert!(pawn.double_stepped);
        assert!(pawn.moved);

        play(&mut game, "g8f6");
        assert!(!game.piece_at(pos("e4")).expect("pawn on e4").double_stepped);
    }

    #[test]
    fn capture_marks_victim_and_resets_counter() {
        let mut game = GameState::new_game();
        for text in ["e2e4", "d7d5", "g1f3", "b8c6"] {
            play(&mut game, text);
        }
        assert_eq!(game.counters.half_moves_since_progress, 2);
        let victim = game.board.piece_at(pos("d5")).expect("pawn on d5");
        let report = play(&mut game, "e4d5");
        assert_eq!(report.record.captured_piece_id, Some(victim));
        assert!(game.piece(victim).expect("record kept").captured);
        assert_eq!(game.counters.half_moves_since_progress, 0);
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let mut game = GameState::new_game();
        for text in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut game, text);
        }
        let victim = game.board.piece_at(pos("d5")).expect("pawn on d5");
        let report = play(&mut game, "e5d6");
        assert!(report.record.is_en_passant);
        assert_eq!(report.record.captured_piece_id, Some(victim));
        assert_eq!(game.board.piece_at(pos("d5")), None);
        assert!(game.piece_at(pos("d6")).is_some());
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn en_passant_expires_after_one_ply() {
        let mut game = GameState::new_game();
        for text in ["e2e4", "a7a6", "e4e5", "d7d5", "h2h3", "h7h6"] {
            play(&mut game, text);
        }
        assert!(matches!(
            apply_move(&mut game, pos("e5"), pos("d6"), None),
            Err(ChessErrors::IllegalMove { .. })
        ));
    }

    #[test]
    fn castling_moves_king_and_rook_together() {
        let mut game = GameState::new_game();
        for text in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
            play(&mut game, text);
        }
        let report = play(&mut game, "e1g1");
        let castle = report.record.castle.expect("castling recorded");
        assert_eq!(castle.rook_from, pos("h1"));
        assert_eq!(castle.rook_to, pos("f1"));
        assert_eq!(game.board.piece_at(pos("f1")), Some(castle.rook_id));
        assert!(game.piece(castle.rook_id).expect("rook registered").moved);
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn promotion_replaces_pawn_with_moved_piece() {
        let mut game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Pawn, "b7"),
                (Team::Black, PieceKind::King, "h8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        let pawn = game.board.piece_at(pos("b7")).expect("pawn on b7");
        let report = play(&mut game, "b7b8r");
        assert_eq!(report.record.promotion_kind, Some(PieceKind::Rook));

        let rook_id = game.board.piece_at(pos("b8")).expect("promoted piece");
        assert_eq!(rook_id, PieceId::promoted_from(pawn, PieceKind::Rook));
        let rook = game.piece(rook_id).expect("promoted record");
        assert!(rook.moved);
        assert_eq!(rook.promoted_from, Some(pawn));
        assert!(game.piece(pawn).is_none());
        assert!(game.check_invariants().is_ok());
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let mut game = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::Black, PieceKind::Pawn, "c2"),
                (Team::Black, PieceKind::King, "h8"),
            ],
            Team::Black,
        )
        .expect("valid placements");
        let report = apply_move(&mut game, pos("c2"), pos("c1"), None).expect("legal promotion");
        assert_eq!(report.record.promotion_kind, Some(PieceKind::Queen));
        assert_eq!(
            game.board.piece_at(pos("c1")).map(|id| (id.kind, id.promoted)),
            Some((PieceKind::Queen, true))
        );
    }

    #[test]
    fn inconsistent_record_is_rejected_before_mutation() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let pawn = game.board.piece_at(pos("e2")).expect("pawn on e2");
        let bogus = MoveRecord::simple(pawn, pos("e3"), pos("e4"));
        assert!(apply_record(&mut game, &bogus).is_err());
        assert_eq!(game, before);
    }
}
