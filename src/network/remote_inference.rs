//! Reconstructing the opponent's move from two board snapshots.
//!
//! The peer sends its whole board after each move. The changed cells are
//! classified into one `MoveRecord`:
//!
//! | changed cells | move |
//! |---|---|
//! | 2 | simple move, capture, double step or promotion |
//! | 3 | en passant (the passed pawn's square also empties) |
//! | 4 | castling (King and Rook both move) |
//!
//! The candidate record is replayed on the old board and must reproduce the
//! received one exactly; anything else is a synchronization fault. Legality
//! is not re-derived, the sender already validated the move.

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceId, PieceKind, Position, Team};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_record, TurnReport};
use crate::moves::move_record::{CastleRecord, MoveRecord};
use crate::resolution::check_resolver::resolve_after_move;

fn fault(message: impl Into<String>) -> ChessErrors {
    ChessErrors::SynchronizationFault(message.into())
}

/// Classify the difference between `old` and `new` as one move by `mover`.
pub fn infer_remote_move(
    old: &Board,
    new: &Board,
    mover: Team,
) -> Result<MoveRecord, ChessErrors> {
    let changed = old.diff(new);
    if !(2..=4).contains(&changed.len()) {
        return Err(fault(format!(
            "{} cells changed, no single move explains that",
            changed.len()
        )));
    }

    let vacated: Vec<(Position, PieceId)> = changed
        .iter()
        .filter_map(|&pos| match (old.piece_at(pos), new.piece_at(pos)) {
            (Some(id), None) if id.team == mover => Some((pos, id)),
            _ => None,
        })
        .collect();
    let arrivals: Vec<(Position, PieceId)> = changed
        .iter()
        .filter_map(|&pos| new.piece_at(pos).filter(|id| id.team == mover).map(|id| (pos, id)))
        .collect();

    let (from, piece_id) = match vacated.as_slice() {
        [single] => *single,
        [a, b] => *[a, b]
            .into_iter()
            .find(|(_, id)| id.kind == PieceKind::King)
            .ok_or_else(|| fault(format!("two {mover} pieces left their squares")))?,
        _ => return Err(fault(format!("no single {mover} piece left its square"))),
    };

    let (to, arrived_id) = *arrivals
        .iter()
        .find(|(_, id)| *id == piece_id || is_promotion_of(piece_id, *id))
        .ok_or_else(|| fault(format!("{piece_id} left {from} but never arrived")))?;

    let mut record = MoveRecord::simple(piece_id, from, to);
    if arrived_id != piece_id {
        record.promotion_kind = Some(arrived_id.kind);
    }

    match old.piece_at(to) {
        Some(victim) if victim.team != mover && victim.kind != PieceKind::King => {
            record.captured_piece_id = Some(victim);
        }
        Some(other) => return Err(fault(format!("{piece_id} cannot land on {other}"))),
        None => {}
    }

    let d_file = to.file() as i8 - from.file() as i8;
    let d_rank = to.rank() as i8 - from.rank() as i8;

    if piece_id.kind == PieceKind::Pawn {
        record.is_double_step = d_rank.abs() == 2;
        if d_file != 0 && record.captured_piece_id.is_none() {
            let passed = Position::new(to.file(), from.rank())
                .ok_or_else(|| fault("en passant square off the board"))?;
            match old.piece_at(passed) {
                Some(victim) if victim.team != mover && victim.kind == PieceKind::Pawn => {
                    record.captured_piece_id = Some(victim);
                    record.is_en_passant = true;
                }
                _ => return Err(fault(format!("pawn moved diagonally to empty {to}"))),
            }
        }
    }

    if piece_id.kind == PieceKind::King && d_rank == 0 && d_file.abs() == 2 {
        record.castle = Some(infer_castle(new, from, d_file.signum(), &vacated)?);
    } else if vacated.len() == 2 {
        return Err(fault(format!("{piece_id} moved along with another piece")));
    }

    let replayed = replay_on_board(old, &record);
    if replayed != *new {
        return Err(fault(format!(
            "received board does not match move {record} by {piece_id}"
        )));
    }
    Ok(record)
}

fn is_promotion_of(pawn: PieceId, candidate: PieceId) -> bool {
    pawn.kind == PieceKind::Pawn
        && candidate.promoted
        && candidate.team == pawn.team
        && candidate.instance == pawn.instance
        && PieceKind::PROMOTIONS.contains(&candidate.kind)
}

fn infer_castle(
    new: &Board,
    king_from: Position,
    direction: i8,
    vacated: &[(Position, PieceId)],
) -> Result<CastleRecord, ChessErrors> {
    let passing = king_from
        .offset(direction, 0)
        .ok_or_else(|| fault("castling off the board"))?;
    let (rook_from, rook_id) = *vacated
        .iter()
        .find(|(pos, id)| {
            id.kind == PieceKind::Rook
                && pos.rank() == king_from.rank()
                && (pos.file() as i8 - king_from.file() as i8).signum() == direction
        })
        .ok_or_else(|| fault("King moved two files without a Rook"))?;
    if new.piece_at(passing) != Some(rook_id) {
        return Err(fault(format!("castling Rook {rook_id} did not land on {passing}")));
    }
    Ok(CastleRecord {
        rook_id,
        rook_from,
        rook_to: passing,
    })
}

/// Occupancy after `record`, computed from the board alone.
pub fn replay_on_board(board: &Board, record: &MoveRecord) -> Board {
    let mut out = board.clone();
    if let Some(square) = record.capture_square() {
        out.take(square);
    }
    out.take(record.from);
    let landing = record
        .promotion_kind
        .map_or(record.piece_id, |kind| PieceId::promoted_from(record.piece_id, kind));
    out.set(record.to, Some(landing));
    if let Some(castle) = record.castle {
        out.take(castle.rook_from);
        out.set(castle.rook_to, Some(castle.rook_id));
    }
    out
}

/// Apply the opponent's move given the board they sent.
///
/// Any failure is reported as a synchronization fault and leaves `game`
/// untouched; the caller ends the session.
pub fn apply_inferred_move(game: &mut GameState, new_board: &Board) -> Result<TurnReport, ChessErrors> {
    if game.is_over() {
        return Err(ChessErrors::GameAlreadyOver);
    }
    let mover = game.side_to_move;
    let record = infer_remote_move(&game.board, new_board, mover)?;
    apply_record(game, &record).map_err(|err| match err {
        ChessErrors::SynchronizationFault(_) => err,
        other => fault(other.to_string()),
    })?;
    let events = resolve_after_move(game);
    Ok(TurnReport {
        record,
        events,
        status: game.status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::game_status::TurnStatus;
    use crate::move_generation::legal_move_apply::apply_move;
    use crate::utils::algebraic::{algebraic_to_position, parse_coordinate_move};

    fn pos(s: &str) -> Position {
        algebraic_to_position(s).expect("test square parses")
    }

    /// Play `text` locally and check that the peer reconstructs the same
    /// record and ends up with an identical state.
    fn play_and_mirror(local: &mut GameState, remote: &mut GameState, text: &str) -> MoveRecord {
        let (from, to, promo) = parse_coordinate_move(text).expect("move text parses");
        let old = local.board.clone();
        let mover = local.side_to_move;
        let report = apply_move(local, from, to, promo).expect("scripted move is legal");

        let inferred = infer_remote_move(&old, &local.board, mover).expect("diff is classifiable");
        assert_eq!(inferred, report.record, "inference of {text}");

        let mirrored = apply_inferred_move(remote, &local.board).expect("remote replay succeeds");
        assert_eq!(mirrored.status, report.status);
        assert_eq!(remote, local);
        report.record
    }

    fn mirror_all(start: GameState, moves: &[&str]) -> Vec<MoveRecord> {
        let mut local = start.clone();
        let mut remote = start;
        moves
            .iter()
            .map(|text| play_and_mirror(&mut local, &mut remote, text))
            .collect()
    }

    #[test]
    fn simple_moves_captures_and_double_steps_round_trip() {
        let records = mirror_all(GameState::new_game(), &["e2e4", "d7d5", "e4d5", "g8f6", "g1f3"]);
        assert!(records[0].is_double_step);
        assert!(records[2].is_capture());
        assert!(!records[4].is_capture());
    }

    #[test]
    fn en_passant_round_trips() {
        let records = mirror_all(GameState::new_game(), &["e2e4", "a7a6", "e4e5", "d7d5", "e5d6"]);
        let ep = records[4];
        assert!(ep.is_en_passant);
        assert_eq!(ep.capture_square(), Some(pos("d5")));
    }

    #[test]
    fn castling_round_trips_both_sides() {
        let start = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Rook, "a1"),
                (Team::White, PieceKind::Rook, "h1"),
                (Team::Black, PieceKind::King, "e8"),
                (Team::Black, PieceKind::Rook, "h8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        let records = mirror_all(start, &["e1c1", "e8g8"]);
        let queenside = records[0].castle.expect("queenside castle");
        assert_eq!((queenside.rook_from, queenside.rook_to), (pos("a1"), pos("d1")));
        let kingside = records[1].castle.expect("kingside castle");
        assert_eq!((kingside.rook_from, kingside.rook_to), (pos("h8"), pos("f8")));
    }

    #[test]
    fn promotions_round_trip_with_and_without_capture() {
        let start = GameState::from_placements(
            &[
                (Team::White, PieceKind::King, "e1"),
                (Team::White, PieceKind::Pawn, "b7"),
                (Team::White, PieceKind::Pawn, "g7"),
                (Team::Black, PieceKind::King, "e6"),
                (Team::Black, PieceKind::Rook, "a8"),
            ],
            Team::White,
        )
        .expect("valid placements");
        let records = mirror_all(start, &["b7a8n", "e6d7", "g7g8q"]);
        assert_eq!(records[0].promotion_kind, Some(PieceKind::Knight));
        assert!(records[0].is_capture());
        assert_eq!(records[2].promotion_kind, Some(PieceKind::Queen));
    }

    #[test]
    fn unchanged_or_scrambled_boards_are_sync_faults() {
        let game = GameState::new_game();
        let old = game.board.clone();

        assert!(matches!(
            infer_remote_move(&old, &old, Team::White),
            Err(ChessErrors::SynchronizationFault(_))
        ));

        // Two White pieces vanish, nothing arrives.
        let mut vanished = old.clone();
        vanished.take(pos("a2"));
        vanished.take(pos("b2"));
        assert!(infer_remote_move(&old, &vanished, Team::White).is_err());

        // The mover's piece changes identity in place of moving.
        let mut swapped = old.clone();
        let knight = swapped.take(pos("g1"));
        swapped.set(pos("f3"), knight.map(|id| PieceId { instance: 9, ..id }));
        assert!(infer_remote_move(&old, &swapped, Team::White).is_err());

        // A Black piece moved while White was on move.
        let mut wrong_side = old.clone();
        let pawn = wrong_side.take(pos("e7"));
        wrong_side.set(pos("e5"), pawn);
        assert!(infer_remote_move(&old, &wrong_side, Team::White).is_err());

        // A move plus an extra removal.
        let mut extra = old.clone();
        let pawn = extra.take(pos("e2"));
        extra.set(pos("e4"), pawn);
        extra.take(pos("d7"));
        assert!(infer_remote_move(&old, &extra, Team::White).is_err());
    }

    #[test]
    fn diagonal_pawn_step_to_empty_square_is_rejected() {
        let old = Board::starting_layout();
        let mut new = old.clone();
        let pawn = new.take(pos("e2"));
        new.set(pos("d3"), pawn);
        assert!(matches!(
            infer_remote_move(&old, &new, Team::White),
            Err(ChessErrors::SynchronizationFault(_))
        ));
    }

    #[test]
    fn failed_replay_leaves_game_untouched() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let mut new = game.board.clone();
        new.take(pos("d1"));
        new.take(pos("d8"));
        assert!(matches!(
            apply_inferred_move(&mut game, &new),
            Err(ChessErrors::SynchronizationFault(_))
        ));
        assert_eq!(game, before);
    }

    #[test]
    fn remote_checkmate_is_resolved_locally() {
        let mut local = GameState::new_game();
        let mut remote = GameState::new_game();
        for text in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            play_and_mirror(&mut local, &mut remote, text);
        }
        assert_eq!(
            remote.status,
            TurnStatus::Checkmate {
                winner: Team::Black
            }
        );
        assert!(remote.is_over());
    }
}
