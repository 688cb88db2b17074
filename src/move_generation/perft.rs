//! Perft node counting over the legal move generator.
//!
//! Every legal move (each promotion choice counted separately) is applied
//! through the same `apply_record` path real games use, so known perft
//! totals validate generation and side effects together.

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{PieceKind, Position};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_record, build_move_record};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::resolution_set;
use crate::moves::move_record::MoveRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }

    fn count_leaf(&mut self, child: &GameState, record: &MoveRecord) {
        self.nodes += 1;
        self.captures += u64::from(record.is_capture());
        self.en_passant += u64::from(record.is_en_passant);
        self.castles += u64::from(record.is_castle());
        self.promotions += u64::from(record.promotion_kind.is_some());
        if is_king_in_check(&child.board, child.side_to_move) {
            self.checks += 1;
            if resolution_set(child, child.side_to_move).is_exhausted() {
                self.checkmates += 1;
            }
        }
    }
}

pub fn perft(game: &GameState, depth: u8) -> Result<PerftCounts, ChessErrors> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }

    for (from, to, promotion) in expanded_moves(game) {
        let record = build_move_record(game, from, to, promotion)?;
        let mut child = game.clone();
        apply_record(&mut child, &record)?;
        if depth == 1 {
            total.count_leaf(&child, &record);
        } else {
            total.merge(perft(&child, depth - 1)?);
        }
    }
    Ok(total)
}

/// All legal `(from, to, promotion)` triples for the side to move.
fn expanded_moves(game: &GameState) -> Vec<(Position, Position, Option<PieceKind>)> {
    let team = game.side_to_move;
    let mut out = Vec::new();
    for (id, destinations) in resolution_set(game, team).iter() {
        let Some(from) = game.piece(*id).map(|p| p.position) else {
            continue;
        };
        for &to in destinations {
            if id.kind == PieceKind::Pawn && to.rank() == team.promotion_rank() {
                out.extend(PieceKind::PROMOTIONS.iter().map(|kind| (from, to, Some(*kind))));
            } else {
                out.push((from, to, None));
            }
        }
    }
    out
}
