//! Board snapshot wire format.
//!
//! A snapshot is the 64 cells in index order (a1, b1, .., h1, a2, .., h8),
//! each written as its piece identity `<+|->:<kind code>:<instance>[P]` or
//! as an empty string when vacant, joined by one delimiter character.

use std::collections::HashSet;

use crate::chess_errors::ChessErrors;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceId, PieceKind, Team};

const CELL_COUNT: usize = 64;

impl PieceId {
    pub fn to_wire(&self) -> String {
        self.to_string()
    }

    pub fn from_wire(text: &str) -> Result<Self, ChessErrors> {
        let bad = || ChessErrors::InvalidWireFormat(format!("bad piece identity '{text}'"));

        let mut parts = text.split(':');
        let (Some(sign), Some(code), Some(instance), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };

        let mut sign_chars = sign.chars();
        let team = match (sign_chars.next(), sign_chars.next()) {
            (Some(c), None) => Team::from_wire_sign(c).ok_or_else(bad)?,
            _ => return Err(bad()),
        };
        let kind = code
            .parse::<u8>()
            .ok()
            .and_then(PieceKind::from_wire_code)
            .ok_or_else(bad)?;

        let (digits, promoted) = match instance.strip_suffix('P') {
            Some(digits) => (digits, true),
            None => (instance, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        let instance = digits.parse::<u8>().ok().filter(|x| *x > 0).ok_or_else(bad)?;
        if promoted && matches!(kind, PieceKind::King | PieceKind::Pawn) {
            return Err(bad());
        }

        Ok(Self {
            team,
            kind,
            instance,
            promoted,
        })
    }
}

pub fn encode_board(board: &Board, delimiter: char) -> String {
    let mut out = String::with_capacity(CELL_COUNT * 6);
    for (i, cell) in board.cells().iter().enumerate() {
        if i > 0 {
            out.push(delimiter);
        }
        if let Some(id) = cell {
            out.push_str(&id.to_wire());
        }
    }
    out
}

/// Parse a snapshot. Field count, identities and uniqueness are checked;
/// chess legality is not.
pub fn decode_board(text: &str, delimiter: char) -> Result<Board, ChessErrors> {
    let fields: Vec<&str> = text.split(delimiter).collect();
    if fields.len() != CELL_COUNT {
        return Err(ChessErrors::InvalidWireFormat(format!(
            "expected {CELL_COUNT} cells, got {}",
            fields.len()
        )));
    }

    let mut cells = [None; CELL_COUNT];
    let mut seen = HashSet::new();
    for (cell, field) in cells.iter_mut().zip(fields) {
        if field.is_empty() {
            continue;
        }
        let id = PieceId::from_wire(field)?;
        if !seen.insert(id) {
            return Err(ChessErrors::InvalidWireFormat(format!(
                "piece identity {id} appears twice"
            )));
        }
        *cell = Some(id);
    }
    Ok(Board::from_cells(cells))
}
