//! Conversions between algebraic coordinates and `Position`.
//!
//! Used by tests, position setup and the command loop (`e4`, `e2e4`, `e7e8q`).

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{PieceKind, Position};

/// Convert algebraic notation (for example: "e4") to a position.
#[inline]
pub fn algebraic_to_position(square: &str) -> Result<Position, ChessErrors> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidAlgebraic(square.to_owned()));
    }

    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidAlgebraic(square.to_owned()));
    }

    Position::new(file - b'a', rank - b'1')
        .ok_or_else(|| ChessErrors::InvalidAlgebraic(square.to_owned()))
}

/// Parse a coordinate move such as "e2e4" or "e7e8q".
pub fn parse_coordinate_move(
    text: &str,
) -> Result<(Position, Position, Option<PieceKind>), ChessErrors> {
    let text = text.trim();
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(ChessErrors::InvalidAlgebraic(text.to_owned()));
    }

    let from = algebraic_to_position(&text[0..2])?;
    let to = algebraic_to_position(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        Some(c) => Some(
            PieceKind::from_promotion_char(c)
                .ok_or_else(|| ChessErrors::InvalidAlgebraic(text.to_owned()))?,
        ),
        None => None,
    };
    Ok((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_square_conversions() {
        let a1 = algebraic_to_position("a1").expect("a1 should parse");
        let h8 = algebraic_to_position("h8").expect("h8 should parse");
        assert_eq!(a1.index(), 0);
        assert_eq!(h8.index(), 63);
        assert_eq!(a1.to_string(), "a1");
        assert_eq!(h8.to_string(), "h8");
    }

    #[test]
    fn rejects_off_board_squares() {
        assert!(algebraic_to_position("i1").is_err());
        assert!(algebraic_to_position("a9").is_err());
        assert!(algebraic_to_position("a").is_err());
    }

    #[test]
    fn parses_promotion_suffix() {
        let (from, to, promo) = parse_coordinate_move("e7e8n").expect("move should parse");
        assert_eq!(from.to_string(), "e7");
        assert_eq!(to.to_string(), "e8");
        assert_eq!(promo, Some(PieceKind::Knight));
        assert!(parse_coordinate_move("e7e8k").is_err());
        assert_eq!(
            parse_coordinate_move("g1f3").expect("move should parse").2,
            None
        );
    }
}
