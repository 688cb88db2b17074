//! Text board renderer for diagnostics.
//!
//! Used by the command loop's `show` and by session logs when a received
//! board cannot be reconciled. Rank 8 is printed first.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Position, Team};
use crate::game_state::game_state::GameState;

pub fn render_board(board: &Board) -> String {
    let mut out = String::new();
    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');
        for file in 0..8u8 {
            let cell = Position::new(file, rank).and_then(|pos| board.piece_at(pos));
            match cell {
                Some(id) => out.push(piece_to_unicode(id.team, id.kind)),
                None => out.push('·'),
            }
            if file < 7 {
                out.push(' ');
            }
        }
        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}

/// Board plus side to move and draw counter.
pub fn render_game_state(game: &GameState) -> String {
    format!(
        "{}\n{} to move, ply {}, {} quiet plies",
        render_board(&game.board),
        game.side_to_move,
        game.ply,
        game.counters.half_moves_since_progress
    )
}

fn piece_to_unicode(team: Team, kind: PieceKind) -> char {
    match (team, kind) {
        (Team::White, PieceKind::Pawn) => '♙',
        (Team::White, PieceKind::Knight) => '♘',
        (Team::White, PieceKind::Bishop) => '♗',
        (Team::White, PieceKind::Rook) => '♖',
        (Team::White, PieceKind::Queen) => '♕',
        (Team::White, PieceKind::King) => '♔',
        (Team::Black, PieceKind::Pawn) => '♟',
        (Team::Black, PieceKind::Knight) => '♞',
        (Team::Black, PieceKind::Bishop) => '♝',
        (Team::Black, PieceKind::Rook) => '♜',
        (Team::Black, PieceKind::Queen) => '♛',
        (Team::Black, PieceKind::King) => '♚',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_board_renders_rank_eight_first() {
        let text = render_board(&Board::starting_layout());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[1], "8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜ 8");
        assert_eq!(lines[5], "4 · · · · · · · · 4");
        assert_eq!(lines[8], "1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖ 1");
    }

    #[test]
    fn game_state_footer_names_side_to_move() {
        let text = render_game_state(&GameState::new_game());
        assert!(text.ends_with("White to move, ply 0, 0 quiet plies"));
    }
}
