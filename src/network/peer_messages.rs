//! Text lines exchanged between the two players' sessions.

use std::fmt;

use crate::chess_errors::ChessErrors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMessage {
    /// Full board after the sender's move, in wire format.
    Board(String),
    Heartbeat,
    Resign,
    DrawOffer,
    DrawAccept,
    DrawDecline,
}

impl PeerMessage {
    pub fn parse(line: &str) -> Result<Self, ChessErrors> {
        let line = line.trim_end_matches(['\r', '\n']);
        if let Some(payload) = line.strip_prefix("BOARD ") {
            return Ok(PeerMessage::Board(payload.to_owned()));
        }
        match line.trim() {
            "HEARTBEAT" => Ok(PeerMessage::Heartbeat),
            "RESIGN" => Ok(PeerMessage::Resign),
            "DRAW_OFFER" => Ok(PeerMessage::DrawOffer),
            "DRAW_ACCEPT" => Ok(PeerMessage::DrawAccept),
            "DRAW_DECLINE" => Ok(PeerMessage::DrawDecline),
            other => Err(ChessErrors::InvalidWireFormat(format!(
                "unknown peer message '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PeerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerMessage::Board(payload) => write!(f, "BOARD {payload}"),
            PeerMessage::Heartbeat => write!(f, "HEARTBEAT"),
            PeerMessage::Resign => write!(f, "RESIGN"),
            PeerMessage::DrawOffer => write!(f, "DRAW_OFFER"),
            PeerMessage::DrawAccept => write!(f, "DRAW_ACCEPT"),
            PeerMessage::DrawDecline => write!(f, "DRAW_DECLINE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_payload_keeps_empty_cells() {
        let line = "BOARD |+:1:1||";
        let parsed = PeerMessage::parse(line).expect("board line parses");
        assert_eq!(parsed, PeerMessage::Board("|+:1:1||".to_owned()));
        assert_eq!(parsed.to_string(), line);
    }

    #[test]
    fn control_messages_parse() {
        assert_eq!(PeerMessage::parse("HEARTBEAT\n"), Ok(PeerMessage::Heartbeat));
        assert_eq!(PeerMessage::parse("DRAW_OFFER"), Ok(PeerMessage::DrawOffer));
        assert!(PeerMessage::parse("MOVE e2e4").is_err());
    }
}
