//! Runtime configuration for rules and networked sessions.
//!
//! Options are set by name, the same way a `setoption name X value Y`
//! command is handled: names match case-insensitively and bad values are
//! reported without changing the current setting.

use std::time::Duration;

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_rules::DEFAULT_DRAW_HALF_MOVE_LIMIT;

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_WIRE_DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub draw_half_move_limit: u16,
    pub heartbeat_interval: Duration,
    /// No message from the peer within this window ends the session.
    pub liveness_timeout: Duration,
    pub wire_delimiter: char,
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            draw_half_move_limit: DEFAULT_DRAW_HALF_MOVE_LIMIT,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            liveness_timeout: DEFAULT_LIVENESS_TIMEOUT,
            wire_delimiter: DEFAULT_WIRE_DELIMITER,
            debug: false,
        }
    }
}

impl GameConfig {
    /// Names accepted by `set_option`, for help output.
    pub const OPTION_NAMES: [&'static str; 5] = [
        "DrawHalfMoveLimit",
        "HeartbeatIntervalMs",
        "LivenessTimeoutMs",
        "WireDelimiter",
        "Debug",
    ];

    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ChessErrors> {
        let value = value.trim();
        if name.eq_ignore_ascii_case("DrawHalfMoveLimit") {
            let parsed = value
                .parse::<u16>()
                .ok()
                .filter(|x| *x > 0)
                .ok_or_else(|| invalid(name, value))?;
            self.draw_half_move_limit = parsed;
        } else if name.eq_ignore_ascii_case("HeartbeatIntervalMs") {
            self.heartbeat_interval = parse_millis(name, value)?;
        } else if name.eq_ignore_ascii_case("LivenessTimeoutMs") {
            self.liveness_timeout = parse_millis(name, value)?;
        } else if name.eq_ignore_ascii_case("WireDelimiter") {
            let mut chars = value.chars();
            let delimiter = match (chars.next(), chars.next()) {
                (Some(c), None) if is_usable_delimiter(c) => c,
                _ => return Err(invalid(name, value)),
            };
            self.wire_delimiter = delimiter;
        } else if name.eq_ignore_ascii_case("Debug") {
            self.debug = match value.to_ascii_lowercase().as_str() {
                "true" | "on" => true,
                "false" | "off" => false,
                _ => return Err(invalid(name, value)),
            };
        } else {
            return Err(ChessErrors::InvalidOption(format!("unknown option '{name}'")));
        }
        Ok(())
    }
}

/// The delimiter must not collide with characters of the identity encoding.
fn is_usable_delimiter(c: char) -> bool {
    !(c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | ':' | 'P'))
}

fn parse_millis(name: &str, value: &str) -> Result<Duration, ChessErrors> {
    value
        .parse::<u64>()
        .ok()
        .filter(|x| *x > 0)
        .map(Duration::from_millis)
        .ok_or_else(|| invalid(name, value))
}

fn invalid(name: &str, value: &str) -> ChessErrors {
    ChessErrors::InvalidOption(format!("invalid {name} value '{value}'"))
}
