//! Hot-seat command front-end.
//!
//! Reads one command per line from stdin, applies it to a local game and
//! prints the resulting events. Problems are reported as `info string`
//! lines and never end the loop.
//!
//! Commands: `new`, `show`, `moves <square>`, `move <from><to>[q|r|b|n]`,
//! `resign`, `setoption name <N> value <V>`, `debug on|off`, `help`, `quit`.

use std::io::{self, BufRead, Write};

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::Position;
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_events::GameEvent;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::GameOutcome;
use crate::move_generation::legal_move_apply::{apply_move, TurnReport};
use crate::move_generation::legal_move_generator::legal_destinations_at;
use crate::utils::algebraic::{algebraic_to_position, parse_coordinate_move};
use crate::utils::render_game_state::render_game_state;

pub fn run_stdio_loop() -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut state = CommandState::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let should_quit = state.handle_command(&line, &mut stdout)?;
        stdout.flush()?;
        if should_quit {
            break;
        }
    }

    Ok(())
}

struct CommandState {
    game: GameState,
    config: GameConfig,
}

impl CommandState {
    fn new() -> Self {
        let config = GameConfig::default();
        Self {
            game: GameState::new_game_with_config(&config),
            config,
        }
    }

    fn handle_command(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        let mut parts = trimmed.split_whitespace();
        let cmd = parts.next().unwrap_or_default();

        match cmd {
            "new" => {
                self.game = GameState::new_game_with_config(&self.config);
                writeln!(out, "ok new game, {} to move", self.game.side_to_move)?;
            }
            "show" => {
                writeln!(out, "{}", render_game_state(&self.game))?;
            }
            "moves" => {
                let square = parts.next().unwrap_or_default();
                match algebraic_to_position(square).and_then(|sq| legal_destinations_at(&self.game, sq)) {
                    Ok(event) => writeln!(out, "{}", describe_event(&event))?,
                    Err(err) => writeln!(out, "info string moves error: {err}")?,
                }
            }
            "move" => {
                let text = parts.next().unwrap_or_default();
                match self.handle_move(text) {
                    Ok(report) => self.print_report(&report, out)?,
                    Err(err) => writeln!(out, "info string move error: {err}")?,
                }
            }
            "resign" => {
                if self.game.is_over() {
                    writeln!(out, "info string resign error: {}", ChessErrors::GameAlreadyOver)?;
                } else {
                    let outcome = GameOutcome::Resignation {
                        winner: self.game.side_to_move.opposite(),
                    };
                    writeln!(out, "{}", describe_event(&GameEvent::from_outcome(&outcome)))?;
                    self.game.outcome = Some(outcome);
                }
            }
            "setoption" => {
                if let Err(err) = self.handle_setoption(trimmed) {
                    writeln!(out, "info string setoption error: {err}")?;
                }
            }
            "debug" => {
                let mode = parts.next().unwrap_or_default();
                if let Err(err) = self.config.set_option("Debug", mode) {
                    writeln!(out, "info string debug error: {err}")?;
                }
            }
            "help" => {
                writeln!(
                    out,
                    "commands: new, show, moves <sq>, move <from><to>[q|r|b|n], resign, \
                     setoption name <N> value <V>, debug on|off, quit"
                )?;
                writeln!(out, "options: {}", GameConfig::OPTION_NAMES.join(", "))?;
            }
            "quit" => {
                return Ok(true);
            }
            _ => {
                writeln!(out, "info string unknown command '{cmd}'")?;
            }
        }

        Ok(false)
    }

    fn handle_move(&mut self, text: &str) -> Result<TurnReport, ChessErrors> {
        let (from, to, promotion) = parse_coordinate_move(text)?;
        apply_move(&mut self.game, from, to, promotion)
    }

    fn print_report(&self, report: &TurnReport, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "played {}", report.record)?;
        if self.config.debug {
            writeln!(
                out,
                "info string piece {} status {:?} quiet plies {}",
                report.record.piece_id, report.status, self.game.counters.half_moves_since_progress
            )?;
        }
        for event in &report.events {
            writeln!(out, "{}", describe_event(event))?;
        }
        Ok(())
    }

    fn handle_setoption(&mut self, line: &str) -> Result<(), ChessErrors> {
        let mut name_tokens = Vec::<&str>::new();
        let mut value_tokens = Vec::<&str>::new();
        let mut mode = "";

        for tok in line.split_whitespace().skip(1) {
            match tok {
                "name" => mode = "name",
                "value" => mode = "value",
                _ if mode == "name" => name_tokens.push(tok),
                _ if mode == "value" => value_tokens.push(tok),
                _ => {}
            }
        }

        self.config
            .set_option(&name_tokens.join(" "), &value_tokens.join(" "))?;
        self.game.counters.limit = self.config.draw_half_move_limit;
        Ok(())
    }
}

fn describe_event(event: &GameEvent) -> String {
    let squares = |list: &[Position]| {
        list.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
    };
    match event {
        GameEvent::CheckDetected {
            team,
            threatening_squares,
        } => format!("check {team} from {}", squares(threatening_squares)),
        GameEvent::Checkmate { winner } => format!("checkmate {winner} wins"),
        GameEvent::Draw { reason } => format!("draw {reason}"),
        GameEvent::Resignation { winner } => format!("resignation {winner} wins"),
        GameEvent::ConnectionLost => "connection lost".to_owned(),
        GameEvent::SynchronizationFault { message } => format!("sync fault {message}"),
        GameEvent::LegalDestinations {
            piece,
            destinations,
        } => format!("moves {piece} {}", squares(destinations)).trim_end().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(state: &mut CommandState, lines: &[&str]) -> String {
        let mut out = Vec::new();
        for line in lines {
            state
                .handle_command(line, &mut out)
                .expect("writing to a Vec cannot fail");
        }
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn moves_lists_destinations_for_selected_piece() {
        let mut state = CommandState::new();
        let text = run(&mut state, &["moves g1"]);
        assert_eq!(text.trim(), "moves +:4:2 f3 h3");
    }

    #[test]
    fn fools_mate_prints_check_and_checkmate() {
        let mut state = CommandState::new();
        let text = run(
            &mut state,
            &["move f2f3", "move e7e5", "move g2g4", "move d8h4"],
        );
        assert!(text.contains("played d8h4"));
        assert!(text.contains("check White from h4"));
        assert!(text.contains("checkmate Black wins"));
        let after = run(&mut state, &["move a2a3"]);
        assert!(after.starts_with("info string move error"));
    }

    #[test]
    fn illegal_and_malformed_moves_are_reported() {
        let mut state = CommandState::new();
        let text = run(&mut state, &["move e2e5", "move zz", "moves e4"]);
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().all(|l| l.starts_with("info string")));
        assert_eq!(state.game.ply, 0);
    }

    #[test]
    fn setoption_updates_running_game_limit() {
        let mut state = CommandState::new();
        let text = run(
            &mut state,
            &["setoption name DrawHalfMoveLimit value 4", "setoption name Bogus value 1"],
        );
        assert_eq!(state.game.counters.limit, 4);
        assert_eq!(text.lines().count(), 1);
        let text = run(
            &mut state,
            &["move g1f3", "move g8f6", "move f3g1", "move f6g8"],
        );
        assert!(text.contains("draw half-move limit"));
    }

    #[test]
    fn resign_ends_game_for_side_to_move() {
        let mut state = CommandState::new();
        let text = run(&mut state, &["move e2e4", "resign", "resign"]);
        assert!(text.contains("resignation White wins"));
        assert!(text.lines().last().is_some_and(|l| l.starts_with("info string resign error")));
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut state = CommandState::new();
        let mut out = Vec::new();
        assert!(state.handle_command("quit", &mut out).expect("write"));
        assert!(!state.handle_command("show", &mut out).expect("write"));
    }
}
