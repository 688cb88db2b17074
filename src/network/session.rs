//! Networked two-player session.
//!
//! Threads:
//! - the caller's thread owns the `GameState` and is the only one that
//!   mutates it. `&mut self` plus the side-to-move check act as the turn
//!   token, so a local move and a remote replay can never overlap;
//! - a receiver thread reads lines from the transport, parses them and
//!   hands them over on a channel;
//! - a monitor thread sends heartbeats and, when the peer has been silent
//!   longer than the liveness timeout, raises the connection-lost flag and
//!   wakes the game thread. It never touches the board.
//!
//! Terminal outcomes (checkmate, draw, resignation, lost connection,
//! synchronization fault) stop both threads and close the transport.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::chess_errors::ChessErrors;
use crate::game_state::chess_types::{PieceKind, Position, Team};
use crate::game_state::game_config::GameConfig;
use crate::game_state::game_events::GameEvent;
use crate::game_state::game_state::GameState;
use crate::game_state::game_status::{DrawReason, GameOutcome};
use crate::move_generation::legal_move_apply::{apply_move, TurnReport};
use crate::network::peer_messages::PeerMessage;
use crate::network::remote_inference::apply_inferred_move;
use crate::network::session_log::SessionLog;
use crate::network::transport::{TransportReceiver, TransportSender};
use crate::network::wire_format::{decode_board, encode_board};
use crate::utils::render_game_state::render_game_state;

type SharedSender = Arc<Mutex<Box<dyn TransportSender>>>;

/// What `await_remote_move` observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteTurn {
    Moved(TurnReport),
    /// The peer offers a draw instead of moving; answer with
    /// `respond_to_draw` and keep waiting if declined.
    DrawOffered,
    Ended(GameEvent),
}

enum Inbound {
    Message(PeerMessage),
    Corrupt(String),
    Lost(String),
}

/// Flags shared with the background threads.
#[derive(Debug)]
struct SessionControl {
    stop: AtomicBool,
    connection_lost: AtomicBool,
    last_heard: Mutex<Instant>,
}

impl SessionControl {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            stop: AtomicBool::new(false),
            connection_lost: AtomicBool::new(false),
            last_heard: Mutex::new(Instant::now()),
        })
    }

    #[inline]
    fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    #[inline]
    fn mark_lost(&self) {
        self.connection_lost.store(true, Ordering::Relaxed);
    }

    #[inline]
    fn is_lost(&self) -> bool {
        self.connection_lost.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_heard.lock() {
            *guard = Instant::now();
        }
    }

    fn silent_for(&self) -> Duration {
        let Ok(guard) = self.last_heard.lock() else {
            return Duration::ZERO;
        };
        guard.elapsed()
    }
}

pub struct NetworkSession {
    game: GameState,
    local_team: Team,
    config: GameConfig,
    sender: SharedSender,
    inbox: Receiver<Inbound>,
    control: Arc<SessionControl>,
    log: Arc<SessionLog>,
    stop_monitor: Option<Sender<()>>,
    workers: Vec<JoinHandle<()>>,
    peer_offered_draw: bool,
}

impl NetworkSession {
    /// Start a fresh game over an already connected transport.
    pub fn start<S, R>(
        sender: S,
        receiver: R,
        local_team: Team,
        config: GameConfig,
        log: SessionLog,
    ) -> Result<Self, ChessErrors>
    where
        S: TransportSender + 'static,
        R: TransportReceiver + 'static,
    {
        let boxed: Box<dyn TransportSender> = Box::new(sender);
        let sender: SharedSender = Arc::new(Mutex::new(boxed));
        let control = SessionControl::new();
        let log = Arc::new(log);
        let (inbox_tx, inbox) = mpsc::channel();
        let (stop_monitor, stop_rx) = mpsc::channel();

        let mut workers = Vec::with_capacity(2);
        {
            let inbox_tx = inbox_tx.clone();
            let control = Arc::clone(&control);
            let log = Arc::clone(&log);
            let poll = config.heartbeat_interval;
            workers.push(spawn_worker("session-receiver", move || {
                receive_loop(receiver, inbox_tx, control, log, poll)
            })?);
        }
        {
            let sender = Arc::clone(&sender);
            let control = Arc::clone(&control);
            let log = Arc::clone(&log);
            let interval = config.heartbeat_interval;
            let timeout = config.liveness_timeout;
            workers.push(spawn_worker("session-monitor", move || {
                monitor_loop(stop_rx, sender, inbox_tx, control, log, interval, timeout)
            })?);
        }

        log.info(&format!(
            "session started, playing {local_team}, heartbeat {} ms, timeout {} ms",
            config.heartbeat_interval.as_millis(),
            config.liveness_timeout.as_millis()
        ));

        Ok(Self {
            game: GameState::new_game_with_config(&config),
            local_team,
            config,
            sender,
            inbox,
            control,
            log,
            stop_monitor: Some(stop_monitor),
            workers,
            peer_offered_draw: false,
        })
    }

    #[inline]
    pub fn game(&self) -> &GameState {
        &self.game
    }

    #[inline]
    pub fn local_team(&self) -> Team {
        self.local_team
    }

    #[inline]
    pub fn is_local_turn(&self) -> bool {
        self.game.side_to_move == self.local_team
    }

    /// Play a move for the local side and send the resulting board.
    ///
    /// An illegal request is returned as an error and changes nothing.
    pub fn play_local_move(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<TurnReport, ChessErrors> {
        self.ensure_open()?;
        if !self.is_local_turn() {
            return Err(ChessErrors::NotYourTurn(self.local_team));
        }
        self.drain_pending()?;

        let report = apply_move(&mut self.game, from, to, promotion)?;
        self.log
            .info(&format!("local move {} by {}", report.record, self.local_team));

        let wire = encode_board(&self.game.board, self.config.wire_delimiter);
        self.send_or_lose(&PeerMessage::Board(wire))?;
        self.finish_if_over();
        Ok(report)
    }

    /// Block until the peer moves, offers a draw or the session ends.
    ///
    /// A draw offer left unanswered is declined here.
    pub fn await_remote_move(&mut self) -> Result<RemoteTurn, ChessErrors> {
        self.ensure_open()?;
        if self.is_local_turn() {
            return Err(ChessErrors::NotYourTurn(self.local_team.opposite()));
        }
        if self.peer_offered_draw {
            self.peer_offered_draw = false;
            self.send_or_lose(&PeerMessage::DrawDecline)?;
        }

        loop {
            match self.next_inbound() {
                Inbound::Message(PeerMessage::Board(payload)) => {
                    return self.accept_remote_board(&payload).map(RemoteTurn::Moved);
                }
                Inbound::Message(PeerMessage::Resign) => {
                    let outcome = GameOutcome::Resignation {
                        winner: self.local_team,
                    };
                    return Ok(RemoteTurn::Ended(self.finish(outcome)));
                }
                Inbound::Message(PeerMessage::DrawOffer) => {
                    self.log.info("peer offers a draw");
                    self.peer_offered_draw = true;
                    return Ok(RemoteTurn::DrawOffered);
                }
                Inbound::Message(PeerMessage::Heartbeat) => {}
                Inbound::Message(other) => {
                    return Err(self.sync_fault(format!("unexpected '{other}' while awaiting a move")));
                }
                Inbound::Corrupt(message) => return Err(self.sync_fault(message)),
                Inbound::Lost(message) => return Err(self.lose_connection(&message)),
            }
        }
    }

    /// Answer the peer's pending draw offer.
    pub fn respond_to_draw(&mut self, accept: bool) -> Result<Option<GameEvent>, ChessErrors> {
        self.ensure_open()?;
        if !self.peer_offered_draw {
            return Err(ChessErrors::InvalidOption("no draw offer is pending".to_owned()));
        }
        self.peer_offered_draw = false;
        if accept {
            self.send_or_lose(&PeerMessage::DrawAccept)?;
            Ok(Some(self.finish(GameOutcome::Draw(DrawReason::Agreement))))
        } else {
            self.send_or_lose(&PeerMessage::DrawDecline)?;
            self.log.info("draw offer declined, play continues");
            Ok(None)
        }
    }

    /// Offer a draw on the local turn and wait for the answer.
    ///
    /// Returns `Ok(true)` when the game ended by agreement and `Ok(false)`
    /// when the peer declined; the local side is still on move then.
    pub fn offer_draw(&mut self) -> Result<bool, ChessErrors> {
        self.ensure_open()?;
        if !self.is_local_turn() {
            return Err(ChessErrors::NotYourTurn(self.local_team));
        }
        self.drain_pending()?;
        self.send_or_lose(&PeerMessage::DrawOffer)?;
        self.log.info("draw offered");

        loop {
            match self.next_inbound() {
                Inbound::Message(PeerMessage::DrawAccept) => {
                    self.finish(GameOutcome::Draw(DrawReason::Agreement));
                    return Ok(true);
                }
                Inbound::Message(PeerMessage::DrawDecline) => {
                    self.log.info("peer declined the draw");
                    return Ok(false);
                }
                Inbound::Message(PeerMessage::Resign) => {
                    self.finish(GameOutcome::Resignation {
                        winner: self.local_team,
                    });
                    return Ok(false);
                }
                Inbound::Message(PeerMessage::Heartbeat) => {}
                Inbound::Message(other) => {
                    return Err(self.sync_fault(format!("unexpected '{other}' after a draw offer")));
                }
                Inbound::Corrupt(message) => return Err(self.sync_fault(message)),
                Inbound::Lost(message) => return Err(self.lose_connection(&message)),
            }
        }
    }

    /// Surrender. Allowed on either side's turn.
    pub fn resign(&mut self) -> Result<GameEvent, ChessErrors> {
        self.ensure_open()?;
        if let Err(err) = self.send(&PeerMessage::Resign) {
            self.log.info(&format!("resignation not delivered: {err}"));
        }
        Ok(self.finish(GameOutcome::Resignation {
            winner: self.local_team.opposite(),
        }))
    }

    /// Stop background threads and close the transport. Idempotent.
    pub fn shutdown(&mut self) {
        self.control.request_stop();
        self.stop_monitor.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
        if let Ok(mut sender) = self.sender.lock() {
            sender.close();
        }
    }

    fn ensure_open(&self) -> Result<(), ChessErrors> {
        if self.game.is_over() {
            return Err(ChessErrors::GameAlreadyOver);
        }
        Ok(())
    }

    /// Handle whatever arrived while the local side was thinking. Only
    /// heartbeats are expected on the local turn.
    fn drain_pending(&mut self) -> Result<(), ChessErrors> {
        loop {
            match self.inbox.try_recv() {
                Ok(Inbound::Message(PeerMessage::Heartbeat)) => {}
                Ok(Inbound::Message(PeerMessage::Resign)) => {
                    self.finish(GameOutcome::Resignation {
                        winner: self.local_team,
                    });
                    return Err(ChessErrors::GameAlreadyOver);
                }
                Ok(Inbound::Message(other)) => {
                    return Err(self.sync_fault(format!("unexpected '{other}' on the local turn")));
                }
                Ok(Inbound::Corrupt(message)) => return Err(self.sync_fault(message)),
                Ok(Inbound::Lost(message)) => return Err(self.lose_connection(&message)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(self.lose_connection("session threads stopped"));
                }
            }
        }
        if self.control.is_lost() {
            return Err(self.lose_connection("liveness monitor gave up"));
        }
        Ok(())
    }

    fn next_inbound(&mut self) -> Inbound {
        self.inbox
            .recv()
            .unwrap_or_else(|_| Inbound::Lost("session threads stopped".to_owned()))
    }

    fn accept_remote_board(&mut self, payload: &str) -> Result<TurnReport, ChessErrors> {
        let replayed = decode_board(payload, self.config.wire_delimiter)
            .and_then(|board| apply_inferred_move(&mut self.game, &board));
        match replayed {
            Ok(report) => {
                self.log.info(&format!(
                    "remote move {} by {}",
                    report.record,
                    self.local_team.opposite()
                ));
                self.finish_if_over();
                Ok(report)
            }
            Err(err) => {
                self.log
                    .info(&format!("local board at fault:\n{}", render_game_state(&self.game)));
                Err(self.sync_fault(err.to_string()))
            }
        }
    }

    fn send(&self, message: &PeerMessage) -> Result<(), ChessErrors> {
        let mut sender = self
            .sender
            .lock()
            .map_err(|_| ChessErrors::TransportFault("sender lock poisoned".to_owned()))?;
        sender.send_line(&message.to_string())
    }

    fn send_or_lose(&mut self, message: &PeerMessage) -> Result<(), ChessErrors> {
        match self.send(message) {
            Ok(()) => Ok(()),
            Err(err) => Err(self.lose_connection(&err.to_string())),
        }
    }

    fn sync_fault(&mut self, message: String) -> ChessErrors {
        self.finish(GameOutcome::SynchronizationFault(message.clone()));
        ChessErrors::SynchronizationFault(message)
    }

    fn lose_connection(&mut self, reason: &str) -> ChessErrors {
        self.log.info(&format!("connection lost: {reason}"));
        self.finish(GameOutcome::ConnectionLost);
        ChessErrors::ConnectionLost
    }

    fn finish_if_over(&mut self) {
        if let Some(outcome) = self.game.outcome.clone() {
            self.finish(outcome);
        }
    }

    /// Record the outcome (the first one wins), log it and release resources.
    fn finish(&mut self, outcome: GameOutcome) -> GameEvent {
        let outcome = self.game.outcome.get_or_insert(outcome).clone();
        self.log.info(&format!("game over: {outcome}"));
        self.shutdown();
        GameEvent::from_outcome(&outcome)
    }
}

impl Drop for NetworkSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker<F>(name: &str, body: F) -> Result<JoinHandle<()>, ChessErrors>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(body)
        .map_err(|err| ChessErrors::TransportFault(format!("cannot spawn {name}: {err}")))
}

fn receive_loop<R: TransportReceiver>(
    mut receiver: R,
    inbox: Sender<Inbound>,
    control: Arc<SessionControl>,
    log: Arc<SessionLog>,
    poll: Duration,
) {
    while !control.should_stop() {
        match receiver.receive_line(poll) {
            Ok(Some(line)) => {
                control.touch();
                match PeerMessage::parse(&line) {
                    Ok(PeerMessage::Heartbeat) => log.debug("heartbeat received"),
                    Ok(message) => {
                        log.debug(&format!("received {message}"));
                        if inbox.send(Inbound::Message(message)).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        let _ = inbox.send(Inbound::Corrupt(err.to_string()));
                        break;
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                control.mark_lost();
                let _ = inbox.send(Inbound::Lost(err.to_string()));
                break;
            }
        }
    }
}

fn monitor_loop(
    stop_rx: Receiver<()>,
    sender: SharedSender,
    inbox: Sender<Inbound>,
    control: Arc<SessionControl>,
    log: Arc<SessionLog>,
    interval: Duration,
    timeout: Duration,
) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
        if control.should_stop() {
            break;
        }

        let sent = match sender.lock() {
            Ok(mut sender) => sender.send_line(&PeerMessage::Heartbeat.to_string()),
            Err(_) => Err(ChessErrors::TransportFault("sender lock poisoned".to_owned())),
        };
        if let Err(err) = sent {
            control.mark_lost();
            let _ = inbox.send(Inbound::Lost(err.to_string()));
            break;
        }
        log.debug("heartbeat sent");

        let silent = control.silent_for();
        if silent >= timeout {
            control.mark_lost();
            let _ = inbox.send(Inbound::Lost(format!(
                "peer silent for {} ms",
                silent.as_millis()
            )));
            break;
        }
    }
}
