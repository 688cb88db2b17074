//! Line transport seam.
//!
//! Framing and connection setup live behind these traits. The session only
//! needs to push a text line and to wait a bounded time for the next one.
//! Any error is a lost connection; nothing is retried.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::chess_errors::ChessErrors;

pub trait TransportSender: Send {
    fn send_line(&mut self, line: &str) -> Result<(), ChessErrors>;

    /// Release the underlying connection. Further sends fail.
    fn close(&mut self) {}
}

pub trait TransportReceiver: Send {
    /// Next line, or `Ok(None)` if nothing arrived within `timeout`.
    fn receive_line(&mut self, timeout: Duration) -> Result<Option<String>, ChessErrors>;
}

/// In-process transport end backed by `std::sync::mpsc`.
pub struct ChannelSender {
    tx: Option<Sender<String>>,
}

pub struct ChannelReceiver {
    rx: Receiver<String>,
}

impl TransportSender for ChannelSender {
    fn send_line(&mut self, line: &str) -> Result<(), ChessErrors> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| ChessErrors::TransportFault("sender closed".to_owned()))?;
        tx.send(line.to_owned())
            .map_err(|_| ChessErrors::TransportFault("peer hung up".to_owned()))
    }

    fn close(&mut self) {
        self.tx = None;
    }
}

impl TransportReceiver for ChannelReceiver {
    fn receive_line(&mut self, timeout: Duration) -> Result<Option<String>, ChessErrors> {
        match self.rx.recv_timeout(timeout) {
            Ok(line) => Ok(Some(line)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(ChessErrors::ConnectionLost),
        }
    }
}

/// Connection endpoints for one side: what it sends and what it hears.
pub struct ChannelEndpoint {
    pub sender: ChannelSender,
    pub receiver: ChannelReceiver,
}

/// Two cross-wired endpoints, one per player.
pub fn channel_pair() -> (ChannelEndpoint, ChannelEndpoint) {
    let (a_tx, b_rx) = mpsc::channel();
    let (b_tx, a_rx) = mpsc::channel();
    (
        ChannelEndpoint {
            sender: ChannelSender { tx: Some(a_tx) },
            receiver: ChannelReceiver { rx: a_rx },
        },
        ChannelEndpoint {
            sender: ChannelSender { tx: Some(b_tx) },
            receiver: ChannelReceiver { rx: b_rx },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_cross_between_endpoints() {
        let (mut a, mut b) = channel_pair();
        a.sender.send_line("HEARTBEAT").expect("send succeeds");
        assert_eq!(
            b.receiver.receive_line(Duration::from_millis(50)),
            Ok(Some("HEARTBEAT".to_owned()))
        );
        assert_eq!(a.receiver.receive_line(Duration::from_millis(10)), Ok(None));
    }

    #[test]
    fn closing_disconnects_the_peer() {
        let (mut a, mut b) = channel_pair();
        a.sender.close();
        assert!(a.sender.send_line("RESIGN").is_err());
        assert_eq!(
            b.receiver.receive_line(Duration::from_millis(10)),
            Err(ChessErrors::ConnectionLost)
        );
    }
}
