//! Transport seam between sessions and the wire.

use crate::error::{Result, SyncError};
use crate::shutdown::ShutdownSignal;
use crate::types::ClientCommand;
use crossbeam_channel::{select, unbounded, Receiver, RecvTimeoutError, Sender};
use serde_json::Value;
use std::time::Duration;

/// Message-oriented, ordered, reliable connection to one observer.
///
/// Framing lives here: every document goes out as one newline-terminated
/// compact JSON line. Implementations must make `receive_command`
/// cancellable — returning [`SyncError::Cancelled`] once process
/// shutdown is requested and [`SyncError::Disconnected`] when the peer
/// goes away — so a session blocked on an acknowledgment can still
/// terminate.
pub trait Transport: Send {
    /// Send one JSON document to the client.
    fn send_document(&mut self, document: &Value) -> Result<()>;

    /// Block until the client sends its next command.
    fn receive_command(&mut self) -> Result<ClientCommand>;

    /// Whether the connection is still usable for sending.
    fn is_connected(&self) -> bool;
}

/// In-process transport over crossbeam channels.
///
/// Serves same-process observers (and the test suite) with the same
/// session protocol a socket transport would carry: serialized document
/// lines out, [`ClientCommand`]s in.
pub struct ChannelTransport {
    documents: Sender<String>,
    commands: Receiver<ClientCommand>,
    shutdown: ShutdownSignal,
    connected: bool,
}

/// Client half of a [`ChannelTransport`].
pub struct ChannelPeer {
    documents: Receiver<String>,
    commands: Sender<ClientCommand>,
}

/// Create a connected transport/peer pair.
pub fn channel_transport(shutdown: ShutdownSignal) -> (ChannelTransport, ChannelPeer) {
    let (doc_tx, doc_rx) = unbounded();
    let (cmd_tx, cmd_rx) = unbounded();

    (
        ChannelTransport {
            documents: doc_tx,
            commands: cmd_rx,
            shutdown,
            connected: true,
        },
        ChannelPeer {
            documents: doc_rx,
            commands: cmd_tx,
        },
    )
}

impl Transport for ChannelTransport {
    fn send_document(&mut self, document: &Value) -> Result<()> {
        let mut line = serde_json::to_string(document)?;
        line.push('\n');

        if self.documents.send(line).is_err() {
            self.connected = false;
            return Err(SyncError::Disconnected);
        }
        Ok(())
    }

    fn receive_command(&mut self) -> Result<ClientCommand> {
        select! {
            recv(self.commands) -> msg => match msg {
                Ok(command) => Ok(command),
                Err(_) => {
                    self.connected = false;
                    Err(SyncError::Disconnected)
                }
            },
            recv(self.shutdown.receiver()) -> _ => Err(SyncError::Cancelled),
        }
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

impl ChannelPeer {
    /// Receive the next document line, waiting up to `timeout`.
    pub fn recv_line(&self, timeout: Duration) -> Option<String> {
        match self.documents.recv_timeout(timeout) {
            Ok(line) => Some(line),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Receive and parse the next document, waiting up to `timeout`.
    pub fn recv_document(&self, timeout: Duration) -> Option<Value> {
        self.recv_line(timeout)
            .and_then(|line| serde_json::from_str(&line).ok())
    }

    /// Send a command to the session. Returns false if the session is
    /// gone.
    pub fn send_command(&self, command: ClientCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Acknowledge the previously received document.
    pub fn acknowledge(&self) -> bool {
        self.send_command(ClientCommand::Acknowledge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::shutdown_channel;
    use serde_json::json;

    #[test]
    fn test_documents_are_newline_terminated_lines() {
        let (_guard, signal) = shutdown_channel();
        let (mut transport, peer) = channel_transport(signal);

        transport.send_document(&json!({"status": "idle"})).unwrap();

        let line = peer.recv_line(Duration::from_millis(100)).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(
            serde_json::from_str::<Value>(&line).unwrap(),
            json!({"status": "idle"})
        );
    }

    #[test]
    fn test_receive_unblocks_on_shutdown() {
        let (guard, signal) = shutdown_channel();
        let (mut transport, _peer) = channel_transport(signal);

        drop(guard);
        assert!(matches!(
            transport.receive_command(),
            Err(SyncError::Cancelled)
        ));
    }

    #[test]
    fn test_peer_drop_disconnects() {
        let (_guard, signal) = shutdown_channel();
        let (mut transport, peer) = channel_transport(signal);
        drop(peer);

        assert!(matches!(
            transport.send_document(&json!({})),
            Err(SyncError::Disconnected)
        ));
        assert!(!transport.is_connected());
    }
}
