//! Process-wide shutdown signaling.
//!
//! Built on sender-drop disconnection of a zero-message crossbeam
//! channel: every clone of the [`ShutdownSignal`] receiver unblocks at
//! once when the guard goes away, which makes it usable inside
//! `select!` arms at the session wait points.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};

/// Requests shutdown when dropped (or via [`ShutdownGuard::trigger`]).
pub struct ShutdownGuard {
    _keepalive: Sender<()>,
}

impl ShutdownGuard {
    /// Explicitly request shutdown.
    pub fn trigger(self) {}
}

/// Clonable handle observed by sessions and transports.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: Receiver<()>,
}

impl ShutdownSignal {
    /// True once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block until shutdown is requested.
    pub fn wait(&self) {
        let _ = self.rx.recv();
    }

    /// Raw receiver for `select!` integration. Nothing is ever sent on
    /// it; it only disconnects.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}

/// Create a linked guard/signal pair.
pub fn shutdown_channel() -> (ShutdownGuard, ShutdownSignal) {
    let (tx, rx) = bounded(0);
    (ShutdownGuard { _keepalive: tx }, ShutdownSignal { rx })
}
