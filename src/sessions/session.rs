//! Subscription session state machine.

use crate::diff::diff;
use crate::error::{Result, SyncError};
use crate::model::{ModelProvider, ObservableModel};
use crate::registry::{SubscriberRegistry, UpdateSlot};
use crate::sessions::Transport;
use crate::shutdown::ShutdownSignal;
use crate::snapshot::{capture, Snapshot};
use crate::types::{ClientCommand, ErrorEnvelope, SessionId, SubscriptionMode};
use crossbeam_channel::{select, Receiver};
use std::sync::Arc;
use tracing::debug;

/// One observer's subscription lifecycle.
///
/// Created by [`Session::attach`], which captures the current model and
/// registers with the registry, then driven by [`Session::run`] on a
/// dedicated thread:
///
/// 1. send the full initial document (mode-independent),
/// 2. wait for the client's acknowledgment,
/// 3. wait for the next pending snapshot,
/// 4. send it whole (Full mode) or as a diff against the last delivered
///    snapshot (Patch mode), and loop back to 2.
///
/// The pending slot holds only the latest snapshot: updates arriving
/// while the session is mid-cycle coalesce, so a slow client only ever
/// sees the most recent state.
pub struct Session {
    id: SessionId,
    mode: SubscriptionMode,
    last_delivered: Snapshot,
    slot: Arc<UpdateSlot>,
    wakeup: Receiver<()>,
    transport: Box<dyn Transport>,
    registry: Arc<SubscriberRegistry>,
    shutdown: ShutdownSignal,
}

impl Session {
    /// Capture the current model and register with the registry.
    ///
    /// The capture happens before registration, so the initial send
    /// always reflects a state at least as new as anything published
    /// before the entry became visible to fan-out.
    pub fn attach<M: ObservableModel>(
        provider: &ModelProvider<M>,
        registry: Arc<SubscriberRegistry>,
        transport: Box<dyn Transport>,
        mode: SubscriptionMode,
        shutdown: ShutdownSignal,
    ) -> Result<Session> {
        if shutdown.is_requested() {
            return Err(SyncError::Cancelled);
        }

        let initial = capture(provider)?;
        let registration = registry.register(mode);

        Ok(Session {
            id: registration.id,
            mode,
            last_delivered: initial,
            slot: registration.slot,
            wakeup: registration.wakeup,
            transport,
            registry,
            shutdown,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Drive the session until cancellation, disconnect, or error.
    ///
    /// Always unregisters from the registry exactly once. Shutdown
    /// cancellation is a clean close and returns `Ok`; protocol
    /// violations and transport failures propagate to the owning thread
    /// after a best-effort error envelope to a still-connected client.
    pub fn run(mut self) -> Result<()> {
        let outcome = self.drive();
        self.registry.unregister(self.id);

        match outcome {
            Ok(()) => Ok(()),
            Err(SyncError::Cancelled) => {
                debug!(session = %self.id, "session closed by shutdown");
                Ok(())
            }
            Err(err) => {
                debug!(session = %self.id, error = %err, "session errored");
                if self.transport.is_connected() {
                    if let Ok(envelope) = serde_json::to_value(ErrorEnvelope::from_error(&err)) {
                        let _ = self.transport.send_document(&envelope);
                    }
                }
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<()> {
        // The first message is always the full model, regardless of mode.
        debug!(session = %self.id, mode = ?self.mode, "sending initial model");
        self.transport.send_document(&self.last_delivered)?;

        loop {
            self.await_acknowledgment()?;
            let current = self.await_update()?;

            match self.mode {
                SubscriptionMode::Full => {
                    self.transport.send_document(&current)?;
                }
                SubscriptionMode::Patch => {
                    if !self.last_delivered.is_object() || !current.is_object() {
                        return Err(SyncError::MalformedSnapshot(
                            "model document root must be an object".to_string(),
                        ));
                    }
                    let patch = diff(&self.last_delivered, &current);
                    self.transport.send_document(&patch)?;
                }
            }

            self.last_delivered = current;
        }
    }

    /// AwaitingAck: only an acknowledgment is legal here.
    fn await_acknowledgment(&mut self) -> Result<()> {
        match self.transport.receive_command()? {
            ClientCommand::Acknowledge => Ok(()),
            ClientCommand::Unsupported => Err(SyncError::UnsupportedCommand(
                "only Acknowledge is accepted while a subscription awaits an update".to_string(),
            )),
        }
    }

    /// AwaitingUpdate: block until the fan-out installs a snapshot or
    /// shutdown is requested.
    fn await_update(&self) -> Result<Snapshot> {
        loop {
            select! {
                recv(self.wakeup) -> msg => {
                    if msg.is_err() {
                        return Err(SyncError::Cancelled);
                    }
                    // An empty slot means an earlier wake already drained
                    // a coalesced value; wait for the next one.
                    if let Some(snapshot) = self.slot.take() {
                        return Ok(snapshot);
                    }
                }
                recv(self.shutdown.receiver()) -> _ => return Err(SyncError::Cancelled),
            }
        }
    }
}
