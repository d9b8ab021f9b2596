//! Broadcast fan-out from model mutations to subscribed sessions.

use crate::error::Result;
use crate::model::{ModelProvider, ObservableModel};
use crate::registry::SubscriberRegistry;
use crate::sessions::{Session, Transport};
use crate::shutdown::ShutdownSignal;
use crate::snapshot::capture;
use crate::types::SubscriptionMode;
use std::sync::Arc;
use tracing::debug;

/// Publishes model changes to every subscribed session.
///
/// The model owner calls [`Broadcaster::publish`] after every committed
/// mutation subscribers should observe. Fan-out installs one shared
/// snapshot into each session's pending slot and never blocks on any
/// session's delivery.
pub struct Broadcaster<M: ObservableModel> {
    provider: Arc<ModelProvider<M>>,
    registry: Arc<SubscriberRegistry>,
}

impl<M: ObservableModel> Broadcaster<M> {
    pub fn new(provider: Arc<ModelProvider<M>>, registry: Arc<SubscriberRegistry>) -> Self {
        Self { provider, registry }
    }

    pub fn provider(&self) -> &Arc<ModelProvider<M>> {
        &self.provider
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Attach a new session over `transport` with the given mode.
    ///
    /// The caller runs the returned session on its own thread.
    pub fn attach(
        &self,
        transport: Box<dyn Transport>,
        mode: SubscriptionMode,
        shutdown: ShutdownSignal,
    ) -> Result<Session> {
        Session::attach(
            &self.provider,
            Arc::clone(&self.registry),
            transport,
            mode,
            shutdown,
        )
    }

    /// Snapshot the model and notify every registered session.
    ///
    /// With no subscribers this is a no-op beyond the capture itself.
    /// After fan-out, delivered-once transient content is cleared from
    /// the model under the exclusive lock.
    pub fn publish(&self) -> Result<()> {
        let snapshot = capture(&self.provider)?;

        if self.registry.is_empty() {
            return Ok(());
        }

        debug!(subscribers = self.registry.len(), "broadcasting model update");
        self.registry.notify_all(&snapshot);

        // TODO: cache transient content across coalesced updates. Two
        // publishes before a session drains its slot clear messages
        // that session never observed.
        self.provider.write().clear_transient();

        Ok(())
    }
}
