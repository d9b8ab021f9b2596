//! Subscriber registry: the shared map of live sessions.

use crate::snapshot::Snapshot;
use crate::types::{SessionId, SubscriptionMode};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Single-slot pending update shared between a session and the
/// broadcast fan-out.
///
/// The signal channel has capacity 1 and the value cell holds only the
/// latest snapshot, so updates installed while a session is mid-cycle
/// coalesce: intermediate states are overwritten, never queued.
pub struct UpdateSlot {
    latest: Mutex<Option<Snapshot>>,
    signal: Sender<()>,
}

impl UpdateSlot {
    fn new() -> (Arc<Self>, Receiver<()>) {
        let (signal, wakeup) = bounded(1);
        let slot = Arc::new(Self {
            latest: Mutex::new(None),
            signal,
        });
        (slot, wakeup)
    }

    /// Install a new pending snapshot and wake the session.
    ///
    /// Returns false if the session's wake-up receiver is gone, which
    /// marks the entry dead for the caller to prune.
    fn install(&self, snapshot: Snapshot) -> bool {
        *self.latest.lock() = Some(snapshot);
        match self.signal.try_send(()) {
            Ok(()) => true,
            // Already signaled; the pending value was overwritten.
            Err(TrySendError::Full(())) => true,
            Err(TrySendError::Disconnected(())) => false,
        }
    }

    /// Take the pending snapshot, if any.
    ///
    /// May be empty after a wake-up when an earlier wake already
    /// drained a coalesced value; callers treat that as spurious and
    /// wait again.
    pub(crate) fn take(&self) -> Option<Snapshot> {
        self.latest.lock().take()
    }
}

/// A session's membership in the registry, returned by
/// [`SubscriberRegistry::register`].
pub struct Registration {
    pub id: SessionId,
    /// Fires when a new pending snapshot was installed.
    pub wakeup: Receiver<()>,
    /// Shared latest-value cell, drained by the session loop.
    pub slot: Arc<UpdateSlot>,
}

/// Per-session registry entry.
struct Subscriber {
    mode: SubscriptionMode,
    slot: Arc<UpdateSlot>,
}

/// Concurrency-safe map from live sessions to their delivery mode and
/// pending-update slot.
///
/// Explicitly owned and injectable: construct one per server, drop it
/// at shutdown. A session appears here exactly while its loop runs; an
/// entry is always inserted fully formed, so iteration never observes
/// a half-constructed session.
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<SessionId, Subscriber>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a session with the requested delivery mode.
    pub fn register(&self, mode: SubscriptionMode) -> Registration {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (slot, wakeup) = UpdateSlot::new();

        self.subscribers.write().insert(
            id,
            Subscriber {
                mode,
                slot: Arc::clone(&slot),
            },
        );

        debug!(session = %id, ?mode, "subscriber registered");
        Registration { id, wakeup, slot }
    }

    /// Remove a session. Idempotent: terminal session states may race
    /// with fan-out pruning and both end up here.
    pub fn unregister(&self, id: SessionId) {
        if self.subscribers.write().remove(&id).is_some() {
            debug!(session = %id, "subscriber unregistered");
        }
    }

    /// Install `snapshot` as every live session's pending value and
    /// wake it. Never blocks on a session's delivery; entries whose
    /// session is gone are pruned. No cross-session ordering.
    pub fn notify_all(&self, snapshot: &Snapshot) {
        let mut dead = Vec::new();

        {
            let subscribers = self.subscribers.read();
            for (id, subscriber) in subscribers.iter() {
                if !subscriber.slot.install(Arc::clone(snapshot)) {
                    dead.push(*id);
                }
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.write();
            for id in dead {
                if subscribers.remove(&id).is_some() {
                    debug!(session = %id, "pruned dead subscriber during fan-out");
                }
            }
        }
    }

    /// Delivery mode of a registered session, if still present.
    pub fn mode_of(&self, id: SessionId) -> Option<SubscriptionMode> {
        self.subscribers.read().get(&id).map(|s| s.mode)
    }

    /// Visit every registered session under the read lock.
    ///
    /// A session added or removed concurrently is observed at most
    /// once; a stable session is never visited twice.
    pub fn for_each(&self, mut f: impl FnMut(SessionId, SubscriptionMode)) {
        for (id, subscriber) in self.subscribers.read().iter() {
            f(*id, subscriber.mode);
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.read().is_empty()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
