//! Shared access to the authoritative object model.
//!
//! The model itself lives outside this crate; anything serializable can
//! be observed. [`ModelProvider`] is the single synchronization point:
//! producers mutate through the write guard and snapshot captures read
//! through the read guard.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;

/// A model that can be observed by subscribed clients.
pub trait ObservableModel: Serialize + Send + Sync + 'static {
    /// Drop delivered-once content (queued messages, one-shot status)
    /// after a broadcast pass has captured it.
    fn clear_transient(&mut self) {}
}

/// Reader/writer wrapper around the authoritative model.
///
/// Multiple concurrent readers (snapshot captures), one writer
/// (mutation or transient clear); writers exclude readers. The guards
/// are the scoped shared/exclusive locks of the model store; the model
/// reference is only valid while a guard is held.
pub struct ModelProvider<M: ObservableModel> {
    model: RwLock<M>,
}

impl<M: ObservableModel> ModelProvider<M> {
    pub fn new(model: M) -> Self {
        Self {
            model: RwLock::new(model),
        }
    }

    /// Acquire shared access for reading the current model.
    pub fn read(&self) -> RwLockReadGuard<'_, M> {
        self.model.read()
    }

    /// Acquire exclusive access for mutating the current model.
    pub fn write(&self) -> RwLockWriteGuard<'_, M> {
        self.model.write()
    }
}
