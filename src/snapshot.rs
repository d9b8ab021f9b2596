//! Snapshot capture: the model serialized at one instant.

use crate::error::Result;
use crate::model::{ModelProvider, ObservableModel};
use std::sync::Arc;

/// An immutable structural copy of the model at one instant.
///
/// Snapshots are never mutated; a model change produces a new snapshot
/// that replaces the shared reference wholesale. Sessions keep the
/// snapshot they last delivered as their diff baseline, so a snapshot
/// is freed only once no session still needs it.
pub type Snapshot = Arc<serde_json::Value>;

/// Serialize the current model into a [`Snapshot`].
///
/// Takes the provider's shared lock for the duration of the copy and
/// releases it before returning. The returned document holds no
/// references into live model memory and can be read indefinitely
/// without any lock.
pub fn capture<M: ObservableModel>(provider: &ModelProvider<M>) -> Result<Snapshot> {
    let value = {
        let model = provider.read();
        serde_json::to_value(&*model)?
    };
    Ok(Arc::new(value))
}
