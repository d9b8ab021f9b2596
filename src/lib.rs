//! # modelcast
//!
//! Live state synchronization for a machine-control daemon: keeps
//! connected observers informed of changes to a shared, continuously
//! mutated object model without polling.
//!
//! ## Core Concepts
//!
//! - **Snapshots**: immutable, reference-counted JSON copies of the model
//! - **Diffs**: minimal merge patches between successive snapshots
//! - **Sessions**: one thread per observer, full or patch delivery
//! - **Coalescing**: a slow observer only ever sees the latest state
//!
//! ## Example
//!
//! ```ignore
//! use modelcast::{
//!     channel_transport, shutdown_channel, Broadcaster, ModelProvider,
//!     SubscriberRegistry, SubscriptionMode,
//! };
//! use std::sync::Arc;
//!
//! let provider = Arc::new(ModelProvider::new(machine));
//! let registry = Arc::new(SubscriberRegistry::new());
//! let broadcaster = Broadcaster::new(provider.clone(), registry);
//! let (guard, signal) = shutdown_channel();
//!
//! // One thread per observer.
//! let (transport, peer) = channel_transport(signal.clone());
//! let session = broadcaster.attach(Box::new(transport), SubscriptionMode::Patch, signal)?;
//! std::thread::spawn(move || session.run());
//!
//! // After every committed mutation:
//! provider.write().status = "printing".to_string();
//! broadcaster.publish()?;
//! ```

pub mod broadcast;
pub mod diff;
pub mod error;
pub mod model;
pub mod registry;
pub mod sessions;
pub mod shutdown;
pub mod snapshot;
pub mod types;

// Re-exports
pub use broadcast::Broadcaster;
pub use diff::{apply_patch, diff};
pub use error::{Result, SyncError};
pub use model::{ModelProvider, ObservableModel};
pub use registry::{Registration, SubscriberRegistry, UpdateSlot};
pub use sessions::{channel_transport, ChannelPeer, ChannelTransport, Session, Transport};
pub use shutdown::{shutdown_channel, ShutdownGuard, ShutdownSignal};
pub use snapshot::{capture, Snapshot};
pub use types::{ClientCommand, ErrorEnvelope, SessionId, SubscriptionMode};
