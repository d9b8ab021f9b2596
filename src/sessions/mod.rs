//! Per-connection subscription sessions.
//!
//! A session owns one observer's delivery state: its transport, its
//! delivery mode, the snapshot it last delivered, and the pending-update
//! slot the broadcast fan-out writes into. Each session runs on its own
//! thread and cycles through send → acknowledge → wait-for-update for
//! the life of the connection.

mod session;
mod transport;

pub use session::Session;
pub use transport::{channel_transport, ChannelPeer, ChannelTransport, Transport};
