use async_trait::async_trait;
use tandem_core::{ConnectionId, SignalMessage};

/// Outbound half of the relay channel, as seen by the coordinator.
///
/// The WebSocket layer implements this; tests substitute a recorder.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver one message to one connection. Delivery to a vanished connection is a no-op.
    async fn send_signal(&self, connection_id: ConnectionId, msg: SignalMessage);
}
