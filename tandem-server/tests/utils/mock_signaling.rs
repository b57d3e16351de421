use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{ConnectionId, SignalMessage};
use tandem_server::SignalingOutput;
use tokio::sync::Mutex;

/// Mock SignalingOutput that records every delivery in order.
#[derive(Clone, Default)]
pub struct MockSignalingOutput {
    sent: Arc<Mutex<Vec<(ConnectionId, SignalMessage)>>>,
}

impl MockSignalingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered to one connection, in delivery order.
    pub async fn received_by(&self, connection_id: &ConnectionId) -> Vec<SignalMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to == connection_id)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub async fn total(&self) -> usize {
        self.sent.lock().await.len()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }
}

#[async_trait]
impl SignalingOutput for MockSignalingOutput {
    async fn send_signal(&self, connection_id: ConnectionId, msg: SignalMessage) {
        tracing::debug!("[MockSignaling] {} -> {:?}", msg.op(), connection_id);
        self.sent.lock().await.push((connection_id, msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_signaling_filters_by_recipient() {
        let signaling = MockSignalingOutput::new();
        let (a, b) = (ConnectionId::new(), ConnectionId::new());

        signaling.send_signal(a, SignalMessage::Created).await;
        signaling.send_signal(b, SignalMessage::Joined).await;

        assert_eq!(signaling.received_by(&a).await, vec![SignalMessage::Created]);
        assert_eq!(signaling.received_by(&b).await, vec![SignalMessage::Joined]);
        assert_eq!(signaling.total().await, 2);
    }
}
