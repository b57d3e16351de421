use crate::room::RoomCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Registry of open relay sockets plus the command line into the coordinator.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
            }),
            room_cmd_tx,
        }
    }

    pub fn add_connection(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(connection_id, tx);
    }

    pub fn remove_connection(&self, connection_id: &ConnectionId) {
        self.inner.connections.remove(connection_id);
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub async fn submit(&self, cmd: RoomCommand) -> anyhow::Result<()> {
        self.room_cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow::anyhow!("room coordinator is not running"))
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_signal(&self, connection_id: ConnectionId, msg: SignalMessage) {
        let Some(connection) = self.inner.connections.get(&connection_id) else {
            warn!(
                "Attempted to send '{}' to disconnected {:?}",
                msg.op(),
                connection_id
            );
            return;
        };

        match serde_json::to_string(&msg) {
            Ok(json) => {
                if let Err(e) = connection.send(Message::Text(json.into())) {
                    error!("Failed to send WS message to {:?}: {:?}", connection_id, e);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}
