mod ws_relay;

pub use ws_relay::{WsSignalSink, connect};

use crate::error::AgentError;
use async_trait::async_trait;
use tandem_core::SignalMessage;
use tokio::sync::mpsc;

/// Outbound half of the agent's relay channel.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, msg: SignalMessage) -> Result<(), AgentError>;
}

/// In-process sink: every message lands on an mpsc receiver.
#[derive(Clone)]
pub struct ChannelSignalSink {
    tx: mpsc::UnboundedSender<SignalMessage>,
}

impl ChannelSignalSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SignalMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl SignalSink for ChannelSignalSink {
    async fn send(&self, msg: SignalMessage) -> Result<(), AgentError> {
        self.tx.send(msg).map_err(|_| AgentError::RelayClosed)
    }
}
