use crate::error::AgentError;
use crate::relay::SignalSink;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tandem_core::SignalMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Sink half of a WebSocket relay connection. Dropping every clone closes the socket.
#[derive(Clone)]
pub struct WsSignalSink {
    tx: mpsc::UnboundedSender<Message>,
}

#[async_trait]
impl SignalSink for WsSignalSink {
    async fn send(&self, msg: SignalMessage) -> Result<(), AgentError> {
        let json = serde_json::to_string(&msg).map_err(|e| AgentError::Relay(e.to_string()))?;
        self.tx
            .send(Message::Text(json.into()))
            .map_err(|_| AgentError::RelayClosed)
    }
}

/// Opens the relay socket at `url`.
///
/// Returns the outbound sink and the stream of inbound signals. The stream
/// ends when the server closes the socket.
pub async fn connect(
    url: &str,
) -> Result<(WsSignalSink, mpsc::UnboundedReceiver<SignalMessage>), AgentError> {
    info!("Connecting to signaling server: {}", url);

    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| AgentError::Relay(format!("Failed to connect to {url}: {e}")))?;

    info!("Connected to signaling server");

    let (mut write, mut read) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Message>();
    let (in_tx, in_rx) = mpsc::unbounded_channel::<SignalMessage>();

    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            if let Err(e) = write.send(msg).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
        let _ = write.close().await;
        debug!("Relay sender task terminated");
    });

    tokio::spawn(async move {
        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                    Ok(signal) => {
                        if in_tx.send(signal).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid SignalMessage from relay: {}", e),
                },
                Ok(Message::Close(_)) => {
                    info!("Relay closed the connection");
                    break;
                }
                Err(e) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                _ => {}
            }
        }
        debug!("Relay receiver task terminated");
    });

    Ok((WsSignalSink { tx: out_tx }, in_rx))
}
