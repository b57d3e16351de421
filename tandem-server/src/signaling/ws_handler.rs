use crate::{RoomCommand, SignalingService};
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tandem_core::{ConnectionId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let connection_id = ConnectionId::new();
    info!("New WebSocket connection: {:?}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(connection_id, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(signal) => {
                            let Some(cmd) = route_signal(connection_id, signal) else {
                                continue;
                            };
                            if let Err(e) = service.submit(cmd).await {
                                error!("Room coordinator died: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid SignalMessage from {:?}: {:?}", connection_id, e)
                        }
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_connection(&connection_id);
    let _ = service.submit(RoomCommand::Leave { connection_id }).await;
    info!("WebSocket disconnected: {:?}", connection_id);
}

/// Maps an inbound client message to the coordinator intent it expresses.
pub fn route_signal(connection_id: ConnectionId, signal: SignalMessage) -> Option<RoomCommand> {
    match signal {
        SignalMessage::JoinRoom { room_id } => Some(RoomCommand::Join {
            connection_id,
            room_id,
        }),
        SignalMessage::LeaveRoom => Some(RoomCommand::Leave { connection_id }),
        SignalMessage::Offer { .. }
        | SignalMessage::Answer { .. }
        | SignalMessage::IceCandidate { .. }
        | SignalMessage::ChatMessage { .. } => Some(RoomCommand::Relay {
            connection_id,
            message: signal,
        }),
        SignalMessage::Created
        | SignalMessage::Joined
        | SignalMessage::Ready
        | SignalMessage::Full
        | SignalMessage::PeerLeft => {
            debug!(
                "Ignoring coordinator-only '{}' sent by {:?}",
                signal.op(),
                connection_id
            );
            None
        }
    }
}
