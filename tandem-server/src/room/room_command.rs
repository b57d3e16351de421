use tandem_core::{ConnectionId, RoomId, SignalMessage};
use tokio::sync::oneshot;

/// Intents delivered to the coordinator by the relay channel layer.
#[derive(Debug)]
pub enum RoomCommand {
    /// `join-room` from a connection.
    Join {
        connection_id: ConnectionId,
        room_id: RoomId,
    },

    /// A peer-to-peer message (`offer`, `answer`, `ice-candidate`, `chat-message`).
    Relay {
        connection_id: ConnectionId,
        message: SignalMessage,
    },

    /// Explicit `leave-room` or the socket closing.
    Leave { connection_id: ConnectionId },

    /// Snapshot of the room table for the `/stats` endpoint.
    Stats {
        reply: oneshot::Sender<CoordinatorStats>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorStats {
    pub rooms: usize,
    pub members: usize,
}
