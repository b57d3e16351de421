use crate::room::{CoordinatorStats, JoinOutcome, Room, RoomCommand};
use crate::signaling::SignalingOutput;
use std::collections::HashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, RoomId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns the room table. Only this type mutates membership, and only in
/// response to [`RoomCommand`]s.
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<ConnectionId, RoomId>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: HashMap::new(),
            memberships: HashMap::new(),
            signaling,
        }
    }

    pub async fn run(mut self, mut command_rx: mpsc::Receiver<RoomCommand>) {
        info!("Room coordinator started");

        while let Some(cmd) = command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Shutting down room coordinator.");
    }

    pub async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                connection_id,
                room_id,
            } => self.join(connection_id, room_id).await,

            RoomCommand::Relay {
                connection_id,
                message,
            } => self.relay(connection_id, message).await,

            RoomCommand::Leave { connection_id } => self.leave(connection_id).await,

            RoomCommand::Stats { reply } => {
                let _ = reply.send(self.stats());
            }
        }
    }

    pub async fn join(&mut self, connection_id: ConnectionId, room_id: RoomId) {
        if let Some(current) = self.memberships.get(&connection_id) {
            if *current != room_id {
                info!(
                    "Connection {:?} switches from room '{}' to '{}'",
                    connection_id, current, room_id
                );
                self.leave(connection_id).await;
            }
        }

        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id.clone()));

        match room.join(connection_id) {
            JoinOutcome::Created => {
                info!("Room '{}' created by {:?}", room_id, connection_id);
                self.memberships.insert(connection_id, room_id);
                self.signaling
                    .send_signal(connection_id, SignalMessage::Created)
                    .await;
            }

            JoinOutcome::Joined { waiting } => {
                info!("Connection {:?} joined room '{}'", connection_id, room_id);
                self.memberships.insert(connection_id, room_id);
                self.signaling
                    .send_signal(connection_id, SignalMessage::Joined)
                    .await;
                self.signaling
                    .send_signal(waiting, SignalMessage::Ready)
                    .await;
            }

            JoinOutcome::AlreadyMember => {
                debug!(
                    "Connection {:?} is already in room '{}'; ignoring join",
                    connection_id, room_id
                );
            }

            JoinOutcome::Full => {
                info!(
                    "Room '{}' is full; rejecting {:?}",
                    room_id, connection_id
                );
                self.signaling
                    .send_signal(connection_id, SignalMessage::Full)
                    .await;
            }
        }
    }

    pub async fn relay(&mut self, connection_id: ConnectionId, message: SignalMessage) {
        let Some(room_id) = message.relay_room() else {
            warn!(
                "Dropping non-relayable '{}' from {:?}",
                message.op(),
                connection_id
            );
            return;
        };

        let Some(room) = self
            .rooms
            .get(room_id)
            .filter(|room| room.contains(&connection_id))
        else {
            warn!(
                "Dropping '{}' from {:?}: not a member of room '{}'",
                message.op(),
                connection_id,
                room_id
            );
            return;
        };

        let targets: Vec<ConnectionId> = room.others(&connection_id).collect();
        debug!(
            "Relaying '{}' in room '{}' from {:?} to {} peer(s)",
            message.op(),
            room_id,
            connection_id,
            targets.len()
        );

        for target in targets {
            self.signaling.send_signal(target, message.clone()).await;
        }
    }

    pub async fn leave(&mut self, connection_id: ConnectionId) {
        let Some(room_id) = self.memberships.remove(&connection_id) else {
            debug!("Connection {:?} left without a room", connection_id);
            return;
        };

        let Some(room) = self.rooms.get_mut(&room_id) else {
            return;
        };
        room.leave(&connection_id);
        info!("Connection {:?} left room '{}'", connection_id, room_id);

        if room.is_empty() {
            self.rooms.remove(&room_id);
            info!("Room '{}' is empty and has been removed", room_id);
            return;
        }

        let remaining: Vec<ConnectionId> = room.members().to_vec();
        for peer in remaining {
            self.signaling
                .send_signal(peer, SignalMessage::PeerLeft)
                .await;
        }
    }

    /// Members of `room_id` in arrival order, or `None` if the room does not exist.
    pub fn members(&self, room_id: &RoomId) -> Option<&[ConnectionId]> {
        self.rooms.get(room_id).map(Room::members)
    }

    pub fn room_of(&self, connection_id: &ConnectionId) -> Option<&RoomId> {
        self.memberships.get(connection_id)
    }

    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            rooms: self.rooms.len(),
            members: self.memberships.len(),
        }
    }
}
