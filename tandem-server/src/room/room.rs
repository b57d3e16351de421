use tandem_core::utils::ROOM_CAPACITY;
use tandem_core::{ConnectionId, RoomId};

/// Occupancy of a live room. An empty room is removed from the table, so it has no state here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Waiting,
    Active,
}

/// What a join attempt did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First member; the room was just created.
    Created,
    /// Second member; `waiting` is the member that must be told `ready`.
    Joined { waiting: ConnectionId },
    /// The connection was already a member; nothing changed.
    AlreadyMember,
    /// The room is at capacity; the connection was not added.
    Full,
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    members: Vec<ConnectionId>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: Vec::with_capacity(ROOM_CAPACITY),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    /// Members in arrival order.
    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn state(&self) -> Option<RoomState> {
        match self.members.len() {
            0 => None,
            1 => Some(RoomState::Waiting),
            _ => Some(RoomState::Active),
        }
    }

    pub fn join(&mut self, connection_id: ConnectionId) -> JoinOutcome {
        if self.contains(&connection_id) {
            return JoinOutcome::AlreadyMember;
        }

        match self.members.as_slice() {
            [] => {
                self.members.push(connection_id);
                JoinOutcome::Created
            }
            [waiting] => {
                let waiting = *waiting;
                self.members.push(connection_id);
                JoinOutcome::Joined { waiting }
            }
            _ => JoinOutcome::Full,
        }
    }

    /// Returns `true` if the connection was a member.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != connection_id);
        self.members.len() != before
    }

    /// Every member except `connection_id`.
    pub fn others<'a>(
        &'a self,
        connection_id: &'a ConnectionId,
    ) -> impl Iterator<Item = ConnectionId> + 'a {
        self.members
            .iter()
            .filter(move |m| *m != connection_id)
            .copied()
    }
}
