use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// One trickled ICE candidate, in the shape browsers produce from `RTCIceCandidate.toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidatePayload {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
    pub username_fragment: Option<String>,
}

impl IceCandidatePayload {
    pub fn new(candidate: impl Into<String>) -> Self {
        Self {
            candidate: candidate.into(),
            sdp_mid: None,
            sdp_m_line_index: None,
            username_fragment: None,
        }
    }

    /// Empty candidate strings are end-of-candidates markers or keep-alives.
    pub fn is_empty(&self) -> bool {
        self.candidate.trim().is_empty()
    }
}

/// Every event that crosses the relay channel, in either direction.
///
/// Serialized as `{"op": "<kebab-case name>", "d": {..camelCase fields..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    content = "d",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum SignalMessage {
    JoinRoom {
        room_id: RoomId,
    },
    LeaveRoom,
    Created,
    Joined,
    Ready,
    Full,
    PeerLeft,
    Offer {
        room_id: RoomId,
        sdp: String,
    },
    Answer {
        room_id: RoomId,
        sdp: String,
    },
    IceCandidate {
        room_id: RoomId,
        candidate: Option<IceCandidatePayload>,
    },
    ChatMessage {
        room_id: RoomId,
        text: String,
        sender: String,
    },
}

impl SignalMessage {
    /// Wire name of the event, for logs.
    pub fn op(&self) -> &'static str {
        match self {
            SignalMessage::JoinRoom { .. } => "join-room",
            SignalMessage::LeaveRoom => "leave-room",
            SignalMessage::Created => "created",
            SignalMessage::Joined => "joined",
            SignalMessage::Ready => "ready",
            SignalMessage::Full => "full",
            SignalMessage::PeerLeft => "peer-left",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::IceCandidate { .. } => "ice-candidate",
            SignalMessage::ChatMessage { .. } => "chat-message",
        }
    }

    /// Target room of a peer-to-peer message; `None` for coordinator control events.
    pub fn relay_room(&self) -> Option<&RoomId> {
        match self {
            SignalMessage::Offer { room_id, .. }
            | SignalMessage::Answer { room_id, .. }
            | SignalMessage::IceCandidate { room_id, .. }
            | SignalMessage::ChatMessage { room_id, .. } => Some(room_id),
            _ => None,
        }
    }
}
