mod webrtc_engine;

pub use webrtc_engine::{WebRtcFactory, WebRtcPeerConnection};

use crate::error::EngineError;
use crate::media::{LocalTrack, TrackKind};
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidatePayload, IceServerConfig};
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Transport-level connectivity as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Asynchronous notifications from a peer connection to its agent.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// A gathered local candidate; `None` marks the end of gathering.
    LocalCandidate(Option<IceCandidatePayload>),
    RemoteTrack { id: String, kind: TrackKind },
    StateChanged(PeerState),
}

/// One peer connection, as the negotiation state machine drives it.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn add_track(&self, track: &LocalTrack) -> Result<(), EngineError>;

    async fn create_offer(&self) -> Result<SessionDescription, EngineError>;

    async fn create_answer(&self) -> Result<SessionDescription, EngineError>;

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError>;

    async fn add_ice_candidate(&self, candidate: IceCandidatePayload) -> Result<(), EngineError>;

    /// Feeds the existing outgoing sender of `track.kind()` from `track`, without renegotiation.
    async fn replace_track(&self, track: &LocalTrack) -> Result<(), EngineError>;

    async fn close(&self) -> Result<(), EngineError>;
}

#[async_trait]
pub trait PeerConnectionFactory: Send + Sync {
    /// Builds a connection whose callbacks report into `events`.
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Arc<dyn PeerConnection>, EngineError>;
}
