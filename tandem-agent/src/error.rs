use crate::media::{TrackKind, TrackSource};
use thiserror::Error;

/// Failures reported by the real-time-communication engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("webrtc: {0}")]
    WebRtc(#[from] webrtc::Error),

    #[error("no outgoing {0} sender on this connection")]
    NoSender(TrackKind),

    #[error("engine rejected the operation: {0}")]
    Rejected(String),
}

/// Failures acquiring local capture tracks.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0} is unavailable")]
    Unavailable(TrackSource),

    #[error("permission to use {0} was denied")]
    PermissionDenied(TrackSource),

    #[error("constraints request neither audio nor video")]
    NothingRequested,
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent has not been started")]
    NotStarted,

    #[error("agent is already started")]
    AlreadyStarted,

    #[error("agent is closed")]
    Closed,

    #[error("screen is already being shared")]
    AlreadySharing,

    #[error("screen is not being shared")]
    NotSharing,

    #[error("no local {0} track")]
    NoTrack(TrackKind),

    #[error("media: {0}")]
    Media(#[from] MediaError),

    #[error("engine: {0}")]
    Engine(#[from] EngineError),

    #[error("relay channel is closed")]
    RelayClosed,

    #[error("relay: {0}")]
    Relay(String),
}
