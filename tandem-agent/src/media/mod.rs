mod local_media;
mod local_track;
mod synthetic;

pub use local_media::{LocalMedia, VideoSource};
pub use local_track::LocalTrack;
pub use synthetic::SyntheticMediaDevices;

use crate::error::MediaError;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Audio => f.write_str("audio"),
            TrackKind::Video => f.write_str("video"),
        }
    }
}

/// Where a local track's samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackSource {
    Microphone,
    Camera,
    Screen,
}

impl TrackSource {
    pub fn kind(self) -> TrackKind {
        match self {
            TrackSource::Microphone => TrackKind::Audio,
            TrackSource::Camera | TrackSource::Screen => TrackKind::Video,
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSource::Microphone => f.write_str("microphone"),
            TrackSource::Camera => f.write_str("camera"),
            TrackSource::Screen => f.write_str("screen"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaConstraints {
    pub audio: bool,
    pub video: bool,
}

impl Default for MediaConstraints {
    fn default() -> Self {
        Self {
            audio: true,
            video: true,
        }
    }
}

/// Capture capability: the `getUserMedia` / `getDisplayMedia` pair.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    /// Camera and/or microphone tracks. All-or-nothing: on error no track is left running.
    async fn user_media(&self, constraints: &MediaConstraints)
    -> Result<Vec<LocalTrack>, MediaError>;

    /// One screen-capture video track.
    async fn display_media(&self) -> Result<LocalTrack, MediaError>;
}
