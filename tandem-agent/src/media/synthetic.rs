use crate::error::MediaError;
use crate::media::{LocalTrack, MediaConstraints, MediaDevices, TrackSource};
use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

/// Mints tracks that carry whatever samples the caller writes, without any
/// capture hardware. Useful for headless peers and tests.
#[derive(Debug, Clone)]
pub struct SyntheticMediaDevices {
    stream_id: String,
    camera: bool,
    microphone: bool,
    screen: bool,
}

impl SyntheticMediaDevices {
    pub fn new() -> Self {
        Self {
            stream_id: Uuid::new_v4().to_string(),
            camera: true,
            microphone: true,
            screen: true,
        }
    }

    pub fn without_camera(mut self) -> Self {
        self.camera = false;
        self
    }

    pub fn without_microphone(mut self) -> Self {
        self.microphone = false;
        self
    }

    pub fn without_screen(mut self) -> Self {
        self.screen = false;
        self
    }

    fn mint(&self, source: TrackSource) -> LocalTrack {
        LocalTrack::new(
            source,
            format!("{}-{}", source, Uuid::new_v4()),
            self.stream_id.clone(),
        )
    }
}

impl Default for SyntheticMediaDevices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaDevices for SyntheticMediaDevices {
    async fn user_media(
        &self,
        constraints: &MediaConstraints,
    ) -> Result<Vec<LocalTrack>, MediaError> {
        if !constraints.audio && !constraints.video {
            return Err(MediaError::NothingRequested);
        }
        if constraints.audio && !self.microphone {
            return Err(MediaError::Unavailable(TrackSource::Microphone));
        }
        if constraints.video && !self.camera {
            return Err(MediaError::Unavailable(TrackSource::Camera));
        }

        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(self.mint(TrackSource::Microphone));
        }
        if constraints.video {
            tracks.push(self.mint(TrackSource::Camera));
        }
        debug!("Minted {} synthetic track(s)", tracks.len());
        Ok(tracks)
    }

    async fn display_media(&self) -> Result<LocalTrack, MediaError> {
        if !self.screen {
            return Err(MediaError::PermissionDenied(TrackSource::Screen));
        }
        Ok(self.mint(TrackSource::Screen))
    }
}
