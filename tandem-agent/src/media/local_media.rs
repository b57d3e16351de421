use crate::engine::PeerConnection;
use crate::error::EngineError;
use crate::media::{LocalTrack, TrackKind, TrackSource};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// What currently feeds the outgoing video sender. Independent of negotiation state.
#[derive(Debug, Clone)]
pub enum VideoSource {
    Camera,
    Screen(LocalTrack),
}

impl VideoSource {
    pub fn is_screen(&self) -> bool {
        matches!(self, VideoSource::Screen(_))
    }
}

/// The agent's capture tracks plus the camera/screen swap state.
///
/// Toggles only flip track flags, so UI code may call them while signaling
/// handlers run.
pub struct LocalMedia {
    tracks: Vec<LocalTrack>,
    video_source: Mutex<VideoSource>,
}

impl LocalMedia {
    pub fn new(tracks: Vec<LocalTrack>) -> Self {
        Self {
            tracks,
            video_source: Mutex::new(VideoSource::Camera),
        }
    }

    pub fn tracks(&self) -> &[LocalTrack] {
        &self.tracks
    }

    pub fn camera(&self) -> Option<&LocalTrack> {
        self.tracks
            .iter()
            .find(|t| t.source() == TrackSource::Camera)
    }

    /// Flips every capture track of `kind`. Returns the new flag of the first
    /// such track, or `None` when there is none.
    pub fn toggle(&self, kind: TrackKind) -> Option<bool> {
        self.tracks
            .iter()
            .filter(|t| t.kind() == kind)
            .map(LocalTrack::toggle)
            .reduce(|first, _| first)
    }

    pub fn is_enabled(&self, kind: TrackKind) -> Option<bool> {
        self.tracks
            .iter()
            .find(|t| t.kind() == kind)
            .map(LocalTrack::is_enabled)
    }

    pub async fn video_source(&self) -> VideoSource {
        self.video_source.lock().await.clone()
    }

    /// Puts `screen` on the outgoing video sender. Nothing changes if the engine refuses.
    pub async fn swap_in_screen(
        &self,
        pc: &dyn PeerConnection,
        screen: LocalTrack,
    ) -> Result<bool, EngineError> {
        let mut source = self.video_source.lock().await;
        if source.is_screen() {
            return Ok(false);
        }

        pc.replace_track(&screen).await?;
        info!("Outgoing video switched to screen track {}", screen.id());
        *source = VideoSource::Screen(screen);
        Ok(true)
    }

    /// Restores the camera if `screen` is still the active source, and ends the
    /// screen track. Returns `false` when the camera was already active.
    pub async fn restore_camera(
        &self,
        pc: &dyn PeerConnection,
        screen: &LocalTrack,
    ) -> Result<bool, EngineError> {
        let mut source = self.video_source.lock().await;
        let VideoSource::Screen(active) = &*source else {
            return Ok(false);
        };
        if active.id() != screen.id() {
            return Ok(false);
        }

        if let Some(camera) = self.camera() {
            pc.replace_track(camera).await?;
        }
        *source = VideoSource::Camera;
        screen.stop();
        info!("Outgoing video switched back to camera");
        Ok(true)
    }

    /// Ends every track, including an active screen share.
    pub async fn stop_all(&self) {
        for track in &self.tracks {
            track.stop();
        }

        let mut source = self.video_source.lock().await;
        if let VideoSource::Screen(screen) = &*source {
            screen.stop();
        }
        *source = VideoSource::Camera;
        debug!("Stopped {} local track(s)", self.tracks.len());
    }
}
