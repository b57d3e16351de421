use crate::agent::{AgentEvent, NegotiationAgent, NegotiationState};
use crate::error::AgentError;
use crate::media::{TrackKind, VideoSource};
use tandem_core::SignalMessage;
use tracing::{debug, info, warn};

impl NegotiationAgent {
    /// Flips microphone enablement. No signaling traffic.
    pub fn toggle_audio(&self) -> Result<bool, AgentError> {
        self.toggle_track(TrackKind::Audio)
    }

    /// Flips camera enablement. No signaling traffic.
    pub fn toggle_video(&self) -> Result<bool, AgentError> {
        self.toggle_track(TrackKind::Video)
    }

    fn toggle_track(&self, kind: TrackKind) -> Result<bool, AgentError> {
        let (_, media) = self.live_session()?;
        let enabled = media.toggle(kind).ok_or(AgentError::NoTrack(kind))?;
        debug!(
            "[{}] Local {} {}",
            self.config.room_id,
            kind,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(enabled)
    }

    /// Feeds a screen capture into the outgoing video sender. The camera comes
    /// back when the capture ends or [`stop_screen_share`](Self::stop_screen_share) is called.
    pub async fn share_screen(&self) -> Result<(), AgentError> {
        let (pc, media) = self.live_session()?;
        if media.video_source().await.is_screen() {
            return Err(AgentError::AlreadySharing);
        }

        let screen = self.devices.display_media().await?;
        match media.swap_in_screen(pc.as_ref(), screen.clone()).await {
            Ok(true) => {}
            Ok(false) => {
                screen.stop();
                return Err(AgentError::AlreadySharing);
            }
            Err(e) => {
                screen.stop();
                return Err(e.into());
            }
        }
        self.emit(AgentEvent::ScreenShareStarted);

        let events = self.events.clone();
        let cancel = self.cancel.child_token();
        let room_id = self.config.room_id.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = screen.ended() => {
                    match media.restore_camera(pc.as_ref(), &screen).await {
                        Ok(true) => {
                            info!("[{}] Screen capture ended", room_id);
                            let _ = events.send(AgentEvent::ScreenShareEnded);
                        }
                        Ok(false) => {}
                        Err(e) => warn!("[{}] Could not restore camera: {}", room_id, e),
                    }
                }
            }
        });

        Ok(())
    }

    /// Ends the active screen capture and puts the camera back.
    pub async fn stop_screen_share(&self) -> Result<(), AgentError> {
        let (pc, media) = self.live_session()?;
        let VideoSource::Screen(screen) = media.video_source().await else {
            return Err(AgentError::NotSharing);
        };

        if media.restore_camera(pc.as_ref(), &screen).await? {
            self.emit(AgentEvent::ScreenShareEnded);
        }
        Ok(())
    }

    /// Sends a chat line to the peer. Blank text is dropped silently.
    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), AgentError> {
        match self.state {
            NegotiationState::Idle => return Err(AgentError::NotStarted),
            NegotiationState::Closed => return Err(AgentError::Closed),
            _ => {}
        }

        let text = text.into();
        if text.trim().is_empty() {
            return Ok(());
        }

        self.relay
            .send(SignalMessage::ChatMessage {
                room_id: self.config.room_id.clone(),
                text: text.clone(),
                sender: self.config.sender_label.clone(),
            })
            .await?;
        self.emit(AgentEvent::ChatSent { text });
        Ok(())
    }
}
