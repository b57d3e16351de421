use crate::agent::{NegotiationAgent, NegotiationState};
use crate::error::AgentError;
use crate::media::{LocalMedia, LocalTrack};
use std::sync::Arc;
use tandem_core::SignalMessage;
use tracing::{info, warn};

impl NegotiationAgent {
    /// Acquires local media, builds the peer connection and joins the room.
    ///
    /// On failure nothing stays running and the agent remains `Idle`.
    pub async fn start(&mut self) -> Result<(), AgentError> {
        match self.state {
            NegotiationState::Idle => {}
            NegotiationState::Closed => return Err(AgentError::Closed),
            _ => return Err(AgentError::AlreadyStarted),
        }

        let tracks = self.devices.user_media(&self.config.constraints).await?;
        info!(
            "[{}] Acquired {} local track(s)",
            self.config.room_id,
            tracks.len()
        );

        let pc = match self
            .factory
            .create(&self.config.ice_servers, self.engine_tx.clone())
            .await
        {
            Ok(pc) => pc,
            Err(e) => {
                stop_tracks(&tracks);
                return Err(e.into());
            }
        };

        for track in &tracks {
            if let Err(e) = pc.add_track(track).await {
                stop_tracks(&tracks);
                let _ = pc.close().await;
                return Err(e.into());
            }
        }

        let join = SignalMessage::JoinRoom {
            room_id: self.config.room_id.clone(),
        };
        if let Err(e) = self.relay.send(join).await {
            warn!("[{}] Could not send join: {}", self.config.room_id, e);
            stop_tracks(&tracks);
            let _ = pc.close().await;
            return Err(e);
        }

        let _ = self.media.set(Arc::new(LocalMedia::new(tracks)));
        self.pc = Some(pc);
        self.transition(NegotiationState::AwaitingPeer);
        Ok(())
    }
}

fn stop_tracks(tracks: &[LocalTrack]) {
    for track in tracks {
        track.stop();
    }
}
