use crate::agent::{NegotiationAgent, NegotiationState};
use tandem_core::SignalMessage;
use tracing::{info, warn};

impl NegotiationAgent {
    /// Closes the session from any state. Safe to call more than once.
    ///
    /// Every step can be repeated, so a teardown that is itself interrupted
    /// finishes the next time it runs.
    pub async fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        // Media is only installed once `start` succeeded.
        let started = self.media.get().is_some();

        self.transition(NegotiationState::Closed);
        self.cancel.cancel();
        self.pending.clear();
        self.remote_description_set = false;

        if let Some(pc) = self.pc.clone() {
            if let Err(e) = pc.close().await {
                warn!("[{}] Error closing peer connection: {}", self.config.room_id, e);
            }
            self.pc = None;
        }

        if let Some(media) = self.media.get() {
            media.stop_all().await;
        }

        if started {
            let _ = self.relay.send(SignalMessage::LeaveRoom).await;
        }
        self.torn_down = true;
        info!("[{}] Session closed", self.config.room_id);
    }
}
