use crate::agent::{AgentEvent, NegotiationAgent, NegotiationState};
use crate::engine::{EngineEvent, PeerState};
use tandem_core::SignalMessage;
use tracing::{debug, info, warn};

impl NegotiationAgent {
    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        if self.state.is_closed() {
            return;
        }

        match event {
            EngineEvent::LocalCandidate(Some(candidate)) => {
                let msg = SignalMessage::IceCandidate {
                    room_id: self.config.room_id.clone(),
                    candidate: Some(candidate),
                };
                if let Err(e) = self.relay.send(msg).await {
                    warn!(
                        "[{}] Could not send local candidate: {}",
                        self.config.room_id, e
                    );
                }
            }

            EngineEvent::LocalCandidate(None) => {
                debug!("[{}] ICE gathering complete", self.config.room_id);
            }

            EngineEvent::RemoteTrack { id, kind } => {
                info!("[{}] Remote {} track {}", self.config.room_id, kind, id);
                self.emit(AgentEvent::RemoteTrack { id, kind });
            }

            EngineEvent::StateChanged(peer_state) => {
                self.emit(AgentEvent::PeerConnection(peer_state));

                let settled = matches!(
                    self.state,
                    NegotiationState::OfferSent | NegotiationState::AnswerSent
                );
                if peer_state == PeerState::Connected && settled && self.remote_description_set {
                    self.transition(NegotiationState::Connected);
                }
            }
        }
    }
}
