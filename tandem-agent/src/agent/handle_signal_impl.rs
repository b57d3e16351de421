use crate::agent::{AgentEvent, NegotiationAgent, NegotiationState};
use crate::engine::SessionDescription;
use crate::error::AgentError;
use tandem_core::{IceCandidatePayload, Role, RoomId, SignalMessage};
use tracing::{debug, info, warn};

impl NegotiationAgent {
    /// Applies one message from the signaling relay. Messages that arrive
    /// after teardown are discarded.
    pub async fn handle_signal(&mut self, msg: SignalMessage) {
        if self.state.is_closed() {
            debug!(
                "[{}] Discarding '{}' after close",
                self.config.room_id,
                msg.op()
            );
            return;
        }

        match msg {
            SignalMessage::Created => {
                info!("[{}] Room created, waiting for a peer", self.config.room_id);
                self.emit(AgentEvent::RoomCreated);
            }

            SignalMessage::Joined => {
                info!("[{}] Joined an existing room", self.config.room_id);
                self.assign_role(Role::Responder);
            }

            SignalMessage::Ready => self.on_ready().await,

            SignalMessage::Offer { room_id, sdp } => {
                if self.is_foreign(&room_id, "offer") {
                    return;
                }
                self.on_offer(sdp).await;
            }

            SignalMessage::Answer { room_id, sdp } => {
                if self.is_foreign(&room_id, "answer") {
                    return;
                }
                self.on_answer(sdp).await;
            }

            SignalMessage::IceCandidate { room_id, candidate } => {
                if self.is_foreign(&room_id, "ice-candidate") {
                    return;
                }
                self.on_remote_candidate(candidate).await;
            }

            SignalMessage::ChatMessage { text, sender, .. } => {
                self.emit(AgentEvent::ChatReceived { text, sender });
            }

            SignalMessage::Full => {
                warn!("[{}] Room is full", self.config.room_id);
                self.emit(AgentEvent::RoomFull);
                self.teardown().await;
            }

            SignalMessage::PeerLeft => {
                info!("[{}] Peer left the room", self.config.room_id);
                self.emit(AgentEvent::PeerLeft);
                self.teardown().await;
            }

            SignalMessage::JoinRoom { .. } | SignalMessage::LeaveRoom => {
                warn!(
                    "[{}] Unexpected client-bound '{}'",
                    self.config.room_id,
                    msg.op()
                );
            }
        }
    }

    fn assign_role(&mut self, role: Role) {
        self.role = Some(role);
        self.emit(AgentEvent::RoleAssigned(role));
    }

    fn is_foreign(&self, room_id: &RoomId, op: &str) -> bool {
        if *room_id == self.config.room_id {
            return false;
        }
        warn!(
            "[{}] Dropping '{}' addressed to room '{}'",
            self.config.room_id, op, room_id
        );
        true
    }

    /// The room now has two members and this agent was first: make the offer.
    async fn on_ready(&mut self) {
        if self.state != NegotiationState::AwaitingPeer || self.role.is_some() {
            warn!(
                "[{}] Ignoring 'ready' in state {} with role {:?}",
                self.config.room_id, self.state, self.role
            );
            return;
        }

        self.assign_role(Role::Initiator);
        self.transition(NegotiationState::CreatingOffer);

        match self.make_offer().await {
            Ok(()) => self.transition(NegotiationState::OfferSent),
            Err(e) => {
                warn!("[{}] Could not create offer: {}", self.config.room_id, e);
                self.transition(NegotiationState::AwaitingPeer);
            }
        }
    }

    async fn make_offer(&self) -> Result<(), AgentError> {
        let pc = self.pc.clone().ok_or(AgentError::NotStarted)?;
        let offer = pc.create_offer().await?;
        let sdp = offer.sdp.clone();
        pc.set_local_description(offer).await?;

        self.relay
            .send(SignalMessage::Offer {
                room_id: self.config.room_id.clone(),
                sdp,
            })
            .await
    }

    async fn on_offer(&mut self, sdp: String) {
        if self.role == Some(Role::Initiator) || self.state != NegotiationState::AwaitingPeer {
            warn!(
                "[{}] Ignoring offer in state {} with role {:?}",
                self.config.room_id, self.state, self.role
            );
            return;
        }
        let Some(pc) = self.pc.clone() else {
            return;
        };

        let before = self.state;
        self.transition(NegotiationState::OfferReceived);

        if let Err(e) = pc
            .set_remote_description(SessionDescription::offer(sdp))
            .await
        {
            warn!("[{}] Rejected remote offer: {}", self.config.room_id, e);
            self.transition(before);
            return;
        }
        self.remote_description_set = true;
        if self.role.is_none() {
            self.assign_role(Role::Responder);
        }

        self.transition(NegotiationState::AnsweringLocal);
        match self.make_answer().await {
            Ok(()) => self.transition(NegotiationState::AnswerSent),
            Err(e) => {
                warn!("[{}] Could not answer: {}", self.config.room_id, e);
                self.transition(NegotiationState::OfferReceived);
            }
        }

        self.flush_pending().await;
    }

    async fn make_answer(&self) -> Result<(), AgentError> {
        let pc = self.pc.clone().ok_or(AgentError::NotStarted)?;
        let answer = pc.create_answer().await?;
        let sdp = answer.sdp.clone();
        pc.set_local_description(answer).await?;

        self.relay
            .send(SignalMessage::Answer {
                room_id: self.config.room_id.clone(),
                sdp,
            })
            .await
    }

    async fn on_answer(&mut self, sdp: String) {
        if self.state != NegotiationState::OfferSent || self.remote_description_set {
            warn!(
                "[{}] Ignoring answer in state {}",
                self.config.room_id, self.state
            );
            return;
        }
        let Some(pc) = self.pc.clone() else {
            return;
        };

        if let Err(e) = pc
            .set_remote_description(SessionDescription::answer(sdp))
            .await
        {
            warn!("[{}] Rejected remote answer: {}", self.config.room_id, e);
            return;
        }
        self.remote_description_set = true;
        debug!("[{}] Remote answer applied", self.config.room_id);

        self.flush_pending().await;
    }

    async fn on_remote_candidate(&mut self, candidate: Option<IceCandidatePayload>) {
        let Some(candidate) = candidate.filter(|c| !c.is_empty()) else {
            debug!("[{}] Keep-alive candidate ignored", self.config.room_id);
            return;
        };

        if self.remote_description_set {
            self.apply_candidate(candidate).await;
        } else {
            self.pending.push(candidate);
            debug!(
                "[{}] Queued remote candidate ({} pending)",
                self.config.room_id,
                self.pending.len()
            );
        }
    }

    /// Applies queued candidates in arrival order, exactly once.
    async fn flush_pending(&mut self) {
        let queued = self.pending.take_all();
        if queued.is_empty() {
            return;
        }
        debug!(
            "[{}] Applying {} queued candidate(s)",
            self.config.room_id,
            queued.len()
        );
        for candidate in queued {
            self.apply_candidate(candidate).await;
        }
    }
}
