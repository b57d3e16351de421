mod handle_engine_event_impl;
mod handle_signal_impl;
mod media_controls_impl;
mod negotiation;
mod run_impl;
mod start_impl;
mod teardown_impl;

pub use negotiation::{NegotiationState, PendingCandidates};

use crate::config::AgentConfig;
use crate::engine::{EngineEvent, PeerConnection, PeerConnectionFactory, PeerState};
use crate::error::AgentError;
use crate::media::{LocalMedia, MediaDevices, TrackKind};
use crate::relay::{self, SignalSink};
use std::sync::Arc;
use tandem_core::{IceCandidatePayload, Role, SignalMessage};
use tokio::sync::{OnceCell, mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Notifications for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    StateChanged(NegotiationState),
    RoleAssigned(Role),
    /// Alone in a fresh room, waiting for a peer.
    RoomCreated,
    /// The room already had two members. The agent closes itself.
    RoomFull,
    /// The other member left. The agent closes itself and gives up its seat,
    /// so the room is destroyed and the next joiner creates it afresh.
    PeerLeft,
    PeerConnection(PeerState),
    RemoteTrack { id: String, kind: TrackKind },
    ChatReceived { text: String, sender: String },
    ChatSent { text: String },
    ScreenShareStarted,
    ScreenShareEnded,
}

/// Work the UI asks the running agent to do on its event loop.
#[derive(Debug)]
pub enum AgentCommand {
    ShareScreen {
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
    StopScreenShare {
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
    SendChat {
        text: String,
        reply: oneshot::Sender<Result<(), AgentError>>,
    },
}

/// Owns one peer connection and drives it through a single offer/answer exchange.
pub struct NegotiationAgent {
    config: AgentConfig,
    state: NegotiationState,
    role: Option<Role>,
    pc: Option<Arc<dyn PeerConnection>>,
    remote_description_set: bool,
    pending: PendingCandidates,
    media: Arc<OnceCell<Arc<LocalMedia>>>,
    factory: Arc<dyn PeerConnectionFactory>,
    devices: Arc<dyn MediaDevices>,
    relay: Arc<dyn SignalSink>,
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
    engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
    command_tx: mpsc::Sender<AgentCommand>,
    command_rx: mpsc::Receiver<AgentCommand>,
    events: mpsc::UnboundedSender<AgentEvent>,
    cancel: CancellationToken,
    /// Set once every teardown step has completed.
    torn_down: bool,
}

impl NegotiationAgent {
    pub fn new(
        config: AgentConfig,
        relay: Arc<dyn SignalSink>,
        factory: Arc<dyn PeerConnectionFactory>,
        devices: Arc<dyn MediaDevices>,
    ) -> (Self, mpsc::UnboundedReceiver<AgentEvent>) {
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(32);
        let (events, events_rx) = mpsc::unbounded_channel();

        let agent = Self {
            config,
            state: NegotiationState::Idle,
            role: None,
            pc: None,
            remote_description_set: false,
            pending: PendingCandidates::default(),
            media: Arc::new(OnceCell::new()),
            factory,
            devices,
            relay,
            engine_tx,
            engine_rx,
            command_tx,
            command_rx,
            events,
            cancel: CancellationToken::new(),
            torn_down: false,
        };

        (agent, events_rx)
    }

    /// Opens the relay socket at `config.signaling_url` and builds an agent on it.
    ///
    /// Returns the agent, its UI events and the inbound signals to hand to [`run`](Self::run).
    pub async fn connect(
        config: AgentConfig,
        factory: Arc<dyn PeerConnectionFactory>,
        devices: Arc<dyn MediaDevices>,
    ) -> Result<
        (
            Self,
            mpsc::UnboundedReceiver<AgentEvent>,
            mpsc::UnboundedReceiver<SignalMessage>,
        ),
        AgentError,
    > {
        let (sink, inbound) = relay::connect(&config.signaling_url).await?;
        let (agent, events) = Self::new(config, Arc::new(sink), factory, devices);
        Ok((agent, events, inbound))
    }

    pub fn handle(&self) -> AgentHandle {
        AgentHandle {
            commands: self.command_tx.clone(),
            media: self.media.clone(),
            cancel: self.cancel.clone(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn has_remote_description(&self) -> bool {
        self.remote_description_set
    }

    pub fn pending_candidates(&self) -> &PendingCandidates {
        &self.pending
    }

    pub fn media(&self) -> Option<&Arc<LocalMedia>> {
        self.media.get()
    }

    fn transition(&mut self, next: NegotiationState) {
        if self.state == next {
            return;
        }
        info!(
            "[{}] negotiation {} -> {}",
            self.config.room_id, self.state, next
        );
        self.state = next;
        self.emit(AgentEvent::StateChanged(next));
    }

    fn emit(&self, event: AgentEvent) {
        let _ = self.events.send(event);
    }

    /// Peer connection and media of a started, not yet closed agent.
    fn live_session(&self) -> Result<(Arc<dyn PeerConnection>, Arc<LocalMedia>), AgentError> {
        if self.state.is_closed() {
            return Err(AgentError::Closed);
        }
        match (&self.pc, self.media.get()) {
            (Some(pc), Some(media)) => Ok((pc.clone(), media.clone())),
            _ => Err(AgentError::NotStarted),
        }
    }

    async fn apply_candidate(&self, candidate: IceCandidatePayload) {
        let Some(pc) = &self.pc else {
            return;
        };
        if let Err(e) = pc.add_ice_candidate(candidate).await {
            tracing::warn!("[{}] Error adding ICE: {}", self.config.room_id, e);
        }
    }
}

/// Cloneable control surface for a running agent.
///
/// Toggles act on local tracks directly; everything that touches the peer
/// connection goes through the agent's event loop.
#[derive(Clone)]
pub struct AgentHandle {
    commands: mpsc::Sender<AgentCommand>,
    media: Arc<OnceCell<Arc<LocalMedia>>>,
    cancel: CancellationToken,
}

impl AgentHandle {
    /// Flips microphone enablement. No signaling traffic.
    pub fn toggle_audio(&self) -> Result<bool, AgentError> {
        self.toggle(TrackKind::Audio)
    }

    /// Flips camera enablement. No signaling traffic.
    pub fn toggle_video(&self) -> Result<bool, AgentError> {
        self.toggle(TrackKind::Video)
    }

    fn toggle(&self, kind: TrackKind) -> Result<bool, AgentError> {
        if self.cancel.is_cancelled() {
            return Err(AgentError::Closed);
        }
        let media = self.media.get().ok_or(AgentError::NotStarted)?;
        media.toggle(kind).ok_or(AgentError::NoTrack(kind))
    }

    pub async fn share_screen(&self) -> Result<(), AgentError> {
        self.request(|reply| AgentCommand::ShareScreen { reply })
            .await
    }

    pub async fn stop_screen_share(&self) -> Result<(), AgentError> {
        self.request(|reply| AgentCommand::StopScreenShare { reply })
            .await
    }

    pub async fn send_chat(&self, text: impl Into<String>) -> Result<(), AgentError> {
        let text = text.into();
        self.request(|reply| AgentCommand::SendChat { text, reply })
            .await
    }

    /// Requests teardown. The event loop closes the session and exits.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    async fn request<F>(&self, build: F) -> Result<(), AgentError>
    where
        F: FnOnce(oneshot::Sender<Result<(), AgentError>>) -> AgentCommand,
    {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| AgentError::Closed)?;
        rx.await.map_err(|_| AgentError::Closed)?
    }
}
