use crate::agent::{AgentCommand, NegotiationAgent};
use crate::engine::EngineEvent;
use tandem_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::{debug, info};

enum LoopEvent {
    Signal(SignalMessage),
    Engine(EngineEvent),
    Command(AgentCommand),
}

impl NegotiationAgent {
    /// Drives the agent until it closes: relay messages, engine callbacks and
    /// handle commands are processed one at a time, in arrival order per source.
    ///
    /// Each handler races the teardown token. A handler still waiting on the
    /// engine when teardown is requested is dropped, then the session closes.
    /// A closed `inbound` channel counts as losing the relay.
    pub async fn run(mut self, mut inbound: mpsc::UnboundedReceiver<SignalMessage>) {
        info!("[{}] Agent event loop started", self.config.room_id);
        let cancel = self.cancel.clone();

        loop {
            let event = tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    debug!("[{}] Teardown requested", self.config.room_id);
                    break;
                }

                msg = inbound.recv() => {
                    let Some(msg) = msg else {
                        info!("[{}] Relay channel closed", self.config.room_id);
                        break;
                    };
                    LoopEvent::Signal(msg)
                }

                Some(event) = self.engine_rx.recv() => LoopEvent::Engine(event),

                Some(cmd) = self.command_rx.recv() => LoopEvent::Command(cmd),
            };

            if cancel.run_until_cancelled(self.dispatch(event)).await.is_none() {
                debug!(
                    "[{}] In-flight handler dropped by teardown",
                    self.config.room_id
                );
                break;
            }

            if self.state.is_closed() {
                break;
            }
        }

        self.teardown().await;
        info!("[{}] Agent event loop stopped", self.config.room_id);
    }

    async fn dispatch(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::Signal(msg) => self.handle_signal(msg).await,
            LoopEvent::Engine(event) => self.handle_engine_event(event).await,
            LoopEvent::Command(cmd) => self.handle_command(cmd).await,
        }
    }

    async fn handle_command(&mut self, cmd: AgentCommand) {
        match cmd {
            AgentCommand::ShareScreen { reply } => {
                let _ = reply.send(self.share_screen().await);
            }
            AgentCommand::StopScreenShare { reply } => {
                let _ = reply.send(self.stop_screen_share().await);
            }
            AgentCommand::SendChat { text, reply } => {
                let _ = reply.send(self.send_chat(text).await);
            }
        }
    }
}
