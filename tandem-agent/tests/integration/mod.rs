pub mod session_tests;

use std::sync::Arc;
use tandem_agent::{
    AgentConfig, AgentEvent, ChannelSignalSink, NegotiationAgent, SyntheticMediaDevices,
};
use tandem_core::SignalMessage;
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::MockFactory;

pub const ROOM: &str = "r1";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// An agent wired to mocks, plus every observable side of it.
pub struct TestAgent {
    pub agent: NegotiationAgent,
    pub events: mpsc::UnboundedReceiver<AgentEvent>,
    pub outbound: mpsc::UnboundedReceiver<SignalMessage>,
    pub factory: MockFactory,
}

impl TestAgent {
    pub fn new() -> Self {
        Self::with_parts(MockFactory::new(), SyntheticMediaDevices::new())
    }

    pub fn with_parts(factory: MockFactory, devices: SyntheticMediaDevices) -> Self {
        Self::with_config(test_config(), factory, devices)
    }

    pub fn with_config(
        config: AgentConfig,
        factory: MockFactory,
        devices: SyntheticMediaDevices,
    ) -> Self {
        let (sink, outbound) = ChannelSignalSink::new();
        let (agent, events) = NegotiationAgent::new(
            config,
            Arc::new(sink),
            Arc::new(factory.clone()),
            Arc::new(devices),
        );
        Self {
            agent,
            events,
            outbound,
            factory,
        }
    }

    /// Starts the agent and discards the join message.
    pub async fn started() -> Self {
        let mut t = Self::new();
        t.agent.start().await.unwrap();
        assert_eq!(
            t.sent(),
            vec![SignalMessage::JoinRoom {
                room_id: ROOM.into()
            }]
        );
        t.events();
        t
    }

    /// Everything the agent has put on the relay since the last call.
    pub fn sent(&mut self) -> Vec<SignalMessage> {
        drain(&mut self.outbound)
    }

    /// Every UI event since the last call.
    pub fn events(&mut self) -> Vec<AgentEvent> {
        drain(&mut self.events)
    }
}

pub fn test_config() -> AgentConfig {
    AgentConfig::new(ROOM).with_sender_label("alice")
}

pub fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}
