use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tandem_agent::{
    AgentConfig, AgentError, AgentEvent, EngineEvent, NegotiationAgent, NegotiationState,
    PeerState, SessionDescription, SyntheticMediaDevices,
};
use tandem_core::Role;
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::{EngineCall, MockFactory};

async fn spawn_relay() -> SocketAddr {
    let (signaling, _coordinator) = tandem_server::spawn_coordinator(64);
    let app = tandem_server::router(signaling);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

struct Peer {
    events: mpsc::UnboundedReceiver<AgentEvent>,
    factory: MockFactory,
    handle: tandem_agent::AgentHandle,
}

async fn join(addr: SocketAddr, label: &str) -> Peer {
    let factory = MockFactory::new();
    let config = AgentConfig::new("r1")
        .with_signaling_url(format!("ws://{addr}/ws"))
        .with_sender_label(label);

    let (mut agent, events, inbound) = NegotiationAgent::connect(
        config,
        Arc::new(factory.clone()),
        Arc::new(SyntheticMediaDevices::new()),
    )
    .await
    .unwrap();
    agent.start().await.unwrap();
    let handle = agent.handle();
    tokio::spawn(agent.run(inbound));

    Peer {
        events,
        factory,
        handle,
    }
}

async fn wait_for(events: &mut mpsc::UnboundedReceiver<AgentEvent>, wanted: AgentEvent) {
    tokio::time::timeout(Duration::from_secs(3), async {
        while let Some(event) = events.recv().await {
            if event == wanted {
                return;
            }
        }
        panic!("event stream ended before {wanted:?}");
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {wanted:?}"));
}

async fn wait_for_call(factory: &MockFactory, wanted: EngineCall) {
    tokio::time::timeout(Duration::from_secs(3), async {
        while !factory.pc.calls().await.contains(&wanted) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {wanted:?}"));
}

#[tokio::test]
async fn test_exactly_one_offer_and_one_answer() {
    init_tracing();
    let addr = spawn_relay().await;

    let mut alice = join(addr, "alice").await;
    wait_for(&mut alice.events, AgentEvent::RoomCreated).await;

    let mut bob = join(addr, "bob").await;
    wait_for(&mut bob.events, AgentEvent::RoleAssigned(Role::Responder)).await;
    wait_for(&mut alice.events, AgentEvent::RoleAssigned(Role::Initiator)).await;

    wait_for(
        &mut bob.events,
        AgentEvent::StateChanged(NegotiationState::AnswerSent),
    )
    .await;
    wait_for_call(
        &alice.factory,
        EngineCall::SetRemote(SessionDescription::answer("mock-answer")),
    )
    .await;

    alice
        .factory
        .inject(EngineEvent::StateChanged(PeerState::Connected))
        .await;
    bob.factory
        .inject(EngineEvent::StateChanged(PeerState::Connected))
        .await;
    wait_for(
        &mut alice.events,
        AgentEvent::StateChanged(NegotiationState::Connected),
    )
    .await;
    wait_for(
        &mut bob.events,
        AgentEvent::StateChanged(NegotiationState::Connected),
    )
    .await;

    let alice_calls = alice.factory.pc.calls().await;
    let bob_calls = bob.factory.pc.calls().await;
    assert_eq!(
        alice_calls
            .iter()
            .filter(|c| **c == EngineCall::CreateOffer)
            .count(),
        1
    );
    assert!(!alice_calls.contains(&EngineCall::CreateAnswer));
    assert_eq!(
        bob_calls
            .iter()
            .filter(|c| **c == EngineCall::CreateAnswer)
            .count(),
        1
    );
    assert!(!bob_calls.contains(&EngineCall::CreateOffer));
    assert!(bob_calls.contains(&EngineCall::SetRemote(SessionDescription::offer(
        "mock-offer"
    ))));
}

#[tokio::test]
async fn test_chat_and_departure_reach_the_peer() {
    init_tracing();
    let addr = spawn_relay().await;

    let mut alice = join(addr, "alice").await;
    wait_for(&mut alice.events, AgentEvent::RoomCreated).await;
    let mut bob = join(addr, "bob").await;
    wait_for(&mut alice.events, AgentEvent::RoleAssigned(Role::Initiator)).await;

    alice.handle.send_chat("hi bob").await.unwrap();
    wait_for(
        &mut bob.events,
        AgentEvent::ChatReceived {
            text: "hi bob".into(),
            sender: "alice".into(),
        },
    )
    .await;

    bob.handle.teardown();
    wait_for(&mut alice.events, AgentEvent::PeerLeft).await;
    wait_for(
        &mut alice.events,
        AgentEvent::StateChanged(NegotiationState::Closed),
    )
    .await;
    assert!(alice.handle.is_closed());
}

#[tokio::test]
async fn test_connect_uses_configured_signaling_url() {
    init_tracing();
    let config = AgentConfig::new("r1").with_signaling_url("ws://127.0.0.1:1/ws");

    let result = NegotiationAgent::connect(
        config,
        Arc::new(MockFactory::new()),
        Arc::new(SyntheticMediaDevices::new()),
    )
    .await;

    match result {
        Err(AgentError::Relay(reason)) => assert!(reason.contains("127.0.0.1:1")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("connected to a closed port"),
    }
}
