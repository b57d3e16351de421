use std::time::Duration;
use tandem_agent::{
    AgentError, AgentEvent, MediaError, NegotiationState, SyntheticMediaDevices, TrackSource,
    VideoSource,
};

use crate::integration::{TestAgent, init_tracing};
use crate::utils::{EngineCall, MockFactory, MockFailures};

async fn replaced_tracks(t: &TestAgent) -> Vec<String> {
    t.factory
        .pc
        .calls()
        .await
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::ReplaceTrack(id) => Some(id),
            _ => None,
        })
        .collect()
}

fn camera_id(t: &TestAgent) -> String {
    t.agent.media().unwrap().camera().unwrap().id().to_owned()
}

#[tokio::test]
async fn test_share_and_stop_swaps_video_without_signaling() {
    init_tracing();
    let mut t = TestAgent::started().await;
    t.agent.handle_signal(tandem_core::SignalMessage::Ready).await;
    t.sent();
    t.events();

    t.agent.share_screen().await.unwrap();

    let VideoSource::Screen(screen) = t.agent.media().unwrap().video_source().await else {
        panic!("screen should be the active video source");
    };
    assert_eq!(screen.source(), TrackSource::Screen);
    assert_eq!(replaced_tracks(&t).await, vec![screen.id().to_owned()]);
    assert_eq!(t.events(), vec![AgentEvent::ScreenShareStarted]);

    t.agent.stop_screen_share().await.unwrap();

    assert!(!t.agent.media().unwrap().video_source().await.is_screen());
    assert!(screen.is_ended());
    assert_eq!(
        replaced_tracks(&t).await,
        vec![screen.id().to_owned(), camera_id(&t)]
    );
    assert_eq!(t.events(), vec![AgentEvent::ScreenShareEnded]);

    assert_eq!(t.agent.state(), NegotiationState::OfferSent);
    assert!(t.sent().is_empty());
}

#[tokio::test]
async fn test_ended_capture_restores_camera() {
    init_tracing();
    let mut t = TestAgent::started().await;

    t.agent.share_screen().await.unwrap();
    let VideoSource::Screen(screen) = t.agent.media().unwrap().video_source().await else {
        panic!("screen should be the active video source");
    };

    // The user hits "stop sharing" in the capture UI.
    screen.stop();

    tokio::time::timeout(Duration::from_secs(2), async {
        while t.agent.media().unwrap().video_source().await.is_screen() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("camera was not restored");

    assert_eq!(replaced_tracks(&t).await.last(), Some(&camera_id(&t)));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(t.events().contains(&AgentEvent::ScreenShareEnded));
}

#[tokio::test]
async fn test_refused_capture_leaves_camera_untouched() {
    init_tracing();
    let mut t = TestAgent::with_parts(
        MockFactory::new(),
        SyntheticMediaDevices::new().without_screen(),
    );
    t.agent.start().await.unwrap();

    let err = t.agent.share_screen().await.unwrap_err();

    assert!(matches!(
        err,
        AgentError::Media(MediaError::PermissionDenied(TrackSource::Screen))
    ));
    assert!(!t.agent.media().unwrap().video_source().await.is_screen());
    assert!(replaced_tracks(&t).await.is_empty());
    assert!(!t.events().contains(&AgentEvent::ScreenShareStarted));
}

#[tokio::test]
async fn test_engine_refusal_keeps_camera() {
    init_tracing();
    let t = TestAgent::started().await;
    t.factory
        .pc
        .fail(MockFailures {
            replace_track: true,
            ..Default::default()
        })
        .await;

    let err = t.agent.share_screen().await.unwrap_err();

    assert!(matches!(err, AgentError::Engine(_)));
    assert!(!t.agent.media().unwrap().video_source().await.is_screen());
    assert!(!t.agent.media().unwrap().camera().unwrap().is_ended());
}

#[tokio::test]
async fn test_share_twice_and_stop_without_share() {
    init_tracing();
    let t = TestAgent::started().await;

    assert!(matches!(
        t.agent.stop_screen_share().await,
        Err(AgentError::NotSharing)
    ));

    t.agent.share_screen().await.unwrap();
    assert!(matches!(
        t.agent.share_screen().await,
        Err(AgentError::AlreadySharing)
    ));
}

#[tokio::test]
async fn test_share_before_start_fails() {
    init_tracing();
    let t = TestAgent::new();

    assert!(matches!(
        t.agent.share_screen().await,
        Err(AgentError::NotStarted)
    ));
}
