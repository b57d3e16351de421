use tandem_core::{ConnectionId, RoomId, SignalMessage};

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_third_join_is_rejected() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();
    let room = RoomId::from("r1");
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    manager.join(a, room.clone()).await;
    manager.join(b, room.clone()).await;
    signaling.clear().await;

    manager.join(c, room.clone()).await;

    assert_eq!(signaling.received_by(&c).await, vec![SignalMessage::Full]);
    assert!(signaling.received_by(&a).await.is_empty());
    assert!(signaling.received_by(&b).await.is_empty());
    assert_eq!(manager.members(&room), Some(&[a, b][..]));
    assert_eq!(manager.room_of(&c), None);
}

#[tokio::test]
async fn test_rejected_connection_can_try_another_room() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    manager.join(a, "r1".into()).await;
    manager.join(b, "r1".into()).await;
    manager.join(c, "r1".into()).await;
    manager.join(c, "r2".into()).await;

    assert_eq!(
        signaling.received_by(&c).await,
        vec![SignalMessage::Full, SignalMessage::Created]
    );
    assert_eq!(manager.members(&RoomId::from("r2")), Some(&[c][..]));
}

#[tokio::test]
async fn test_many_concurrent_joins_never_exceed_capacity() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();
    let room = RoomId::from("crowded");
    let ids: Vec<ConnectionId> = (0..10).map(|_| ConnectionId::new()).collect();

    for id in &ids {
        manager.join(*id, room.clone()).await;
    }

    assert_eq!(manager.members(&room).map(<[_]>::len), Some(2));
    for id in &ids[2..] {
        assert_eq!(signaling.received_by(id).await, vec![SignalMessage::Full]);
    }
}
