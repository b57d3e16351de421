use tandem_core::{ConnectionId, RoomId, SignalMessage};
use tandem_server::RoomCommand;

use crate::integration::{create_test_manager, init_tracing};

#[tokio::test]
async fn test_disconnect_notifies_peer_and_frees_seat() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();
    let room = RoomId::from("r1");
    let (a, b, d) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    manager.join(a, room.clone()).await;
    manager.join(b, room.clone()).await;

    manager
        .handle_command(RoomCommand::Leave { connection_id: a })
        .await;
    assert_eq!(manager.members(&room), Some(&[b][..]));

    manager.join(d, room.clone()).await;

    assert_eq!(signaling.received_by(&d).await, vec![SignalMessage::Joined]);
    assert_eq!(
        signaling.received_by(&b).await,
        vec![
            SignalMessage::Joined,
            SignalMessage::PeerLeft,
            SignalMessage::Ready
        ]
    );
    assert_eq!(manager.members(&room), Some(&[b, d][..]));
}

#[tokio::test]
async fn test_empty_room_is_reusable_from_scratch() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();
    let room = RoomId::from("r1");
    let (a, b, e) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    manager.join(a, room.clone()).await;
    manager.join(b, room.clone()).await;
    manager.leave(a).await;
    manager.leave(b).await;

    assert_eq!(manager.members(&room), None);
    assert_eq!(manager.stats().rooms, 0);

    manager.join(e, room.clone()).await;
    assert_eq!(signaling.received_by(&e).await, vec![SignalMessage::Created]);
}

#[tokio::test]
async fn test_leave_without_room_is_harmless() {
    init_tracing();

    let (mut manager, signaling) = create_test_manager();

    manager.leave(ConnectionId::new()).await;

    assert_eq!(signaling.total().await, 0);
    assert_eq!(manager.stats().members, 0);
}
