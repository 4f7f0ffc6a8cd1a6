mod common;

use std::time::Duration;

use http::StatusCode;
use serde_json::json;
use tokio::time::timeout;
use uuid::Uuid;

use devconnect::models::notification::{NotificationEvent, NotificationKind};
use devconnect::realtime::bus::NotificationBus;

use common::{register, request, test_app, token_of, user_id_of};

fn follow_event(from: &str, from_id: &str) -> NotificationEvent {
    NotificationEvent {
        kind: NotificationKind::Follow,
        from: from.to_string(),
        from_id: from_id.to_string(),
    }
}

#[tokio::test]
async fn test_publish_delivers_one_copy_per_subscribed_session() {
    let bus = NotificationBus::new();

    // Two sessions for the same user, e.g. two open tabs.
    let mut tab_one = bus.subscribe(Uuid::new_v4(), "user-1").await;
    let mut tab_two = bus.subscribe(Uuid::new_v4(), "user-1").await;

    let delivered = bus.publish("user-1", follow_event("Ada", "user-2")).await;
    assert_eq!(delivered, 2);

    for rx in [&mut tab_one, &mut tab_two] {
        let event = rx.try_recv().expect("each session receives its own copy");
        assert_eq!(event.kind, NotificationKind::Follow);
        assert_eq!(event.from, "Ada");
        assert!(rx.try_recv().is_err(), "at most one copy per session");
    }
}

#[tokio::test]
async fn test_publish_to_empty_channel_is_silently_dropped() {
    let bus = NotificationBus::new();
    let delivered = bus.publish("nobody-home", follow_event("Ada", "user-2")).await;
    assert_eq!(delivered, 0);
}

#[tokio::test]
async fn test_unsubscribe_removes_session() {
    let bus = NotificationBus::new();

    let session = Uuid::new_v4();
    let mut rx = bus.subscribe(session, "user-1").await;
    bus.unsubscribe(session).await;
    // Idempotent on a session that is already gone.
    bus.unsubscribe(session).await;

    assert_eq!(bus.publish("user-1", follow_event("Ada", "user-2")).await, 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_rejoin_moves_session_to_new_channel() {
    let bus = NotificationBus::new();

    let session = Uuid::new_v4();
    let _old = bus.subscribe(session, "user-1").await;
    let mut current = bus.subscribe(session, "user-2").await;

    assert_eq!(bus.publish("user-1", follow_event("Ada", "a")).await, 0);
    assert_eq!(bus.publish("user-2", follow_event("Ada", "a")).await, 1);
    assert!(current.try_recv().is_ok());
}

#[tokio::test]
async fn test_dropped_receiver_is_pruned_on_publish() {
    let bus = NotificationBus::new();

    let rx = bus.subscribe(Uuid::new_v4(), "user-1").await;
    drop(rx);

    assert_eq!(bus.publish("user-1", follow_event("Ada", "a")).await, 0);
}

#[tokio::test]
async fn test_follow_dispatches_notification_to_target_channel() {
    let (app, state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let lin = register(&app, "Lin", "lin@x.com").await;
    let (ada_token, ada_id) = (token_of(&ada), user_id_of(&ada));
    let lin_id = user_id_of(&lin);

    // Lin's session has joined its own channel before the follow dispatches.
    let mut events = state.bus.subscribe(Uuid::new_v4(), &lin_id).await;

    let (status, _) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", lin_id),
        Some(&ada_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let event = timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("notification not dispatched")
        .unwrap();
    assert_eq!(event.kind, NotificationKind::Follow);
    assert_eq!(event.from, "Ada");
    assert_eq!(event.from_id, ada_id);
    assert!(events.try_recv().is_err(), "exactly one event per follow");

    // The wire shape is {type, from, fromId}.
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({"type": "follow", "from": "Ada", "fromId": ada_id})
    );
}

#[tokio::test]
async fn test_follow_without_connected_recipient_still_succeeds() {
    let (app, _state) = test_app().await;

    let ada = register(&app, "Ada", "ada@x.com").await;
    let lin = register(&app, "Lin", "lin@x.com").await;

    let (status, following) = request(
        &app,
        "PUT",
        &format!("/api/users/follow/{}", user_id_of(&lin)),
        Some(&token_of(&ada)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(following, json!([user_id_of(&lin)]));
}
