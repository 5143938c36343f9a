use crate::{RealtimeEvent, RealtimeFrame, UserId};

use serde_json::json;

#[test]
fn given_online_users_frame_when_decoded_then_returns_ids() {
    // GIVEN: A getOnlineUsers frame as the server sends it
    let frame: RealtimeFrame =
        serde_json::from_value(json!({ "event": "getOnlineUsers", "data": ["A", "B"] }))
            .expect("valid frame");

    // WHEN: Decoding
    let event = frame.into_event().expect("known payload");

    // THEN: The ids come through in order
    assert_eq!(
        event,
        RealtimeEvent::OnlineUsers(vec![UserId::from("A"), UserId::from("B")])
    );
}

#[test]
fn given_unknown_event_when_decoded_then_returns_other() {
    let frame: RealtimeFrame =
        serde_json::from_value(json!({ "event": "newMessage", "data": { "text": "hi" } }))
            .expect("valid frame");

    let event = frame.into_event().expect("unknown events never fail");

    assert_eq!(event, RealtimeEvent::Other(String::from("newMessage")));
}

/// **VALUE**: Verifies that a malformed presence payload is an error, not an empty list.
///
/// **WHY THIS MATTERS**: Treating garbage as `[]` would wipe the presence set
/// and show everybody offline.
///
/// **BUG THIS CATCHES**: Would catch an `unwrap_or_default()` on the payload.
#[test]
fn given_malformed_online_users_payload_when_decoded_then_returns_error() {
    let frame: RealtimeFrame =
        serde_json::from_value(json!({ "event": "getOnlineUsers", "data": "A,B" }))
            .expect("valid frame");

    assert!(frame.into_event().is_err());
}

#[test]
fn given_ids_when_frame_built_then_round_trips_through_json() {
    let ids = vec![UserId::from("A")];

    let text = serde_json::to_string(&RealtimeFrame::online_users(&ids)).expect("serializable");
    let decoded: RealtimeFrame = serde_json::from_str(&text).expect("valid frame");

    assert_eq!(decoded.into_event().ok(), Some(RealtimeEvent::OnlineUsers(ids)));
}
