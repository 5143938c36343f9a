use crate::{PresenceSet, UserId};

/// **VALUE**: Verifies wholesale replacement semantics.
///
/// **WHY THIS MATTERS**: The server pushes the complete online list every time.
/// Merging would keep users "online" forever after they disconnect.
///
/// **BUG THIS CATCHES**: Would catch `replace` being implemented as `extend`.
#[test]
fn given_a_and_b_online_when_replaced_with_b_then_only_b_remains() {
    // GIVEN: A and B online
    let mut presence = PresenceSet::new();
    presence.replace(vec![UserId::from("A"), UserId::from("B")]);
    assert_eq!(presence.len(), 2);

    // WHEN: A push with only B arrives
    presence.replace(vec![UserId::from("B")]);

    // THEN: Exactly {B}
    assert_eq!(presence.len(), 1);
    assert!(presence.is_online(&UserId::from("B")));
    assert!(!presence.is_online(&UserId::from("A")));
}

#[test]
fn given_duplicate_ids_when_replaced_then_stored_once() {
    let mut presence = PresenceSet::new();

    presence.replace(vec![UserId::from("A"), UserId::from("A")]);

    assert_eq!(presence.len(), 1);
}

#[test]
fn given_online_users_when_cleared_then_empty() {
    let mut presence: PresenceSet = vec![UserId::from("A")].into_iter().collect();

    presence.clear();

    assert!(presence.is_empty());
}
