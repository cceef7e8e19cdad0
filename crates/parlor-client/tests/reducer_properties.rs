//! Property-based tests for the reducer chain.
//!
//! Verifies the membership and history invariants under arbitrary action
//! sequences, driving the store synchronously.

use std::collections::HashSet;

use parlor_client::{
    Action, ApiCall, ApiPhase, Room, Store,
    proto::{DisconnectReason, MessageEvent, User, UserInfoEvent},
};
use proptest::prelude::*;

fn user(id: i64) -> User {
    User {
        id,
        user_name: format!("user{id}"),
        email: format!("user{id}@example.com"),
        first_name: "Test".into(),
        last_name: "User".into(),
    }
}

fn store_with_rooms(ids: &[i64]) -> Store {
    let mut store = Store::new();
    store.dispatch(&Action::Api {
        call: ApiCall::UsersRooms,
        phase: ApiPhase::Success,
        rooms: Some(ids.iter().map(|id| Room::new(*id, format!("room{id}"), false)).collect()),
    });
    store
}

fn message(room_id: i64, seq: usize) -> MessageEvent {
    MessageEvent {
        room_id,
        user_id: 1,
        user_name: "ada".into(),
        message: format!("m{seq}"),
        time: seq as u64,
    }
}

proptest! {
    /// Any sequence of userInfo announcements leaves a member set with one
    /// entry per distinct user id.
    #[test]
    fn member_set_is_idempotent(ids in prop::collection::vec(1i64..10, 0..40)) {
        let mut store = store_with_rooms(&[1]);
        for id in &ids {
            store.dispatch(&Action::ReceiveUserInfo(UserInfoEvent { user: user(*id), room_id: 1 }));
        }

        let distinct: HashSet<i64> = ids.iter().copied().collect();
        let room = store.state().room(1).unwrap();
        prop_assert_eq!(room.users().len(), distinct.len());
        for id in distinct {
            prop_assert!(room.has_user(id));
        }
    }

    /// Messages land only in their target room, in dispatch order; rooms
    /// the client does not occupy absorb nothing.
    #[test]
    fn message_append_is_isolated_and_ordered(
        targets in prop::collection::vec(1i64..6, 0..60)
    ) {
        let occupied = [1i64, 2, 3];
        let mut store = store_with_rooms(&occupied);
        for (seq, room_id) in targets.iter().enumerate() {
            store.dispatch(&Action::ReceiveMessage(message(*room_id, seq)));
        }

        for room_id in occupied {
            let expected: Vec<String> = targets
                .iter()
                .enumerate()
                .filter(|(_, target)| **target == room_id)
                .map(|(seq, _)| format!("m{seq}"))
                .collect();
            let got: Vec<String> = store
                .state()
                .room(room_id)
                .unwrap()
                .messages()
                .iter()
                .map(|m| m.body.clone())
                .collect();
            prop_assert_eq!(got, expected);
        }
    }

    /// An unplanned disconnect empties every room but keeps identities; a
    /// server-initiated one resets the whole session.
    #[test]
    fn disconnect_clears_or_resets(
        room_ids in prop::collection::hash_set(1i64..8, 1..5),
        traffic in prop::collection::vec((1i64..8, 1i64..10), 0..30),
        server_initiated in any::<bool>(),
    ) {
        let room_ids: Vec<i64> = room_ids.into_iter().collect();
        let mut store = store_with_rooms(&room_ids);
        store.dispatch(&Action::SocketConnected);
        for (seq, (room_id, user_id)) in traffic.iter().enumerate() {
            store.dispatch(&Action::ReceiveUserInfo(UserInfoEvent {
                user: user(*user_id),
                room_id: *room_id,
            }));
            store.dispatch(&Action::ReceiveMessage(message(*room_id, seq)));
        }

        let reason = if server_initiated {
            DisconnectReason::ServerDisconnect
        } else {
            DisconnectReason::TransportClose
        };
        store.dispatch(&Action::SocketDisconnected { reason });

        if server_initiated {
            prop_assert_eq!(store.state(), &parlor_client::AppState::default());
        } else {
            prop_assert!(!store.state().connected);
            prop_assert_eq!(store.state().rooms_in.len(), room_ids.len());
            for room in &store.state().rooms_in {
                prop_assert!(room.users().is_empty());
                prop_assert!(room.messages().is_empty());
            }
        }
    }
}
