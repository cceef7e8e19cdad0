//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::time::Duration;

use parlor_client::{
    Action, ApiCall, ApiPhase, AppState, ProtocolAdapter, Room, Socket, Store, StoreHandle,
    proto::{RoomId, User, UserId},
    transport::{self, RemoteEnd, TransportEvent},
};

/// A spawned store, an opened socket over an in-memory transport, and the
/// remote (server) end driving it.
pub struct Session {
    pub store: StoreHandle,
    pub socket: Socket,
    pub remote: RemoteEnd,
    pub adapter: ProtocolAdapter,
}

pub fn user(id: UserId, name: &str) -> User {
    User {
        id,
        user_name: name.into(),
        email: format!("{name}@example.com"),
        first_name: name.into(),
        last_name: "Test".into(),
    }
}

pub fn rooms_loaded(ids: &[RoomId]) -> Action {
    Action::Api {
        call: ApiCall::UsersRooms,
        phase: ApiPhase::Success,
        rooms: Some(ids.iter().map(|id| Room::new(*id, format!("room{id}"), false)).collect()),
    }
}

/// Open a socket against an in-memory transport whose server side has
/// already completed the handshake.
pub async fn connected_session() -> Session {
    let store = Store::new().spawn();
    let mut socket = Socket::new(store.dispatcher(), store.subscribe());

    let (transport, remote) = transport::pair();
    remote.to_client.send(TransportEvent::Connected).await.unwrap();
    let adapter = socket.open(transport).await.unwrap();

    Session { store, socket, remote, adapter }
}

/// Wait until the store state satisfies `pred`, with a timeout.
pub async fn wait_for<F>(store: &StoreHandle, pred: F) -> AppState
where
    F: Fn(&AppState) -> bool,
{
    let mut rx = store.subscribe();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let state = rx.borrow();
                if pred(&state) {
                    return state.clone();
                }
            }
            rx.changed().await.expect("store loop ended");
        }
    })
    .await
    .expect("state condition not reached in time")
}

/// Give queued dispatches time to drain, for assertions that something did
/// NOT happen.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
