//! The reducer chain.
//!
//! Reducers are pure functions of `(previous state, action)`. The store
//! applies [`CHAIN`] strictly in order, each reducer receiving the previous
//! reducer's output; no reducer is ever skipped or reordered.

use crate::{
    action::{Action, ApiPhase},
    state::{AppState, Message, Room},
};

/// A single link in the reducer chain.
pub type Reducer = fn(AppState, &Action) -> AppState;

/// The full chain, in registration order.
pub const CHAIN: [Reducer; 2] = [request_lifecycle, chat];

/// Tracks the global `waiting` flag across request/response lifecycles.
///
/// Any [`ApiPhase::Request`] raises the flag; [`ApiPhase::Success`] and
/// [`ApiPhase::Failed`] lower it. Every other action passes through.
pub fn request_lifecycle(mut state: AppState, action: &Action) -> AppState {
    if let Some(phase) = action.api_phase() {
        state.waiting = matches!(phase, ApiPhase::Request);
    }
    state
}

/// Folds socket and user actions into the room/user/message model.
pub fn chat(mut state: AppState, action: &Action) -> AppState {
    match action {
        Action::SocketConnected => {
            state.connected = true;
        },

        Action::SocketDisconnected { reason } => {
            // A server-initiated disconnect ends the session outright. Any
            // other disconnect keeps room identities but drops membership
            // and history, which are not trustworthy across the gap.
            if reason.is_server_initiated() {
                return AppState::default();
            }
            state.connected = false;
            for room in &mut state.rooms_in {
                room.clear();
            }
        },

        Action::SendMessage(payload) | Action::ReceiveMessage(payload) => {
            append_message(
                &mut state.rooms_in,
                Message::new(
                    payload.message.clone(),
                    payload.user_id,
                    payload.user_name.clone(),
                    payload.room_id,
                    payload.time,
                ),
            );
        },

        Action::PublishRoomJoin(payload) => {
            add_user(&mut state.rooms_in, payload.room_id, payload.user.clone());
        },

        Action::ReceiveRoomJoin(payload) => {
            // The joiner's identity may be absent here; it then arrives via
            // the userInfo exchange instead.
            if let (Some(room_id), Some(user)) = (payload.room_id, &payload.user) {
                add_user(&mut state.rooms_in, room_id, user.clone());
            }
        },

        Action::ReceiveUserInfo(payload) => {
            add_user(&mut state.rooms_in, payload.room_id, payload.user.clone());
        },

        Action::ReceiveRoomLeave { payload, time } => {
            for room in &mut state.rooms_in {
                if room.id == payload.room_id {
                    room.remove_user(payload.user.id);
                    room.add_message(Message::system(
                        format!("User {} has left the room", payload.user.user_name),
                        payload.room_id,
                        *time,
                    ));
                }
            }
        },

        Action::Api { phase: ApiPhase::Success, rooms: Some(rooms), .. } => {
            merge_rooms(&mut state.rooms_in, rooms);
        },

        Action::SetUser(user) => {
            state.user = Some(user.clone());
        },

        Action::SetViewRoom(room_id) => {
            state.view_room = *room_id;
        },

        Action::PublishUserInfo(_)
        | Action::PublishRoomLeave(_)
        | Action::Api { .. } => {},
    }

    state
}

fn append_message(rooms: &mut [Room], message: Message) {
    for room in rooms {
        if room.id == message.room_id {
            room.add_message(message);
            return;
        }
    }
}

fn add_user(rooms: &mut [Room], room_id: parlor_proto::RoomId, user: parlor_proto::User) {
    for room in rooms {
        if room.id == room_id {
            room.add_user(user);
            return;
        }
    }
}

/// Merge server-delivered rooms into the occupied list, keeping existing
/// rooms (and their accumulated history) over incoming duplicates.
fn merge_rooms(rooms_in: &mut Vec<Room>, incoming: &[Room]) {
    for room in incoming {
        if !rooms_in.iter().any(|r| r.id == room.id) {
            rooms_in.push(room.clone());
        }
    }
}
