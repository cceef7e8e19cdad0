//! The action catalog.
//!
//! Every state mutation in the client flows through exactly one [`Action`]
//! dispatched into the [`crate::Store`]. Each variant carries a typed
//! payload, so an action missing its payload is unrepresentable; there is no
//! runtime "malformed action" failure mode.
//!
//! Actions fall into three families:
//!
//! - `Receive*` / `Socket*`: produced by the connection manager, one per
//!   inbound wire event.
//! - `Publish*` / `SendMessage`: produced by the protocol adapter as the
//!   optimistic local half of an outbound emit.
//! - [`Action::Api`]: the request/response lifecycle of the HTTP
//!   collaborator, classified by an explicit [`ApiPhase`] rather than by
//!   naming convention.

use parlor_proto::{
    DisconnectReason, MessageEvent, RoomId, RoomUserEvent, User, UserInfoEvent, UserInfoReply,
    UserJoinEvent,
};

use crate::state::Room;

/// Operations performed against the HTTP collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiCall {
    /// Create a new room.
    CreateRoom,
    /// Fetch the room directory.
    FetchRooms,
    /// Join a room by id.
    JoinRoom,
    /// Fetch the rooms the user belongs to.
    UsersRooms,
}

/// Phase of a request/response lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiPhase {
    /// Request in flight.
    Request,
    /// Request completed successfully.
    Success,
    /// Request failed.
    Failed,
}

/// Actions processed by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The socket handshake completed.
    SocketConnected,

    /// The socket disconnected.
    SocketDisconnected {
        /// Why the connection ended.
        reason: DisconnectReason,
    },

    /// Local user sent a message (optimistic, pre-confirmation).
    SendMessage(MessageEvent),

    /// A peer's message arrived.
    ReceiveMessage(MessageEvent),

    /// Local user joined a room (optimistic, pre-confirmation).
    PublishRoomJoin(RoomUserEvent),

    /// A peer joined a room we occupy.
    ReceiveRoomJoin(UserJoinEvent),

    /// A peer announced its identity for a room.
    ReceiveUserInfo(UserInfoEvent),

    /// We announced our identity to a specific peer socket.
    PublishUserInfo(UserInfoReply),

    /// Local user left a room (optimistic, pre-confirmation).
    PublishRoomLeave(RoomUserEvent),

    /// A peer left a room we occupy.
    ReceiveRoomLeave {
        /// The departing user and room.
        payload: RoomUserEvent,
        /// When the departure was observed, epoch milliseconds. Stamped by
        /// the protocol adapter so the reducer stays pure.
        time: u64,
    },

    /// An HTTP collaborator call changed phase.
    Api {
        /// Which operation.
        call: ApiCall,
        /// Which lifecycle phase.
        phase: ApiPhase,
        /// Rooms delivered by a successful response, when the operation
        /// yields any (join, directory fetch, rooms-I'm-in).
        rooms: Option<Vec<Room>>,
    },

    /// The session's authenticated user was established.
    SetUser(User),

    /// The room being viewed changed.
    SetViewRoom(Option<RoomId>),
}

impl Action {
    /// Request-lifecycle phase of this action, if it has one.
    pub fn api_phase(&self) -> Option<ApiPhase> {
        match self {
            Self::Api { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
