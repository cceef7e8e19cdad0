//! Inbound and outbound wire events.
//!
//! Both directions share the same envelope: a JSON object with an `event`
//! name and a `data` payload whose shape is determined by the name. The
//! serde `tag`/`content` representation enforces the name-to-shape mapping
//! at decode time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolError,
    user::{RoomId, User, UserId},
};

/// Events received from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum InboundEvent {
    /// A peer announced its identity for a room.
    UserInfo(UserInfoEvent),
    /// A chat message addressed to a room.
    Message(MessageEvent),
    /// A peer joined a room. The receiver is expected to answer with a
    /// directed `userInfo` event so the newcomer learns who is present.
    UserJoin(UserJoinEvent),
    /// A peer left a room.
    UserLeave(RoomUserEvent),
}

impl InboundEvent {
    /// Decode a text frame into an event.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }

    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserInfo(_) => "userInfo",
            Self::Message(_) => "message",
            Self::UserJoin(_) => "userJoin",
            Self::UserLeave(_) => "userLeave",
        }
    }
}

/// Events emitted to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// Send a chat message to a room.
    Message(MessageEvent),
    /// Join a room.
    Join(RoomUserEvent),
    /// Leave a room.
    Leave(RoomUserEvent),
    /// Announce our identity, directed at a specific peer socket.
    UserInfo(UserInfoReply),
}

impl OutboundEvent {
    /// Encode this event as a text frame.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

/// Payload of `message` events, both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Author's user id.
    pub user_id: UserId,
    /// Author's display name.
    pub user_name: String,
    /// Message body text.
    pub message: String,
    /// Send time, epoch milliseconds. Assigned client-side at send time.
    pub time: u64,
}

/// Payload of inbound `userInfo` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoEvent {
    /// The announced user.
    pub user: User,
    /// Room the announcement applies to.
    pub room_id: RoomId,
}

/// Payload of inbound `userJoin` events.
///
/// All fields are optional on the wire. `socketId` and `roomId` are
/// mandatory for the directed reply and validated by the protocol adapter;
/// `user` may be absent, in which case the joiner's identity arrives later
/// via `userInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserJoinEvent {
    /// Socket the reply must be directed at.
    #[serde(default)]
    pub socket_id: Option<String>,
    /// Room that was joined.
    #[serde(default)]
    pub room_id: Option<RoomId>,
    /// The joining user, when the server includes it.
    #[serde(default)]
    pub user: Option<User>,
}

/// Payload pairing a room with a user (`join`, `leave`, `userLeave`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomUserEvent {
    /// Room affected.
    pub room_id: RoomId,
    /// User affected.
    pub user: User,
}

/// Payload of outbound `userInfo` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoReply {
    /// Socket the announcement is directed at.
    pub socket_id: String,
    /// The announced user.
    pub user: User,
    /// Room the announcement applies to.
    pub room_id: RoomId,
}

/// Why a connection ended.
///
/// Reason strings follow the socket.io convention so that peers and logs
/// agree on who ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The server forcibly closed the connection. Session state is not
    /// recoverable; clients must treat this as a session end.
    ServerDisconnect,
    /// The client closed the connection deliberately.
    ClientDisconnect,
    /// The underlying transport dropped without a close handshake.
    TransportClose,
}

impl DisconnectReason {
    /// Whether the server ended the session.
    pub fn is_server_initiated(self) -> bool {
        matches!(self, Self::ServerDisconnect)
    }
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::ServerDisconnect => "io server disconnect",
            Self::ClientDisconnect => "io client disconnect",
            Self::TransportClose => "transport close",
        };
        f.write_str(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId) -> User {
        User {
            id,
            user_name: format!("user{id}"),
            email: format!("user{id}@example.com"),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
        }
    }

    #[test]
    fn inbound_message_envelope() {
        let text = r#"{
            "event": "message",
            "data": {"roomId": 5, "userId": 1, "userName": "a", "message": "hi", "time": 1000}
        }"#;

        let event = InboundEvent::decode(text).unwrap();
        assert_eq!(
            event,
            InboundEvent::Message(MessageEvent {
                room_id: 5,
                user_id: 1,
                user_name: "a".into(),
                message: "hi".into(),
                time: 1000,
            })
        );
        assert_eq!(event.name(), "message");
    }

    #[test]
    fn user_join_fields_are_optional() {
        let text = r#"{"event": "userJoin", "data": {"roomId": 3}}"#;
        let event = InboundEvent::decode(text).unwrap();

        let InboundEvent::UserJoin(payload) = event else {
            panic!("expected userJoin");
        };
        assert_eq!(payload.room_id, Some(3));
        assert_eq!(payload.socket_id, None);
        assert_eq!(payload.user, None);
    }

    #[test]
    fn unknown_event_name_rejected() {
        let text = r#"{"event": "shutdown", "data": {}}"#;
        assert!(InboundEvent::decode(text).is_err());
    }

    #[test]
    fn outbound_user_info_uses_camel_case() {
        let event = OutboundEvent::UserInfo(UserInfoReply {
            socket_id: "abc".into(),
            user: user(7),
            room_id: 2,
        });

        let encoded = event.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(value["event"], "userInfo");
        assert_eq!(value["data"]["socketId"], "abc");
        assert_eq!(value["data"]["roomId"], 2);
        assert_eq!(value["data"]["user"]["userName"], "user7");
    }

    #[test]
    fn disconnect_reason_strings() {
        assert_eq!(DisconnectReason::ServerDisconnect.to_string(), "io server disconnect");
        assert_eq!(DisconnectReason::ClientDisconnect.to_string(), "io client disconnect");
        assert!(DisconnectReason::ServerDisconnect.is_server_initiated());
        assert!(!DisconnectReason::TransportClose.is_server_initiated());
    }
}
