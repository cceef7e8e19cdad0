//! Wire event model for the parlor chat protocol.
//!
//! Defines the typed, JSON-shaped events exchanged between a chat client and
//! server over a single socket connection. Events travel as text frames with
//! an `{"event": <name>, "data": <payload>}` envelope.
//!
//! # Directions
//!
//! - [`InboundEvent`]: server -> client (`userInfo`, `message`, `userJoin`,
//!   `userLeave`)
//! - [`OutboundEvent`]: client -> server (`message`, `join`, `leave`,
//!   `userInfo`)
//!
//! Connection lifecycle (`connect`, `disconnect`, `error`) is not carried in
//! the JSON envelope; it is surfaced by the transport layer itself.
//! [`DisconnectReason`] carries the reason taxonomy for `disconnect`.
//!
//! # Invariants
//!
//! Each event name maps to exactly one payload shape. Decoding validates the
//! envelope and payload fields in one step, except for `userJoin` whose
//! `socketId`/`roomId`/`user` fields are optional on the wire and validated
//! downstream by the protocol adapter.

mod error;
mod event;
mod user;

pub use error::ProtocolError;
pub use event::{
    DisconnectReason, InboundEvent, MessageEvent, OutboundEvent, RoomUserEvent, UserInfoEvent,
    UserInfoReply, UserJoinEvent,
};
pub use user::{RoomId, User, UserId};
