//! Protocol adapter.
//!
//! Translates between user intent, store actions, and wire events. Each
//! outbound operation follows the same sequence:
//!
//! 1. fail with [`ClientError::NotConnected`] if the transport is closed;
//! 2. fail with [`ClientError::InvalidState`] if an intent-specific
//!    precondition does not hold;
//! 3. dispatch the optimistic local action;
//! 4. emit the wire event carrying the same payload.
//!
//! The dispatch and emit are one client-side step, not a transaction with
//! the network: an emit may still be lost after the local state changed.
//! That is accepted eventual consistency; there is no retry or timeout, and
//! a dropped emit only surfaces, if at all, as a later disconnect.
//!
//! The inbound half turns every wire event into exactly one dispatched
//! action, and answers `userJoin` announcements with a directed `userInfo`
//! reply (mandatory: newly joined peers depend on it to learn who is
//! already present).

use std::time::{SystemTime, UNIX_EPOCH};

use parlor_proto::{
    InboundEvent, MessageEvent, OutboundEvent, RoomId, RoomUserEvent, User, UserInfoReply,
};
use tokio::sync::{mpsc, watch};

use crate::{
    action::Action,
    error::ClientError,
    state::AppState,
    store::Dispatcher,
    transport::TransportError,
};

/// Outbound operations and inbound translation for one connection.
///
/// Handles are cheap to clone and are valid for the lifetime of the
/// connection that produced them; after a disconnect every operation fails
/// with [`ClientError::NotConnected`] and a fresh handle comes from the
/// next [`crate::Socket::open`].
#[derive(Clone)]
pub struct ProtocolAdapter {
    dispatcher: Dispatcher,
    state: watch::Receiver<AppState>,
    outbound: mpsc::Sender<OutboundEvent>,
    connected: watch::Receiver<bool>,
}

impl ProtocolAdapter {
    pub(crate) fn new(
        dispatcher: Dispatcher,
        state: watch::Receiver<AppState>,
        outbound: mpsc::Sender<OutboundEvent>,
        connected: watch::Receiver<bool>,
    ) -> Self {
        Self { dispatcher, state, outbound, connected }
    }

    /// Whether the underlying transport is currently open.
    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    /// Send a message to the currently viewed room as the authenticated
    /// user. The timestamp is assigned here, at send time.
    pub async fn send_message(&self, body: &str) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let (room_id, user) = {
            let state = self.state.borrow();
            let room_id = state.view_room.ok_or_else(|| ClientError::InvalidState {
                reason: "no room selected".into(),
            })?;
            let user = state.user.clone().ok_or_else(|| ClientError::InvalidState {
                reason: "no authenticated user".into(),
            })?;
            (room_id, user)
        };

        let payload = MessageEvent {
            room_id,
            user_id: user.id,
            user_name: user.user_name,
            message: body.into(),
            time: epoch_millis(),
        };

        self.dispatcher.dispatch(Action::SendMessage(payload.clone())).await;
        self.emit(OutboundEvent::Message(payload)).await
    }

    /// Announce that `user` joins `room_id`.
    pub async fn join_room(&self, room_id: RoomId, user: User) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let payload = RoomUserEvent { room_id, user };
        self.dispatcher.dispatch(Action::PublishRoomJoin(payload.clone())).await;
        self.emit(OutboundEvent::Join(payload)).await
    }

    /// Announce that `user` leaves `room_id`.
    pub async fn leave_room(&self, room_id: RoomId, user: User) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let payload = RoomUserEvent { room_id, user };
        self.dispatcher.dispatch(Action::PublishRoomLeave(payload.clone())).await;
        self.emit(OutboundEvent::Leave(payload)).await
    }

    /// Announce `user`'s identity for `room_id`, directed at the peer
    /// socket `socket_id`.
    pub async fn send_user_info(
        &self,
        socket_id: String,
        user: User,
        room_id: RoomId,
    ) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let payload = UserInfoReply { socket_id, user, room_id };
        self.dispatcher.dispatch(Action::PublishUserInfo(payload.clone())).await;
        self.emit(OutboundEvent::UserInfo(payload)).await
    }

    /// Translate one inbound wire event into its dispatched action, plus
    /// the mandatory `userInfo` reply for `userJoin` announcements.
    ///
    /// Errors mean the event was dropped; the connection stays open and the
    /// caller is expected to log and continue.
    pub(crate) async fn handle_inbound(&self, event: InboundEvent) -> Result<(), ClientError> {
        match event {
            InboundEvent::UserInfo(payload) => {
                self.dispatcher.dispatch(Action::ReceiveUserInfo(payload)).await;
                Ok(())
            },

            InboundEvent::Message(payload) => {
                self.dispatcher.dispatch(Action::ReceiveMessage(payload)).await;
                Ok(())
            },

            InboundEvent::UserJoin(payload) => {
                // Validate the reply coordinates before dispatching anything
                // so a malformed announcement has no effect at all.
                let socket_id = payload.socket_id.clone().ok_or(ClientError::ProtocolViolation {
                    event: "userJoin",
                    reason: "missing socketId".into(),
                })?;
                let room_id = payload.room_id.ok_or(ClientError::ProtocolViolation {
                    event: "userJoin",
                    reason: "missing roomId".into(),
                })?;
                let local_user =
                    self.state.borrow().user.clone().ok_or_else(|| ClientError::InvalidState {
                        reason: "no authenticated user to announce".into(),
                    })?;

                self.dispatcher.dispatch(Action::ReceiveRoomJoin(payload)).await;
                self.send_user_info(socket_id, local_user, room_id).await
            },

            InboundEvent::UserLeave(payload) => {
                self.dispatcher
                    .dispatch(Action::ReceiveRoomLeave { payload, time: epoch_millis() })
                    .await;
                Ok(())
            },
        }
    }

    fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.is_connected() { Ok(()) } else { Err(ClientError::NotConnected) }
    }

    async fn emit(&self, event: OutboundEvent) -> Result<(), ClientError> {
        self.outbound
            .send(event)
            .await
            .map_err(|_| TransportError::Stream("outbound channel closed".into()).into())
    }
}

/// Current time as epoch milliseconds.
fn epoch_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
}
