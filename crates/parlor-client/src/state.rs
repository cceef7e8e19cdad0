//! Observable application state types.
//!
//! This module defines the data structures that represent the client's
//! current view of the world: the rooms it occupies, their members and
//! message history, and session-level flags.
//!
//! [`AppState`] is owned exclusively by the [`crate::Store`]; every other
//! component sees read-only snapshots. Mutation happens only inside the
//! reducer chain, which receives a fresh copy and returns the next value.

use parlor_proto::{RoomId, User, UserId};

/// Reserved author id for synthetic, system-authored messages.
///
/// Never a real user id; consumers must not resolve it against membership.
pub const SYSTEM_AUTHOR: UserId = -1;

/// A message in a room.
///
/// Immutable; ordering is insertion order within the owning room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Body text.
    pub body: String,
    /// Author's user id, or [`SYSTEM_AUTHOR`] for synthetic messages.
    pub author_id: UserId,
    /// Author's display name. Empty for synthetic messages.
    pub author_name: String,
    /// Room the message belongs to.
    pub room_id: RoomId,
    /// Timestamp, epoch milliseconds, assigned at send time.
    pub time: u64,
}

impl Message {
    /// Create a user-authored message.
    pub fn new(
        body: impl Into<String>,
        author_id: UserId,
        author_name: impl Into<String>,
        room_id: RoomId,
        time: u64,
    ) -> Self {
        Self { body: body.into(), author_id, author_name: author_name.into(), room_id, time }
    }

    /// Create a system-authored message, e.g. a departure announcement.
    pub fn system(body: impl Into<String>, room_id: RoomId, time: u64) -> Self {
        Self { body: body.into(), author_id: SYSTEM_AUTHOR, author_name: String::new(), room_id, time }
    }
}

/// A room the user occupies.
///
/// # Invariants
///
/// - The user set never contains two entries with the same id.
/// - Messages are never reordered once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Stable server-assigned id.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Whether joining requires a password.
    pub protected: bool,
    messages: Vec<Message>,
    users: Vec<User>,
}

impl Room {
    /// Create an empty room.
    pub fn new(id: RoomId, name: impl Into<String>, protected: bool) -> Self {
        Self { id, name: name.into(), protected, messages: Vec::new(), users: Vec::new() }
    }

    /// Append a message. Ordering is preserved; nothing is ever removed
    /// except by [`Room::clear`].
    pub fn add_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add a user to the member set. Idempotent: adding an already-present
    /// user id leaves the set unchanged.
    pub fn add_user(&mut self, user: User) {
        if !self.users.iter().any(|u| u.same_identity(&user)) {
            self.users.push(user);
        }
    }

    /// Remove a user from the member set by id.
    pub fn remove_user(&mut self, user_id: UserId) {
        self.users.retain(|u| u.id != user_id);
    }

    /// Drop all members and all history, keeping the room identity.
    pub fn clear(&mut self) {
        self.users.clear();
        self.messages.clear();
    }

    /// Message history, chronological.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Current member set.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Whether a user id is in the member set.
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.users.iter().any(|u| u.id == user_id)
    }
}

/// Root session state, one instance per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// True while any network request is outstanding.
    pub waiting: bool,
    /// The authenticated local user, if any.
    pub user: Option<User>,
    /// Rooms the user currently occupies.
    pub rooms_in: Vec<Room>,
    /// Room currently being viewed, if any.
    pub view_room: Option<RoomId>,
    /// Whether the socket is currently connected.
    pub connected: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self { waiting: false, user: None, rooms_in: Vec::new(), view_room: None, connected: false }
    }
}

impl AppState {
    /// Look up an occupied room by id.
    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms_in.iter().find(|r| r.id == room_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: UserId, name: &str) -> User {
        User {
            id,
            user_name: name.into(),
            email: format!("{name}@example.com"),
            first_name: name.into(),
            last_name: "Test".into(),
        }
    }

    #[test]
    fn add_user_is_idempotent_by_id() {
        let mut room = Room::new(1, "general", false);
        room.add_user(user(7, "ada"));
        room.add_user(user(7, "ada-renamed"));

        assert_eq!(room.users().len(), 1);
        assert_eq!(room.users()[0].user_name, "ada");
    }

    #[test]
    fn remove_user_keeps_others() {
        let mut room = Room::new(1, "general", false);
        room.add_user(user(7, "ada"));
        room.add_user(user(8, "grace"));
        room.remove_user(7);

        assert!(!room.has_user(7));
        assert!(room.has_user(8));
    }

    #[test]
    fn clear_keeps_identity() {
        let mut room = Room::new(9, "ops", true);
        room.add_user(user(1, "ada"));
        room.add_message(Message::new("hi", 1, "ada", 9, 100));
        room.clear();

        assert_eq!(room.id, 9);
        assert_eq!(room.name, "ops");
        assert!(room.protected);
        assert!(room.users().is_empty());
        assert!(room.messages().is_empty());
    }

    #[test]
    fn system_message_uses_sentinel_author() {
        let message = Message::system("User ada has left the room", 3, 42);
        assert_eq!(message.author_id, SYSTEM_AUTHOR);
        assert!(message.author_name.is_empty());
    }
}
