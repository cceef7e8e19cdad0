//! User identity as it appears on the wire.

use serde::{Deserialize, Serialize};

/// Stable server-assigned room identifier.
pub type RoomId = i64;

/// Stable server-assigned user identifier.
pub type UserId = i64;

/// A chat user.
///
/// Immutable once constructed; equality for room-membership purposes is by
/// [`User::id`] alone, which [`User::same_identity`] expresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable user identifier.
    pub id: UserId,
    /// Display name.
    pub user_name: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl User {
    /// Whether `other` refers to the same user, regardless of profile fields.
    pub fn same_identity(&self, other: &User) -> bool {
        self.id == other.id
    }
}
