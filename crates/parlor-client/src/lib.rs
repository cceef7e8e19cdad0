//! Realtime state synchronization core for the parlor chat client.
//!
//! Keeps a local view of the rooms the user occupies, their members, and
//! their message history consistent with a remote chat server, despite
//! asynchronous and partially-failing network events, while reflecting
//! locally-originated optimistic actions before server confirmation.
//!
//! # Components
//!
//! - [`Action`]: the typed action catalog; every state mutation is one
//!   dispatched action.
//! - [`Store`] / [`Dispatcher`]: single-writer state container behind a
//!   bounded, single-consumer dispatch queue, so no two dispatches can
//!   interleave.
//! - [`reducer`]: the pure reducer chain (request lifecycle, then domain).
//! - [`Socket`]: connection lifecycle; wires each inbound event to exactly
//!   one dispatch.
//! - [`ProtocolAdapter`]: outbound intents as optimistic-dispatch-plus-emit
//!   pairs, and the mandatory `userInfo` reply to `userJoin`.
//! - [`transport`]: WebSocket I/O plus an in-memory pair for tests.
//!
//! # Boundaries
//!
//! The core performs no reconnects, no retries, and no HTTP; the HTTP
//! collaborator appears only as the [`Action::Api`] lifecycle it
//! dispatches, and the UI only as a read-only observer of state snapshots.

mod action;
mod adapter;
mod connection;
mod error;
pub mod reducer;
mod state;
mod store;
pub mod transport;

pub use action::{Action, ApiCall, ApiPhase};
pub use adapter::ProtocolAdapter;
pub use connection::Socket;
pub use error::ClientError;
pub use parlor_proto as proto;
pub use state::{AppState, Message, Room, SYSTEM_AUTHOR};
pub use store::{DISPATCH_QUEUE_DEPTH, Dispatcher, Store, StoreHandle};
