//! Single-writer state container and dispatch queue.
//!
//! The [`Store`] is the only mutator of [`AppState`]. [`Store::dispatch`]
//! runs the reducer chain synchronously, replaces the state, and notifies
//! observers exactly once; a partially-reduced state is never observable.
//!
//! [`Store::spawn`] moves the store into a single-consumer loop fed by a
//! bounded queue. All producers (the connection manager's reader task, the
//! protocol adapter, the UI) share cloned [`Dispatcher`] handles, so no two
//! dispatches can interleave by construction.

use tokio::sync::{mpsc, watch};

use crate::{action::Action, reducer::CHAIN, state::AppState};

/// Capacity of the dispatch queue.
///
/// Inbound socket callbacks block (asynchronously) once this many actions
/// are pending, bounding memory under a slow consumer.
pub const DISPATCH_QUEUE_DEPTH: usize = 64;

/// Single-writer state container.
pub struct Store {
    state: AppState,
    observers: watch::Sender<AppState>,
}

impl Store {
    /// Create a store holding the fixed initial state.
    pub fn new() -> Self {
        let state = AppState::default();
        let (observers, _) = watch::channel(state.clone());
        Self { state, observers }
    }

    /// Current state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Subscribe to state snapshots.
    ///
    /// Observers receive the post-chain state exactly once per dispatched
    /// action; intermediate reducer output is never published.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.observers.subscribe()
    }

    /// Apply an action: run every reducer in [`CHAIN`] in registration
    /// order, replace the state, then notify observers.
    pub fn dispatch(&mut self, action: &Action) {
        let mut next = self.state.clone();
        for reduce in CHAIN {
            next = reduce(next, action);
        }
        self.state = next;
        self.observers.send_replace(self.state.clone());
    }

    /// Move the store into a single-consumer dispatch loop.
    ///
    /// Returns a handle carrying a cloneable [`Dispatcher`] and a state
    /// receiver. The loop ends when every dispatcher handle is dropped.
    pub fn spawn(mut self) -> StoreHandle {
        let (tx, mut rx) = mpsc::channel::<Action>(DISPATCH_QUEUE_DEPTH);
        let state = self.subscribe();

        tokio::spawn(async move {
            while let Some(action) = rx.recv().await {
                self.dispatch(&action);
            }
        });

        StoreHandle { dispatcher: Dispatcher { tx }, state }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable producer handle into the dispatch queue.
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<Action>,
}

impl Dispatcher {
    /// Queue an action for the dispatch loop.
    ///
    /// Waits when the queue is full. If the loop has stopped the action is
    /// dropped with a warning; that only happens during session teardown.
    pub async fn dispatch(&self, action: Action) {
        if self.tx.send(action).await.is_err() {
            tracing::warn!("dispatch loop stopped, action dropped");
        }
    }
}

/// Handle to a spawned store.
pub struct StoreHandle {
    dispatcher: Dispatcher,
    state: watch::Receiver<AppState>,
}

impl StoreHandle {
    /// A producer handle into the dispatch queue.
    pub fn dispatcher(&self) -> Dispatcher {
        self.dispatcher.clone()
    }

    /// Subscribe to state snapshots.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.state.clone()
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }
}
