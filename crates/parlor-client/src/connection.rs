//! Connection manager.
//!
//! [`Socket`] owns at most one live transport per session. [`Socket::open`]
//! wires every inbound transport event to exactly one dispatch and resolves
//! once the handshake completes; [`Socket::close`] tears the transport down
//! and dispatches the disconnect. Each open builds fresh channels, a fresh
//! reader task, and a fresh [`ProtocolAdapter`], so handlers cannot leak
//! across repeated opens.
//!
//! The core never reconnects on its own; that policy belongs to the caller.

use parlor_proto::DisconnectReason;
use tokio::sync::{oneshot, watch};

use crate::{
    action::Action,
    adapter::ProtocolAdapter,
    error::ClientError,
    state::AppState,
    store::Dispatcher,
    transport::{Transport, TransportError, TransportEvent},
};

/// Connection manager: socket lifecycle and inbound wiring.
pub struct Socket {
    dispatcher: Dispatcher,
    state: watch::Receiver<AppState>,
    live: Option<Live>,
}

struct Live {
    adapter: ProtocolAdapter,
    connected: watch::Receiver<bool>,
    reader: tokio::task::JoinHandle<()>,
    transport_abort: Option<tokio::task::AbortHandle>,
}

impl Live {
    /// Stop the reader and the transport I/O task. After this nothing from
    /// the connection can reach the store.
    fn abort(self) {
        self.reader.abort();
        if let Some(abort) = self.transport_abort {
            abort.abort();
        }
    }
}

impl Socket {
    /// Create a disconnected socket bound to a store.
    pub fn new(dispatcher: Dispatcher, state: watch::Receiver<AppState>) -> Self {
        Self { dispatcher, state, live: None }
    }

    /// Whether a live transport is currently connected.
    pub fn is_connected(&self) -> bool {
        self.live.as_ref().is_some_and(|live| *live.connected.borrow())
    }

    /// The adapter for the current connection, if connected.
    pub fn adapter(&self) -> Option<ProtocolAdapter> {
        self.live.as_ref().map(|live| live.adapter.clone())
    }

    /// Attach a transport and wait for the handshake.
    ///
    /// Resolves with the connection's [`ProtocolAdapter`] once the
    /// transport reports `Connected`; fails on a transport error or on a
    /// disconnect arriving first. While open, every inbound event is
    /// translated into exactly one dispatched action.
    pub async fn open(&mut self, mut transport: Transport) -> Result<ProtocolAdapter, ClientError> {
        if self.is_connected() {
            return Err(ClientError::InvalidState { reason: "socket already connected".into() });
        }
        // Drop remnants of a previous connection before rewiring.
        if let Some(old) = self.live.take() {
            old.abort();
        }

        let transport_abort = transport.take_abort();
        let (connected_tx, connected_rx) = watch::channel(false);
        let adapter = ProtocolAdapter::new(
            self.dispatcher.clone(),
            self.state.clone(),
            transport.to_server.clone(),
            connected_rx.clone(),
        );

        let (ready_tx, ready_rx) = oneshot::channel();
        let reader = tokio::spawn(read_loop(
            transport,
            self.dispatcher.clone(),
            adapter.clone(),
            connected_tx,
            ready_tx,
        ));

        self.live = Some(Live { adapter: adapter.clone(), connected: connected_rx, reader, transport_abort });

        let error = match ready_rx.await {
            Ok(Ok(())) => return Ok(adapter),
            Ok(Err(error)) => error,
            Err(_) => {
                TransportError::Connection("transport closed before handshake".into()).into()
            },
        };

        // A rejected open leaves nothing behind: the reader and transport
        // die with the handshake, so no event from the failed connection
        // can reach the store later.
        if let Some(live) = self.live.take() {
            live.abort();
        }
        Err(error)
    }

    /// Terminate the transport and dispatch the disconnect.
    ///
    /// Fails with [`ClientError::NotConnected`] when no transport is open.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        let Some(live) = self.live.take() else {
            return Err(ClientError::NotConnected);
        };
        if !*live.connected.borrow() {
            live.abort();
            return Err(ClientError::NotConnected);
        }

        live.abort();
        self.dispatcher
            .dispatch(Action::SocketDisconnected { reason: DisconnectReason::ClientDisconnect })
            .await;
        Ok(())
    }
}

/// Per-connection reader: one dispatched action per transport event.
async fn read_loop(
    mut transport: Transport,
    dispatcher: Dispatcher,
    adapter: ProtocolAdapter,
    connected: watch::Sender<bool>,
    ready: oneshot::Sender<Result<(), ClientError>>,
) {
    let mut ready = Some(ready);

    while let Some(event) = transport.from_server.recv().await {
        match event {
            TransportEvent::Connected => {
                connected.send_replace(true);
                dispatcher.dispatch(Action::SocketConnected).await;
                if let Some(tx) = ready.take() {
                    let _ = tx.send(Ok(()));
                }
            },

            TransportEvent::Event(inbound) => {
                if let Err(error) = adapter.handle_inbound(inbound).await {
                    tracing::warn!(%error, "inbound event dropped");
                }
            },

            TransportEvent::Disconnected { reason } => {
                connected.send_replace(false);
                dispatcher.dispatch(Action::SocketDisconnected { reason }).await;
                if let Some(tx) = ready.take() {
                    let _ =
                        tx.send(Err(TransportError::Connection(reason.to_string()).into()));
                }
                break;
            },

            TransportEvent::Error { detail } => {
                // An error before the handshake rejects the pending open;
                // afterwards it is logged and the disconnect (if fatal)
                // arrives as its own event.
                if let Some(tx) = ready.take() {
                    let _ = tx.send(Err(TransportError::Connection(detail).into()));
                } else {
                    tracing::warn!(%detail, "transport error");
                }
            },
        }
    }
}
