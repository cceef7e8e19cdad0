//! WebSocket transport.
//!
//! Provides [`connect`], which opens a WebSocket to the chat server and
//! returns a [`Transport`]: channel handles for outbound emits and inbound
//! [`TransportEvent`]s, plus an abort handle for the I/O task. This is a
//! thin layer that only moves events; all protocol logic lives in the
//! connection manager and protocol adapter.
//!
//! [`pair`] builds an in-memory transport with a [`RemoteEnd`] standing in
//! for the server, for deterministic tests.

use futures_util::{SinkExt, StreamExt};
use parlor_proto::{DisconnectReason, InboundEvent, OutboundEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

/// Channel capacity in each direction.
const CHANNEL_CAPACITY: usize = 32;

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed or was lost.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Read or write on the live stream failed.
    #[error("stream error: {0}")]
    Stream(String),
}

/// Lifecycle and data events delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection handshake completed.
    Connected,

    /// A wire event arrived.
    Event(InboundEvent),

    /// The connection ended. Always the final event.
    Disconnected {
        /// Why the connection ended.
        reason: DisconnectReason,
    },

    /// The transport failed. Followed by `Disconnected` when fatal.
    Error {
        /// Error description.
        detail: String,
    },
}

/// Handle to a connected transport.
///
/// Emits go through `to_server`; lifecycle and inbound wire events arrive
/// on `from_server`. Dropping all `to_server` clones closes the connection
/// gracefully; [`Transport::stop`] tears it down immediately.
pub struct Transport {
    /// Send wire events to the server.
    pub to_server: mpsc::Sender<OutboundEvent>,
    /// Receive transport events from the server.
    pub from_server: mpsc::Receiver<TransportEvent>,
    abort: Option<tokio::task::AbortHandle>,
}

impl Transport {
    /// Abort the I/O task, if any. In-memory transports have none.
    pub fn stop(&self) {
        if let Some(abort) = &self.abort {
            abort.abort();
        }
    }

    /// Detach the abort handle for the connection manager to own.
    pub(crate) fn take_abort(&mut self) -> Option<tokio::task::AbortHandle> {
        self.abort.take()
    }
}

/// Server side of an in-memory transport, for tests and simulation.
pub struct RemoteEnd {
    /// Inject transport events toward the client.
    pub to_client: mpsc::Sender<TransportEvent>,
    /// Observe wire events emitted by the client.
    pub from_client: mpsc::Receiver<OutboundEvent>,
}

/// Build an in-memory transport and its remote end.
pub fn pair() -> (Transport, RemoteEnd) {
    let (to_server_tx, to_server_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (to_client_tx, to_client_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let transport = Transport { to_server: to_server_tx, from_server: to_client_rx, abort: None };
    let remote = RemoteEnd { to_client: to_client_tx, from_client: to_server_rx };
    (transport, remote)
}

/// Connect to a chat server via WebSocket.
pub async fn connect(url: &str) -> Result<Transport, TransportError> {
    let (stream, _response) = connect_async(url)
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    let (to_server_tx, to_server_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (events_tx, events_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(run_connection(stream, to_server_rx, events_tx));

    Ok(Transport {
        to_server: to_server_tx,
        from_server: events_rx,
        abort: Some(handle.abort_handle()),
    })
}

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Run the connection, bridging between channels and the WebSocket.
async fn run_connection(
    stream: WsStream,
    mut to_server: mpsc::Receiver<OutboundEvent>,
    events: mpsc::Sender<TransportEvent>,
) {
    // The handshake already completed in `connect`.
    let _ = events.send(TransportEvent::Connected).await;

    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outgoing = to_server.recv() => match outgoing {
                Some(event) => match event.encode() {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text.into())).await {
                            let _ = events.send(TransportEvent::Error { detail: e.to_string() }).await;
                            let _ = events
                                .send(TransportEvent::Disconnected {
                                    reason: DisconnectReason::TransportClose,
                                })
                                .await;
                            return;
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, "unencodable outbound event dropped");
                    },
                },
                None => {
                    // All senders dropped: deliberate client-side shutdown.
                    let _ = sink.send(Message::Close(None)).await;
                    let _ = events
                        .send(TransportEvent::Disconnected {
                            reason: DisconnectReason::ClientDisconnect,
                        })
                        .await;
                    return;
                },
            },

            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => match InboundEvent::decode(&text) {
                    Ok(event) => {
                        if events.send(TransportEvent::Event(event)).await.is_err() {
                            return;
                        }
                    },
                    Err(error) => {
                        tracing::warn!(%error, "undecodable inbound frame dropped");
                    },
                },
                Some(Ok(Message::Close(_))) => {
                    let _ = events
                        .send(TransportEvent::Disconnected {
                            reason: DisconnectReason::ServerDisconnect,
                        })
                        .await;
                    return;
                },
                // Pings and pongs are answered by tungstenite itself.
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    let _ = events.send(TransportEvent::Error { detail: e.to_string() }).await;
                    let _ = events
                        .send(TransportEvent::Disconnected {
                            reason: DisconnectReason::TransportClose,
                        })
                        .await;
                    return;
                },
                None => {
                    let _ = events
                        .send(TransportEvent::Disconnected {
                            reason: DisconnectReason::TransportClose,
                        })
                        .await;
                    return;
                },
            },
        }
    }
}
