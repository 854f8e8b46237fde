//! WebSocket command channel.
//!
//! [`CommandChannel`] is one live connection: it yields inbound text frames
//! and writes outbound ones. [`ChannelHandle`] is the cloneable view the rest
//! of the program holds: it queues outbound frames for whichever connection
//! is current and observes [`ConnectionState`] through a watch channel.

use futures_util::{SinkExt, StreamExt};
use log::{debug, trace, warn};
use stick_core::{StatusFrame, TelemetryError, TelemetrySink};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

/// Outbound frames that may wait for the connection task.
pub const OUTBOUND_CAPACITY: usize = 16;

/// URL scheme accepted for the command server.
pub const WS_SCHEME: &str = "ws://";

/// Link state as seen by everyone except the connection task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection, waiting to retry (or never started).
    Disconnected,
    /// Handshake in progress.
    Connecting,
    /// Frames flow both ways.
    Connected,
    /// Last connection attempt failed, waiting to retry.
    Failed,
    /// The connection task has exited; no further connections.
    Closed,
}

impl ConnectionState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Failed => "failed",
            Self::Closed => "closed",
        }
    }
}

/// Failure to establish or use a connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("endpoint `{0}` is not a ws:// URL")]
    InvalidEndpoint(String),
    #[error("websocket handshake failed: {0}")]
    Handshake(#[source] tungstenite::Error),
    #[error("websocket transport error: {0}")]
    Transport(#[source] tungstenite::Error),
}

/// Failure to queue an outbound frame.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    #[error("not connected")]
    NotConnected,
    #[error("outbound queue full")]
    QueueFull,
    #[error("connection task gone")]
    Closed,
}

/// Check that `endpoint` is a `ws://` URL with a host part.
pub fn is_ws_endpoint(endpoint: &str) -> bool {
    endpoint
        .strip_prefix(WS_SCHEME)
        .is_some_and(|rest| !rest.is_empty() && !rest.starts_with('/'))
}

/// One established WebSocket connection.
pub struct CommandChannel {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    endpoint: String,
}

impl CommandChannel {
    /// Open a connection to `endpoint`.
    ///
    /// Failure is reported, never fatal; calling again is safe.
    pub async fn connect(endpoint: &str) -> Result<Self, ConnectionError> {
        if !is_ws_endpoint(endpoint) {
            return Err(ConnectionError::InvalidEndpoint(endpoint.to_owned()));
        }

        let (socket, response) = tokio_tungstenite::connect_async(endpoint)
            .await
            .map_err(ConnectionError::Handshake)?;
        debug!("handshake with {} done ({})", endpoint, response.status());

        Ok(Self {
            socket,
            endpoint: endpoint.to_owned(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Wait for the next inbound text frame.
    ///
    /// Returns `None` once the connection is closed or broken. Binary frames
    /// are skipped; ping/pong is answered by the transport.
    pub async fn next_frame(&mut self) -> Option<String> {
        while let Some(message) = self.socket.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    trace!("<- {:?}", text);
                    return Some(text);
                }
                Ok(Message::Binary(data)) => {
                    debug!("ignoring {} byte binary frame", data.len());
                }
                Ok(Message::Close(frame)) => {
                    debug!("server closed connection: {:?}", frame);
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("websocket read error: {}", e);
                    return None;
                }
            }
        }
        None
    }

    /// Write one outbound text frame.
    pub async fn send_text(&mut self, text: String) -> Result<(), ConnectionError> {
        trace!("-> {:?}", text);
        self.socket
            .send(Message::Text(text))
            .await
            .map_err(ConnectionError::Transport)
    }

    /// Close the connection, ignoring errors from an already-broken socket.
    pub async fn close(mut self) {
        let _ = self.socket.close(None).await;
    }
}

/// Cloneable handle to the connection task.
#[derive(Debug, Clone)]
pub struct ChannelHandle {
    outbound: mpsc::Sender<String>,
    state: watch::Receiver<ConnectionState>,
}

impl ChannelHandle {
    pub fn new(outbound: mpsc::Sender<String>, state: watch::Receiver<ConnectionState>) -> Self {
        Self { outbound, state }
    }

    /// Current link state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Queue one text frame for the server without waiting.
    ///
    /// # Errors
    ///
    /// [`SendError::NotConnected`] unless the state is `Connected`,
    /// [`SendError::QueueFull`] when the outbound queue is saturated.
    pub fn send(&self, text: impl Into<String>) -> Result<(), SendError> {
        if !self.is_connected() {
            return Err(match self.state() {
                ConnectionState::Closed => SendError::Closed,
                _ => SendError::NotConnected,
            });
        }
        self.outbound.try_send(text.into()).map_err(|e| match e {
            TrySendError::Full(_) => SendError::QueueFull,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }

    /// Wait until the link reaches `wanted`.
    ///
    /// # Errors
    ///
    /// [`SendError::Closed`] if the connection task exits first.
    pub async fn wait_for(&mut self, wanted: ConnectionState) -> Result<(), SendError> {
        self.state
            .wait_for(|state| *state == wanted)
            .await
            .map(|_| ())
            .map_err(|_| SendError::Closed)
    }
}

impl TelemetrySink for ChannelHandle {
    async fn send_status(&mut self, frame: &StatusFrame) -> Result<(), TelemetryError> {
        self.send(frame.to_string()).map_err(|e| {
            debug!("status frame not sent: {}", e);
            match e {
                SendError::NotConnected => TelemetryError::NotConnected,
                SendError::QueueFull => TelemetryError::BufferFull,
                SendError::Closed => TelemetryError::Io,
            }
        })
    }

    fn supports_telemetry(&self) -> bool {
        true
    }
}
