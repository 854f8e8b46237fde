//! Connection supervisor with exponential backoff.
//!
//! The supervisor task owns the socket. It connects, pumps frames between
//! the socket and the queues, and on loss waits out a backoff before trying
//! again. Everyone else talks to it through a [`ChannelHandle`].

use std::time::Duration;

use log::{debug, error, info, warn};
use stick_core::{InputError, InputEvent};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::channel::{
    ChannelHandle, CommandChannel, ConnectionError, ConnectionState, OUTBOUND_CAPACITY,
};
use crate::input::Event;

/// Reconnect delay bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffConfig {
    /// First delay after a failure.
    pub min: Duration,
    /// Delays double up to this cap.
    pub max: Duration,
}

pub const DEFAULT_BACKOFF: BackoffConfig = BackoffConfig {
    min: Duration::from_millis(500),
    max: Duration::from_secs(30),
};

impl Default for BackoffConfig {
    fn default() -> Self {
        DEFAULT_BACKOFF
    }
}

/// Doubling delay sequence, reset after a successful connection.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    next: Duration,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            config,
            next: config.min,
        }
    }

    /// Delay to wait now. Advances the sequence.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.next.saturating_mul(2).min(self.config.max);
        delay
    }

    /// Start over from the minimum delay.
    pub fn reset(&mut self) {
        self.next = self.config.min;
    }
}

/// How a connection's pump loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PumpExit {
    /// Socket closed or broke.
    Lost,
    /// Nobody consumes events any more.
    Shutdown,
}

/// Connection task state.
pub struct Supervisor {
    endpoint: String,
    backoff: Backoff,
    reconnect: bool,
    outbound: mpsc::Receiver<String>,
    state: watch::Sender<ConnectionState>,
    events: mpsc::Sender<Event>,
}

impl Supervisor {
    /// Create a supervisor and the handle that talks to it.
    ///
    /// Inbound frames are pushed into `events`. With `reconnect` unset the
    /// supervisor stops after the first connection ends (or fails).
    pub fn new(
        endpoint: impl Into<String>,
        backoff: BackoffConfig,
        reconnect: bool,
        events: mpsc::Sender<Event>,
    ) -> (Self, ChannelHandle) {
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);

        let supervisor = Self {
            endpoint: endpoint.into(),
            backoff: Backoff::new(backoff),
            reconnect,
            outbound: outbound_rx,
            state: state_tx,
            events,
        };
        (supervisor, ChannelHandle::new(outbound_tx, state_rx))
    }

    /// Spawn the supervisor on the current runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Connect, pump, back off, repeat.
    pub async fn run(mut self) {
        while !self.events.is_closed() {
            self.set_state(ConnectionState::Connecting);
            info!("connecting to {}", self.endpoint);

            match CommandChannel::connect(&self.endpoint).await {
                Ok(mut channel) => {
                    self.backoff.reset();
                    self.set_state(ConnectionState::Connected);
                    // A sender that saw the previous link as up may have
                    // queued after it went down
                    self.discard_outbound();
                    info!("connected to {}", self.endpoint);

                    let exit = self.pump(&mut channel).await;
                    self.set_state(ConnectionState::Disconnected);
                    self.discard_outbound();

                    if exit == PumpExit::Shutdown {
                        channel.close().await;
                        break;
                    }
                    warn!("connection to {} lost", self.endpoint);
                    let lost = Err(InputError::Disconnected);
                    if self.events.send(lost).await.is_err() {
                        break;
                    }
                }
                Err(ConnectionError::InvalidEndpoint(endpoint)) => {
                    self.set_state(ConnectionState::Failed);
                    error!("cannot connect to `{}`: not a ws:// URL", endpoint);
                    break;
                }
                Err(e) => {
                    self.set_state(ConnectionState::Failed);
                    warn!("connection failed: {}", e);
                }
            }

            if !self.reconnect {
                break;
            }
            let delay = self.backoff.next_delay();
            info!("reconnecting in {:?}", delay);
            tokio::time::sleep(delay).await;
        }

        self.set_state(ConnectionState::Closed);
        info!("connection task stopped");
    }

    fn set_state(&self, state: ConnectionState) {
        debug!("connection state: {}", state.as_str());
        self.state.send_replace(state);
    }

    async fn pump(&mut self, channel: &mut CommandChannel) -> PumpExit {
        loop {
            tokio::select! {
                frame = channel.next_frame() => match frame {
                    Some(text) => {
                        // Blocks while the event queue is full; the socket is
                        // not read meanwhile.
                        if self.events.send(Ok(InputEvent::Frame(text))).await.is_err() {
                            return PumpExit::Shutdown;
                        }
                    }
                    None => return PumpExit::Lost,
                },
                Some(text) = self.outbound.recv() => {
                    if let Err(e) = channel.send_text(text).await {
                        warn!("{}", e);
                        return PumpExit::Lost;
                    }
                }
            }
        }
    }

    /// Drop frames queued for a connection that no longer exists.
    fn discard_outbound(&mut self) {
        let mut dropped = 0usize;
        while self.outbound.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            warn!("dropped {} unsent outbound frames", dropped);
        }
    }
}
