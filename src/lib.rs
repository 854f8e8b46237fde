//! Host side of the stick bridge: WebSocket transport, event queue, and the
//! stand-in flight sink.
//!
//! - [`channel`]: one WebSocket connection ([`CommandChannel`]) and the
//!   cloneable [`ChannelHandle`] used for outbound frames
//! - [`reconnect`]: connection task with exponential backoff ([`Supervisor`])
//! - [`input`]: event queue feeding the bridge ([`QueueSource`]) and the
//!   local joystick reader
//! - [`output`]: [`LogFlightSink`] and [`LogNotices`]
//! - [`config`]: command line parsing and validation

pub mod channel;
pub mod config;
pub mod input;
pub mod output;
pub mod reconnect;

pub use channel::{ChannelHandle, CommandChannel, ConnectionError, ConnectionState, SendError};
pub use config::{Args, BridgeConfig, ConfigError, DEFAULT_ENDPOINT};
pub use input::{event_queue, read_local_sticks, Event, QueueSource, DEFAULT_QUEUE_CAPACITY};
pub use output::{LogFlightSink, LogNotices};
pub use reconnect::{Backoff, BackoffConfig, Supervisor, DEFAULT_BACKOFF};
