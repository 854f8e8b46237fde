//! Platform-agnostic stick mapping, dispatch, and traits.
//!
//! This crate provides the core abstractions for turning remote text commands
//! and local joystick samples into flight-controller stick positions, without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host.
//!
//! # Overview
//!
//! - [`mapper`]: Pure mapping from commands/samples to stick units ([`map_analog`], [`map_named`])
//! - [`input`]: Command source trait ([`CommandSource`])
//! - [`output`]: Flight sink trait ([`FlightSink`])
//! - [`telemetry`]: Upstream status and operator notices ([`TelemetrySink`], [`NoticeSink`])
//! - [`bridge`]: Orchestrates source-to-sink flow ([`CommandBridge`])
//!
//! # Example
//!
//! ```rust
//! use stick_core::{map_command, parse_command, StickPosition, DEFAULT_MAPPER_CONFIG};
//!
//! let intent = map_command(&parse_command("yaw+"), &DEFAULT_MAPPER_CONFIG).unwrap();
//! assert_eq!(intent.left, StickPosition::new(66, 0));
//! assert!(intent.right.is_neutral());
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host use)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod bridge;
pub mod input;
pub mod mapper;
pub mod output;
pub mod telemetry;

// Re-export main types at crate root
pub use bridge::{BridgeError, CommandBridge};
pub use input::{AnalogSample, CommandSource, InputError, InputEvent};
pub use mapper::{
    apply_deadzone, map_analog, map_command, map_move, map_named, scale_axis, MapperConfig,
    DEFAULT_DEADZONE, DEFAULT_MAPPER_CONFIG,
};
pub use output::{FlightSink, SinkError};
pub use stick_proto::{
    parse_command, Command, NamedAction, ParseError, StatusFrame, StickIntent, StickPosition,
    StickSide, StickUpdate, MAX_STICK_POSITION_ABS,
};
pub use telemetry::{Notice, NoticeSink, NullTelemetrySink, TelemetryError, TelemetrySink};
