//! Text command protocol types, parsing, and serialization for the stick bridge.
//!
//! This crate provides everything needed to work with the remote command
//! protocol:
//!
//! - **Types**: Core data structures
//!   - [`StickPosition`] / [`StickIntent`] - Integer stick deflections
//!   - [`NamedAction`] - Fixed command vocabulary
//!   - [`Command`] - One parsed frame
//!
//! - **Parsing**: Parse incoming frames
//!   - [`normalize()`] - Trim a frame for case-insensitive matching
//!   - [`parse_command()`] - Parse any frame
//!
//! - **Serialization**: Produce frames
//!   - [`Serialize`] trait - Commands and [`StatusFrame`]s to text
//!   - [`FrameBuilder`] - Fluent builder API for the controller side
//!
//! # Protocol Format
//!
//! One UTF-8 text frame per command, case-insensitive:
//!
//! ```text
//! movedrone:<roll>,<throttle>,<yaw>,<pitch>
//! yaw+ | yaw- | right | left | forward | backward | up | down
//! takeoff | land | s | enable | disable | h
//! ```
//!
//! Axis values are floats nominally in [-1, 1].
//!
//! # Example
//!
//! ```
//! use stick_proto::{parse_command, Command, NamedAction, ParseError};
//!
//! assert_eq!(parse_command("Yaw+"), Command::Action(NamedAction::YawPlus));
//! assert_eq!(
//!     parse_command("barrel roll"),
//!     Command::Unknown { raw: "barrel roll", reason: ParseError::UnknownCommand }
//! );
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting (for embedded logging)
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

pub mod builder;
pub mod parser;
pub mod serialize;
pub mod types;

// Re-export types at crate root for convenience
pub use builder::{ActionBuilder, FrameBuilder, MoveBuilder};
pub use parser::{
    normalize, parse_command, parse_move_parameters, Normalized, ParseError, MOVE_FIELD_COUNT,
    MOVE_PREFIX,
};
pub use serialize::{Serialize, SerializeError, StatusFrame};
pub use types::{
    Command, NamedAction, StickIntent, StickPosition, StickSide, StickUpdate,
    MAX_STICK_POSITION_ABS,
};
