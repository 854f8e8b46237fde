//! Wire serialization for commands and outbound status frames.
//!
//! This module provides the [`Serialize`] trait for turning [`Command`]s back
//! into inbound-grammar text (what a remote controller sends) and
//! [`StatusFrame`]s into the informational text sent upstream.
//!
//! # Formats
//!
//! ```text
//! movedrone:<roll>,<throttle>,<yaw>,<pitch>
//! <named-action-token>
//! Joystick <left|right>: <x>, <y>
//! height: <meters>
//! ```
//!
//! Floats are written with `{:?}` so whole numbers keep their fractional
//! part (`1.0`, not `1`), which is what the controller side already logs.
//!
//! # Example
//!
//! ```
//! use stick_proto::{Command, NamedAction, Serialize};
//!
//! let mut buf = [0u8; 64];
//! let len = Command::Action(NamedAction::YawPlus).serialize(&mut buf).unwrap();
//! assert_eq!(&buf[..len], b"yaw+");
//! ```

use core::fmt::{self, Write};

use crate::parser::MOVE_PREFIX;
use crate::types::{Command, NamedAction, StickSide};

/// Error type for serialization operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold the serialized frame.
    BufferTooSmall,
    /// A write operation failed (for `fmt::Write` adapters).
    WriteError,
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::WriteError => write!(f, "write error"),
        }
    }
}

/// Informational frame sent from the drone side back to the controller.
///
/// No schema is defined for these; they are meant for humans and logs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusFrame {
    /// Local joystick sample after deadzone filtering.
    Joystick { side: StickSide, x: f32, y: f32 },
    /// Current height above takeoff point, in meters.
    Height(f32),
}

/// Bounded writer over a byte slice.
struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let end = self.pos + bytes.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
        Ok(())
    }
}

/// Extension trait for serializing protocol frames.
///
/// Implementors only provide [`Serialize::serialize_fmt`]; the buffer and
/// `heapless::String` variants are derived from it.
pub trait Serialize {
    /// Serialize to a `core::fmt::Write` implementation.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::WriteError`] if the write fails.
    fn serialize_fmt<W: Write>(&self, writer: &mut W) -> Result<(), SerializeError>;

    /// Serialize to the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is not large enough.
    fn serialize(&self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        let mut writer = SliceWriter::new(buf);
        self.serialize_fmt(&mut writer)
            .map_err(|_| SerializeError::BufferTooSmall)?;
        Ok(writer.pos)
    }

    /// Serialize to a `heapless::String`.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if `N` is not large enough.
    fn serialize_to_string<const N: usize>(&self) -> Result<heapless::String<N>, SerializeError> {
        let mut out = heapless::String::new();
        self.serialize_fmt(&mut out)
            .map_err(|_| SerializeError::BufferTooSmall)?;
        Ok(out)
    }
}

impl Serialize for NamedAction {
    fn serialize_fmt<W: Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        writer
            .write_str(self.token())
            .map_err(|_| SerializeError::WriteError)
    }
}

impl Serialize for Command<'_> {
    fn serialize_fmt<W: Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        match self {
            Command::Move {
                roll,
                throttle,
                yaw,
                pitch,
            } => write!(
                writer,
                "{}{:?},{:?},{:?},{:?}",
                MOVE_PREFIX, roll, throttle, yaw, pitch
            )
            .map_err(|_| SerializeError::WriteError),
            Command::Action(action) => action.serialize_fmt(writer),
            // Relay rejected frames verbatim
            Command::Unknown { raw, .. } => writer
                .write_str(raw)
                .map_err(|_| SerializeError::WriteError),
        }
    }
}

impl Serialize for StatusFrame {
    fn serialize_fmt<W: Write>(&self, writer: &mut W) -> Result<(), SerializeError> {
        match self {
            StatusFrame::Joystick { side, x, y } => {
                write!(writer, "Joystick {}: {:?}, {:?}", side.as_str(), x, y)
            }
            StatusFrame::Height(meters) => write!(writer, "height: {:?}", meters),
        }
        .map_err(|_| SerializeError::WriteError)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize_fmt(f).map_err(|_| fmt::Error)
    }
}

impl fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize_fmt(f).map_err(|_| fmt::Error)
    }
}
