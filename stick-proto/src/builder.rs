//! Builder pattern API for constructing command frames.
//!
//! This module provides a fluent builder API for the controller side of the
//! protocol, without needing to construct [`Command`] values by hand.
//!
//! # Example
//!
//! ```
//! use stick_proto::{FrameBuilder, NamedAction};
//!
//! let mut buf = [0u8; 64];
//! let len = FrameBuilder::move_drone()
//!     .roll(0.5)
//!     .pitch(-0.25)
//!     .serialize(&mut buf)
//!     .unwrap();
//! assert_eq!(&buf[..len], b"movedrone:0.5,0.0,0.0,-0.25");
//!
//! let len = FrameBuilder::action(NamedAction::Land)
//!     .serialize(&mut buf)
//!     .unwrap();
//! assert_eq!(&buf[..len], b"land");
//! ```

use crate::serialize::{Serialize, SerializeError};
use crate::types::{Command, NamedAction};

/// Entry point for building command frames.
pub struct FrameBuilder;

impl FrameBuilder {
    /// Start building an explicit four-axis frame. All axes start at 0.
    #[must_use]
    pub fn move_drone() -> MoveBuilder {
        MoveBuilder {
            roll: 0.0,
            throttle: 0.0,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Build a named-action frame.
    #[must_use]
    pub fn action(action: NamedAction) -> ActionBuilder {
        ActionBuilder { action }
    }
}

/// Builder for `movedrone:` frames.
///
/// Created via [`FrameBuilder::move_drone()`].
#[derive(Debug, Clone, Copy)]
pub struct MoveBuilder {
    roll: f32,
    throttle: f32,
    yaw: f32,
    pitch: f32,
}

impl MoveBuilder {
    #[must_use]
    pub fn roll(mut self, value: f32) -> Self {
        self.roll = value;
        self
    }

    #[must_use]
    pub fn throttle(mut self, value: f32) -> Self {
        self.throttle = value;
        self
    }

    #[must_use]
    pub fn yaw(mut self, value: f32) -> Self {
        self.yaw = value;
        self
    }

    #[must_use]
    pub fn pitch(mut self, value: f32) -> Self {
        self.pitch = value;
        self
    }

    /// Set the left stick axes (yaw, throttle) at once.
    #[must_use]
    pub fn left_stick(mut self, yaw: f32, throttle: f32) -> Self {
        self.yaw = yaw;
        self.throttle = throttle;
        self
    }

    /// Set the right stick axes (roll, pitch) at once.
    #[must_use]
    pub fn right_stick(mut self, roll: f32, pitch: f32) -> Self {
        self.roll = roll;
        self.pitch = pitch;
        self
    }

    /// Get the built command without serializing.
    #[must_use]
    pub fn build(self) -> Command<'static> {
        Command::Move {
            roll: self.roll,
            throttle: self.throttle,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    /// Serialize the frame to the provided buffer.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::BufferTooSmall`] if the buffer is too small.
    pub fn serialize(self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        self.build().serialize(buf)
    }

    /// Serialize to a `heapless::String`.
    pub fn serialize_to_string<const N: usize>(
        self,
    ) -> Result<heapless::String<N>, SerializeError> {
        self.build().serialize_to_string()
    }
}

impl Default for MoveBuilder {
    fn default() -> Self {
        FrameBuilder::move_drone()
    }
}

/// Builder for named-action frames.
///
/// Created via [`FrameBuilder::action()`].
#[derive(Debug, Clone, Copy)]
pub struct ActionBuilder {
    action: NamedAction,
}

impl ActionBuilder {
    #[must_use]
    pub fn build(self) -> Command<'static> {
        Command::Action(self.action)
    }

    /// Serialize the frame to the provided buffer.
    pub fn serialize(self, buf: &mut [u8]) -> Result<usize, SerializeError> {
        self.action.serialize(buf)
    }

    /// Serialize to a `heapless::String`.
    pub fn serialize_to_string<const N: usize>(
        self,
    ) -> Result<heapless::String<N>, SerializeError> {
        self.action.serialize_to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_command;

    #[test]
    fn test_move_builder_defaults_to_neutral() {
        assert_eq!(
            FrameBuilder::move_drone().build(),
            Command::Move {
                roll: 0.0,
                throttle: 0.0,
                yaw: 0.0,
                pitch: 0.0
            }
        );
    }

    #[test]
    fn test_move_builder_stick_pairs() {
        let command = FrameBuilder::move_drone()
            .left_stick(-0.1, 0.4)
            .right_stick(0.2, -0.3)
            .build();
        assert_eq!(
            command,
            Command::Move {
                roll: 0.2,
                throttle: 0.4,
                yaw: -0.1,
                pitch: -0.3
            }
        );
    }

    #[test]
    fn test_move_builder_frame_is_parseable() {
        let frame: heapless::String<64> = FrameBuilder::move_drone()
            .roll(0.05)
            .throttle(-1.0)
            .yaw(0.1)
            .pitch(0.9)
            .serialize_to_string()
            .unwrap();
        assert_eq!(
            parse_command(&frame),
            Command::Move {
                roll: 0.05,
                throttle: -1.0,
                yaw: 0.1,
                pitch: 0.9
            }
        );
    }

    #[test]
    fn test_action_builder_round_trip() {
        for action in NamedAction::ALL {
            let frame: heapless::String<16> =
                FrameBuilder::action(action).serialize_to_string().unwrap();
            assert_eq!(parse_command(&frame), FrameBuilder::action(action).build());
        }
    }
}
