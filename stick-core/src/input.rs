//! Command source trait and error types.

use core::future::Future;
use stick_proto::StickSide;

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// Transport I/O error.
    Io,
    /// Remote link lost. More events may follow after a reconnect.
    Disconnected,
    /// Source exhausted for good; no further events will arrive.
    Closed,
}

impl core::fmt::Display for InputError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io => write!(f, "input I/O error"),
            Self::Disconnected => write!(f, "remote disconnected"),
            Self::Closed => write!(f, "input closed"),
        }
    }
}

/// One local joystick sample, axes nominally in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogSample {
    pub side: StickSide,
    pub x: f32,
    pub y: f32,
}

impl AnalogSample {
    #[inline]
    #[must_use]
    pub const fn new(side: StickSide, x: f32, y: f32) -> Self {
        Self { side, x, y }
    }
}

/// Event delivered to the bridge.
///
/// `F` is the frame text storage: `heapless::String<N>` on embedded targets,
/// `String` on host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent<F> {
    /// Inbound text frame from the remote controller.
    Frame(F),
    /// Sample from a local analog joystick.
    Analog(AnalogSample),
}

/// Async trait for command sources.
///
/// Abstracts where commands come from (WebSocket, local joystick, test
/// fixtures), so the bridge can be driven by any of them.
pub trait CommandSource {
    /// Frame text storage.
    type Frame: AsRef<str>;

    /// Wait for and receive the next event.
    fn receive(&mut self) -> impl Future<Output = Result<InputEvent<Self::Frame>, InputError>>;
}
