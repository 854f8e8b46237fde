//! Flight sink trait and error types.

use core::future::Future;

/// Error type for flight sink operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkError {
    /// The flight controller refused the request.
    Rejected,
    /// Flight controller not ready (e.g., no aircraft connected).
    NotReady,
    /// Operation not provided by this sink.
    Unsupported,
    /// Communication error with the flight controller.
    Io,
}

impl core::fmt::Display for SinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rejected => write!(f, "rejected by flight controller"),
            Self::NotReady => write!(f, "flight controller not ready"),
            Self::Unsupported => write!(f, "operation not supported"),
            Self::Io => write!(f, "flight controller I/O error"),
        }
    }
}

/// Async trait for the flight-control side.
///
/// Stick positions are integer deflections within
/// `[-MAX_STICK_POSITION_ABS, MAX_STICK_POSITION_ABS]`; left stick is
/// (yaw, throttle), right stick is (roll, pitch).
///
/// Callers invoke methods sequentially, never concurrently.
pub trait FlightSink {
    /// Begin an automatic takeoff. Resolves when the controller answers.
    fn start_takeoff(&mut self) -> impl Future<Output = Result<(), SinkError>>;

    /// Begin an automatic landing.
    fn start_landing(&mut self) -> impl Future<Output = Result<(), SinkError>>;

    /// Hand control to stick positions sent through this sink.
    fn enable_virtual_stick(&mut self) -> impl Future<Output = Result<(), SinkError>>;

    /// Return control to the physical remote.
    fn disable_virtual_stick(&mut self) -> impl Future<Output = Result<(), SinkError>>;

    fn set_left_position(&mut self, x: i16, y: i16) -> impl Future<Output = Result<(), SinkError>>;

    fn set_right_position(&mut self, x: i16, y: i16)
        -> impl Future<Output = Result<(), SinkError>>;

    /// Current height above the takeoff point, in meters.
    ///
    /// Sinks without an altitude source keep the default.
    fn height(&mut self) -> impl Future<Output = Result<f32, SinkError>> {
        core::future::ready(Err(SinkError::Unsupported))
    }
}
