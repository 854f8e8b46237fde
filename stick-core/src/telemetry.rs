//! Upstream status frames and user-visible notices.
//!
//! Two feedback paths leave the bridge:
//! - [`TelemetrySink`]: informational [`StatusFrame`]s sent back to the
//!   remote controller over the same link commands arrive on.
//! - [`NoticeSink`]: short human-readable [`Notice`]s for the local operator.

use core::fmt;
use core::future::Future;

use stick_proto::{NamedAction, ParseError, StatusFrame, StickSide};

use crate::input::InputError;
use crate::output::SinkError;

/// Error type for telemetry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TelemetryError {
    /// No upstream link for this sink.
    NotSupported,
    /// Link exists but is not connected right now.
    NotConnected,
    /// Transmit queue is full.
    BufferFull,
    /// I/O error during transmission.
    Io,
}

/// Trait for sending status frames back to the remote controller.
pub trait TelemetrySink {
    /// Send one status frame.
    fn send_status(
        &mut self,
        frame: &StatusFrame,
    ) -> impl Future<Output = Result<(), TelemetryError>>;

    /// Check if this sink has an upstream link at all.
    ///
    /// Returns `false` by default.
    fn supports_telemetry(&self) -> bool {
        false
    }
}

/// Telemetry sink that discards all frames.
pub struct NullTelemetrySink;

impl TelemetrySink for NullTelemetrySink {
    async fn send_status(&mut self, _frame: &StatusFrame) -> Result<(), TelemetryError> {
        Err(TelemetryError::NotSupported)
    }
}

/// Outcome reported to the local operator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Notice<'a> {
    /// A takeoff/land/enable/disable request was accepted.
    ActionSucceeded(NamedAction),
    /// A takeoff/land/enable/disable/height request failed.
    ActionFailed {
        action: NamedAction,
        error: SinkError,
    },
    /// Both sticks centered by `s`.
    Stopped,
    /// Height reading in meters.
    Height(f32),
    /// Frame did not parse. `raw` is the frame as received.
    Rejected { raw: &'a str, reason: ParseError },
    /// A stick position write failed.
    StickFailed { side: StickSide, error: SinkError },
    /// The command source reported an error.
    InputFailed(InputError),
}

impl Notice<'_> {
    /// Whether this notice reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notice::ActionFailed { .. }
                | Notice::Rejected { .. }
                | Notice::StickFailed { .. }
                | Notice::InputFailed(_)
        )
    }
}

fn action_subject(action: NamedAction) -> &'static str {
    match action {
        NamedAction::Takeoff => "initiating takeoff",
        NamedAction::Land => "initiating landing",
        NamedAction::EnableStick => "enabling virtual stick",
        NamedAction::DisableStick => "disabling virtual stick",
        NamedAction::ShowHeight => "reading height",
        _ => action.token(),
    }
}

impl fmt::Display for Notice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::ActionSucceeded(NamedAction::Takeoff) => {
                write!(f, "Takeoff initiated successfully")
            }
            Notice::ActionSucceeded(NamedAction::Land) => {
                write!(f, "Landing initiated successfully")
            }
            Notice::ActionSucceeded(NamedAction::EnableStick) => {
                write!(f, "Virtual stick enabled")
            }
            Notice::ActionSucceeded(NamedAction::DisableStick) => {
                write!(f, "Virtual stick disabled")
            }
            Notice::ActionSucceeded(action) => write!(f, "{} done", action.token()),
            Notice::ActionFailed { action, error } => {
                write!(f, "Error {}: {}", action_subject(*action), error)
            }
            Notice::Stopped => write!(f, "Drone stopped"),
            Notice::Height(meters) => write!(f, "Height: {:?} m", meters),
            Notice::Rejected {
                raw,
                reason: ParseError::InvalidParameters,
            } => write!(f, "Invalid moveDrone parameters: {}", raw),
            Notice::Rejected {
                raw,
                reason: ParseError::UnknownCommand,
            } => write!(f, "Unknown command from server: {}", raw),
            Notice::StickFailed { side, error } => {
                write!(f, "Error setting {} stick: {}", side.as_str(), error)
            }
            Notice::InputFailed(error) => write!(f, "Input error: {}", error),
        }
    }
}

/// Trait for surfacing notices to the operator.
///
/// Delivery is fire-and-forget.
pub trait NoticeSink {
    fn notify(&mut self, notice: &Notice<'_>);
}
