use log::{debug, info, warn};
use stick_core::{FlightSink, SinkError, StickIntent, StickPosition};

/// Height reached by an automatic takeoff, in meters.
pub const TAKEOFF_HEIGHT_M: f32 = 1.2;

/// Flight sink that logs every call and tracks a minimal flight state.
///
/// Stands in for a vendor flight SDK: takeoff and landing are rejected when
/// they make no sense for the current state, stick writes are recorded so
/// the last applied intent can be inspected.
#[derive(Debug, Default)]
pub struct LogFlightSink {
    intent: StickIntent,
    virtual_stick: bool,
    flying: bool,
}

impl LogFlightSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last stick positions written.
    pub fn intent(&self) -> StickIntent {
        self.intent
    }

    pub fn virtual_stick_enabled(&self) -> bool {
        self.virtual_stick
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    fn set_stick(&mut self, name: &str, position: StickPosition) {
        if !self.virtual_stick {
            debug!("{} stick set while virtual stick is disabled", name);
        }
        info!("{} stick -> ({}, {})", name, position.x, position.y);
    }
}

impl FlightSink for LogFlightSink {
    async fn start_takeoff(&mut self) -> Result<(), SinkError> {
        if self.flying {
            warn!("takeoff rejected: already flying");
            return Err(SinkError::Rejected);
        }
        self.flying = true;
        info!("takeoff");
        Ok(())
    }

    async fn start_landing(&mut self) -> Result<(), SinkError> {
        if !self.flying {
            warn!("landing rejected: on the ground");
            return Err(SinkError::Rejected);
        }
        self.flying = false;
        info!("landing");
        Ok(())
    }

    async fn enable_virtual_stick(&mut self) -> Result<(), SinkError> {
        self.virtual_stick = true;
        info!("virtual stick enabled");
        Ok(())
    }

    async fn disable_virtual_stick(&mut self) -> Result<(), SinkError> {
        self.virtual_stick = false;
        info!("virtual stick disabled");
        Ok(())
    }

    async fn set_left_position(&mut self, x: i16, y: i16) -> Result<(), SinkError> {
        self.intent.left = StickPosition::new(x, y);
        self.set_stick("left", self.intent.left);
        Ok(())
    }

    async fn set_right_position(&mut self, x: i16, y: i16) -> Result<(), SinkError> {
        self.intent.right = StickPosition::new(x, y);
        self.set_stick("right", self.intent.right);
        Ok(())
    }

    async fn height(&mut self) -> Result<f32, SinkError> {
        Ok(if self.flying { TAKEOFF_HEIGHT_M } else { 0.0 })
    }
}
