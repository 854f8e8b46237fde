mod log_sink;
mod notices;

pub use log_sink::{LogFlightSink, TAKEOFF_HEIGHT_M};
pub use notices::LogNotices;
