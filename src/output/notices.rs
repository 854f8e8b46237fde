use log::{info, warn};
use stick_core::{Notice, NoticeSink};

/// Notice sink that writes to the log: failures at `warn`, the rest at `info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn notify(&mut self, notice: &Notice<'_>) {
        if notice.is_error() {
            warn!("{}", notice);
        } else {
            info!("{}", notice);
        }
    }
}
