mod local;
mod queue;

use stick_core::{InputError, InputEvent};
use tokio::sync::mpsc;

pub use local::{parse_stick_line, read_local_sticks, StickLineError};
pub use queue::QueueSource;

/// One entry of the shared event queue.
pub type Event = Result<InputEvent<String>, InputError>;

/// Default event queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Create the bounded queue all producers push into.
pub fn event_queue(capacity: usize) -> (mpsc::Sender<Event>, mpsc::Receiver<Event>) {
    mpsc::channel(capacity)
}
