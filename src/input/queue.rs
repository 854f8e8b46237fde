use stick_core::{CommandSource, InputError, InputEvent};
use tokio::sync::mpsc;

use super::Event;

/// Command source fed by the shared event queue.
///
/// Producers (the connection task and the local joystick reader) push into
/// the queue; the bridge is the single consumer. Once every producer is gone
/// the source reports [`InputError::Closed`].
pub struct QueueSource {
    events: mpsc::Receiver<Event>,
}

impl QueueSource {
    pub fn new(events: mpsc::Receiver<Event>) -> Self {
        Self { events }
    }
}

impl CommandSource for QueueSource {
    type Frame = String;

    async fn receive(&mut self) -> Result<InputEvent<String>, InputError> {
        self.events.recv().await.unwrap_or(Err(InputError::Closed))
    }
}
