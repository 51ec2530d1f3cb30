use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::control::domain::control_event::ControlEvent;
use crate::control::domain::control_input::ControlInput;

/// Control input fed through a crossbeam channel.
///
/// Any thread holding the [`Sender`] can inject events; the frame loop picks
/// them up at its next poll.
pub struct ChannelControlInput {
    rx: Receiver<ControlEvent>,
}

impl ChannelControlInput {
    pub fn new(rx: Receiver<ControlEvent>) -> Self {
        Self { rx }
    }

    /// Unbounded channel plus the input reading from it.
    pub fn channel() -> (Sender<ControlEvent>, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (tx, Self::new(rx))
    }
}

impl ControlInput for ChannelControlInput {
    fn poll(&mut self) -> Option<ControlEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}
