use crate::control::domain::control_event::ControlEvent;

/// Non-blocking source of operator events, polled once per frame.
pub trait ControlInput: Send {
    /// Next pending event, or `None` when nothing is queued right now.
    fn poll(&mut self) -> Option<ControlEvent>;
}

/// Input that never produces events (batch video and image runs).
pub struct NoControlInput;

impl ControlInput for NoControlInput {
    fn poll(&mut self) -> Option<ControlEvent> {
        None
    }
}
