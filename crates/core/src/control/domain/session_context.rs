use crate::control::domain::control_event::ControlEvent;
use crate::control::domain::control_input::ControlInput;
use crate::control::domain::interactive_controller::InteractiveController;
use crate::effects::domain::effect_state::EffectState;

/// Owns the single live [`EffectState`] of a session together with the
/// controller that replaces it.
///
/// The frame loop calls [`SessionContext::poll_input`] between frames and
/// then [`SessionContext::snapshot`] once at the start of each frame.
#[derive(Debug)]
pub struct SessionContext {
    state: EffectState,
    controller: InteractiveController,
}

impl SessionContext {
    pub fn new(initial: EffectState) -> Self {
        Self {
            state: initial,
            controller: InteractiveController::new(),
        }
    }

    pub fn snapshot(&self) -> EffectState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        self.controller.is_stopped()
    }

    /// Applies one event; returns whether a screenshot was requested.
    pub fn apply(&mut self, event: ControlEvent) -> bool {
        let reaction = self.controller.handle(event, self.state);
        self.state = reaction.state;
        reaction.screenshot
    }

    /// Drains every pending event from `input`; returns the number of
    /// screenshot requests among them.
    pub fn poll_input(&mut self, input: &mut dyn ControlInput) -> usize {
        let mut screenshots = 0;
        while let Some(event) = input.poll() {
            if self.apply(event) {
                screenshots += 1;
            }
        }
        screenshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::domain::effect_kind::EffectKind;
    use std::collections::VecDeque;

    struct QueueInput(VecDeque<ControlEvent>);

    impl ControlInput for QueueInput {
        fn poll(&mut self) -> Option<ControlEvent> {
            self.0.pop_front()
        }
    }

    #[test]
    fn test_poll_drains_queue_and_counts_screenshots() {
        let mut ctx = SessionContext::new(EffectState::default());
        let mut input = QueueInput(VecDeque::from(vec![
            ControlEvent::Screenshot,
            ControlEvent::SelectEffect(2),
            ControlEvent::Screenshot,
        ]));

        assert_eq!(ctx.poll_input(&mut input), 2);
        assert_eq!(ctx.snapshot().kind, EffectKind::BlackBox);
        assert!(input.0.is_empty());
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut ctx = SessionContext::new(EffectState::default());
        let snapshot = ctx.snapshot();
        ctx.apply(ControlEvent::SelectEffect(1));
        assert_eq!(snapshot.kind, EffectKind::Pixelate);
        assert_eq!(ctx.snapshot().kind, EffectKind::Blur);
    }

    #[test]
    fn test_quit_marks_context_stopped() {
        let mut ctx = SessionContext::new(EffectState::default());
        ctx.apply(ControlEvent::Quit);
        assert!(ctx.is_stopped());
    }
}
