use std::collections::VecDeque;
use std::time::{Duration, Instant};

const DEFAULT_WINDOW: usize = 30;

/// Frames per second over a sliding window of recent frame timestamps.
pub struct FrameRateCounter {
    window: usize,
    stamps: VecDeque<Instant>,
}

impl FrameRateCounter {
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(2),
            stamps: VecDeque::new(),
        }
    }

    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Records a frame finished at `now` and returns the current rate.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        self.stamps.push_back(now);
        while self.stamps.len() > self.window {
            self.stamps.pop_front();
        }
        self.fps()
    }

    /// 0 until two frames have been seen.
    pub fn fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.stamps.front(), self.stamps.back()) else {
            return 0.0;
        };
        let span = last.saturating_duration_since(*first);
        if self.stamps.len() < 2 || span == Duration::ZERO {
            return 0.0;
        }
        (self.stamps.len() - 1) as f64 / span.as_secs_f64()
    }
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_and_single_frame_report_zero() {
        let mut counter = FrameRateCounter::default();
        assert_eq!(counter.fps(), 0.0);
        assert_eq!(counter.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_steady_rate() {
        let mut counter = FrameRateCounter::new(10);
        let start = Instant::now();
        let mut fps = 0.0;
        for i in 0..5 {
            fps = counter.tick_at(start + Duration::from_millis(40 * i));
        }
        assert_relative_eq!(fps, 25.0, epsilon = 1e-6);
    }

    #[test]
    fn test_window_forgets_old_frames() {
        let mut counter = FrameRateCounter::new(3);
        let start = Instant::now();
        counter.tick_at(start);
        // A long stall followed by fast frames.
        counter.tick_at(start + Duration::from_secs(10));
        counter.tick_at(start + Duration::from_millis(10_100));
        let fps = counter.tick_at(start + Duration::from_millis(10_200));
        assert_relative_eq!(fps, 10.0, epsilon = 1e-6);
    }
}
