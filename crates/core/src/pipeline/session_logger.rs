use std::collections::BTreeMap;
use std::time::Instant;

/// Observer for per-frame session events.
///
/// Keeps the session loop free of output concerns: the CLI reports through
/// the `log` crate, tests discard everything.
pub trait SessionLogger: Send {
    /// Frame `current` of `total` is done. `total` is 0 for live sources.
    fn progress(&mut self, current: usize, total: usize);

    /// How long a named stage (`detect`, `effects`, `compose`, `write`) took
    /// for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// A per-frame measurement such as the number of faces.
    fn metric(&mut self, name: &str, value: f64);

    /// End-of-session report. Default: no-op.
    fn summary(&self) {}
}

/// Discards every event.
pub struct NullSessionLogger;

impl SessionLogger for NullSessionLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
}

/// Running totals for one stage or metric. Constant size regardless of how
/// many frames a live session runs for.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aggregate {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl Aggregate {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Accumulates stage timings and metrics and reports them via `log`.
///
/// Progress lines are throttled to one every `throttle_frames` frames.
pub struct StdoutSessionLogger {
    throttle_frames: usize,
    timings: BTreeMap<String, Aggregate>,
    metrics: BTreeMap<String, Aggregate>,
    start_time: Instant,
    frames: usize,
}

impl StdoutSessionLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: BTreeMap::new(),
            metrics: BTreeMap::new(),
            start_time: Instant::now(),
            frames: 0,
        }
    }

    /// Formatted summary, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!(
            "Session summary ({} frames, {:.1}s total):",
            self.frames,
            elapsed_ms / 1000.0
        )];

        for (stage, durations) in &self.timings {
            let total_ms = durations.sum;
            let avg_ms = durations.mean();
            let max_ms = durations.max;
            let pct = if elapsed_ms > 0.0 {
                total_ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!(
                "  {stage:8}: avg {avg_ms:6.1}ms  max {max_ms:6.1}ms  total {total_ms:7.0}ms  ({pct:4.1}%)"
            ));
        }

        for (name, values) in &self.metrics {
            lines.push(format!(
                "  {name}: avg {:.1}, max {:.0}, total {:.0}",
                values.mean(),
                values.max,
                values.sum
            ));
        }

        if self.frames > 0 && elapsed_ms > 0.0 {
            let fps = self.frames as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {fps:.1} fps"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<Aggregate> {
        self.timings.get(stage).copied()
    }

    pub fn metrics_for(&self, name: &str) -> Option<Aggregate> {
        self.metrics.get(name).copied()
    }
}

impl Default for StdoutSessionLogger {
    fn default() -> Self {
        Self::new(30)
    }
}

impl SessionLogger for StdoutSessionLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.frames = current;
        if current % self.throttle_frames != 0 && current != total {
            return;
        }
        if total > 0 {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} frames ({pct:.1}%)");
        } else {
            log::info!("Processed {current} frames");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().record(value);
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}
