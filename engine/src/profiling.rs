use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepTimings {
    pub step: Duration,
    pub total: Duration,
}

/// Optional hook for capturing per-frame step timings.
///
/// Kept independent of any particular `FrameLogic` so the same profiler works for headless runs
/// and the windowed loop.
pub trait Profiler {
    fn on_step(&mut self, _frame: u64, _timings: StepTimings) {}
}

/// Keeps the slowest step seen so far, plus a running total for averaging.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorstStep {
    pub frames: u64,
    pub worst: Duration,
    pub total: Duration,
}

impl WorstStep {
    pub fn average(&self) -> Duration {
        if self.frames == 0 {
            return Duration::ZERO;
        }
        self.total / self.frames.min(u32::MAX as u64) as u32
    }
}

impl Profiler for WorstStep {
    fn on_step(&mut self, _frame: u64, timings: StepTimings) {
        self.frames = self.frames.saturating_add(1);
        self.worst = self.worst.max(timings.total);
        self.total = self.total.saturating_add(timings.total);
    }
}
