pub mod app;
pub mod graphics;
pub mod pixels_renderer;
pub mod profiling;
pub mod scene;
pub mod snapshot;
pub mod surface;
pub mod ui;
pub mod view_tree;

/// Timing delivered to every per-frame callback, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Total time since the clock started.
    pub elapsed: f32,
    /// Time since the previous frame.
    pub delta: f32,
}

/// Accumulates frame deltas into a monotonically increasing elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    elapsed: f32,
    frames: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advances the clock and returns the timing for the new frame.
    ///
    /// Negative or non-finite deltas are treated as zero so `elapsed` never runs backwards.
    pub fn tick(&mut self, delta: f32) -> FrameTime {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        self.elapsed += delta;
        self.frames = self.frames.saturating_add(1);
        FrameTime {
            elapsed: self.elapsed,
            delta,
        }
    }
}

pub trait FrameLogic {
    type State;
    type Input;

    fn initial_state(&mut self) -> Self::State;
    fn step(&mut self, state: &mut Self::State, input: Self::Input, time: FrameTime);
}

/// Drives a [`FrameLogic`] with synthetic frame deltas, without a window.
#[derive(Debug)]
pub struct HeadlessRunner<L: FrameLogic> {
    logic: L,
    state: L::State,
    clock: FrameClock,
}

impl<L: FrameLogic> HeadlessRunner<L> {
    pub fn new(mut logic: L) -> Self {
        let state = logic.initial_state();
        Self {
            logic,
            state,
            clock: FrameClock::new(),
        }
    }

    pub fn frame(&self) -> u64 {
        self.clock.frames()
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn state(&self) -> &L::State {
        &self.state
    }

    pub fn step(&mut self, input: L::Input, delta: f32) -> u64 {
        let time = self.clock.tick(delta);
        self.logic.step(&mut self.state, input, time);
        self.clock.frames()
    }

    pub fn step_profiled<P: profiling::Profiler>(
        &mut self,
        input: L::Input,
        delta: f32,
        profiler: &mut P,
    ) -> u64 {
        use std::time::Instant;

        let total_start = Instant::now();
        let time = self.clock.tick(delta);

        let step_start = Instant::now();
        self.logic.step(&mut self.state, input, time);
        let step_dt = step_start.elapsed();

        let frame = self.clock.frames();
        profiler.on_step(
            frame,
            profiling::StepTimings {
                step: step_dt,
                total: total_start.elapsed(),
            },
        );
        frame
    }

    pub fn run<I>(&mut self, inputs: I, delta: f32) -> u64
    where
        I: IntoIterator<Item = L::Input>,
    {
        let mut last_frame = self.frame();
        for input in inputs {
            last_frame = self.step(input, delta);
        }
        last_frame
    }
}
