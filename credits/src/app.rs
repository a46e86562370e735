use engine::app::{InputFrame, SceneApp};
use engine::graphics::Renderer2d;
use engine::profiling::Profiler;
use engine::scene::{Camera, Scene3d};
use engine::snapshot::FrameSnapshot;
use engine::surface::{RgbaFrame, SurfaceSize};
use engine::view_tree::ViewTree;
use engine::{FrameLogic, FrameTime, HeadlessRunner};
use winit::event::VirtualKeyCode;

use crate::config::CreditsConfig;
use crate::playback::{AudioWidget, Control, PlaybackController, PlaybackState};
use crate::track::CreditsTrack;
use crate::view::{build_view, draw_credits};

/// Scene, track and controller wired together; one instance per credits roll.
pub struct CreditsRoll<A: AudioWidget> {
    scene: Scene3d,
    track: CreditsTrack<Scene3d>,
    controller: PlaybackController<A>,
    exit_height: f32,
    finished: bool,
}

impl<A: AudioWidget> CreditsRoll<A> {
    pub fn new<S: AsRef<str>>(lines: &[S], config: &CreditsConfig, audio: A) -> Self {
        let mut scene = Scene3d::new();
        let track = CreditsTrack::new(&mut scene, lines, config.scroll_speed, config.animator_params());
        tracing::info!(lines = track.len(), profile = ?config.profile, "credits ready");
        Self {
            scene,
            track,
            controller: PlaybackController::new(audio),
            exit_height: config.exit_height,
            finished: false,
        }
    }

    pub fn scene(&self) -> &Scene3d {
        &self.scene
    }

    pub fn track(&self) -> &CreditsTrack<Scene3d> {
        &self.track
    }

    pub fn controller(&self) -> &PlaybackController<A> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<A> {
        &mut self.controller
    }

    pub fn state(&self) -> PlaybackState {
        self.controller.state()
    }

    pub fn activate(&mut self, control: Control) {
        self.controller.activate(control);
    }

    /// The per-frame step: move the track according to the current playback state.
    pub fn frame(&mut self, time: FrameTime) {
        self.track.update(&mut self.scene, self.controller.state(), time);

        let finished = self.track.is_finished(self.exit_height);
        if finished && !self.finished {
            tracing::info!(offset = self.track.scroll_offset(), "credits finished rolling");
        }
        self.finished = finished;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn render(&self, camera: &Camera, gfx: &mut dyn Renderer2d) {
        draw_credits(&self.scene, camera, gfx);
    }
}

/// Windowed front end for [`run_scene`](engine::app::run_scene).
pub struct CreditsApp<A: AudioWidget> {
    roll: CreditsRoll<A>,
    camera: Camera,
}

impl<A: AudioWidget> CreditsApp<A> {
    pub fn new(roll: CreditsRoll<A>) -> Self {
        Self {
            roll,
            camera: Camera::default(),
        }
    }

    pub fn roll(&self) -> &CreditsRoll<A> {
        &self.roll
    }
}

impl<A: AudioWidget> SceneApp for CreditsApp<A> {
    type Action = Control;

    fn build_view(&self, surface: SurfaceSize) -> ViewTree<Control> {
        build_view(self.roll.controller(), surface)
    }

    fn update(&mut self, input: &InputFrame, actions: &[Control], time: FrameTime) -> bool {
        if input.pressed(VirtualKeyCode::Escape) {
            return false;
        }
        if input.pressed(VirtualKeyCode::Tab) {
            self.roll.controller_mut().focus_next();
        }
        if input.pressed(VirtualKeyCode::Space) || input.pressed(VirtualKeyCode::Return) {
            self.roll.controller_mut().activate_focused();
        }
        for action in actions {
            self.roll.activate(*action);
        }
        self.roll.frame(time);
        true
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        self.roll.render(&self.camera, gfx);
    }
}

/// Headless driver: each step optionally activates a control, then advances one frame.
pub struct CreditsLogic<A: AudioWidget + Default> {
    lines: Vec<String>,
    config: CreditsConfig,
    audio: Option<A>,
}

impl<A: AudioWidget + Default> CreditsLogic<A> {
    pub fn new(lines: Vec<String>, config: CreditsConfig, audio: A) -> Self {
        Self {
            lines,
            config,
            audio: Some(audio),
        }
    }
}

impl<A: AudioWidget + Default> FrameLogic for CreditsLogic<A> {
    type State = CreditsRoll<A>;
    type Input = Option<Control>;

    fn initial_state(&mut self) -> Self::State {
        let audio = self.audio.take().unwrap_or_default();
        CreditsRoll::new(&self.lines, &self.config, audio)
    }

    fn step(&mut self, state: &mut Self::State, input: Self::Input, time: FrameTime) {
        if let Some(control) = input {
            state.activate(control);
        }
        state.frame(time);
    }
}

/// Runs the roll offscreen: presses play, advances `frames` frames of `delta` seconds, and
/// hashes each rendered frame.
pub fn render_headless<A: AudioWidget + Default, P: Profiler>(
    logic: CreditsLogic<A>,
    size: SurfaceSize,
    frames: u64,
    delta: f32,
    profiler: &mut P,
) -> (HeadlessRunner<CreditsLogic<A>>, Vec<FrameSnapshot>) {
    let camera = Camera::default();
    let mut runner = HeadlessRunner::new(logic);
    let mut rgba = RgbaFrame::new(size);
    let mut snapshots = Vec::new();

    for i in 0..frames {
        let input = (i == 0).then_some(Control::Toggle);
        let frame = runner.step_profiled(input, delta, profiler);
        runner.state().render(&camera, &mut rgba.renderer());
        snapshots.push(FrameSnapshot::capture(frame, &rgba));
    }
    (runner, snapshots)
}
