//! Playback state machine tying the scroll to an external audio player.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
    /// Rewound to the start; stays here until played again.
    Reset,
}

/// Fire-and-forget commands to an embedded audio player.
pub trait AudioWidget {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, seconds: f32);
}

impl<W: AudioWidget + ?Sized> AudioWidget for &mut W {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek_to(&mut self, seconds: f32) {
        (**self).seek_to(seconds);
    }
}

impl<W: AudioWidget + ?Sized> AudioWidget for Box<W> {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn seek_to(&mut self, seconds: f32) {
        (**self).seek_to(seconds);
    }
}

/// The two on-screen controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    /// Play/pause toggle; the primary control.
    Toggle,
    Reset,
}

#[derive(Debug)]
pub struct PlaybackController<A: AudioWidget> {
    state: PlaybackState,
    audio: A,
    focused: Control,
}

impl<A: AudioWidget> PlaybackController<A> {
    pub fn new(audio: A) -> Self {
        Self {
            state: PlaybackState::Paused,
            audio,
            focused: Control::Toggle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn focused(&self) -> Control {
        self.focused
    }

    pub fn play(&mut self) {
        self.audio.play();
        self.transition(PlaybackState::Playing);
    }

    pub fn pause(&mut self) {
        self.audio.pause();
        self.transition(PlaybackState::Paused);
    }

    /// Rewinds the audio, leaves it paused, and hands focus back to the toggle control.
    pub fn reset(&mut self) {
        self.audio.seek_to(0.0);
        self.audio.pause();
        self.transition(PlaybackState::Reset);
        self.focused = Control::Toggle;
    }

    pub fn toggle(&mut self) {
        match self.state {
            PlaybackState::Paused | PlaybackState::Reset => self.play(),
            PlaybackState::Playing => self.pause(),
        }
    }

    /// Performs whatever `control` does. Activating a hidden control is ignored.
    pub fn activate(&mut self, control: Control) {
        match control {
            Control::Toggle => self.toggle(),
            Control::Reset if self.reset_visible() => self.reset(),
            Control::Reset => {
                tracing::debug!("reset ignored while already reset");
            }
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        match self.state {
            PlaybackState::Paused | PlaybackState::Reset => "Roll Credits",
            PlaybackState::Playing => "Pause",
        }
    }

    pub fn reset_visible(&self) -> bool {
        self.state != PlaybackState::Reset
    }

    pub fn visible_controls(&self) -> Vec<Control> {
        let mut controls = vec![Control::Toggle];
        if self.reset_visible() {
            controls.push(Control::Reset);
        }
        controls
    }

    /// Moves focus to the next visible control, wrapping around.
    pub fn focus_next(&mut self) {
        let controls = self.visible_controls();
        let current = controls.iter().position(|c| *c == self.focused).unwrap_or(0);
        self.focused = controls[(current + 1) % controls.len()];
    }

    pub fn activate_focused(&mut self) {
        self.activate(self.focused);
    }

    fn transition(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::info!(from = ?self.state, to = ?next, "playback state changed");
        }
        self.state = next;
        if self.focused == Control::Reset && !self.reset_visible() {
            self.focused = Control::Toggle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, RecordingWidget};

    #[test]
    fn starts_paused_with_toggle_focused() {
        let controller = PlaybackController::new(RecordingWidget::default());
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert_eq!(controller.focused(), Control::Toggle);
        assert_eq!(controller.toggle_label(), "Roll Credits");
        assert!(controller.reset_visible());
    }

    #[test]
    fn toggle_from_paused_plays_once() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.toggle();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.audio().commands(), &[AudioCommand::Play]);
        assert_eq!(controller.toggle_label(), "Pause");
    }

    #[test]
    fn toggle_from_playing_pauses() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.toggle();
        controller.toggle();
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert_eq!(
            controller.audio().commands(),
            &[AudioCommand::Play, AudioCommand::Pause]
        );
    }

    #[test]
    fn reset_seeks_then_pauses_and_hides_itself() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.play();
        controller.focus_next();
        assert_eq!(controller.focused(), Control::Reset);

        controller.activate_focused();
        assert_eq!(controller.state(), PlaybackState::Reset);
        assert_eq!(
            controller.audio().commands(),
            &[
                AudioCommand::Play,
                AudioCommand::SeekTo(0.0),
                AudioCommand::Pause
            ]
        );
        assert!(!controller.reset_visible());
        assert_eq!(controller.focused(), Control::Toggle);
        assert_eq!(controller.visible_controls(), vec![Control::Toggle]);
    }

    #[test]
    fn toggle_from_reset_plays() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.reset();
        controller.toggle();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.audio().commands().last(), Some(&AudioCommand::Play));
        assert!(controller.reset_visible());
    }

    #[test]
    fn hidden_reset_control_is_ignored() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.reset();
        let issued = controller.audio().commands().len();

        controller.activate(Control::Reset);
        assert_eq!(controller.audio().commands().len(), issued);
        assert_eq!(controller.state(), PlaybackState::Reset);
    }

    #[test]
    fn focus_wraps_over_visible_controls_only() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        controller.reset();
        controller.focus_next();
        assert_eq!(controller.focused(), Control::Toggle);
    }

    #[test]
    fn borrowed_widget_receives_commands() {
        let mut widget = RecordingWidget::default();
        {
            let mut controller = PlaybackController::new(&mut widget);
            controller.toggle();
        }
        assert_eq!(widget.commands(), &[AudioCommand::Play]);
    }
}
