use engine::FrameTime;
use engine::scene::{GroupId, ObjectId, Scene3d, Transform, Vec3};

use crate::animator::{AnimatorParams, LinePose, animate};
use crate::playback::PlaybackState;

pub const DEFAULT_SCROLL_SPEED: f32 = 1.0;

/// World-space scale of the rendered text meshes.
pub const LINE_SCALE: f32 = 0.4;

/// Scene operations the track needs from whatever draws it.
pub trait RenderHost {
    type Group: Copy;
    type Handle: Copy;

    fn spawn_group(&mut self) -> Self::Group;
    fn spawn_line(&mut self, group: Self::Group, text: &str, base_offset: f32) -> Self::Handle;
    fn set_group_offset(&mut self, group: Self::Group, y: f32);
    fn world_y(&self, line: Self::Handle) -> f32;
    fn apply_pose(&mut self, line: Self::Handle, pose: &LinePose);
}

impl RenderHost for Scene3d {
    type Group = GroupId;
    type Handle = ObjectId;

    fn spawn_group(&mut self) -> GroupId {
        self.add_group(Vec3::ZERO)
    }

    fn spawn_line(&mut self, group: GroupId, text: &str, base_offset: f32) -> ObjectId {
        let id = self.add_text(
            Some(group),
            text,
            Transform {
                position: Vec3::new(0.0, base_offset, 0.0),
                rotation_y: 0.0,
                scale: LINE_SCALE,
            },
        );
        if let Some(obj) = self.object_mut(id) {
            obj.emissive = [255, 0, 0];
            obj.emissive_intensity = 10.0;
        }
        id
    }

    fn set_group_offset(&mut self, group: GroupId, y: f32) {
        let mut position = self.group_position(group);
        position.y = y;
        self.set_group_position(group, position);
    }

    fn world_y(&self, line: ObjectId) -> f32 {
        self.world_position(line).y
    }

    fn apply_pose(&mut self, line: ObjectId, pose: &LinePose) {
        let Some(obj) = self.object_mut(line) else {
            return;
        };
        obj.local.rotation_y = pose.rotation_y;
        obj.local.position.x = pose.position_x;
        obj.local.position.z = pose.position_z;
        obj.emissive_intensity = pose.glow_intensity;
    }
}

/// Starting height of line `index` out of `count`, relative to the track.
///
/// Later lines start lower; the stack is compressed so consecutive lines sit `1/1.7` apart, with
/// a fixed 5 unit margin below the origin. The `count` terms of the layout cancel, so the offset
/// is computed without them.
pub fn base_offset(index: usize, count: usize) -> f32 {
    debug_assert!(count == 0 || index < count, "line {index} out of {count}");
    (-(index as f64 / 1.7) - 5.0) as f32
}

#[derive(Debug, Clone)]
pub struct CreditLine<H> {
    text: String,
    base_offset: f32,
    handle: H,
    world_y: f32,
    pose: LinePose,
}

impl<H: Copy> CreditLine<H> {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn base_offset(&self) -> f32 {
        self.base_offset
    }

    pub fn handle(&self) -> H {
        self.handle
    }

    /// World height as of the last update.
    pub fn world_y(&self) -> f32 {
        self.world_y
    }

    pub fn pose(&self) -> LinePose {
        self.pose
    }
}

pub struct CreditsTrack<H: RenderHost> {
    group: H::Group,
    lines: Vec<CreditLine<H::Handle>>,
    scroll_offset: f32,
    scroll_speed: f32,
    params: AnimatorParams,
}

impl<H: RenderHost> CreditsTrack<H> {
    pub fn new<S: AsRef<str>>(host: &mut H, lines: &[S], scroll_speed: f32, params: AnimatorParams) -> Self {
        let group = host.spawn_group();
        let count = lines.len();
        let lines = lines
            .iter()
            .enumerate()
            .map(|(index, text)| {
                let text = text.as_ref();
                let offset = base_offset(index, count);
                CreditLine {
                    text: text.to_string(),
                    base_offset: offset,
                    handle: host.spawn_line(group, text, offset),
                    world_y: offset,
                    pose: LinePose::default(),
                }
            })
            .collect();
        tracing::debug!(lines = count, scroll_speed, "credits track built");
        Self {
            group,
            lines,
            scroll_offset: 0.0,
            scroll_speed,
            params,
        }
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    pub fn params(&self) -> &AnimatorParams {
        &self.params
    }

    pub fn lines(&self) -> &[CreditLine<H::Handle>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Advances the scroll for one frame, then re-derives every line's pose from its new height.
    pub fn update(&mut self, host: &mut H, state: PlaybackState, time: FrameTime) {
        match state {
            PlaybackState::Playing => self.scroll_offset += time.delta * self.scroll_speed,
            PlaybackState::Reset => self.scroll_offset = 0.0,
            PlaybackState::Paused => {}
        }
        host.set_group_offset(self.group, self.scroll_offset);

        for line in &mut self.lines {
            let y = host.world_y(line.handle);
            let pose = animate(&self.params, y, time.elapsed);
            host.apply_pose(line.handle, &pose);
            line.world_y = y;
            line.pose = pose;
        }
        tracing::trace!(offset = self.scroll_offset, ?state, "track updated");
    }

    /// True once every line has scrolled above `exit_height`. An empty track is always finished.
    pub fn is_finished(&self, exit_height: f32) -> bool {
        self.lines.iter().all(|line| line.world_y > exit_height)
    }
}
