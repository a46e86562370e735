//! A minimal retained 3D scene: positioned groups holding emissive text objects.
//!
//! The scene only stores transforms and material values. Drawing happens elsewhere by projecting
//! objects through a [`Camera`] onto a `Renderer2d`.

use serde::{Deserialize, Serialize};

use crate::surface::SurfaceSize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation about the local vertical axis, in radians.
    pub rotation_y: f32,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(u32);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObject {
    pub parent: Option<GroupId>,
    pub text: String,
    pub local: Transform,
    /// Emissive base colour, RGB.
    pub emissive: [u8; 3],
    pub emissive_intensity: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene3d {
    groups: Vec<Vec3>,
    objects: Vec<TextObject>,
}

impl Scene3d {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, position: Vec3) -> GroupId {
        self.groups.push(position);
        GroupId((self.groups.len() - 1) as u32)
    }

    pub fn add_text(&mut self, parent: Option<GroupId>, text: impl Into<String>, local: Transform) -> ObjectId {
        self.objects.push(TextObject {
            parent,
            text: text.into(),
            local,
            emissive: [255, 0, 0],
            emissive_intensity: 1.0,
        });
        ObjectId((self.objects.len() - 1) as u32)
    }

    pub fn group_position(&self, id: GroupId) -> Vec3 {
        self.groups.get(id.0 as usize).copied().unwrap_or_default()
    }

    pub fn set_group_position(&mut self, id: GroupId, position: Vec3) {
        if let Some(group) = self.groups.get_mut(id.0 as usize) {
            *group = position;
        }
    }

    pub fn object(&self, id: ObjectId) -> Option<&TextObject> {
        self.objects.get(id.0 as usize)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut TextObject> {
        self.objects.get_mut(id.0 as usize)
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &TextObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (ObjectId(i as u32), obj))
    }

    /// Parent group offset plus the object's local position.
    pub fn world_position(&self, id: ObjectId) -> Vec3 {
        let Some(obj) = self.object(id) else {
            return Vec3::ZERO;
        };
        let parent = obj
            .parent
            .map(|g| self.group_position(g))
            .unwrap_or_default();
        parent + obj.local.position
    }
}

/// Perspective camera looking down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view, degrees.
    pub fov_y: f32,
    pub near: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov_y: 75.0,
            near: 0.1,
        }
    }
}

/// A point projected to the screen: pixel coordinates plus the distance in front of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
    /// Screen pixels per world unit at this depth.
    pub pixels_per_unit: f32,
}

impl Camera {
    pub fn project(&self, world: Vec3, surface: SurfaceSize) -> Option<Projected> {
        if surface.is_empty() {
            return None;
        }
        let depth = self.position.z - world.z;
        if depth <= self.near {
            return None;
        }
        let half_h = surface.height as f32 * 0.5;
        let half_w = surface.width as f32 * 0.5;
        let focal = half_h / (self.fov_y.to_radians() * 0.5).tan();
        let pixels_per_unit = focal / depth;
        Some(Projected {
            x: half_w + (world.x - self.position.x) * pixels_per_unit,
            y: half_h - (world.y - self.position.y) * pixels_per_unit,
            depth,
            pixels_per_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_position_includes_group_offset() {
        let mut scene = Scene3d::new();
        let group = scene.add_group(Vec3::ZERO);
        let line = scene.add_text(
            Some(group),
            "hello",
            Transform {
                position: Vec3::new(0.5, -2.0, 0.0),
                ..Transform::default()
            },
        );

        scene.set_group_position(group, Vec3::new(0.0, 1.5, 0.0));
        assert_eq!(scene.world_position(line), Vec3::new(0.5, -0.5, 0.0));
    }

    #[test]
    fn camera_projects_origin_to_center() {
        let camera = Camera::default();
        let p = camera
            .project(Vec3::ZERO, SurfaceSize::new(200, 100))
            .expect("origin is in front of the camera");
        assert!((p.x - 100.0).abs() < 1e-4);
        assert!((p.y - 50.0).abs() < 1e-4);
        assert!((p.depth - 5.0).abs() < 1e-6);
    }

    #[test]
    fn camera_rejects_points_behind_it() {
        let camera = Camera::default();
        assert!(camera.project(Vec3::new(0.0, 0.0, 6.0), SurfaceSize::new(10, 10)).is_none());
    }

    #[test]
    fn higher_world_y_projects_higher_on_screen() {
        let camera = Camera::default();
        let size = SurfaceSize::new(100, 100);
        let low = camera.project(Vec3::new(0.0, -1.0, 0.0), size).unwrap();
        let high = camera.project(Vec3::new(0.0, 1.0, 0.0), size).unwrap();
        assert!(high.y < low.y);
    }
}
