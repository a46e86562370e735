use engine::graphics::{Color, GLYPH_H, GLYPH_W, Renderer2d};
use engine::scene::{Camera, Scene3d, TextObject, Vec3};
use engine::surface::SurfaceSize;
use engine::ui::{Anchor, Insets, Rect, Size};
use engine::view_tree::{ButtonNode, ViewNode, ViewTree};

use crate::playback::{AudioWidget, Control, PlaybackController};

pub const BACKGROUND: Color = [0, 0, 0, 255];

const BUTTON_W: u32 = 200;
const BUTTON_H: u32 = 36;
const BUTTON_GAP: u32 = 12;
const BAR_MARGIN: u32 = 24;

/// Horizontal distance between glyph centres, in units of the object's scale.
const GLYPH_ADVANCE: f32 = 0.6;

pub fn build_view<A: AudioWidget>(controller: &PlaybackController<A>, surface: SurfaceSize) -> ViewTree<Control> {
    let controls = controller.visible_controls();
    let count = controls.len() as u32;
    let bar_size = Size::new(
        BUTTON_W * count + BUTTON_GAP * count.saturating_sub(1),
        BUTTON_H,
    );
    let bar = Rect::from_size(surface.width, surface.height)
        .inset(Insets::all(BAR_MARGIN))
        .place(bar_size, Anchor::BOTTOM_CENTER);

    let mut view = ViewTree::new();
    for (control, rect) in controls.into_iter().zip(bar.row(count, BUTTON_GAP)) {
        let label = match control {
            Control::Toggle => controller.toggle_label(),
            Control::Reset => "Reset",
        };
        view.push(ViewNode::Button(ButtonNode {
            rect,
            label: label.to_string(),
            action: control,
            enabled: true,
            focused: controller.focused() == control,
        }));
    }
    view
}

/// Maps emissive intensity to a displayed colour.
///
/// Low intensities fade the emissive hue in; high intensities push it towards white the way an
/// over-exposed bloom does.
pub fn glow_color(emissive: [u8; 3], intensity: f32) -> Color {
    let intensity = intensity.max(0.0);
    let lit = 1.0 - (-intensity * 0.5).exp();
    let hot = 1.0 - (-(intensity - 2.0).max(0.0) * 0.08).exp();
    let channel = |c: u8| {
        let base = c as f32 * lit;
        (base + (255.0 - base) * hot).round().clamp(0.0, 255.0) as u8
    };
    [channel(emissive[0]), channel(emissive[1]), channel(emissive[2]), 255]
}

/// Strength of the additive halo drawn behind a glyph.
pub fn halo_strength(intensity: f32) -> f32 {
    ((intensity - 1.0) * 0.02).clamp(0.0, 0.35)
}

pub fn draw_credits(scene: &Scene3d, camera: &Camera, gfx: &mut dyn Renderer2d) {
    let surface = gfx.size();
    gfx.clear(BACKGROUND);

    // Painter's order: farthest first.
    let mut objects: Vec<(Vec3, &TextObject)> = scene
        .objects()
        .filter(|(_, obj)| !obj.text.trim().is_empty())
        .map(|(id, obj)| (scene.world_position(id), obj))
        .collect();
    objects.sort_by(|a, b| a.0.z.total_cmp(&b.0.z));

    for (origin, obj) in objects {
        draw_text_object(origin, obj, camera, surface, gfx);
    }
}

fn draw_text_object(
    origin: Vec3,
    obj: &TextObject,
    camera: &Camera,
    surface: SurfaceSize,
    gfx: &mut dyn Renderer2d,
) {
    let color = glow_color(obj.emissive, obj.emissive_intensity);
    let halo = halo_strength(obj.emissive_intensity);
    let halo_color = [obj.emissive[0], obj.emissive[1], obj.emissive[2], 255];

    let scale = obj.local.scale;
    let (sin_r, cos_r) = obj.local.rotation_y.sin_cos();
    let chars: Vec<char> = obj.text.chars().collect();
    let center = (chars.len() as f32 - 1.0) * 0.5;
    let mut buf = [0u8; 4];

    for (i, ch) in chars.iter().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        // Glyphs sit along the object's local X axis, twisted about Y.
        let u = (i as f32 - center) * GLYPH_ADVANCE * scale;
        let world = Vec3::new(origin.x + u * cos_r, origin.y, origin.z - u * sin_r);
        let Some(p) = camera.project(world, surface) else {
            continue;
        };

        let px_scale = ((p.pixels_per_unit * scale) / GLYPH_H as f32).round().max(1.0) as u32;
        let w = GLYPH_W * px_scale;
        let h = GLYPH_H * px_scale;
        let (cx, cy) = (p.x.round() as i32, p.y.round() as i32);

        if halo > 0.0 {
            gfx.add_rect(Rect::centered_on(cx, cy, w * 3, h * 2), halo_color, halo);
        }

        let x = cx - (w / 2) as i32;
        let y = cy - (h / 2) as i32;
        if x < 0 || y < 0 || x as u32 >= surface.width || y as u32 >= surface.height {
            continue;
        }
        gfx.draw_text_scaled(x as u32, y as u32, ch.encode_utf8(&mut buf), color, px_scale);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingWidget;

    #[test]
    fn view_shows_both_controls_until_reset() {
        let mut controller = PlaybackController::new(RecordingWidget::default());
        let size = SurfaceSize::new(800, 600);

        let view = build_view(&controller, size);
        let labels: Vec<_> = view.buttons().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Roll Credits", "Reset"]);
        assert!(view.buttons().next().unwrap().focused);

        controller.reset();
        let view = build_view(&controller, size);
        let actions: Vec<_> = view.buttons().map(|b| b.action).collect();
        assert_eq!(actions, vec![Control::Toggle]);

        controller.toggle();
        let view = build_view(&controller, size);
        assert_eq!(view.buttons().next().unwrap().label, "Pause");
    }

    #[test]
    fn buttons_sit_at_the_bottom_inside_the_margin() {
        let controller = PlaybackController::new(RecordingWidget::default());
        let size = SurfaceSize::new(800, 600);
        for button in build_view(&controller, size).buttons() {
            assert_eq!(button.rect.y + button.rect.h, size.height - BAR_MARGIN);
            assert!(button.rect.x >= BAR_MARGIN);
        }
    }

    #[test]
    fn glow_color_brightens_with_intensity() {
        let emissive = [255, 0, 0];
        assert_eq!(glow_color(emissive, 0.0), [0, 0, 0, 255]);
        let dim = glow_color(emissive, 1.0);
        let bright = glow_color(emissive, 20.0);
        assert!(bright[0] > dim[0]);
        assert_eq!(dim[1], 0);
        assert!(bright[1] > 0, "strong glow should bleed towards white");
    }

    #[test]
    fn halo_only_above_unit_intensity() {
        assert_eq!(halo_strength(0.5), 0.0);
        assert_eq!(halo_strength(1.0), 0.0);
        assert!(halo_strength(11.0) > 0.0);
        assert!(halo_strength(1000.0) <= 0.35);
    }
}
