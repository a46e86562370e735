use serde::{Deserialize, Serialize};

use crate::graphics::{Color, Renderer2d, line_advance_y, text_width};
use crate::ui::{Anchor, Rect, Size};

const BUTTON_FILL: Color = [24, 20, 28, 255];
const BUTTON_FILL_HOVER: Color = [44, 34, 48, 255];
const BUTTON_BORDER: Color = [120, 90, 110, 255];
const BUTTON_FOCUS: Color = [255, 200, 210, 255];
const BUTTON_TEXT: Color = [235, 230, 235, 255];
const BUTTON_TEXT_DISABLED: Color = [110, 105, 110, 255];
const BUTTON_TEXT_SCALE: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewTree<A> {
    pub nodes: Vec<ViewNode<A>>,
}

impl<A> Default for ViewTree<A> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<A> ViewTree<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: ViewNode<A>) {
        self.nodes.push(node);
    }

    pub fn buttons(&self) -> impl Iterator<Item = &ButtonNode<A>> {
        self.nodes.iter().map(|node| match node {
            ViewNode::Button(button) => button,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ViewNode<A> {
    Button(ButtonNode<A>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonNode<A> {
    pub rect: Rect,
    pub label: String,
    pub action: A,
    pub enabled: bool,
    pub focused: bool,
}

/// Pointer state for one frame, as collected by the event loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerInput {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
}

/// Returns the actions of enabled buttons under the pointer when it was released this frame,
/// topmost first.
pub fn hit_test_actions<A: Clone>(view: &ViewTree<A>, input: PointerInput) -> Vec<A> {
    if !input.mouse_up {
        return Vec::new();
    }
    let Some((mx, my)) = input.mouse_pos else {
        return Vec::new();
    };
    view.nodes
        .iter()
        .rev()
        .filter_map(|node| match node {
            ViewNode::Button(button) if button.enabled && button.rect.contains(mx, my) => {
                Some(button.action.clone())
            }
            _ => None,
        })
        .collect()
}

pub fn draw_view<A>(view: &ViewTree<A>, hover: Option<(u32, u32)>, gfx: &mut dyn Renderer2d) {
    for node in &view.nodes {
        match node {
            ViewNode::Button(button) => {
                let hovered = hover.is_some_and(|(x, y)| button.rect.contains(x, y));
                let fill = if hovered && button.enabled {
                    BUTTON_FILL_HOVER
                } else {
                    BUTTON_FILL
                };
                gfx.fill_rect(button.rect, fill);
                let border = if button.focused {
                    BUTTON_FOCUS
                } else {
                    BUTTON_BORDER
                };
                gfx.rect_outline(button.rect, border);

                let label_size = Size::new(
                    text_width(&button.label, BUTTON_TEXT_SCALE),
                    line_advance_y(BUTTON_TEXT_SCALE),
                );
                let label = button.rect.place(label_size, Anchor::CENTER);
                let color = if button.enabled {
                    BUTTON_TEXT
                } else {
                    BUTTON_TEXT_DISABLED
                };
                gfx.draw_text_scaled(label.x, label.y, &button.label, color, BUTTON_TEXT_SCALE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_buttons() -> ViewTree<u8> {
        let mut view = ViewTree::new();
        view.push(ViewNode::Button(ButtonNode {
            rect: Rect::new(0, 0, 10, 10),
            label: "A".to_string(),
            action: 1,
            enabled: true,
            focused: true,
        }));
        view.push(ViewNode::Button(ButtonNode {
            rect: Rect::new(20, 0, 10, 10),
            label: "B".to_string(),
            action: 2,
            enabled: false,
            focused: false,
        }));
        view
    }

    #[test]
    fn hit_test_requires_release_inside_enabled_button() {
        let view = two_buttons();
        let release_at = |x, y| PointerInput {
            mouse_pos: Some((x, y)),
            mouse_down: false,
            mouse_up: true,
        };

        assert_eq!(hit_test_actions(&view, release_at(5, 5)), vec![1]);
        assert!(hit_test_actions(&view, release_at(25, 5)).is_empty());
        assert!(
            hit_test_actions(
                &view,
                PointerInput {
                    mouse_pos: Some((5, 5)),
                    mouse_down: true,
                    mouse_up: false,
                }
            )
            .is_empty()
        );
    }
}
