//! Layout primitives for the on-screen controls.
//!
//! Integer pixel rectangles plus anchored placement and row layout; everything saturates
//! instead of underflowing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_size(w: u32, h: u32) -> Self {
        Self { x: 0, y: 0, w, h }
    }

    /// A `w`x`h` rect centred on a possibly off-screen point, clipped at the top-left edge.
    pub fn centered_on(cx: i32, cy: i32, w: u32, h: u32) -> Self {
        let x0 = cx - (w / 2) as i32;
        let y0 = cy - (h / 2) as i32;
        let clip_x = (-x0).max(0) as u32;
        let clip_y = (-y0).max(0) as u32;
        Self {
            x: x0.max(0) as u32,
            y: y0.max(0) as u32,
            w: w.saturating_sub(clip_x),
            h: h.saturating_sub(clip_y),
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && px < self.x.saturating_add(self.w)
            && py >= self.y
            && py < self.y.saturating_add(self.h)
    }

    pub fn inset(&self, insets: Insets) -> Self {
        Self {
            x: self.x.saturating_add(insets.left),
            y: self.y.saturating_add(insets.top),
            w: self.w.saturating_sub(insets.left.saturating_add(insets.right)),
            h: self.h.saturating_sub(insets.top.saturating_add(insets.bottom)),
        }
    }

    /// Places a child of `size` inside this rect. Oversized children are clamped to fit.
    pub fn place(&self, size: Size, anchor: Anchor) -> Self {
        let w = size.w.min(self.w);
        let h = size.h.min(self.h);
        Self {
            x: self.x.saturating_add(anchor.h.offset(self.w - w)),
            y: self.y.saturating_add(anchor.v.offset(self.h - h)),
            w,
            h,
        }
    }

    /// Splits this rect into equally sized cells laid out left to right with `gap` between them.
    pub fn row(&self, cells: u32, gap: u32) -> Vec<Rect> {
        if cells == 0 {
            return Vec::new();
        }
        let gaps = gap.saturating_mul(cells - 1);
        let cell_w = self.w.saturating_sub(gaps) / cells;
        (0..cells)
            .map(|i| {
                Rect::new(
                    self.x.saturating_add(i * (cell_w + gap)),
                    self.y,
                    cell_w,
                    self.h,
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Insets {
    pub fn all(v: u32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl Align {
    fn offset(self, slack: u32) -> u32 {
        match self {
            Align::Start => 0,
            Align::Center => slack / 2,
            Align::End => slack,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub h: Align,
    pub v: Align,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        h: Align::Center,
        v: Align::Center,
    };
    pub const BOTTOM_CENTER: Anchor = Anchor {
        h: Align::Center,
        v: Align::End,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_bar_sits_inside_margin_at_bottom() {
        let bar = Rect::from_size(100, 80)
            .inset(Insets::all(10))
            .place(Size::new(20, 10), Anchor::BOTTOM_CENTER);
        assert_eq!(bar, Rect::new(40, 60, 20, 10));
    }

    #[test]
    fn oversized_child_is_clamped_to_parent() {
        let child = Rect::new(5, 5, 50, 40).place(Size::new(999, 999), Anchor::CENTER);
        assert_eq!(child, Rect::new(5, 5, 50, 40));
        assert_eq!(child.size(), Size::new(50, 40));
    }

    #[test]
    fn row_splits_with_gaps() {
        let cells = Rect::new(10, 5, 110, 20).row(2, 10);
        assert_eq!(cells, vec![Rect::new(10, 5, 50, 20), Rect::new(70, 5, 50, 20)]);
    }

    #[test]
    fn centered_on_clips_negative_origin() {
        assert_eq!(Rect::centered_on(1, 1, 6, 4), Rect::new(0, 0, 4, 3));
        assert_eq!(Rect::centered_on(10, 10, 6, 4), Rect::new(7, 8, 6, 4));
    }
}
