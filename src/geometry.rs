//! Axis-aligned rectangle tests.

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    /// Rectangle of size `w`×`h` centered on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Rect::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// True when the projections overlap on both axes. Shared edges do not count.
pub fn rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
}

/// Top edge above the field or bottom edge below it. Horizontal edges are
/// never checked: the character does not move sideways.
pub fn character_out_of_bounds(character: &Rect, field_height: f64) -> bool {
    character.y < 0.0 || character.bottom() > field_height
}

/// Top edge touching or above the top of the field.
pub fn touches_ceiling(character: &Rect) -> bool {
    character.y <= 0.0
}

/// Entirely under the bottom of the field.
pub fn below_field(character: &Rect, field_height: f64) -> bool {
    character.bottom() > field_height
}
