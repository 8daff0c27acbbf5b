use crate::config::Tuning;
use crate::geometry::Rect;

/// Zula. Only the vertical axis is simulated; `x` comes from [`Tuning::zula_x`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Character {
    pub y: f64,
    pub vy: f64,
}

impl Character {
    pub fn spawn(t: &Tuning) -> Self {
        Character {
            y: t.zula_start_y(),
            vy: 0.0,
        }
    }

    /// One tick of gravity. Velocity is uncapped; position is clamped at the
    /// top only, so the box never rises above the field.
    pub fn advance(self, gravity: f64, zula_height: f64) -> Self {
        let vy = self.vy + gravity;
        Character {
            y: (self.y + vy).max(zula_height / 2.0),
            vy,
        }
    }

    /// Overwrites the velocity, it does not add to it.
    pub fn apply_jump_impulse(self, jump_strength: f64) -> Self {
        Character {
            vy: jump_strength,
            ..self
        }
    }

    pub fn rect(&self, t: &Tuning) -> Rect {
        Rect::centered(t.zula_x(), self.y, t.zula_width, t.zula_height)
    }
}
