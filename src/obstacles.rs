//! Scrolling towers: spawn timing, movement, scoring and pruning.

use log::debug;
use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::Tuning;
use crate::geometry::Rect;

/// Source of uniform samples in `[0, 1)`. Injected so tests can script the
/// gap positions.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for SmallRng {
    fn next_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// A top/bottom tower pair. `top_height` and the fixed gap determine both.
#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    pub x: f64,
    pub top_height: f64,
    pub scored: bool,
}

impl Obstacle {
    pub fn top_rect(&self, t: &Tuning) -> Rect {
        Rect::new(self.x, 0.0, t.obstacle_width, self.top_height)
    }

    pub fn bottom_rect(&self, t: &Tuning) -> Rect {
        let y = self.top_height + t.obstacle_gap;
        Rect::new(self.x, y, t.obstacle_width, (t.field_height - y).max(0.0))
    }

    pub fn trailing_edge(&self, t: &Tuning) -> f64 {
        self.x + t.obstacle_width
    }
}

/// The live towers of one session, oldest (leftmost) first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObstacleField {
    pub obstacles: Vec<Obstacle>,
    pub next_id: u32,
    /// `None` until the first spawn of the session.
    pub last_spawn: Option<f64>,
}

impl ObstacleField {
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Adds a tower at the right edge once the spawn interval has elapsed.
    /// The very first call of a session always spawns.
    pub fn maybe_spawn(mut self, now: f64, t: &Tuning, rng: &mut dyn RandomSource) -> Self {
        let due = match self.last_spawn {
            None => true,
            Some(last) => now - last > t.spawn_interval,
        };
        if !due {
            return self;
        }

        let (min, max) = spawn_range(t);
        let top_height = min + rng.next_unit() * (max - min);
        let id = self.next_id;
        debug!("spawn obstacle {id} top={top_height:.1} at {now:.0}ms");
        self.obstacles.push(Obstacle {
            id,
            x: t.field_width,
            top_height,
            scored: false,
        });
        self.next_id += 1;
        self.last_spawn = Some(now);
        self
    }

    /// Scrolls every tower left by `speed` and marks the ones whose trailing
    /// edge has just passed `zula_x`. Returns the ids scored this tick.
    pub fn advance(mut self, speed: f64, zula_x: f64, t: &Tuning) -> (Self, Vec<u32>) {
        let mut scored = Vec::new();
        for o in &mut self.obstacles {
            o.x -= speed;
            if !o.scored && o.x + t.obstacle_width < zula_x {
                o.scored = true;
                scored.push(o.id);
            }
        }
        (self, scored)
    }

    /// Drops towers that are entirely off the left edge.
    pub fn prune(mut self, t: &Tuning) -> Self {
        self.obstacles.retain(|o| o.trailing_edge(t) > 0.0);
        self
    }
}

/// Sampling interval for `top_height`. The nominal fraction range is clamped
/// so both towers keep `min_visible_px`; if that collapses, fall back to the
/// widest range that still keeps them, then to anything non-negative.
pub fn spawn_range(t: &Tuning) -> (f64, f64) {
    let h = t.field_height;
    let ceiling = h - t.obstacle_gap - t.min_visible_px;

    let min = (h * t.min_height_fraction).max(t.min_visible_px);
    let max = (h * t.max_height_fraction).min(ceiling);
    if min < max {
        return (min, max);
    }

    if t.min_visible_px < ceiling {
        return (t.min_visible_px, ceiling);
    }

    (0.0, (h - t.obstacle_gap).max(1.0))
}
