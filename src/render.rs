//! Draws a [`Game`] onto any [`Surface`]. Reads state, never changes it.

use crate::game::{Game, Screen};
use crate::geometry::Rect;
use crate::sprite::{Images, Sprite};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }
}

pub const SKY: Rgb = Rgb(70, 180, 200);
pub const SKY_IDLE: Rgb = Rgb(40, 46, 92);
pub const TOWER: Rgb = Rgb(100, 170, 40);
pub const TOWER_EDGE: Rgb = Rgb(60, 100, 20);
pub const ZULA_FALLBACK: Rgb = Rgb(242, 154, 56);
pub const PANEL: Rgb = Rgb(220, 195, 120);
pub const PANEL_EDGE: Rgb = Rgb(120, 84, 40);
pub const GOLD: Rgb = Rgb(245, 200, 66);
pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const INK: Rgb = Rgb(45, 30, 20);
pub const SHADOW: Rgb = Rgb(30, 30, 30);
pub const BLACK: Rgb = Rgb(0, 0, 0);

// ── Surface ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Baseline {
    Top,
    Middle,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    /// Height in field units.
    pub size: f64,
    pub align: Align,
    pub baseline: Baseline,
}

impl Font {
    pub const fn centered(size: f64) -> Self {
        Font {
            size,
            align: Align::Center,
            baseline: Baseline::Middle,
        }
    }
}

/// A 2D raster target addressed in field coordinates.
pub trait Surface {
    fn fill_rect(&mut self, r: Rect, color: Rgb);
    /// Mixes `color` over what is already drawn; `alpha` in `[0, 1]`.
    fn blend_rect(&mut self, r: Rect, color: Rgb, alpha: f64);
    fn stroke_rect(&mut self, r: Rect, color: Rgb, line_width: f64);
    fn draw_image(&mut self, image: &Sprite, dest: Rect);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgb);
    fn measure_text(&self, text: &str, font: Font) -> f64;
}

/// Greedy word wrap. A word wider than `max_width` gets a line to itself.
pub fn wrap_text(s: &dyn Surface, text: &str, font: Font, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if s.measure_text(&candidate, font) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct Renderer {
    images: Images,
}

impl Renderer {
    pub fn new(images: Images) -> Self {
        Renderer { images }
    }

    pub fn draw(&self, game: &Game, s: &mut dyn Surface) {
        match game.screen() {
            Screen::Idle => self.draw_idle(game, s),
            Screen::Playing | Screen::Dying => self.draw_field(game, s),
            Screen::GameOver => {
                self.draw_field(game, s);
                self.draw_game_over(game, s);
            }
        }
    }

    fn draw_idle(&self, game: &Game, s: &mut dyn Surface) {
        let t = game.tuning();
        let (w, h) = (t.field_width, t.field_height);
        let cx = w / 2.0;
        s.fill_rect(Rect::new(0.0, 0.0, w, h), SKY_IDLE);

        s.fill_text("Zula's Adventure", cx + 2.0, h * 0.2 + 2.0, Font::centered(40.0), SHADOW);
        s.fill_text("Zula's Adventure", cx, h * 0.2, Font::centered(40.0), GOLD);

        let hero = Rect::centered(cx, h * 0.45, t.zula_width * 2.0, t.zula_height * 2.0);
        self.draw_zula(s, hero);

        s.fill_text("Click or press Space to start", cx, h * 0.7, Font::centered(18.0), WHITE);
        draw_mute_status(game, s, h * 0.9);
    }

    fn draw_field(&self, game: &Game, s: &mut dyn Surface) {
        let t = game.tuning();
        let (w, h) = (t.field_width, t.field_height);
        s.fill_rect(Rect::new(0.0, 0.0, w, h), SKY);

        for o in game.obstacles().iter() {
            draw_tower(s, self.images.tower_top.as_ref(), o.top_rect(t));
            draw_tower(s, self.images.tower_bottom.as_ref(), o.bottom_rect(t));
        }

        self.draw_zula(s, game.character().rect(t));

        let score = game.score().to_string();
        let font = Font {
            size: 36.0,
            align: Align::Center,
            baseline: Baseline::Top,
        };
        s.fill_text(&score, w / 2.0 + 2.0, 22.0, font, SHADOW);
        s.fill_text(&score, w / 2.0, 20.0, font, WHITE);

        draw_scanlines(s, w, h);
    }

    fn draw_game_over(&self, game: &Game, s: &mut dyn Surface) {
        let t = game.tuning();
        let (w, h) = (t.field_width, t.field_height);
        let cx = w / 2.0;
        s.blend_rect(Rect::new(0.0, 0.0, w, h), BLACK, 0.55);

        let panel = Rect::centered(cx, h / 2.0, w * 0.8, h * 0.55);
        s.fill_rect(panel, PANEL);
        s.stroke_rect(panel, PANEL_EDGE, 4.0);

        let mut y = panel.y + 40.0;
        s.fill_text("Game Over", cx, y, Font::centered(32.0), PANEL_EDGE);
        y += 44.0;

        let body = Font::centered(16.0);
        let message = game.message().unwrap_or("");
        for line in wrap_text(s, message, body, panel.w - 40.0) {
            s.fill_text(&line, cx, y, body, INK);
            y += body.size * 1.4;
        }

        s.fill_text(
            &format!("Score: {}", game.score()),
            cx,
            panel.bottom() - 70.0,
            Font::centered(24.0),
            INK,
        );
        s.fill_text(
            "Click or press Space to restart",
            cx,
            panel.bottom() - 30.0,
            Font::centered(14.0),
            PANEL_EDGE,
        );
        draw_mute_status(game, s, h * 0.92);
    }

    fn draw_zula(&self, s: &mut dyn Surface, r: Rect) {
        match &self.images.zula {
            Some(sprite) => s.draw_image(sprite, r),
            None => {
                s.fill_rect(r, ZULA_FALLBACK);
                s.fill_text("?", r.x + r.w / 2.0, r.y + r.h / 2.0, Font::centered(r.h * 0.6), INK);
            }
        }
    }
}

fn draw_tower(s: &mut dyn Surface, sprite: Option<&Sprite>, r: Rect) {
    if r.h <= 0.0 {
        return;
    }
    match sprite {
        Some(sprite) => s.draw_image(sprite, r),
        None => {
            s.fill_rect(r, TOWER);
            s.stroke_rect(r, TOWER_EDGE, 2.0);
        }
    }
}

fn draw_scanlines(s: &mut dyn Surface, w: f64, h: f64) {
    let mut y = 0.0;
    while y < h {
        s.blend_rect(Rect::new(0.0, y, w, 1.0), BLACK, 0.12);
        y += 4.0;
    }
}

fn draw_mute_status(game: &Game, s: &mut dyn Surface, y: f64) {
    let label = if game.muted() {
        "Sound: off (M)"
    } else {
        "Sound: on (M)"
    };
    s.fill_text(label, game.tuning().field_width / 2.0, y, Font::centered(14.0), WHITE);
}
