//! A [`Surface`] made of half-block terminal cells.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::geometry::Rect;
use crate::render::{Align, BLACK, Baseline, Font, Rgb, Surface};
use crate::sprite::Sprite;

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![BLACK; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, BLACK);
    }

    pub fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if self.in_bounds(x, y) {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut prev_fg = None;
        let mut prev_bg = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if prev_bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(term_color(bot)))?;
                    prev_bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                } else {
                    if prev_fg != Some(top) {
                        queue!(out, style::SetForegroundColor(term_color(top)))?;
                        prev_fg = Some(top);
                    }
                    queue!(out, style::Print('\u{2580}'))?; // ▀
                }
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                prev_fg = None;
                prev_bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn term_color(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

/// Rows top to bottom, bit 2 is the left column.
#[rustfmt::skip]
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ' ' => [0; 5],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        _ => [0b110, 0b001, 0b010, 0b000, 0b010], // ?
    }
}

// ── Surface ─────────────────────────────────────────────────────────────────

/// Letterboxes a `field_w`×`field_h` field into the largest area of the
/// terminal that keeps pixels square.
pub struct TerminalSurface {
    buf: PixelBuf,
    field_w: f64,
    field_h: f64,
    scale: f64,
    ox: f64,
    oy: f64,
    clip: (i32, i32, i32, i32),
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, field_w: f64, field_h: f64) -> Self {
        let mut s = TerminalSurface {
            buf: PixelBuf::new(0, 0),
            field_w,
            field_h,
            scale: 1.0,
            ox: 0.0,
            oy: 0.0,
            clip: (0, 0, 0, 0),
        };
        s.resize(cols, rows);
        s
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (pw, ph) = (cols as usize, rows as usize * 2);
        self.buf.resize(pw, ph);
        self.scale = (pw as f64 / self.field_w).min(ph as f64 / self.field_h);
        self.ox = ((pw as f64 - self.field_w * self.scale) / 2.0).floor();
        self.oy = ((ph as f64 - self.field_h * self.scale) / 2.0).floor();
        let (x0, y0) = (self.ox as i32, self.oy as i32);
        self.clip = (
            x0,
            y0,
            x0 + (self.field_w * self.scale).round() as i32,
            y0 + (self.field_h * self.scale).round() as i32,
        );
    }

    /// Pixel size of one field unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.buf.get(x, y)
    }

    pub fn present(&mut self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)?;
        self.buf.clear(BLACK);
        Ok(())
    }

    fn px_x(&self, x: f64) -> i32 {
        (self.ox + x * self.scale).round() as i32
    }

    fn px_y(&self, y: f64) -> i32 {
        (self.oy + y * self.scale).round() as i32
    }

    fn plot(&mut self, x: i32, y: i32, c: Rgb) {
        let (x0, y0, x1, y1) = self.clip;
        if x >= x0 && x < x1 && y >= y0 && y < y1 {
            self.buf.set(x, y, c);
        }
    }

    fn span(&self, r: Rect) -> (i32, i32, i32, i32) {
        (self.px_x(r.x), self.px_y(r.y), self.px_x(r.right()), self.px_y(r.bottom()))
    }

    fn fill_px(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.plot(x, y, c);
            }
        }
    }

    fn glyph_scale(&self, font: Font) -> i32 {
        ((font.size * self.scale * 0.7 / 5.0).round() as i32).max(1)
    }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, r: Rect, color: Rgb) {
        let (x0, y0, x1, y1) = self.span(r);
        self.fill_px(x0, y0, x1, y1, color);
    }

    fn blend_rect(&mut self, r: Rect, color: Rgb, alpha: f64) {
        let (x0, y0, x1, y1) = self.span(r);
        // Thin rules (scanlines) must cover at least one pixel row.
        let y1 = y1.max(y0 + 1);
        let t = (alpha.clamp(0.0, 1.0) * 256.0) as u16;
        let (cx0, cy0, cx1, cy1) = self.clip;
        for y in y0.max(cy0)..y1.min(cy1) {
            for x in x0.max(cx0)..x1.min(cx1) {
                let under = self.buf.get(x as usize, y as usize);
                self.buf.set(x, y, Rgb::lerp(under, color, t));
            }
        }
    }

    fn stroke_rect(&mut self, r: Rect, color: Rgb, line_width: f64) {
        let (x0, y0, x1, y1) = self.span(r);
        let lw = ((line_width * self.scale).round() as i32).max(1);
        self.fill_px(x0, y0, x1, y0 + lw, color);
        self.fill_px(x0, y1 - lw, x1, y1, color);
        self.fill_px(x0, y0, x0 + lw, y1, color);
        self.fill_px(x1 - lw, y0, x1, y1, color);
    }

    fn draw_image(&mut self, image: &Sprite, dest: Rect) {
        let (x0, y0, x1, y1) = self.span(dest);
        let (w, h) = (x1 - x0, y1 - y0);
        if w <= 0 || h <= 0 {
            return;
        }
        for dy in 0..h {
            let sy = dy as usize * image.h / h as usize;
            for dx in 0..w {
                let sx = dx as usize * image.w / w as usize;
                if let Some(c) = image.get(sx, sy) {
                    self.plot(x0 + dx, y0 + dy, c);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: Font, color: Rgb) {
        let k = self.glyph_scale(font);
        let n = text.chars().count() as i32;
        if n == 0 {
            return;
        }
        let width = n * 4 * k - k;
        let left = match font.align {
            Align::Left => self.px_x(x),
            Align::Center => self.px_x(x) - width / 2,
            Align::Right => self.px_x(x) - width,
        };
        let top = match font.baseline {
            Baseline::Top => self.px_y(y),
            Baseline::Middle => self.px_y(y) - 5 * k / 2,
            Baseline::Bottom => self.px_y(y) - 5 * k,
        };
        for (i, ch) in text.chars().enumerate() {
            let gx = left + i as i32 * 4 * k;
            for (row, bits) in glyph(ch).iter().enumerate() {
                for col in 0..3 {
                    if bits & (0b100 >> col) != 0 {
                        let px = gx + col * k;
                        let py = top + row as i32 * k;
                        self.fill_px(px, py, px + k, py + k, color);
                    }
                }
            }
        }
    }

    fn measure_text(&self, text: &str, font: Font) -> f64 {
        let n = text.chars().count() as i32;
        if n == 0 {
            return 0.0;
        }
        let k = self.glyph_scale(font);
        (n * 4 * k - k) as f64 / self.scale
    }
}
