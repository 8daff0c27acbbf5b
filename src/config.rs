//! Tuning constants and host settings.

use std::env;
use std::path::PathBuf;

// ── Field ───────────────────────────────────────────────────────────────────

pub const FIELD_WIDTH: f64 = 512.0;
pub const FIELD_HEIGHT: f64 = 512.0;

// ── Character ───────────────────────────────────────────────────────────────

pub const GRAVITY: f64 = 0.07;
pub const JUMP_STRENGTH: f64 = -3.0;
/// Proportion of field width.
pub const ZULA_START_X_FRACTION: f64 = 0.25;
/// Proportion of field height.
pub const ZULA_START_Y_FRACTION: f64 = 0.5;
pub const ZULA_WIDTH: f64 = 50.0;
pub const ZULA_HEIGHT: f64 = 40.0;

// ── Obstacles ───────────────────────────────────────────────────────────────

pub const OBSTACLE_WIDTH: f64 = 80.0;
pub const OBSTACLE_GAP: f64 = 215.0;
/// Pixels per tick.
pub const OBSTACLE_SPEED: f64 = 2.0;
/// Milliseconds between spawns.
pub const OBSTACLE_SPAWN_INTERVAL: f64 = 1500.0;
pub const MIN_OBSTACLE_HEIGHT_FRACTION: f64 = 0.15;
pub const MAX_OBSTACLE_HEIGHT_FRACTION: f64 = 0.65;
/// Minimum pixel height for any visible part of a tower.
pub const MIN_PIPE_VISIBLE_PX: f64 = 20.0;

// ── Sequencing ──────────────────────────────────────────────────────────────

/// Time between a collision and the game-over overlay.
pub const DEATH_DELAY_MS: f64 = 500.0;

pub const MUSIC_VOLUME: f32 = 0.35;
pub const EFFECT_VOLUME: f32 = 0.6;

/// Every number the simulation reads, bundled so a session can run on a
/// different field or at different speeds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub field_width: f64,
    pub field_height: f64,
    pub gravity: f64,
    pub jump_strength: f64,
    pub start_x_fraction: f64,
    pub start_y_fraction: f64,
    pub zula_width: f64,
    pub zula_height: f64,
    pub obstacle_width: f64,
    pub obstacle_gap: f64,
    pub obstacle_speed: f64,
    pub spawn_interval: f64,
    pub min_height_fraction: f64,
    pub max_height_fraction: f64,
    pub min_visible_px: f64,
    pub death_delay: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            start_x_fraction: ZULA_START_X_FRACTION,
            start_y_fraction: ZULA_START_Y_FRACTION,
            zula_width: ZULA_WIDTH,
            zula_height: ZULA_HEIGHT,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_gap: OBSTACLE_GAP,
            obstacle_speed: OBSTACLE_SPEED,
            spawn_interval: OBSTACLE_SPAWN_INTERVAL,
            min_height_fraction: MIN_OBSTACLE_HEIGHT_FRACTION,
            max_height_fraction: MAX_OBSTACLE_HEIGHT_FRACTION,
            min_visible_px: MIN_PIPE_VISIBLE_PX,
            death_delay: DEATH_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Fixed horizontal position of the character's center.
    pub fn zula_x(&self) -> f64 {
        self.field_width * self.start_x_fraction
    }

    pub fn zula_start_y(&self) -> f64 {
        self.field_height * self.start_y_fraction
    }
}

// ── Host settings ───────────────────────────────────────────────────────────

/// Options for the terminal host, read from the environment.
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory with sprite and audio files; `None` uses built-in assets.
    pub assets: Option<PathBuf>,
    pub start_muted: bool,
    pub fps: u32,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            assets: None,
            start_muted: false,
            fps: 60,
            log_file: PathBuf::from("zula-adventure.log"),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut s = Settings::default();
        if let Some(dir) = lookup("ZULA_ASSETS").filter(|d| !d.is_empty()) {
            s.assets = Some(PathBuf::from(dir));
        }
        if let Some(m) = lookup("ZULA_MUTED") {
            s.start_muted = matches!(m.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(fps) = lookup("ZULA_FPS").and_then(|f| f.trim().parse::<u32>().ok()) {
            s.fps = fps.clamp(10, 240);
        }
        if let Some(path) = lookup("ZULA_LOG").filter(|p| !p.is_empty()) {
            s.log_file = PathBuf::from(path);
        }
        s
    }
}
