use std::collections::VecDeque;

use zula::game::GAME_OVER_MESSAGES;
use zula::geometry::{Rect, character_out_of_bounds};
use zula::obstacles::RandomSource;
use zula::render::{Font, Renderer, Rgb, Surface};
use zula::sprite::{Images, Sprite};
use zula::{Action, Game, GameEvent, Screen, Tuning};

/// Replays the given samples, then repeats the last one.
struct Script(VecDeque<f64>, f64);

impl Script {
    fn new(samples: &[f64]) -> Box<Self> {
        let last = samples.last().copied().unwrap_or(0.5);
        Box::new(Script(samples.iter().copied().collect(), last))
    }
}

impl RandomSource for Script {
    fn next_unit(&mut self) -> f64 {
        self.0.pop_front().unwrap_or(self.1)
    }
}

const FRAME: f64 = 1000.0 / 60.0;

fn playing(samples: &[f64]) -> Game {
    let mut g = Game::new(Tuning::default(), Script::new(samples));
    g.handle(Action::Jump, 0.0);
    g
}

/// Ticks until `pred` holds, jumping whenever zula sinks below `hover`.
fn run_until(
    g: &mut Game,
    t: &mut f64,
    hover: f64,
    mut pred: impl FnMut(&Game, &[GameEvent]) -> bool,
) {
    for _ in 0..20_000 {
        *t += FRAME;
        if g.screen() == Screen::Playing && g.character().y > hover {
            g.handle(Action::Jump, *t);
        }
        let out = g.tick(*t);
        if pred(g, &out.events) {
            return;
        }
    }
    panic!("condition never reached");
}

#[test]
fn first_jump_then_gravity() {
    let mut g = Game::new(Tuning::default(), Script::new(&[0.5]));
    assert_eq!(g.character().y, 256.0);
    assert_eq!(g.character().vy, 0.0);
    g.handle(Action::Jump, 0.0);
    g.tick(FRAME);
    assert!((g.character().vy - (-3.0 + 0.07)).abs() < 1e-9);
    assert!((g.character().y - (256.0 - 3.0 + 0.07)).abs() < 1e-9);
}

#[test]
fn falling_off_the_bottom_dies_once() {
    let mut g = playing(&[0.5]);
    let mut t = 0.0;
    let mut collisions = 0;
    let mut game_over_events = 0;
    for _ in 0..2000 {
        t += FRAME;
        let out = g.tick(t);
        collisions += out.events.iter().filter(|e| **e == GameEvent::Collided).count();
        game_over_events += out
            .events
            .iter()
            .filter(|e| **e == GameEvent::ScreenChanged(Screen::GameOver))
            .count();
        if !out.schedule_next {
            break;
        }
    }
    assert_eq!(collisions, 1);
    assert_eq!(game_over_events, 1);
    assert_eq!(g.screen(), Screen::GameOver);
    assert!(g.character().rect(g.tuning()).bottom() > 512.0);
}

#[test]
fn below_field_rect_is_out_of_bounds() {
    let r = Rect::new(103.0, 513.0, 50.0, 40.0);
    assert!(character_out_of_bounds(&r, 512.0));
}

#[test]
fn towers_score_exactly_once_each() {
    // every gap spans 177..392, which the hover band stays inside
    let mut g = playing(&[0.5]);
    let mut t = 0.0;
    let hover = 270.0;
    let mut scored = Vec::new();
    run_until(&mut g, &mut t, hover, |_, events| {
        for e in events {
            if let GameEvent::Scored(n) = e {
                scored.push(*n);
            }
        }
        scored.len() >= 3
    });
    assert_eq!(scored, vec![1, 2, 3]);
    assert_eq!(g.score(), 3);
    assert_eq!(g.screen(), Screen::Playing);

    let passed = g.obstacles().iter().filter(|o| o.scored).count();
    assert!(passed <= 3);
    for o in g.obstacles().iter() {
        assert!(o.x + 80.0 > 0.0, "pruned towers must be gone");
        assert!(o.top_height >= 20.0);
        assert!(512.0 - o.top_height - 215.0 >= 20.0);
    }
}

#[test]
fn obstacle_ids_are_monotonic_within_a_session() {
    let mut g = playing(&[0.5]);
    let mut t = 0.0;
    run_until(&mut g, &mut t, 270.0, |g, _| g.obstacles().next_id >= 4);
    let ids: Vec<u32> = g.obstacles().iter().map(|o| o.id).collect();
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn restart_inside_death_window_cancels_game_over() {
    let mut g = playing(&[0.5]);
    let mut t = 0.0;
    // earn a point so the reset is visible
    run_until(&mut g, &mut t, 270.0, |g, _| g.score() >= 1);
    // then stop jumping and fall
    let mut dying_at = None;
    for _ in 0..2000 {
        t += FRAME;
        let out = g.tick(t);
        if out.events.contains(&GameEvent::Collided) {
            dying_at = Some(t);
            break;
        }
    }
    let dying_at = dying_at.expect("zula never hit anything");
    assert_eq!(g.screen(), Screen::Dying);
    assert_eq!(g.pending_game_over(), Some(dying_at + 500.0));

    let events = g.handle(Action::Jump, dying_at + 100.0);
    assert_eq!(
        events,
        vec![GameEvent::ScreenChanged(Screen::Playing), GameEvent::Jumped]
    );
    assert_eq!(g.screen(), Screen::Playing);
    assert_eq!(g.score(), 0);
    assert!(g.obstacles().is_empty());
    assert_eq!(g.obstacles().next_id, 0);
    assert_eq!(g.pending_game_over(), None);

    // well past the old deadline: still playing, no stale GameOver
    for i in 1..=60 {
        let out = g.tick(dying_at + 100.0 + i as f64 * FRAME);
        assert!(!out.events.contains(&GameEvent::ScreenChanged(Screen::GameOver)));
    }
    assert_eq!(g.screen(), Screen::Playing);
}

#[test]
fn restart_from_game_over_resets_session() {
    let mut g = playing(&[0.5, 0.0]);
    let mut t = 0.0;
    loop {
        t += FRAME;
        if !g.tick(t).schedule_next {
            break;
        }
    }
    assert_eq!(g.screen(), Screen::GameOver);
    assert_eq!(g.message(), Some(GAME_OVER_MESSAGES[0]));
    assert!(g.tick(t + FRAME).events.is_empty());

    g.handle(Action::ToggleMute, t + 10.0);
    g.handle(Action::Jump, t + 20.0);
    assert_eq!(g.screen(), Screen::Playing);
    assert_eq!(g.character().y, 256.0);
    assert_eq!(g.character().vy, -3.0);
    assert_eq!(g.message(), None);
    assert!(g.muted());
    assert!(g.wants_frames());
}

// ── Rendering ───────────────────────────────────────────────────────────────

#[derive(Debug, PartialEq)]
enum Cmd {
    Fill(Rect),
    Blend,
    Stroke(Rect),
    Image(Rect),
    Text(String),
}

#[derive(Default)]
struct Recording(Vec<Cmd>);

impl Surface for Recording {
    fn fill_rect(&mut self, r: Rect, _: Rgb) {
        self.0.push(Cmd::Fill(r));
    }
    fn blend_rect(&mut self, _: Rect, _: Rgb, _: f64) {
        self.0.push(Cmd::Blend);
    }
    fn stroke_rect(&mut self, r: Rect, _: Rgb, _: f64) {
        self.0.push(Cmd::Stroke(r));
    }
    fn draw_image(&mut self, _: &Sprite, dest: Rect) {
        self.0.push(Cmd::Image(dest));
    }
    fn fill_text(&mut self, text: &str, _: f64, _: f64, _: Font, _: Rgb) {
        self.0.push(Cmd::Text(text.to_string()));
    }
    fn measure_text(&self, text: &str, font: Font) -> f64 {
        text.chars().count() as f64 * font.size * 0.6
    }
}

impl Recording {
    fn texts(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter_map(|c| match c {
                Cmd::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn idle_screen_shows_title_prompt_and_sound() {
    let g = Game::new(Tuning::default(), Script::new(&[0.5]));
    let mut s = Recording::default();
    Renderer::new(Images::builtin()).draw(&g, &mut s);
    let texts = s.texts();
    assert!(texts.contains(&"Zula's Adventure"));
    assert!(texts.contains(&"Click or press Space to start"));
    assert!(texts.contains(&"Sound: on (M)"));
    assert!(s.0.iter().any(|c| matches!(c, Cmd::Image(r) if r.w == 100.0 && r.h == 80.0)));
}

#[test]
fn missing_images_fall_back_to_blocks_and_glyph() {
    let mut g = playing(&[0.5]);
    g.tick(FRAME);
    let mut s = Recording::default();
    Renderer::new(Images::none()).draw(&g, &mut s);
    assert!(!s.0.iter().any(|c| matches!(c, Cmd::Image(_))));
    let zula = g.character().rect(g.tuning());
    assert!(s.0.contains(&Cmd::Fill(zula)));
    assert!(s.texts().contains(&"?"));
    let o = g.obstacles().iter().next().expect("one tower spawned");
    assert!(s.0.contains(&Cmd::Stroke(o.top_rect(g.tuning()))));
    assert!(s.0.contains(&Cmd::Stroke(o.bottom_rect(g.tuning()))));
}

#[test]
fn playing_frame_has_score_and_scanlines() {
    let mut g = playing(&[0.5]);
    g.tick(FRAME);
    let mut s = Recording::default();
    Renderer::new(Images::builtin()).draw(&g, &mut s);
    assert!(s.texts().contains(&"0"));
    let scanlines = s.0.iter().filter(|c| **c == Cmd::Blend).count();
    assert_eq!(scanlines, 128);
    // background, then two towers and zula as images
    assert_eq!(s.0[0], Cmd::Fill(Rect::new(0.0, 0.0, 512.0, 512.0)));
    let images = s.0.iter().filter(|c| matches!(c, Cmd::Image(_))).count();
    assert_eq!(images, 3);
}

#[test]
fn game_over_screen_wraps_message_and_shows_score() {
    let mut g = playing(&[0.5, 0.75]);
    let mut t = 0.0;
    loop {
        t += FRAME;
        if !g.tick(t).schedule_next {
            break;
        }
    }
    let mut s = Recording::default();
    Renderer::new(Images::builtin()).draw(&g, &mut s);
    let texts = s.texts();
    assert!(texts.contains(&"Game Over"));
    assert!(texts.contains(&"Score: 0"));
    assert!(texts.contains(&"Click or press Space to restart"));

    let message = g.message().expect("message picked");
    assert_eq!(message, GAME_OVER_MESSAGES[6]);
    let words: Vec<&str> = message.split_whitespace().collect();
    let wrapped: Vec<&str> = texts
        .iter()
        .copied()
        .filter(|t| words.iter().any(|w| t.split_whitespace().next() == Some(*w)))
        .collect();
    assert!(wrapped.len() >= 2, "long message should wrap: {wrapped:?}");
    assert_eq!(wrapped.join(" "), message);
}
