//! The session state machine: Idle → Playing → Dying → GameOver → Playing.

use log::{debug, info, trace};

use crate::character::Character;
use crate::config::Tuning;
use crate::geometry::{below_field, rectangles_overlap, touches_ceiling};
use crate::input::Action;
use crate::obstacles::{ObstacleField, RandomSource};

pub const GAME_OVER_MESSAGES: [&str; 8] = [
    "Zula has decided this is a good place for a nap.",
    "Nine lives, minus one. Try again?",
    "The towers win this round. Zula demands a rematch.",
    "Zula is pretending that was on purpose.",
    "Ouch. Someone get this cat a treat.",
    "Gravity: 1, Zula: 0.",
    "Zula would like to speak to the architect of these towers.",
    "That was just a warm-up. Obviously.",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Idle,
    Playing,
    /// Frozen frame between a collision and the game-over overlay.
    Dying,
    GameOver,
}

/// Side effects for the audio dispatcher and host.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    /// Carries the new score.
    Scored(u32),
    Collided,
    ScreenChanged(Screen),
    MuteToggled(bool),
}

#[derive(Debug, Default, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    /// Whether the host should schedule another frame.
    pub schedule_next: bool,
}

pub struct Game {
    tuning: Tuning,
    screen: Screen,
    character: Character,
    obstacles: ObstacleField,
    score: u32,
    muted: bool,
    /// Armed on collision; the tick at or after this timestamp enters GameOver.
    game_over_at: Option<f64>,
    message: Option<&'static str>,
    rng: Box<dyn RandomSource>,
}

impl Game {
    pub fn new(tuning: Tuning, rng: Box<dyn RandomSource>) -> Self {
        Game {
            character: Character::spawn(&tuning),
            tuning,
            screen: Screen::Idle,
            obstacles: ObstacleField::default(),
            score: 0,
            muted: false,
            game_over_at: None,
            message: None,
            rng,
        }
    }

    pub fn with_muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    /// End-of-run message, chosen when GameOver is entered.
    pub fn message(&self) -> Option<&'static str> {
        self.message
    }

    /// Timestamp of the armed Dying → GameOver transition, if any.
    pub fn pending_game_over(&self) -> Option<f64> {
        self.game_over_at
    }

    /// False once GameOver is showing: the host may stop its frame loop
    /// until the next input.
    pub fn wants_frames(&self) -> bool {
        self.screen != Screen::GameOver
    }

    pub fn handle(&mut self, action: Action, now: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match action {
            Action::Jump => {
                match self.screen {
                    Screen::Playing => {}
                    Screen::Idle | Screen::Dying | Screen::GameOver => {
                        self.start_session(now);
                        events.push(GameEvent::ScreenChanged(Screen::Playing));
                    }
                }
                self.character = self.character.apply_jump_impulse(self.tuning.jump_strength);
                events.push(GameEvent::Jumped);
            }
            Action::ToggleMute => {
                self.muted = !self.muted;
                info!("sound {}", if self.muted { "muted" } else { "on" });
                events.push(GameEvent::MuteToggled(self.muted));
            }
        }
        events
    }

    pub fn tick(&mut self, now: f64) -> TickOutcome {
        let mut out = TickOutcome {
            events: Vec::new(),
            schedule_next: true,
        };
        match self.screen {
            Screen::Idle => {}
            Screen::Playing => self.step(now, &mut out.events),
            Screen::Dying => {
                if self.game_over_at.is_some_and(|at| now >= at) {
                    self.enter_game_over();
                    out.events.push(GameEvent::ScreenChanged(Screen::GameOver));
                    out.schedule_next = false;
                }
            }
            Screen::GameOver => out.schedule_next = false,
        }
        out
    }

    fn step(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        let t = self.tuning;
        self.character = self.character.advance(t.gravity, t.zula_height);
        let zula = self.character.rect(&t);
        trace!("tick {now:.0}ms y={:.2} vy={:.2}", self.character.y, self.character.vy);

        if below_field(&zula, t.field_height) {
            self.enter_dying(now, events);
        }
        if self.screen != Screen::Playing {
            return;
        }

        let field = std::mem::take(&mut self.obstacles).maybe_spawn(now, &t, self.rng.as_mut());
        let (field, scored) = field.advance(t.obstacle_speed, t.zula_x(), &t);
        for id in scored {
            self.score += 1;
            debug!("passed obstacle {id}, score {}", self.score);
            events.push(GameEvent::Scored(self.score));
        }
        self.obstacles = field.prune(&t);

        let hit = self.obstacles.iter().any(|o| {
            rectangles_overlap(&zula, &o.top_rect(&t)) || rectangles_overlap(&zula, &o.bottom_rect(&t))
        });
        if hit {
            self.enter_dying(now, events);
        }
        if touches_ceiling(&zula) {
            self.enter_dying(now, events);
        }
    }

    /// No-op unless Playing, so several hits in one tick collide once.
    fn enter_dying(&mut self, now: f64, events: &mut Vec<GameEvent>) {
        if self.screen != Screen::Playing {
            return;
        }
        info!("collision at score {}", self.score);
        self.screen = Screen::Dying;
        self.game_over_at = Some(now + self.tuning.death_delay);
        events.push(GameEvent::Collided);
        events.push(GameEvent::ScreenChanged(Screen::Dying));
    }

    fn enter_game_over(&mut self) {
        self.screen = Screen::GameOver;
        self.game_over_at = None;
        let n = GAME_OVER_MESSAGES.len();
        let i = ((self.rng.next_unit() * n as f64) as usize).min(n - 1);
        self.message = Some(GAME_OVER_MESSAGES[i]);
        info!("game over, final score {}", self.score);
    }

    fn start_session(&mut self, now: f64) {
        if self.game_over_at.take().is_some() {
            debug!("restart at {now:.0}ms cancelled pending game over");
        }
        self.character = Character::spawn(&self.tuning);
        self.obstacles = ObstacleField::default();
        self.score = 0;
        self.message = None;
        self.screen = Screen::Playing;
        info!("session started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacles::Obstacle;

    struct Constant(f64);

    impl RandomSource for Constant {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    fn game() -> Game {
        Game::new(Tuning::default(), Box::new(Constant(0.5)))
    }

    #[test]
    fn idle_ticks_do_nothing_but_keep_scheduling() {
        let mut g = game();
        let before = *g.character();
        let out = g.tick(16.0);
        assert_eq!(out, TickOutcome { events: vec![], schedule_next: true });
        assert_eq!(*g.character(), before);
        assert!(g.obstacles().is_empty());
    }

    #[test]
    fn first_jump_starts_and_jumps() {
        let mut g = game();
        let events = g.handle(Action::Jump, 10.0);
        assert_eq!(
            events,
            vec![GameEvent::ScreenChanged(Screen::Playing), GameEvent::Jumped]
        );
        assert_eq!(g.screen(), Screen::Playing);
        assert_eq!(g.character().vy, -3.0);
    }

    #[test]
    fn mute_persists_across_restart() {
        let mut g = game();
        assert_eq!(g.handle(Action::ToggleMute, 0.0), vec![GameEvent::MuteToggled(true)]);
        g.handle(Action::Jump, 0.0);
        g.screen = Screen::GameOver;
        g.handle(Action::Jump, 10.0);
        assert!(g.muted());
    }

    #[test]
    fn velocity_grows_by_gravity_while_playing() {
        let mut g = game();
        g.handle(Action::Jump, 0.0);
        let mut prev = g.character().vy;
        for i in 1..60 {
            g.tick(i as f64 * 16.0);
            assert_eq!(g.screen(), Screen::Playing);
            assert!((g.character().vy - prev - 0.07).abs() < 1e-9);
            prev = g.character().vy;
        }
    }

    #[test]
    fn simultaneous_hits_collide_once() {
        let mut g = game();
        g.handle(Action::Jump, 0.0);
        let x = g.tuning().zula_x() - 40.0;
        // two towers both closed over zula, the top one reaching past her
        g.obstacles = ObstacleField {
            obstacles: vec![
                Obstacle { id: 0, x, top_height: 400.0, scored: false },
                Obstacle { id: 1, x: x + 1.0, top_height: 400.0, scored: false },
            ],
            next_id: 2,
            last_spawn: Some(0.0),
        };
        let out = g.tick(16.0);
        let collisions = out.events.iter().filter(|e| **e == GameEvent::Collided).count();
        assert_eq!(collisions, 1);
        assert_eq!(g.screen(), Screen::Dying);

        let out = g.tick(32.0);
        assert!(out.events.is_empty());
        assert!(out.schedule_next);
    }

    #[test]
    fn dying_freezes_the_frame() {
        let mut g = game();
        g.handle(Action::Jump, 0.0);
        g.tick(16.0);
        let mut events = Vec::new();
        g.enter_dying(16.0, &mut events);
        let character = *g.character();
        let field = g.obstacles().clone();
        g.tick(100.0);
        g.tick(200.0);
        assert_eq!(*g.character(), character);
        assert_eq!(*g.obstacles(), field);
    }

    #[test]
    fn game_over_after_delay_stops_frames() {
        let mut g = game();
        g.handle(Action::Jump, 0.0);
        let mut events = Vec::new();
        g.enter_dying(1000.0, &mut events);
        assert_eq!(g.pending_game_over(), Some(1500.0));

        assert!(g.tick(1499.0).schedule_next);
        assert_eq!(g.screen(), Screen::Dying);

        let out = g.tick(1500.0);
        assert_eq!(out.events, vec![GameEvent::ScreenChanged(Screen::GameOver)]);
        assert!(!out.schedule_next);
        assert!(!g.wants_frames());
        assert_eq!(g.message(), Some(GAME_OVER_MESSAGES[4]));
        assert_eq!(g.pending_game_over(), None);
    }

    #[test]
    fn ceiling_contact_is_fatal() {
        let mut g = game();
        g.handle(Action::Jump, 0.0);
        g.character = Character { y: 21.0, vy: -5.0 };
        let out = g.tick(16.0);
        assert!(out.events.contains(&GameEvent::Collided));
        assert_eq!(g.character().y, 20.0);
    }
}
