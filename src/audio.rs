//! Maps game events to sound: one looping music track and three one-shots.

use log::warn;

use crate::config::{EFFECT_VOLUME, MUSIC_VOLUME};
use crate::error::AudioError;
use crate::game::{Game, GameEvent, Screen};

/// A loaded, playable sound.
pub trait Clip {
    /// Resumes from the current position.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    /// Back to the start; the next `play` begins from the top.
    fn rewind(&mut self);
    fn set_volume(&mut self, volume: f32);
    fn set_looping(&mut self, looping: bool);
}

pub type ClipSlot = Option<Box<dyn Clip>>;

pub struct AudioCues {
    music: ClipSlot,
    jump: ClipSlot,
    score: ClipSlot,
    collision: ClipSlot,
    music_playing: bool,
}

impl AudioCues {
    pub fn new(music: ClipSlot, jump: ClipSlot, score: ClipSlot, collision: ClipSlot) -> Self {
        let mut cues = AudioCues {
            music,
            jump,
            score,
            collision,
            music_playing: false,
        };
        if let Some(m) = cues.music.as_mut() {
            m.set_looping(true);
            m.set_volume(MUSIC_VOLUME);
        }
        for fx in [&mut cues.jump, &mut cues.score, &mut cues.collision] {
            if let Some(c) = fx.as_mut() {
                c.set_looping(false);
                c.set_volume(EFFECT_VOLUME);
            }
        }
        cues
    }

    pub fn silent() -> Self {
        AudioCues::new(None, None, None, None)
    }

    pub fn dispatch(&mut self, events: &[GameEvent], game: &Game) {
        for event in events {
            match event {
                GameEvent::Jumped => self.one_shot(Effect::Jump, game.muted()),
                GameEvent::Scored(_) => self.one_shot(Effect::Score, game.muted()),
                GameEvent::Collided => self.one_shot(Effect::Collision, game.muted()),
                GameEvent::MuteToggled(true) => self.pause_effects(),
                GameEvent::ScreenChanged(_) | GameEvent::MuteToggled(false) => {}
            }
        }
        if !events.is_empty() {
            self.sync_music(game.screen(), game.muted());
        }
    }

    /// Music runs only while Playing and unmuted. Pausing keeps its position.
    pub fn sync_music(&mut self, screen: Screen, muted: bool) {
        let want = screen == Screen::Playing && !muted;
        if want == self.music_playing {
            return;
        }
        let Some(music) = self.music.as_mut() else {
            return;
        };
        if want {
            match music.play() {
                Ok(()) => self.music_playing = true,
                Err(e) => warn!("background music: {e}"),
            }
        } else {
            music.pause();
            self.music_playing = false;
        }
    }

    fn one_shot(&mut self, which: Effect, muted: bool) {
        if muted {
            return;
        }
        let (name, slot) = match which {
            Effect::Jump => ("jump", &mut self.jump),
            Effect::Score => ("score", &mut self.score),
            Effect::Collision => ("collision", &mut self.collision),
        };
        if let Some(clip) = slot.as_mut() {
            clip.rewind();
            if let Err(e) = clip.play() {
                warn!("{name} sound: {e}");
            }
        }
    }

    fn pause_effects(&mut self) {
        for fx in [&mut self.jump, &mut self.score, &mut self.collision] {
            if let Some(c) = fx.as_mut() {
                c.pause();
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Effect {
    Jump,
    Score,
    Collision,
}
