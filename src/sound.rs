//! rodio playback with effects synthesized by fundsp or decoded from files.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use fundsp::prelude::*;
use log::{info, warn};
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source, buffer::SamplesBuffer};

use crate::audio::{AudioCues, Clip, ClipSlot};
use crate::error::{AssetError, AudioError};

const SAMPLE_RATE: u32 = 44100;

/// Decoded or synthesized samples, replayable from the start.
#[derive(Clone, Debug)]
pub struct Pcm {
    pub channels: u16,
    pub rate: u32,
    pub data: Vec<f32>,
}

impl Pcm {
    fn mono(data: Vec<f32>) -> Self {
        Pcm {
            channels: 1,
            rate: SAMPLE_RATE,
            data,
        }
    }

    pub fn decode(path: &Path) -> Result<Self, AssetError> {
        let file = File::open(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| AssetError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let channels = decoder.channels();
        let rate = decoder.sample_rate();
        let data: Vec<f32> = decoder.collect();
        if data.is_empty() {
            return Err(AssetError::Decode {
                path: path.to_path_buf(),
                reason: "no samples".into(),
            });
        }
        Ok(Pcm {
            channels,
            rate,
            data,
        })
    }

    pub fn duration_secs(&self) -> f32 {
        self.data.len() as f32 / (self.channels as f32 * self.rate as f32)
    }
}

// ── Sounds ──────────────────────────────────────────────────────────────────

/// Drives `osc` (a node with a frequency input) sample by sample.
fn synth(
    mut osc: Box<dyn AudioUnit>,
    secs: f32,
    freq: impl Fn(f32) -> f32,
    gain: impl Fn(f32) -> f32,
) -> Vec<f32> {
    osc.set_sample_rate(SAMPLE_RATE as f64);
    let n = (SAMPLE_RATE as f32 * secs) as usize;
    let mut out = [0.0f32];
    (0..n)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE as f32;
            osc.tick(&[freq(t)], &mut out);
            out[0] * gain(t)
        })
        .collect()
}

/// Falling sawtooth, 400Hz to 80Hz over 0.4s.
pub fn collision_sound() -> Pcm {
    Pcm::mono(synth(
        Box::new(saw()),
        0.5,
        |t| lerp(400.0, 80.0, (t / 0.4).min(1.0)),
        |t| lerp(0.15, 0.0, (t / 0.5).min(1.0)),
    ))
}

/// Short rising square chirp.
pub fn jump_sound() -> Pcm {
    Pcm::mono(synth(
        Box::new(square()),
        0.12,
        |t| lerp(300.0, 700.0, t / 0.12),
        |t| lerp(0.08, 0.0, t / 0.12),
    ))
}

/// Two-note ding.
pub fn score_sound() -> Pcm {
    Pcm::mono(synth(
        Box::new(sine::<f32>()),
        0.25,
        |t| if t < 0.08 { 988.0 } else { 1319.0 },
        |t| 0.2 * (1.0 - t / 0.25),
    ))
}

/// Eight-note arpeggio, looped by the music clip.
pub fn music_loop() -> Pcm {
    const NOTES: [f32; 8] = [60.0, 64.0, 67.0, 72.0, 69.0, 67.0, 64.0, 62.0];
    const STEP: f32 = 0.2;
    Pcm::mono(synth(
        Box::new(triangle()),
        STEP * NOTES.len() as f32,
        |t| midi_hz(NOTES[Ord::min((t / STEP) as usize, NOTES.len() - 1)]),
        |t| 0.12 * (1.0 - (t % STEP) / STEP).powi(2),
    ))
}

// ── Clips ───────────────────────────────────────────────────────────────────

/// One sink per sound so effects overlap instead of queueing.
pub struct SinkClip {
    sink: Sink,
    pcm: Pcm,
    looping: bool,
}

impl SinkClip {
    fn load(&mut self) {
        let buf = SamplesBuffer::new(self.pcm.channels, self.pcm.rate, self.pcm.data.clone());
        if self.looping {
            self.sink.append(buf.repeat_infinite());
        } else {
            self.sink.append(buf);
        }
    }
}

impl Clip for SinkClip {
    fn play(&mut self) -> Result<(), AudioError> {
        if self.sink.empty() {
            self.load();
        }
        self.sink.play();
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn rewind(&mut self) {
        // clear() also pauses; play() reloads from the top.
        self.sink.clear();
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn set_looping(&mut self, looping: bool) {
        if self.looping != looping {
            self.looping = looping;
            self.sink.clear();
        }
    }
}

pub struct SoundSystem {
    stream: OutputStream,
}

impl SoundSystem {
    pub fn open() -> Result<Self, AudioError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::NoDevice(e.to_string()))?;
        stream.log_on_drop(false);
        Ok(SoundSystem { stream })
    }

    pub fn clip(&self, pcm: Pcm) -> SinkClip {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        SinkClip {
            sink,
            pcm,
            looping: false,
        }
    }

    /// With `assets`, decodes the four clips from files and leaves any that
    /// fail silent. Without, synthesizes them.
    pub fn cues(&self, assets: Option<&Path>) -> AudioCues {
        let slot = |name: &str, loaded: Result<Pcm, AssetError>| -> ClipSlot {
            match loaded {
                Ok(pcm) => {
                    info!("{name} sound: {:.2}s", pcm.duration_secs());
                    Some(Box::new(self.clip(pcm)))
                }
                Err(e) => {
                    warn!("{name} sound unavailable, staying silent: {e}");
                    None
                }
            }
        };
        match assets {
            Some(dir) => AudioCues::new(
                slot("background", Pcm::decode(&dir.join("background.ogg"))),
                slot("jump", Pcm::decode(&dir.join("jump.wav"))),
                slot("score", Pcm::decode(&dir.join("score.wav"))),
                slot("collision", Pcm::decode(&dir.join("collision.wav"))),
            ),
            None => AudioCues::new(
                slot("background", Ok(music_loop())),
                slot("jump", Ok(jump_sound())),
                slot("score", Ok(score_sound())),
                slot("collision", Ok(collision_sound())),
            ),
        }
    }
}
