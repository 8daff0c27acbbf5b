use std::fs::File;
use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{event, terminal};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use zula::audio::AudioCues;
use zula::input::{HostInput, InputCapture, map_event};
use zula::render::Renderer;
use zula::scheduler::{Clock, FrameScheduler};
use zula::sound::SoundSystem;
use zula::sprite::Images;
use zula::terminal::TerminalSurface;
use zula::{Game, Settings, Tuning};

fn init_logging(settings: &Settings) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    // stderr would scribble over the alternate screen
    match File::create(&settings.log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("cannot open {}: {e}", settings.log_file.display()),
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    init_logging(&settings);
    info!("starting with {settings:?}");

    let images = match &settings.assets {
        Some(dir) => Images::load(dir),
        None => Images::builtin(),
    };
    // Kept alive for the whole run: dropping it stops every sink.
    let sound = match SoundSystem::open() {
        Ok(s) => Some(s),
        Err(e) => {
            warn!("{e}; running silent");
            None
        }
    };
    let cues = match &sound {
        Some(s) => s.cues(settings.assets.as_deref()),
        None => AudioCues::silent(),
    };

    let game = Game::new(Tuning::default(), Box::new(SmallRng::from_entropy()))
        .with_muted(settings.start_muted);

    let capture = InputCapture::acquire().context("failed to set up the terminal")?;
    let result = run(game, Renderer::new(images), cues, settings.fps);
    drop(capture);
    info!("bye");
    result
}

fn run(mut game: Game, renderer: Renderer, mut cues: AudioCues, fps: u32) -> anyhow::Result<()> {
    let mut out = stdout();
    let (cols, rows) = terminal::size().context("failed to read terminal size")?;
    let t = *game.tuning();
    let mut surface = TerminalSurface::new(cols, rows, t.field_width, t.field_height);

    let clock = Clock::start();
    let mut frames = FrameScheduler::new(fps);
    frames.request(Instant::now());
    let mut dirty = true;

    loop {
        // GameOver leaves nothing scheduled: block until the next input.
        let ready = match frames.time_until(Instant::now()) {
            Some(wait) => event::poll(wait)?,
            None => true,
        };
        if ready {
            loop {
                match map_event(&event::read()?) {
                    Some(HostInput::Quit) => {
                        frames.cancel();
                        return Ok(());
                    }
                    Some(HostInput::Resize(c, r)) => {
                        surface.resize(c, r);
                        dirty = true;
                    }
                    Some(HostInput::Game(action)) => {
                        let now = Instant::now();
                        let events = game.handle(action, clock.ms(now));
                        cues.dispatch(&events, &game);
                        if game.wants_frames() {
                            frames.request(now);
                        }
                        dirty = true;
                    }
                    None => {}
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        if frames.due(now) {
            let tick = game.tick(clock.ms(now));
            cues.dispatch(&tick.events, &game);
            if tick.schedule_next {
                frames.request(now);
            }
            dirty = true;
        }

        if dirty {
            renderer.draw(&game, &mut surface);
            surface.present(&mut out).context("failed to draw frame")?;
            dirty = false;
        }
    }
}
