//! Zula's Adventure: a Flappy Bird style game about a cat.
//!
//! The simulation ([`game`], [`character`], [`obstacles`], [`geometry`]) is
//! host-independent. It is drawn through the [`render::Surface`] trait and
//! heard through [`audio::Clip`]; [`terminal`] and [`sound`] implement those
//! for a crossterm terminal and a rodio output device.

pub mod audio;
pub mod character;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod input;
pub mod obstacles;
pub mod render;
pub mod scheduler;
pub mod sound;
pub mod sprite;
pub mod terminal;

pub use config::{Settings, Tuning};
pub use game::{Game, GameEvent, Screen, TickOutcome};
pub use input::Action;
