use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure to load an image or sound. Never fatal: callers log it and fall
/// back to primitives or silence.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sprite line {line}: {reason}")]
    Sprite { line: usize, reason: String },
    #[error("cannot decode audio {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output: {0}")]
    NoDevice(String),
    #[error("playback rejected: {0}")]
    Rejected(String),
}
