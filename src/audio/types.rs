//! Transport trait, commands and the state shared with the audio thread.

use std::io;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// The audio peripheral as seen by the state machine.
pub trait Transport {
    /// Begin playing the file at catalog path `path`, replacing anything playing.
    fn start_file(&mut self, path: &str) -> Result<(), AudioError>;
    fn pause(&mut self, paused: bool);
    fn stop(&mut self);
    /// True once the current file has finished or nothing was started.
    fn is_stopped(&self) -> bool;
    /// Output volume, 0–100.
    fn set_volume(&mut self, volume: u8);
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),
    #[error("cannot open {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
    #[error("audio thread is gone")]
    Disconnected,
}

#[derive(Debug)]
pub(super) enum AudioCmd {
    /// Replace the current sink with `path`; the outcome goes back on `reply`.
    Start {
        path: PathBuf,
        reply: Sender<Result<(), AudioError>>,
    },
    Pause(bool),
    Stop,
    SetVolume(u8),
    Quit,
}

/// Transport state published by the audio thread.
#[derive(Debug, Clone)]
pub struct TransportInfo {
    pub path: Option<PathBuf>,
    pub paused: bool,
    pub stopped: bool,
    pub volume: u8,
}

impl Default for TransportInfo {
    fn default() -> Self {
        Self {
            path: None,
            paused: false,
            stopped: true,
            volume: 100,
        }
    }
}

pub type TransportHandle = Arc<Mutex<TransportInfo>>;
