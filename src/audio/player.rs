use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::warn;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioError, Transport, TransportHandle, TransportInfo};

/// [`Transport`] backed by a `rodio` output stream on its own thread.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    info: TransportHandle,
    root: PathBuf,
    settle: Duration,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    /// Spawn the audio thread and wait until it has opened the output device.
    ///
    /// Catalog paths handed to [`Transport::start_file`] are resolved under `root`.
    pub fn new(root: impl Into<PathBuf>, settle: Duration) -> Result<Self, AudioError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let info: TransportHandle = Arc::new(Mutex::new(TransportInfo::default()));

        let handle = spawn_audio_thread(rx, info.clone(), ready_tx);
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => return Err(AudioError::Disconnected),
        }

        Ok(Self {
            tx,
            info,
            root: root.into(),
            settle,
            join: Mutex::new(Some(handle)),
        })
    }

    /// Snapshot of what the audio thread last reported.
    pub fn info(&self) -> Option<TransportInfo> {
        self.info.lock().ok().map(|i| i.clone())
    }

    /// Host path for a catalog path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        resolve_under(&self.root, path)
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn quit(&self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }

    fn send(&self, cmd: AudioCmd) {
        if self.tx.send(cmd).is_err() {
            warn!("audio thread is gone, command dropped");
        }
    }
}

pub(super) fn resolve_under(root: &std::path::Path, path: &str) -> PathBuf {
    let relative = path.trim_start_matches('/');
    if relative.is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}

impl Transport for AudioPlayer {
    fn start_file(&mut self, path: &str) -> Result<(), AudioError> {
        let (reply, outcome) = mpsc::channel();
        self.tx
            .send(AudioCmd::Start {
                path: self.resolve(path),
                reply,
            })
            .map_err(|_| AudioError::Disconnected)?;
        outcome.recv().map_err(|_| AudioError::Disconnected)??;

        if !self.settle.is_zero() {
            thread::sleep(self.settle);
        }
        Ok(())
    }

    fn pause(&mut self, paused: bool) {
        self.send(AudioCmd::Pause(paused));
    }

    fn stop(&mut self) {
        self.send(AudioCmd::Stop);
    }

    fn is_stopped(&self) -> bool {
        match self.info.lock() {
            Ok(info) => info.stopped,
            Err(_) => true,
        }
    }

    fn set_volume(&mut self, volume: u8) {
        self.send(AudioCmd::SetVolume(volume));
    }
}
