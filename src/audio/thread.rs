use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use super::sink::{create_sink, gain};
use super::types::{AudioCmd, AudioError, TransportHandle};

/// How often the thread refreshes the shared info while idle.
const POLL: Duration = Duration::from_millis(50);

/// Spawn the thread that owns the output stream.
///
/// `ready` receives exactly one message: whether the output device opened.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    info: TransportHandle,
    ready: Sender<Result<(), AudioError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, "cannot open audio output");
                let _ = ready.send(Err(AudioError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped, which would land on the display
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut sink: Option<Sink> = None;
        let mut paused = false;
        let mut volume: u8 = 100;

        loop {
            match rx.recv_timeout(POLL) {
                Ok(AudioCmd::Start { path, reply }) => {
                    if let Some(old) = sink.take() {
                        old.stop();
                    }
                    let started = create_sink(&stream, &path, volume);
                    let outcome = match started {
                        Ok(new_sink) => {
                            debug!(path = %path.display(), "playback started");
                            sink = Some(new_sink);
                            paused = false;
                            if let Ok(mut i) = info.lock() {
                                i.path = Some(path);
                                i.paused = false;
                                i.stopped = false;
                            }
                            Ok(())
                        }
                        Err(e) => {
                            warn!(error = %e, "playback failed to start");
                            if let Ok(mut i) = info.lock() {
                                i.path = None;
                                i.stopped = true;
                            }
                            Err(e)
                        }
                    };
                    let _ = reply.send(outcome);
                }
                Ok(AudioCmd::Pause(p)) => {
                    if let Some(s) = sink.as_ref() {
                        if p {
                            s.pause();
                        } else {
                            s.play();
                        }
                        paused = p;
                        if let Ok(mut i) = info.lock() {
                            i.paused = p;
                        }
                    }
                }
                Ok(AudioCmd::Stop) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    paused = false;
                    if let Ok(mut i) = info.lock() {
                        i.path = None;
                        i.paused = false;
                        i.stopped = true;
                    }
                }
                Ok(AudioCmd::SetVolume(v)) => {
                    volume = v;
                    if let Some(s) = sink.as_ref() {
                        s.set_volume(gain(v));
                    }
                    if let Ok(mut i) = info.lock() {
                        i.volume = v;
                    }
                }
                Ok(AudioCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if sink_finished(sink.as_ref(), paused) {
                sink = None;
                if let Ok(mut i) = info.lock() {
                    i.stopped = true;
                }
            }
        }
    })
}

/// A sink counts as finished once it has drained while not paused.
pub(super) fn sink_finished(sink: Option<&Sink>, paused: bool) -> bool {
    sink.is_some_and(|s| !paused && s.empty())
}
