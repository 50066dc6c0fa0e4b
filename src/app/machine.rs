//! State transitions. Each `on_*` handler runs one tick of its state and
//! returns the state for the next tick.

use tracing::{debug, info, warn};

use crate::audio::{AudioError, Transport};
use crate::library::{Storage, ensure_loaded};
use crate::ui::Display;

use super::input::{Button, ButtonSet, Inputs, volume_from_level};
use super::model::{App, Overlay, PlayerState};

/// The collaborators a tick may drive.
pub struct Peripherals<'a> {
    pub storage: &'a dyn Storage,
    pub transport: &'a mut dyn Transport,
    pub display: &'a mut dyn Display,
}

/// Which song of a newly entered album to start on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StartAt {
    First,
    Last,
}

impl App {
    /// Leave `Initializing`: show the splash and start browsing.
    pub fn boot(&mut self, now_ms: u64, display: &mut dyn Display) {
        if self.state != PlayerState::Initializing {
            return;
        }
        info!(albums = self.catalog.len(), "ready");
        self.overlay = Some((Overlay::Splash, now_ms.saturating_add(self.settings.ui.splash_ms)));
        self.state = PlayerState::Idle;
        self.render(now_ms, display);
    }

    /// Enter `Error` for good.
    pub fn fail(&mut self, message: impl Into<String>, display: &mut dyn Display) {
        let message = message.into();
        warn!(%message, "entering error state");
        self.cursor.clear_song();
        self.overlay = None;
        self.error = Some(message);
        self.state = PlayerState::Error;
        self.render(0, display);
    }

    /// One loop iteration: apply the controls, run the current state, draw.
    pub fn tick(&mut self, now_ms: u64, inputs: Inputs, io: &mut Peripherals<'_>) {
        if matches!(self.state, PlayerState::Initializing | PlayerState::Error) {
            self.render(now_ms, io.display);
            return;
        }

        if self.autoplay != inputs.autoplay {
            debug!(autoplay = inputs.autoplay, "autoplay toggled");
            self.autoplay = inputs.autoplay;
        }
        let volume = volume_from_level(inputs.knob);
        if self.volume != Some(volume) {
            io.transport.set_volume(volume);
            self.volume = Some(volume);
        }

        let buttons = inputs.buttons;
        let previous = self.state;
        let mut next = match self.state {
            PlayerState::Idle => self.on_idle(now_ms, buttons, io),
            PlayerState::Playing => self.on_playing(now_ms, buttons, io),
            PlayerState::Paused => self.on_paused(now_ms, buttons, io),
            other => other,
        };
        if next == PlayerState::Stopped {
            next = self.on_stopped();
        }
        if next != previous {
            debug!(from = previous.label(), to = next.label(), "state change");
        }
        self.state = next;
        self.render(now_ms, io.display);
    }

    fn on_idle(&mut self, now_ms: u64, buttons: ButtonSet, io: &mut Peripherals<'_>) -> PlayerState {
        if self.catalog.is_empty() {
            return PlayerState::Idle;
        }
        let last = self.catalog.len() - 1;
        if buttons.contains(Button::Up) {
            self.cursor.browse = self.cursor.browse.saturating_sub(1);
        }
        if buttons.contains(Button::Down) {
            self.cursor.browse = (self.cursor.browse + 1).min(last);
        }
        if buttons.contains(Button::Play) {
            return self.select(now_ms, io);
        }
        PlayerState::Idle
    }

    fn on_playing(&mut self, now_ms: u64, buttons: ButtonSet, io: &mut Peripherals<'_>) -> PlayerState {
        if buttons.contains(Button::Stop) {
            io.transport.stop();
            return PlayerState::Stopped;
        }
        if buttons.contains(Button::Play) {
            io.transport.pause(true);
            self.cursor.paused_at_ms = Some(now_ms);
            return PlayerState::Paused;
        }
        if buttons.contains(Button::Next) || buttons.contains(Button::Down) {
            return self.advance(now_ms, io);
        }
        if buttons.contains(Button::Back) || buttons.contains(Button::Up) {
            return self.retreat(now_ms, io);
        }
        if io.transport.is_stopped() {
            return self.advance(now_ms, io);
        }
        PlayerState::Playing
    }

    fn on_paused(&mut self, now_ms: u64, buttons: ButtonSet, io: &mut Peripherals<'_>) -> PlayerState {
        if buttons.contains(Button::Stop) {
            io.transport.stop();
            return PlayerState::Stopped;
        }
        if buttons.contains(Button::Play) {
            io.transport.pause(false);
            if let Some(paused_at) = self.cursor.paused_at_ms.take() {
                self.cursor.started_at_ms += now_ms.saturating_sub(paused_at);
            }
            return PlayerState::Playing;
        }
        PlayerState::Paused
    }

    fn on_stopped(&mut self) -> PlayerState {
        self.cursor.clear_song();
        PlayerState::Idle
    }

    /// Load the browsed album and play its first song.
    fn select(&mut self, now_ms: u64, io: &mut Peripherals<'_>) -> PlayerState {
        let index = self.cursor.browse;
        self.cursor.clear_song();
        if let Err(e) = ensure_loaded(&mut self.catalog, index, io.storage, &self.settings.library) {
            self.notify(now_ms, format!("Load failed: {e}"));
            return PlayerState::Idle;
        }

        self.cursor.album = Some(index);
        self.cursor.song = 0;
        if let Err(e) = self.start_song(now_ms, io) {
            self.notify(now_ms, format!("Play failed: {e}"));
            self.cursor.clear_song();
            return PlayerState::Idle;
        }
        PlayerState::Playing
    }

    /// Next song, or the next album's first song under autoplay, or `Idle`.
    fn advance(&mut self, now_ms: u64, io: &mut Peripherals<'_>) -> PlayerState {
        let Some(album) = self.cursor.album else {
            return PlayerState::Stopped;
        };
        let count = self.catalog.get(album).map_or(0, |a| a.song_count());

        if self.cursor.song + 1 < count {
            self.cursor.song += 1;
            self.play_current(now_ms, io);
            return PlayerState::Playing;
        }
        if self.autoplay && album + 1 < self.catalog.len() {
            return self.enter_album(album + 1, StartAt::First, now_ms, io);
        }
        io.transport.stop();
        PlayerState::Stopped
    }

    /// Restart after the threshold, otherwise the previous song (crossing into
    /// the previous album's last song under autoplay).
    fn retreat(&mut self, now_ms: u64, io: &mut Peripherals<'_>) -> PlayerState {
        let Some(album) = self.cursor.album else {
            return PlayerState::Stopped;
        };

        let elapsed = self.cursor.elapsed_secs(now_ms);
        if elapsed > self.settings.playback.restart_threshold_secs {
            self.play_current(now_ms, io);
            return PlayerState::Playing;
        }
        if self.cursor.song > 0 {
            self.cursor.song -= 1;
            self.play_current(now_ms, io);
            return PlayerState::Playing;
        }
        if self.autoplay && album > 0 {
            return self.enter_album(album - 1, StartAt::Last, now_ms, io);
        }
        self.play_current(now_ms, io);
        PlayerState::Playing
    }

    /// Make `target` resident (evicting the current album) and start playing in it.
    fn enter_album(
        &mut self,
        target: usize,
        start_at: StartAt,
        now_ms: u64,
        io: &mut Peripherals<'_>,
    ) -> PlayerState {
        self.cursor.clear_song();
        if let Err(e) = ensure_loaded(&mut self.catalog, target, io.storage, &self.settings.library) {
            self.notify(now_ms, format!("Load failed: {e}"));
            io.transport.stop();
            return PlayerState::Stopped;
        }

        let count = self.catalog.get(target).map_or(0, |a| a.song_count());
        self.cursor.album = Some(target);
        self.cursor.browse = target;
        self.cursor.song = match start_at {
            StartAt::First => 0,
            StartAt::Last => count.saturating_sub(1),
        };
        self.play_current(now_ms, io);
        PlayerState::Playing
    }

    /// Start the cursor's song; a failure is shown but playback stays put.
    fn play_current(&mut self, now_ms: u64, io: &mut Peripherals<'_>) {
        if let Err(e) = self.start_song(now_ms, io) {
            self.notify(now_ms, format!("Play failed: {e}"));
        }
    }

    fn start_song(&mut self, now_ms: u64, io: &mut Peripherals<'_>) -> Result<(), AudioError> {
        self.cursor.started_at_ms = now_ms;
        self.cursor.paused_at_ms = None;

        let path = self
            .cursor
            .album
            .and_then(|a| self.catalog.get(a))
            .and_then(|a| a.song_path(self.cursor.song));
        let Some(path) = path else {
            return Ok(());
        };

        io.transport.stop();
        debug!(%path, "starting song");
        io.transport.start_file(&path)
    }

    fn notify(&mut self, now_ms: u64, message: String) {
        warn!(%message, "shown on display");
        let until = now_ms.saturating_add(self.settings.ui.notice_ms);
        self.overlay = Some((Overlay::Notice(message), until));
    }

    fn render(&self, now_ms: u64, display: &mut dyn Display) {
        if self.state == PlayerState::Error {
            display.show_error(self.error_message().unwrap_or("Hardware failure"));
            return;
        }
        match self.overlay_at(now_ms) {
            Some(Overlay::Splash) => {
                let ui = &self.settings.ui;
                display.show_splash(&ui.splash_title, &ui.splash_subtitle);
                return;
            }
            Some(Overlay::Notice(message)) => {
                display.show_error(message);
                return;
            }
            None => {}
        }

        match self.state {
            PlayerState::Idle => display.show_browse_list(&self.catalog, self.cursor.browse),
            PlayerState::Playing | PlayerState::Paused => match self.current() {
                Some((album, song)) => display.show_now_playing(
                    song,
                    album,
                    self.cursor.elapsed_secs(now_ms),
                    self.state == PlayerState::Paused,
                ),
                None => display.clear(),
            },
            _ => display.clear(),
        }
    }
}
