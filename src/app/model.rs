//! Application model: `App`, `PlayerState` and the playback cursor.

use crate::config::Settings;
use crate::library::{Album, Catalog, Song};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlayerState {
    #[default]
    Initializing,
    Idle,
    Playing,
    Paused,
    /// Transient: re-enters `Idle` within the same tick.
    Stopped,
    /// Hardware failed to come up; left only by restarting.
    Error,
}

impl PlayerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Idle => "Idle",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
            Self::Stopped => "Stopped",
            Self::Error => "Error",
        }
    }
}

/// Where playback and browsing currently are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the resident album being played, if any.
    pub album: Option<usize>,
    /// Song within that album.
    pub song: usize,
    /// Clock time the current song started, shifted forward across pauses.
    pub started_at_ms: u64,
    pub paused_at_ms: Option<u64>,
    /// Browse position in the catalog.
    pub browse: usize,
}

impl Cursor {
    /// Whole seconds into the current song; frozen while paused.
    pub fn elapsed_secs(&self, now_ms: u64) -> u32 {
        let until = self.paused_at_ms.unwrap_or(now_ms);
        (until.saturating_sub(self.started_at_ms) / 1000) as u32
    }

    /// Drop the song reference; called whenever the album may be unloaded.
    pub fn clear_song(&mut self) {
        self.album = None;
        self.song = 0;
        self.paused_at_ms = None;
    }
}

/// Something shown over the regular screen until a deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Splash,
    Notice(String),
}

pub struct App {
    pub(super) state: PlayerState,
    pub(super) catalog: Catalog,
    pub(super) cursor: Cursor,
    pub(super) autoplay: bool,
    pub(super) volume: Option<u8>,
    pub(super) overlay: Option<(Overlay, u64)>,
    pub(super) error: Option<String>,
    pub(super) settings: Settings,
}

impl App {
    /// A machine in `Initializing` over an already scanned (and sorted) catalog.
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self {
            state: PlayerState::Initializing,
            catalog,
            cursor: Cursor::default(),
            autoplay: settings.playback.autoplay,
            volume: None,
            overlay: None,
            error: None,
            settings,
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Last volume sent to the transport.
    pub fn volume(&self) -> Option<u8> {
        self.volume
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The overlay still visible at `now_ms`.
    pub fn overlay_at(&self, now_ms: u64) -> Option<&Overlay> {
        self.overlay
            .as_ref()
            .filter(|(_, until)| now_ms < *until)
            .map(|(overlay, _)| overlay)
    }

    /// The album and song under the playback cursor.
    pub fn current(&self) -> Option<(&Album, &Song)> {
        let album = self.catalog.get(self.cursor.album?)?;
        let song = album.song(self.cursor.song)?;
        Some((album, song))
    }
}
