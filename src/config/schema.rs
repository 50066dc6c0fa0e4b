use std::path::PathBuf;

use serde::Deserialize;

/// Top-level jukebox settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/jukebox/config.toml` or `~/.config/jukebox/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `JUKEBOX__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub controls: ControlsSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Catalog root. The first command line argument wins over this.
    pub root: Option<PathBuf>,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Capacity of the album index. Albums past this are silently dropped.
    pub max_albums: usize,
    /// Songs loaded per album. Files past this are ignored.
    pub max_songs_per_album: usize,
    /// Deepest directory level that may still be registered (root = 0).
    pub max_depth: usize,
    /// Catalog paths starting with this prefix are never scanned.
    pub trash_prefix: String,
    /// Whether to include dot-files and dot-directories.
    pub include_hidden: bool,
    /// Whether to follow symlinks while enumerating directories.
    pub follow_links: bool,
    /// Artist shown for albums whose first file carries no artist tag.
    pub unknown_artist: String,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            root: None,
            extensions: vec!["mp3".into(), "wav".into(), "ogg".into(), "flac".into()],
            max_albums: 256,
            max_songs_per_album: 32,
            max_depth: 8,
            trash_prefix: "/.Trash".to_string(),
            include_hidden: false,
            follow_links: true,
            unknown_artist: "Unknown Artist".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether autoplay starts enabled (continue into the next album).
    pub autoplay: bool,
    /// "Previous" restarts the current song once it has played longer than this.
    pub restart_threshold_secs: u32,
    /// Pause after a transport start so the decoder can settle (milliseconds).
    pub settle_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            autoplay: true,
            restart_threshold_secs: 5,
            settle_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Minimum interval between two accepted presses of the same button.
    pub debounce_ms: u64,
    /// How far one `+`/`-` key press turns the volume knob (knob range 0..=1023).
    pub volume_step: u16,
    /// Knob position at start-up.
    pub initial_volume_level: u16,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            volume_step: 64,
            initial_volume_level: 767,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub splash_title: String,
    pub splash_subtitle: String,
    /// How long the splash screen stays up after boot.
    pub splash_ms: u64,
    /// How long an error notice stays on the display.
    pub notice_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            splash_title: "Jukebox".to_string(),
            splash_subtitle: "Ready to play!".to_string(),
            splash_ms: 2000,
            notice_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Log file. The terminal is the display, so logs never go to stdout/stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
