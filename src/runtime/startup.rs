use std::io::{self, Stdout};
use std::path::PathBuf;
use std::{env, time::Duration};

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::app::{App, Clock};
use crate::audio::{AudioError, AudioPlayer, Transport};
use crate::config::{ControlsSettings, Settings};
use crate::library::{Catalog, FsStorage, scan, sort_albums};
use crate::ui::Lcd;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot determine the library root: {0}")]
    Root(#[source] io::Error),
    #[error("terminal setup failed: {0}")]
    Terminal(#[from] io::Error),
}

/// Everything the event loop drives.
pub struct Session {
    pub app: App,
    pub storage: FsStorage,
    pub lcd: Lcd,
    /// `None` when the output device failed to open; the machine is in `Error` then.
    pub player: Option<AudioPlayer>,
    pub no_output: NoOutput,
    pub controls: ControlsSettings,
}

impl Session {
    pub fn shutdown(&self) {
        if let Some(player) = &self.player {
            player.quit();
        }
    }
}

/// Transport used when there is no output device. Never reports a song in progress.
#[derive(Debug, Default)]
pub struct NoOutput;

impl Transport for NoOutput {
    fn start_file(&mut self, _path: &str) -> Result<(), AudioError> {
        Err(AudioError::NoOutputDevice("no output device".to_string()))
    }
    fn pause(&mut self, _paused: bool) {}
    fn stop(&mut self) {}
    fn is_stopped(&self) -> bool {
        true
    }
    fn set_volume(&mut self, _volume: u8) {}
}

/// Library root: command line argument, then `[library].root`, then the working directory.
pub fn library_root(arg: Option<String>, settings: &Settings) -> Result<PathBuf, StartupError> {
    if let Some(arg) = arg {
        return Ok(PathBuf::from(arg));
    }
    if let Some(root) = &settings.library.root {
        return Ok(root.clone());
    }
    env::current_dir().map_err(StartupError::Root)
}

pub fn open_terminal() -> Result<Tui, StartupError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

pub fn close_terminal(terminal: &mut Tui) -> Result<(), StartupError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Bring up the transport, scan the library and leave the machine browsing
/// (or in `Error` when the output device is missing).
pub fn boot(root: PathBuf, settings: Settings, clock: &dyn Clock) -> Session {
    let storage = FsStorage::new(root.clone(), settings.library.follow_links);
    let mut lcd = Lcd::new();
    let controls = settings.controls.clone();
    let settle = Duration::from_millis(settings.playback.settle_ms);

    let player = AudioPlayer::new(root, settle);
    let mut catalog = Catalog::new(settings.library.max_albums);
    if player.is_ok() {
        let report = scan(&storage, &mut catalog, &settings.library);
        if report.was_truncated() {
            warn!(
                max_albums = settings.library.max_albums,
                max_depth = settings.library.max_depth,
                "library exceeds the configured limits, some albums are not listed"
            );
        }
        sort_albums(catalog.albums_mut());
    }

    let mut app = App::new(catalog, settings);
    let player = match player {
        Ok(player) => {
            info!("audio output ready");
            app.boot(clock.now_ms(), &mut lcd);
            Some(player)
        }
        Err(e) => {
            error!(error = %e, "audio output unavailable");
            app.fail("Audio init failed", &mut lcd);
            None
        }
    };

    Session {
        app,
        storage,
        lcd,
        player,
        no_output: NoOutput,
        controls,
    }
}
