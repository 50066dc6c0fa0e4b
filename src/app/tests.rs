use super::*;
use crate::audio::{AudioError, Transport};
use crate::config::Settings;
use crate::library::storage::MemStorage;
use crate::library::{Album, Catalog, Song, scan, sort_albums};
use crate::ui::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Blank,
    Splash(String),
    Error(String),
    NowPlaying { title: String, elapsed: u32, paused: bool },
    Browse { selected: usize, albums: usize },
}

struct FakeDisplay {
    last: Screen,
}

impl Display for FakeDisplay {
    fn show_splash(&mut self, title: &str, _subtitle: &str) {
        self.last = Screen::Splash(title.to_string());
    }
    fn show_error(&mut self, message: &str) {
        self.last = Screen::Error(message.to_string());
    }
    fn show_now_playing(&mut self, song: &Song, _album: &Album, elapsed_secs: u32, paused: bool) {
        self.last = Screen::NowPlaying {
            title: song.title.clone(),
            elapsed: elapsed_secs,
            paused,
        };
    }
    fn show_browse_list(&mut self, catalog: &Catalog, selected: usize) {
        self.last = Screen::Browse {
            selected,
            albums: catalog.len(),
        };
    }
    fn clear(&mut self) {
        self.last = Screen::Blank;
    }
}

struct FakeTransport {
    started: Vec<String>,
    stopped: bool,
    paused: Option<bool>,
    stops: usize,
    volumes: Vec<u8>,
    failing: Vec<String>,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            started: Vec::new(),
            stopped: true,
            paused: None,
            stops: 0,
            volumes: Vec::new(),
            failing: Vec::new(),
        }
    }
}

impl Transport for FakeTransport {
    fn start_file(&mut self, path: &str) -> Result<(), AudioError> {
        if self.failing.iter().any(|p| p == path) {
            self.stopped = true;
            return Err(AudioError::Disconnected);
        }
        self.started.push(path.to_string());
        self.stopped = false;
        self.paused = None;
        Ok(())
    }
    fn pause(&mut self, paused: bool) {
        self.paused = Some(paused);
    }
    fn stop(&mut self) {
        self.stops += 1;
        self.stopped = true;
    }
    fn is_stopped(&self) -> bool {
        self.stopped
    }
    fn set_volume(&mut self, volume: u8) {
        self.volumes.push(volume);
    }
}

/// Albums A (2 songs), B (3 songs), C (1 song), in that browse order.
fn library() -> MemStorage {
    let mut storage = MemStorage::new();
    for path in [
        "/A/a1.mp3",
        "/A/a2.mp3",
        "/B/b1.mp3",
        "/B/b2.mp3",
        "/B/b3.mp3",
        "/C/c1.mp3",
    ] {
        storage.add_file(path, b"untagged".to_vec());
    }
    storage
}

struct Rig {
    app: App,
    storage: MemStorage,
    transport: FakeTransport,
    display: FakeDisplay,
    autoplay: bool,
    knob: u16,
}

impl Rig {
    fn with_storage(storage: MemStorage) -> Self {
        let settings = Settings::default();
        let mut catalog = Catalog::new(settings.library.max_albums);
        scan(&storage, &mut catalog, &settings.library);
        sort_albums(catalog.albums_mut());

        let mut display = FakeDisplay { last: Screen::Blank };
        let mut app = App::new(catalog, settings);
        app.boot(0, &mut display);
        Self {
            app,
            storage,
            transport: FakeTransport::default(),
            display,
            autoplay: true,
            knob: KNOB_MAX,
        }
    }

    fn new() -> Self {
        Self::with_storage(library())
    }

    fn tick(&mut self, now_ms: u64, buttons: ButtonSet) {
        let mut io = Peripherals {
            storage: &self.storage,
            transport: &mut self.transport,
            display: &mut self.display,
        };
        let inputs = Inputs::new(buttons, self.knob, self.autoplay);
        self.app.tick(now_ms, inputs, &mut io);
    }

    fn press(&mut self, now_ms: u64, button: Button) {
        self.tick(now_ms, ButtonSet::only(button));
    }

    /// The transport reports the current song as finished.
    fn finish_song(&mut self, now_ms: u64) {
        self.transport.stopped = true;
        self.tick(now_ms, ButtonSet::empty());
    }

    fn last_started(&self) -> &str {
        self.transport.started.last().map(String::as_str).unwrap_or("")
    }

    /// Browse to album `index` and press play at `now_ms`.
    fn play_album(&mut self, index: usize, now_ms: u64) {
        for _ in 0..index {
            self.press(now_ms, Button::Down);
        }
        self.press(now_ms, Button::Play);
    }

    fn loaded(&self) -> Vec<usize> {
        let catalog = self.app.catalog();
        (0..catalog.len())
            .filter(|&i| catalog.get(i).is_some_and(Album::is_loaded))
            .collect()
    }
}

// --- input ----------------------------------------------------------------

#[test]
fn debounce_is_per_button() {
    let mut debouncer = Debouncer::new(500);
    let play = ButtonSet::only(Button::Play);
    assert_eq!(debouncer.accept(play, 1_000), play);
    assert!(debouncer.accept(play, 1_200).is_empty());
    assert!(debouncer.accept(play, 1_499).is_empty());
    assert_eq!(debouncer.accept(play, 1_500), play);

    let both = ButtonSet::only(Button::Play).with(Button::Up);
    assert_eq!(debouncer.accept(both, 1_600), ButtonSet::only(Button::Up));
}

#[test]
fn knob_maps_linearly_onto_percent() {
    assert_eq!(volume_from_level(0), 0);
    assert_eq!(volume_from_level(512), 50);
    assert_eq!(volume_from_level(KNOB_MAX), 100);
    assert_eq!(volume_from_level(4_000), 100);
}

#[test]
fn monotonic_clock_does_not_go_backwards() {
    let clock = MonotonicClock::new();
    let a = clock.now_ms();
    let b = clock.now_ms();
    assert!(b >= a);
}

// --- boot and browsing ----------------------------------------------------

#[test]
fn boot_shows_the_splash_then_the_album_list() {
    let mut rig = Rig::new();
    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert_eq!(rig.display.last, Screen::Splash("Jukebox".into()));

    rig.tick(1_000, ButtonSet::empty());
    assert_eq!(rig.display.last, Screen::Splash("Jukebox".into()));
    rig.tick(2_000, ButtonSet::empty());
    assert_eq!(rig.display.last, Screen::Browse { selected: 0, albums: 3 });
}

#[test]
fn huge_overlay_durations_do_not_overflow() {
    let mut settings = Settings::default();
    settings.ui.splash_ms = u64::MAX;
    settings.ui.notice_ms = u64::MAX;
    let mut storage = MemStorage::new();
    storage.add_file("/A/a1.mp3", b"untagged".to_vec());
    let mut catalog = Catalog::new(4);
    scan(&storage, &mut catalog, &settings.library);
    storage.make_unreadable("/A");

    let mut display = FakeDisplay { last: Screen::Blank };
    let mut app = App::new(catalog, settings);
    app.boot(5_000, &mut display);
    assert_eq!(app.overlay_at(u64::MAX - 1), Some(&Overlay::Splash));

    let mut transport = FakeTransport::default();
    let mut io = Peripherals {
        storage: &storage,
        transport: &mut transport,
        display: &mut display,
    };
    app.tick(6_000, Inputs::new(ButtonSet::only(Button::Play), KNOB_MAX, true), &mut io);
    assert_eq!(app.state(), PlayerState::Idle);
    assert!(matches!(app.overlay_at(u64::MAX - 1), Some(Overlay::Notice(_))));
}

#[test]
fn browsing_is_clamped_at_both_ends() {
    let mut rig = Rig::new();
    rig.press(3_000, Button::Up);
    assert_eq!(rig.app.cursor().browse, 0);
    for _ in 0..5 {
        rig.press(3_000, Button::Down);
    }
    assert_eq!(rig.app.cursor().browse, 2);
    rig.press(3_000, Button::Up);
    assert_eq!(rig.app.cursor().browse, 1);
    assert!(rig.transport.started.is_empty());
}

#[test]
fn empty_catalog_stays_idle() {
    let mut rig = Rig::with_storage(MemStorage::new());
    rig.press(3_000, Button::Play);
    rig.press(3_000, Button::Down);
    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert_eq!(rig.display.last, Screen::Browse { selected: 0, albums: 0 });
}

#[test]
fn select_loads_the_album_and_plays_its_first_song() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);

    assert_eq!(rig.app.state(), PlayerState::Playing);
    assert_eq!(rig.last_started(), "/B/b1.mp3");
    assert_eq!(rig.app.cursor().album, Some(1));
    assert_eq!(rig.app.cursor().song, 0);
    assert_eq!(rig.loaded(), vec![1]);

    rig.tick(10_500, ButtonSet::empty());
    assert_eq!(
        rig.display.last,
        Screen::NowPlaying {
            title: "b1".into(),
            elapsed: 7,
            paused: false
        }
    );
}

// --- end of track ---------------------------------------------------------

#[test]
fn finished_song_moves_to_the_next_in_the_album() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.tick(4_000, ButtonSet::empty());
    assert_eq!(rig.transport.started.len(), 1);

    rig.finish_song(5_000);
    assert_eq!(rig.last_started(), "/B/b2.mp3");
    assert_eq!(rig.app.cursor().elapsed_secs(5_000), 0);
}

#[test]
fn autoplay_continues_into_the_next_album() {
    let mut rig = Rig::new();
    rig.play_album(0, 3_000);
    rig.finish_song(4_000);
    rig.finish_song(5_000);

    assert_eq!(rig.last_started(), "/B/b1.mp3");
    assert_eq!(rig.app.state(), PlayerState::Playing);
    assert_eq!(rig.app.cursor().album, Some(1));
    assert_eq!(rig.app.cursor().browse, 1);
    assert_eq!(rig.loaded(), vec![1]);
    assert_eq!(rig.app.catalog().get(0).unwrap().song_count(), 0);
}

#[test]
fn without_autoplay_the_album_end_returns_to_idle() {
    let mut rig = Rig::new();
    rig.autoplay = false;
    rig.play_album(0, 3_000);
    rig.finish_song(4_000);
    rig.finish_song(5_000);

    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert_eq!(rig.app.cursor().album, None);
    assert!(rig.app.current().is_none());
    assert_eq!(rig.transport.started, vec!["/A/a1.mp3", "/A/a2.mp3"]);
}

#[test]
fn the_last_album_ends_in_idle_even_with_autoplay() {
    let mut rig = Rig::new();
    rig.play_album(2, 3_000);
    rig.finish_song(4_000);
    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(rig.app.current().is_none());
}

// --- next / previous ------------------------------------------------------

#[test]
fn next_and_down_skip_forward() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.press(4_000, Button::Next);
    assert_eq!(rig.last_started(), "/B/b2.mp3");
    rig.press(5_000, Button::Down);
    assert_eq!(rig.last_started(), "/B/b3.mp3");
    rig.press(6_000, Button::Next);
    assert_eq!(rig.last_started(), "/C/c1.mp3");
    rig.press(7_000, Button::Next);
    assert_eq!(rig.app.state(), PlayerState::Idle);
}

#[test]
fn previous_restarts_after_the_threshold() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.press(3_000, Button::Next);
    assert_eq!(rig.last_started(), "/B/b2.mp3");

    rig.press(9_000, Button::Back);
    assert_eq!(rig.last_started(), "/B/b2.mp3");
    assert_eq!(rig.transport.started.len(), 3);
    assert_eq!(rig.app.cursor().elapsed_secs(9_000), 0);
    assert_eq!(rig.app.cursor().song, 1);
}

#[test]
fn previous_within_the_threshold_moves_back() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.press(3_000, Button::Next);

    rig.press(6_000, Button::Back);
    assert_eq!(rig.last_started(), "/B/b1.mp3");
    assert_eq!(rig.app.cursor().song, 0);

    // exactly at the threshold still counts as "early"
    rig.press(11_000, Button::Up);
    assert_eq!(rig.last_started(), "/A/a2.mp3");
}

#[test]
fn previous_at_the_first_song_crosses_into_the_previous_album_last_song() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.press(4_000, Button::Back);

    assert_eq!(rig.last_started(), "/A/a2.mp3");
    assert_eq!(rig.app.cursor().album, Some(0));
    assert_eq!(rig.app.cursor().song, 1);
    assert_eq!(rig.app.cursor().browse, 0);
    assert_eq!(rig.loaded(), vec![0]);
}

#[test]
fn previous_at_the_very_first_song_restarts_it() {
    let mut rig = Rig::new();
    rig.play_album(0, 3_000);
    rig.press(4_000, Button::Back);
    assert_eq!(rig.transport.started, vec!["/A/a1.mp3", "/A/a1.mp3"]);
    assert_eq!(rig.app.state(), PlayerState::Playing);
}

#[test]
fn previous_without_autoplay_stays_in_the_album() {
    let mut rig = Rig::new();
    rig.autoplay = false;
    rig.play_album(1, 3_000);
    rig.press(4_000, Button::Back);
    assert_eq!(rig.transport.started, vec!["/B/b1.mp3", "/B/b1.mp3"]);
    assert_eq!(rig.app.cursor().album, Some(1));
}

// --- stop / pause ---------------------------------------------------------

#[test]
fn stop_returns_to_idle_and_clears_the_song() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    let stops = rig.transport.stops;
    rig.press(4_000, Button::Stop);

    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(rig.app.current().is_none());
    assert_eq!(rig.transport.stops, stops + 1);
    assert_eq!(rig.app.cursor().browse, 1);
    assert_eq!(rig.display.last, Screen::Browse { selected: 1, albums: 3 });
}

#[test]
fn pause_freezes_elapsed_time_and_resume_continues_it() {
    let mut rig = Rig::new();
    rig.play_album(0, 3_000);

    rig.press(7_000, Button::Play);
    assert_eq!(rig.app.state(), PlayerState::Paused);
    assert_eq!(rig.transport.paused, Some(true));

    rig.tick(20_000, ButtonSet::empty());
    assert_eq!(
        rig.display.last,
        Screen::NowPlaying {
            title: "a1".into(),
            elapsed: 4,
            paused: true
        }
    );

    rig.press(30_000, Button::Play);
    assert_eq!(rig.app.state(), PlayerState::Playing);
    assert_eq!(rig.transport.paused, Some(false));
    assert_eq!(rig.app.cursor().elapsed_secs(31_000), 5);
}

#[test]
fn stop_while_paused_returns_to_idle() {
    let mut rig = Rig::new();
    rig.play_album(0, 3_000);
    rig.press(4_000, Button::Play);
    rig.press(5_000, Button::Stop);
    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(rig.app.current().is_none());
}

#[test]
fn a_finished_transport_is_ignored_while_paused() {
    let mut rig = Rig::new();
    rig.play_album(1, 3_000);
    rig.press(4_000, Button::Play);
    rig.finish_song(5_000);
    assert_eq!(rig.app.state(), PlayerState::Paused);
    assert_eq!(rig.transport.started.len(), 1);
}

// --- failures -------------------------------------------------------------

#[test]
fn load_failure_is_shown_and_leaves_the_machine_idle() {
    let mut rig = Rig::new();
    rig.storage.make_unreadable("/B");
    rig.play_album(1, 3_000);

    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(matches!(rig.display.last, Screen::Error(ref m) if m.starts_with("Load failed")));
    assert!(rig.loaded().is_empty());
    assert!(rig.transport.started.is_empty());

    rig.tick(5_000, ButtonSet::empty());
    assert_eq!(rig.display.last, Screen::Browse { selected: 1, albums: 3 });
}

#[test]
fn start_failure_on_select_stays_idle() {
    let mut rig = Rig::new();
    rig.transport.failing.push("/A/a1.mp3".into());
    rig.play_album(0, 3_000);
    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(rig.app.current().is_none());
    assert!(matches!(rig.display.last, Screen::Error(ref m) if m.starts_with("Play failed")));
}

#[test]
fn unplayable_song_mid_album_is_skipped_on_the_next_tick() {
    let mut rig = Rig::new();
    rig.transport.failing.push("/B/b2.mp3".into());
    rig.play_album(1, 3_000);

    rig.finish_song(4_000);
    assert_eq!(rig.app.state(), PlayerState::Playing);
    assert_eq!(rig.app.cursor().song, 1);

    rig.tick(4_020, ButtonSet::empty());
    assert_eq!(rig.last_started(), "/B/b3.mp3");
}

#[test]
fn autoplay_into_an_unloadable_album_stops() {
    let mut rig = Rig::new();
    rig.play_album(0, 3_000);
    rig.storage.make_unreadable("/B");
    rig.finish_song(4_000);
    rig.finish_song(5_000);

    assert_eq!(rig.app.state(), PlayerState::Idle);
    assert!(rig.app.current().is_none());
    assert!(rig.loaded().is_empty());
}

#[test]
fn error_state_is_terminal() {
    let mut rig = Rig::new();
    rig.app.fail("No audio output", &mut rig.display);
    assert_eq!(rig.app.state(), PlayerState::Error);
    assert_eq!(rig.app.error_message(), Some("No audio output"));

    rig.press(3_000, Button::Play);
    rig.press(4_000, Button::Down);
    assert_eq!(rig.app.state(), PlayerState::Error);
    assert!(rig.transport.started.is_empty());
    assert!(rig.transport.volumes.is_empty());
    assert_eq!(rig.display.last, Screen::Error("No audio output".into()));
}

// --- controls -------------------------------------------------------------

#[test]
fn volume_is_sent_only_when_it_changes() {
    let mut rig = Rig::new();
    rig.tick(3_000, ButtonSet::empty());
    rig.tick(3_020, ButtonSet::empty());
    rig.knob = 0;
    rig.tick(3_040, ButtonSet::empty());
    rig.tick(3_060, ButtonSet::empty());
    assert_eq!(rig.transport.volumes, vec![100, 0]);
    assert_eq!(rig.app.volume(), Some(0));
}

#[test]
fn autoplay_follows_the_switch() {
    let mut rig = Rig::new();
    assert!(rig.app.autoplay());
    rig.autoplay = false;
    rig.tick(3_000, ButtonSet::empty());
    assert!(!rig.app.autoplay());
}
