use super::lcd::{DOWN_ARROW, LCD_COLS, LCD_ROWS, UP_ARROW, format_mmss};
use super::*;
use crate::app::PlayerState;
use crate::library::{Album, Catalog, Song};

fn catalog(count: usize) -> Catalog {
    let mut catalog = Catalog::new(8);
    for i in 0..count {
        let album = Album::new(format!("Title {i}"), format!("Artist {i}"), format!("/a{i}"), 0);
        assert!(catalog.push(album).is_ok());
    }
    catalog
}

fn song(title: &str, duration: u32) -> Song {
    Song {
        title: title.to_string(),
        artist: "Miles Davis".to_string(),
        album: "Kind of Blue".to_string(),
        filename: "01.mp3".to_string(),
        duration,
        track_number: 1,
    }
}

#[test]
fn lines_are_cut_to_the_panel_width() {
    let mut lcd = Lcd::new();
    lcd.display_line("abcdefghijklmnopqrstuvwxyz", 0, false);
    assert_eq!(lcd.row(0), "abcdefghijklmnopqrst");
}

#[test]
fn centered_lines_are_padded_on_both_sides() {
    let mut lcd = Lcd::new();
    lcd.display_line("ERROR", 1, true);
    assert_eq!(lcd.row(1), "       ERROR        ");
    assert_eq!(lcd.row(1).chars().count(), LCD_COLS);
}

#[test]
fn a_shorter_line_clears_the_rest_of_the_row() {
    let mut lcd = Lcd::new();
    lcd.display_line("long enough text", 2, false);
    lcd.display_line("hi", 2, false);
    assert_eq!(lcd.row(2).trim_end(), "hi");
}

#[test]
fn only_changed_cells_are_written() {
    let mut lcd = Lcd::new();
    lcd.display_line("abc", 0, false);
    assert_eq!(lcd.writes(), 3);
    lcd.display_line("abc", 0, false);
    assert_eq!(lcd.writes(), 3);
    lcd.display_line("abd", 0, false);
    assert_eq!(lcd.writes(), 4);
}

#[test]
fn out_of_range_writes_are_ignored() {
    let mut lcd = Lcd::new();
    lcd.display_line("x", LCD_ROWS, false);
    lcd.display_char('x', 0, LCD_COLS);
    assert_eq!(lcd.writes(), 0);
    assert_eq!(lcd.row(LCD_ROWS), "");
}

#[test]
fn splash_uses_the_middle_rows() {
    let mut lcd = Lcd::new();
    lcd.show_splash("Jukebox", "Ready to play!");
    let rows = lcd.rows();
    assert_eq!(rows[0].trim(), "");
    assert_eq!(rows[1].trim(), "Jukebox");
    assert_eq!(rows[2].trim(), "Ready to play!");
    assert_eq!(rows[3].trim(), "");
}

#[test]
fn first_album_has_only_a_down_arrow() {
    let mut lcd = Lcd::new();
    lcd.show_browse_list(&catalog(3), 0);
    assert!(!lcd.row(0).contains(UP_ARROW));
    assert_eq!(lcd.row(1).trim(), "Artist 0");
    assert_eq!(lcd.row(2).trim(), "Title 0");
    assert_eq!(lcd.row(3).trim_end(), format!("{DOWN_ARROW}(1/3)"));
}

#[test]
fn middle_album_has_both_arrows() {
    let mut lcd = Lcd::new();
    lcd.show_browse_list(&catalog(3), 1);
    assert!(lcd.row(0).starts_with(UP_ARROW));
    assert_eq!(lcd.row(3).trim_end(), format!("{DOWN_ARROW}(2/3)"));
}

#[test]
fn last_album_has_no_down_arrow() {
    let mut lcd = Lcd::new();
    lcd.show_browse_list(&catalog(3), 2);
    assert!(lcd.row(0).starts_with(UP_ARROW));
    assert_eq!(lcd.row(3).trim_end(), "(3/3)");
}

#[test]
fn redrawing_the_same_album_writes_nothing() {
    let catalog = catalog(3);
    let mut lcd = Lcd::new();
    lcd.show_browse_list(&catalog, 1);
    let writes = lcd.writes();
    lcd.show_browse_list(&catalog, 1);
    assert_eq!(lcd.writes(), writes);
}

#[test]
fn empty_catalog_explains_itself() {
    let mut lcd = Lcd::new();
    lcd.show_browse_list(&catalog(0), 0);
    assert_eq!(lcd.row(1).trim(), "No albums found!");
    assert_eq!(lcd.row(2).trim(), "Check the SD Card.");
}

#[test]
fn now_playing_shows_tags_and_progress() {
    let mut lcd = Lcd::new();
    let album = Album::new("Kind of Blue", "Miles Davis", "/kob", 5);
    lcd.show_now_playing(&song("So What", 565), &album, 75, false);
    assert_eq!(lcd.row(0).trim(), "So What");
    assert_eq!(lcd.row(1).trim(), "Kind of Blue");
    assert_eq!(lcd.row(2).trim(), "Miles Davis");
    assert_eq!(lcd.row(3).trim_end(), "01:15 / 09:25");

    lcd.show_now_playing(&song("So What", 565), &album, 75, true);
    assert_eq!(lcd.row(3).trim_end(), "01:15 / 09:25 PAUSED");
}

#[test]
fn clear_blanks_every_row() {
    let mut lcd = Lcd::new();
    lcd.show_error("Play failed");
    lcd.clear();
    assert!(lcd.rows().iter().all(|r| r.trim().is_empty()));
}

#[test]
fn mmss_does_not_wrap_minutes() {
    assert_eq!(format_mmss(0), "00:00");
    assert_eq!(format_mmss(59), "00:59");
    assert_eq!(format_mmss(61), "01:01");
    assert_eq!(format_mmss(6_000), "100:00");
}

#[test]
fn status_line_lists_state_and_controls() {
    let status = Status {
        state: PlayerState::Paused,
        autoplay: false,
        volume: 42,
        albums: 7,
        output: None,
    };
    assert_eq!(
        status_text(&status),
        "STATE: Paused • AUTOPLAY: OFF • VOLUME: 42% • ALBUMS: 7"
    );

    let status = Status {
        output: Some(("01 So What.flac".to_string(), true)),
        ..status
    };
    assert!(status_text(&status).ends_with("ALBUMS: 7 • OUTPUT: 01 So What.flac (paused)"));
}

#[test]
fn controls_are_listed_in_a_fixed_order() {
    let text = controls_text();
    assert!(text.starts_with("[enter/space/p] play/pause | [s] stop"));
    assert!(text.ends_with("[q] quit"));
}
