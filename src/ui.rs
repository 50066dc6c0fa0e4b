//! Display collaborator and the terminal rendering of it.
//!
//! The state machine draws through the [`Display`] trait. On the desktop the
//! trait is implemented by an [`Lcd`] frame buffer, which `draw` then puts on
//! screen with `ratatui` together with a status line and the key bindings.

mod lcd;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::PlayerState;
use crate::library::{Album, Catalog, Song};

pub use lcd::Lcd;
use lcd::{LCD_COLS, LCD_ROWS};

pub trait Display {
    fn show_splash(&mut self, title: &str, subtitle: &str);
    fn show_error(&mut self, message: &str);
    fn show_now_playing(&mut self, song: &Song, album: &Album, elapsed_secs: u32, paused: bool);
    fn show_browse_list(&mut self, catalog: &Catalog, selected: usize);
    fn clear(&mut self);
}

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("enter/space/p", "play/pause");
    map.insert("s", "stop");
    map.insert("k/j", "up/down");
    map.insert("h/l", "prev/next song");
    map.insert("a", "autoplay");
    map.insert("+/-", "volume");
    map.insert("q", "quit");
    map
});

fn controls_text() -> String {
    let order = ["enter/space/p", "s", "k/j", "h/l", "a", "+/-", "q"];
    order
        .iter()
        .filter_map(|k| CONTROLS_MAP.get(k).map(|v| format!("[{k}] {v}")))
        .collect::<Vec<String>>()
        .join(" | ")
}

/// What the status line shows besides the panel.
#[derive(Debug, Clone)]
pub struct Status {
    pub state: PlayerState,
    pub autoplay: bool,
    pub volume: u8,
    pub albums: usize,
    /// File name the audio output is on, and whether it is paused there.
    pub output: Option<(String, bool)>,
}

pub(crate) fn status_text(status: &Status) -> String {
    let autoplay = if status.autoplay { "ON" } else { "OFF" };
    let mut parts = vec![
        format!("STATE: {}", status.state.label()),
        format!("AUTOPLAY: {autoplay}"),
        format!("VOLUME: {}%", status.volume),
        format!("ALBUMS: {}", status.albums),
    ];
    if let Some((file, paused)) = &status.output {
        let suffix = if *paused { " (paused)" } else { "" };
        parts.push(format!("OUTPUT: {file}{suffix}"));
    }
    parts.join(" • ")
}

/// Center a `width` x `height` box inside `r`, shrinking it when `r` is smaller.
fn centered_rect_sized(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Render the panel, status and controls into `frame`.
pub fn draw(frame: &mut Frame, lcd: &Lcd, status: &Status) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(LCD_ROWS as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let panel_area = centered_rect_sized(LCD_COLS as u16 + 2, LCD_ROWS as u16 + 2, chunks[0]);
    let panel = Paragraph::new(lcd.rows().join("\n")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" jukebox ")
            .title_alignment(Alignment::Center),
    );
    frame.render_widget(panel, panel_area);

    let status_par = Paragraph::new(status_text(status))
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    let footer = Paragraph::new(controls_text())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests;
