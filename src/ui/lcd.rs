//! 20x4 character display model.
//!
//! Only cells whose content changes are written, mirroring how the panel is
//! driven over a slow bus; [`Lcd::writes`] counts those cell writes.

use crate::library::{Album, Catalog, Song};

use super::Display;

pub const LCD_COLS: usize = 20;
pub const LCD_ROWS: usize = 4;

pub const UP_ARROW: char = '\u{2191}';
pub const DOWN_ARROW: char = '\u{2193}';

#[derive(Debug, Clone)]
pub struct Lcd {
    cells: [[char; LCD_COLS]; LCD_ROWS],
    writes: usize,
}

impl Default for Lcd {
    fn default() -> Self {
        Self::new()
    }
}

impl Lcd {
    pub fn new() -> Self {
        Self {
            cells: [[' '; LCD_COLS]; LCD_ROWS],
            writes: 0,
        }
    }

    /// Cell writes performed so far.
    #[cfg(test)]
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn row(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|cells| cells.iter().collect())
            .unwrap_or_default()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..LCD_ROWS).map(|r| self.row(r)).collect()
    }

    /// Replace a whole row with `text`, cut to the panel width and optionally centered.
    pub fn display_line(&mut self, text: &str, row: usize, centered: bool) {
        if row >= LCD_ROWS {
            return;
        }
        let chars: Vec<char> = text.chars().take(LCD_COLS).collect();
        let start = if centered {
            (LCD_COLS - chars.len()) / 2
        } else {
            0
        };

        for col in 0..LCD_COLS {
            let c = col
                .checked_sub(start)
                .and_then(|i| chars.get(i).copied())
                .unwrap_or(' ');
            self.display_char(c, row, col);
        }
    }

    pub fn display_char(&mut self, c: char, row: usize, col: usize) {
        if row >= LCD_ROWS || col >= LCD_COLS {
            return;
        }
        if self.cells[row][col] != c {
            self.cells[row][col] = c;
            self.writes += 1;
        }
    }

    fn blank(&mut self, row: usize) {
        self.display_line("", row, false);
    }
}

impl Display for Lcd {
    fn show_splash(&mut self, title: &str, subtitle: &str) {
        self.blank(0);
        self.display_line(title, 1, true);
        self.display_line(subtitle, 2, true);
        self.blank(3);
    }

    fn show_error(&mut self, message: &str) {
        self.blank(0);
        self.display_line("ERROR", 1, true);
        self.display_line(message, 2, true);
        self.blank(3);
    }

    fn show_now_playing(&mut self, song: &Song, _album: &Album, elapsed_secs: u32, paused: bool) {
        self.display_line(&song.title, 0, true);
        self.display_line(&song.album, 1, true);
        self.display_line(&song.artist, 2, true);
        let mut progress = format!(
            "{} / {}",
            format_mmss(elapsed_secs),
            format_mmss(song.duration)
        );
        if paused {
            progress.push_str(" PAUSED");
        }
        self.display_line(&progress, 3, false);
    }

    fn show_browse_list(&mut self, catalog: &Catalog, selected: usize) {
        let Some(album) = catalog.get(selected) else {
            self.blank(0);
            self.display_line("No albums found!", 1, true);
            self.display_line("Check the SD Card.", 2, true);
            self.blank(3);
            return;
        };

        let up = if selected > 0 { UP_ARROW.to_string() } else { String::new() };
        self.display_line(&up, 0, false);
        self.display_line(&album.artist, 1, true);
        self.display_line(&album.title, 2, true);

        let position = format!("({}/{})", selected + 1, catalog.len());
        if selected + 1 < catalog.len() {
            self.display_line(&format!("{DOWN_ARROW}{position}"), 3, false);
        } else {
            self.display_line(&position, 3, false);
        }
    }

    fn clear(&mut self) {
        for row in 0..LCD_ROWS {
            self.blank(row);
        }
    }
}

/// `MM:SS`; minutes are not capped at 59.
pub fn format_mmss(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
