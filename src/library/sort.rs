use std::cmp::Ordering;

use super::model::{Album, Song};

/// Order albums by artist, then title, using plain byte-wise string order.
pub fn sort_albums(albums: &mut [Album]) {
    albums.sort_by(|a, b| {
        a.artist
            .cmp(&b.artist)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Stable insertion sort by track number. Songs without a position go last,
/// keeping their scan order among themselves.
pub fn sort_songs(songs: &mut [Song]) {
    for i in 1..songs.len() {
        let mut j = i;
        while j > 0 && compare_position(&songs[j - 1], &songs[j]) == Ordering::Greater {
            songs.swap(j - 1, j);
            j -= 1;
        }
    }
}

fn compare_position(a: &Song, b: &Song) -> Ordering {
    position(a).cmp(&position(b))
}

fn position(song: &Song) -> u16 {
    if song.has_position() {
        u16::from(song.track_number)
    } else {
        u16::MAX
    }
}
