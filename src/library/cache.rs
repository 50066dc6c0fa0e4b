//! Keeps at most one album's song list in memory.

use std::io;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::LibrarySettings;
use crate::metadata::{SongMetadata, read_metadata};

use super::model::{Catalog, Song};
use super::sort::sort_songs;
use super::storage::Storage;
use super::{is_audio_name, is_visible, join};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no album at index {0}")]
    UnknownAlbum(usize),
    #[error("cannot open {path}")]
    Unreadable {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("out of memory for {0} songs")]
    Allocation(usize),
    #[error("no playable songs")]
    Empty,
}

/// Make album `index` the resident album.
///
/// A no-op when it is already loaded. Otherwise every other loaded album is
/// evicted first, then the directory is listed, parsed and (when enough
/// files carry track numbers) sorted. On error the album stays unloaded.
pub fn ensure_loaded(
    catalog: &mut Catalog,
    index: usize,
    storage: &dyn Storage,
    settings: &LibrarySettings,
) -> Result<(), LoadError> {
    let album = catalog.get(index).ok_or(LoadError::UnknownAlbum(index))?;
    if album.is_loaded() {
        return Ok(());
    }
    let path = album.path.clone();

    let evicted = catalog.evict_except(index);
    if evicted > 0 {
        debug!(evicted, "evicted resident album");
    }

    let entries = storage
        .entries(&path)
        .map_err(|source| LoadError::Unreadable {
            path: path.clone(),
            source,
        })?;
    let files: Vec<&str> = entries
        .iter()
        .filter(|e| !e.is_dir && is_visible(&e.name, settings))
        .filter(|e| is_audio_name(&e.name, settings))
        .map(|e| e.name.as_str())
        .take(settings.max_songs_per_album)
        .collect();
    if files.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut songs: Vec<Song> = Vec::new();
    songs
        .try_reserve_exact(files.len())
        .map_err(|_| LoadError::Allocation(files.len()))?;

    let album = catalog.get(index).ok_or(LoadError::UnknownAlbum(index))?;
    for name in &files {
        let file_path = join(&path, name);
        let metadata = match storage.open(&file_path) {
            Ok(mut file) => read_metadata(file.as_mut(), name).unwrap_or_else(|e| e.fallback),
            Err(e) => {
                debug!(file = %file_path, error = %e, "cannot open song, using filename");
                SongMetadata::from_filename(name)
            }
        };
        songs.push(Song::from_metadata(name, metadata, album));
    }

    let numbered = songs.iter().filter(|s| s.has_position()).count();
    let sorted = should_sort(numbered, songs.len());
    if sorted {
        sort_songs(&mut songs);
    }

    info!(album = %path, songs = songs.len(), numbered, sorted, "album loaded");
    if let Some(album) = catalog.get_mut(index) {
        album.install(songs);
    }
    Ok(())
}

/// Sort only when at least half (rounded up) of the songs carry a track number.
pub(crate) fn should_sort(numbered: usize, total: usize) -> bool {
    numbered > 0 && numbered >= total.div_ceil(2)
}
