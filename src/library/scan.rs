use tracing::{debug, info, warn};

use crate::config::LibrarySettings;
use crate::metadata::{SongMetadata, read_metadata};

use super::model::{Album, Catalog};
use super::storage::{Entry, Storage};
use super::{is_audio_name, is_visible, join};

/// What a scan found and what it had to leave out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub albums: usize,
    /// Directories not entered because they lie deeper than `max_depth`.
    pub truncated_by_depth: usize,
    /// Leaf albums or directories dropped because the index was full.
    pub truncated_by_capacity: usize,
    pub unreadable_dirs: usize,
}

impl ScanReport {
    pub fn was_truncated(&self) -> bool {
        self.truncated_by_depth > 0 || self.truncated_by_capacity > 0
    }
}

/// Rebuild `catalog` from the storage root.
///
/// Any loaded album is unloaded and the index emptied first. Neither limit is
/// an error: albums past the depth or capacity bound are simply not registered.
pub fn scan(storage: &dyn Storage, catalog: &mut Catalog, settings: &LibrarySettings) -> ScanReport {
    catalog.clear();

    if !storage.is_mounted() {
        warn!("storage not mounted, catalog left empty");
        return ScanReport::default();
    }

    let mut scanner = Scanner {
        storage,
        catalog,
        settings,
        report: ScanReport::default(),
    };
    scanner.visit("", 0);

    let report = ScanReport {
        albums: scanner.catalog.len(),
        ..scanner.report
    };
    info!(
        albums = report.albums,
        truncated_by_depth = report.truncated_by_depth,
        truncated_by_capacity = report.truncated_by_capacity,
        unreadable_dirs = report.unreadable_dirs,
        "catalog scan finished"
    );
    report
}

struct Scanner<'a> {
    storage: &'a dyn Storage,
    catalog: &'a mut Catalog,
    settings: &'a LibrarySettings,
    report: ScanReport,
}

impl Scanner<'_> {
    fn visit(&mut self, dir: &str, depth: usize) {
        if self.is_trash(dir) {
            debug!(dir, "skipping trash directory");
            return;
        }
        if self.catalog.is_full() {
            self.report.truncated_by_capacity += 1;
            return;
        }

        let entries = match self.storage.entries(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir, error = %e, "cannot open directory");
                self.report.unreadable_dirs += 1;
                return;
            }
        };
        let visible: Vec<&Entry> = entries
            .iter()
            .filter(|e| is_visible(&e.name, self.settings))
            .collect();

        // any audio file makes this a leaf; sub-directories are not entered
        if let Some(first) = visible
            .iter()
            .find(|e| !e.is_dir && is_audio_name(&e.name, self.settings))
        {
            self.register(dir, &first.name);
            return;
        }

        for sub in visible.iter().filter(|e| e.is_dir) {
            let child = join(dir, &sub.name);
            if depth + 1 > self.settings.max_depth {
                debug!(dir = %child, "deeper than max_depth, not scanned");
                self.report.truncated_by_depth += 1;
                continue;
            }
            self.visit(&child, depth + 1);
        }
    }

    /// Seed an album from the first audio file of `dir`.
    fn register(&mut self, dir: &str, first_file: &str) {
        let path = join(dir, first_file);
        let metadata = match self.storage.open(&path) {
            Ok(mut file) => read_metadata(file.as_mut(), first_file).unwrap_or_else(|e| e.fallback),
            Err(e) => {
                debug!(file = %path, error = %e, "cannot open first file of album");
                SongMetadata::from_filename(first_file)
            }
        };

        let title = if metadata.album.is_empty() {
            dir_name(dir).to_string()
        } else {
            metadata.album
        };
        let artist = if metadata.artist.is_empty() {
            self.settings.unknown_artist.clone()
        } else {
            metadata.artist
        };

        debug!(dir, %title, %artist, "album registered");
        let album = Album::new(title, artist, dir, metadata.total_tracks);
        if self.catalog.push(album).is_err() {
            self.report.truncated_by_capacity += 1;
        }
    }

    fn is_trash(&self, dir: &str) -> bool {
        let prefix = self.settings.trash_prefix.as_str();
        !prefix.is_empty() && dir.starts_with(prefix)
    }
}

/// Last component of a catalog path; the root is shown as `/`.
fn dir_name(dir: &str) -> &str {
    match dir.rsplit('/').next() {
        Some(name) if !name.is_empty() => name,
        _ => "/",
    }
}
