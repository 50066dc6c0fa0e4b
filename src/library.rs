//! Album catalog: storage access, directory scan, single-album cache and ordering.

mod cache;
mod model;
mod scan;
mod sort;
pub mod storage;

pub use cache::ensure_loaded;
pub use model::{Album, Catalog, Song};
pub use scan::scan;
pub use sort::sort_albums;
pub use storage::{FsStorage, Storage};

use crate::config::LibrarySettings;

/// Whether `name` carries one of the configured audio extensions (case-insensitive).
pub(crate) fn is_audio_name(name: &str, settings: &LibrarySettings) -> bool {
    let Some((_, ext)) = name.rsplit_once('.') else {
        return false;
    };
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.'))
        .filter(|e| !e.is_empty())
        .any(|e| e.eq_ignore_ascii_case(ext))
}

pub(crate) fn is_visible(name: &str, settings: &LibrarySettings) -> bool {
    settings.include_hidden || !name.starts_with('.')
}

/// Join a catalog directory path (`""` is the root) with a child name.
pub(crate) fn join(dir: &str, name: &str) -> String {
    format!("{dir}/{name}")
}
