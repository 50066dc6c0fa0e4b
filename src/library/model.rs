use crate::metadata::SongMetadata;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Relative to the album directory.
    pub filename: String,
    /// Seconds, 0 when unknown.
    pub duration: u32,
    /// 0 when unknown; only 1..=99 counts as a position.
    pub track_number: u8,
}

impl Song {
    /// Build a song from parsed tags; empty artist/album inherit the album's values.
    pub fn from_metadata(filename: &str, metadata: SongMetadata, album: &Album) -> Self {
        let SongMetadata {
            title,
            artist,
            album: album_title,
            duration,
            track_number,
            ..
        } = metadata;
        Self {
            title,
            artist: if artist.is_empty() {
                album.artist.clone()
            } else {
                artist
            },
            album: if album_title.is_empty() {
                album.title.clone()
            } else {
                album_title
            },
            filename: filename.to_string(),
            duration,
            track_number,
        }
    }

    pub fn has_position(&self) -> bool {
        (1..=99).contains(&self.track_number)
    }
}

/// One leaf directory of the catalog.
///
/// Songs are only present while the album is loaded; an unloaded album keeps
/// just the fields the scanner seeded.
#[derive(Debug, Clone)]
pub struct Album {
    pub title: String,
    pub artist: String,
    /// Catalog path of the directory.
    pub path: String,
    /// Total-tracks tag of the first file, 0 when unknown.
    pub expected_songs: u8,
    songs: Vec<Song>,
    loaded: bool,
}

impl Album {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        path: impl Into<String>,
        expected_songs: u8,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            path: path.into(),
            expected_songs,
            songs: Vec::new(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[cfg(test)]
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn song_count(&self) -> usize {
        self.songs.len()
    }

    pub fn song(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    /// Catalog path of the song at `index`.
    pub fn song_path(&self, index: usize) -> Option<String> {
        self.song(index)
            .map(|song| super::join(&self.path, &song.filename))
    }

    /// Free the song list and mark the album unloaded.
    pub(crate) fn unload(&mut self) {
        self.songs = Vec::new();
        self.loaded = false;
    }

    pub(crate) fn install(&mut self, songs: Vec<Song>) {
        self.songs = songs;
        self.loaded = true;
    }
}

/// Bounded, ordered album index.
#[derive(Debug, Clone)]
pub struct Catalog {
    albums: Vec<Album>,
    capacity: usize,
}

impl Catalog {
    pub fn new(capacity: usize) -> Self {
        Self {
            albums: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.albums.len() >= self.capacity
    }

    #[cfg(test)]
    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn albums_mut(&mut self) -> &mut [Album] {
        &mut self.albums
    }

    pub fn get(&self, index: usize) -> Option<&Album> {
        self.albums.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Album> {
        self.albums.get_mut(index)
    }

    /// Append an album; returns it back when the index is full.
    pub fn push(&mut self, album: Album) -> Result<(), Album> {
        if self.is_full() {
            return Err(album);
        }
        self.albums.push(album);
        Ok(())
    }

    /// Unload everything and drop all albums.
    pub fn clear(&mut self) {
        self.unload_all();
        self.albums.clear();
    }

    pub fn unload_all(&mut self) {
        for album in self.albums.iter_mut().filter(|a| a.is_loaded()) {
            album.unload();
        }
    }

    /// Unload every loaded album other than `keep`; returns how many were evicted.
    pub fn evict_except(&mut self, keep: usize) -> usize {
        let mut evicted = 0;
        for (i, album) in self.albums.iter_mut().enumerate() {
            if i != keep && album.is_loaded() {
                album.unload();
                evicted += 1;
            }
        }
        evicted
    }
}
