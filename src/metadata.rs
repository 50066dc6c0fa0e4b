//! Tag and duration extraction for the supported audio containers.
//!
//! Every parser works on a seekable byte stream and never trusts a size
//! field: offsets are checked against the file length (and against the
//! enclosing chunk/block) before anything is read. Callers always end up
//! with a usable title because [`read_metadata`] falls back to the
//! filename stem.

mod flac;
mod mp3;
mod ogg;
mod reader;
mod vorbis;
mod wav;

use std::io::{self, Read, Seek};

use thiserror::Error;
use tracing::debug;

/// Upper bound for every chunk/frame/comment walking loop.
pub(crate) const MAX_PARSE_ITERATIONS: usize = 500;

/// A readable, seekable media file handed out by storage.
pub trait MediaFile: Read + Seek {}

impl<T: Read + Seek> MediaFile for T {}

/// Fields recovered from a file's tags and stream headers.
///
/// Every field defaults to empty/zero and is overwritten independently by
/// whichever tag source provides it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Seconds, 0 when unknown.
    pub duration: u32,
    /// 0 when not found.
    pub track_number: u8,
    /// 0 when not found.
    pub total_tracks: u8,
}

impl SongMetadata {
    /// The record used when nothing could be parsed: title = filename stem.
    pub fn from_filename(filename: &str) -> Self {
        Self {
            title: filename_stem(filename).to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing {expected} signature")]
    BadMagic { expected: &'static str },
    #[error("structure ends before the file does")]
    Truncated,
    #[error("offset {offset} lies outside the enclosing structure (limit {limit})")]
    OutOfBounds { offset: u64, limit: u64 },
    #[error("unsupported extension {0:?}")]
    Unsupported(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parse failure that still carries the best-effort (filename) record.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct Unparsed {
    pub fallback: SongMetadata,
    #[source]
    pub reason: ParseError,
}

/// Container formats the parsers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Ogg,
    Flac,
}

impl AudioFormat {
    /// Resolve a format from a file name, purely by (case-insensitive) extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = file_extension(filename)?;
        if ext.eq_ignore_ascii_case("wav") {
            Some(Self::Wav)
        } else if ext.eq_ignore_ascii_case("mp3") {
            Some(Self::Mp3)
        } else if ext.eq_ignore_ascii_case("ogg") {
            Some(Self::Ogg)
        } else if ext.eq_ignore_ascii_case("flac") {
            Some(Self::Flac)
        } else {
            None
        }
    }
}

/// Parse `file` according to the extension of `filename`.
///
/// On success the title is never empty: it falls back to the filename stem.
/// On failure the error carries that same fallback record.
pub fn read_metadata<R: Read + Seek + ?Sized>(
    file: &mut R,
    filename: &str,
) -> Result<SongMetadata, Unparsed> {
    let parsed = match AudioFormat::from_filename(filename) {
        Some(AudioFormat::Wav) => wav::parse(file),
        Some(AudioFormat::Mp3) => mp3::parse(file),
        Some(AudioFormat::Ogg) => ogg::parse(file),
        Some(AudioFormat::Flac) => flac::parse(file),
        None => Err(ParseError::Unsupported(
            file_extension(filename).unwrap_or_default().to_string(),
        )),
    };

    match parsed {
        Ok(mut metadata) => {
            if metadata.title.is_empty() {
                metadata.title = filename_stem(filename).to_string();
            }
            Ok(metadata)
        }
        Err(reason) => {
            debug!(file = filename, %reason, "metadata parse failed, using filename");
            Err(Unparsed {
                fallback: SongMetadata::from_filename(filename),
                reason,
            })
        }
    }
}

/// Text between the last `/` and the last `.`; the whole name when there is
/// no dot or nothing precedes it (`.mp3`).
pub fn filename_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Extension after the last `.` of the final path component, if any.
pub fn file_extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map(|dot| &name[dot + 1..])
}

/// Parse `"N"` or `"N/M"` into `(track, total)`; unparsable parts become 0.
///
/// Like C `atoi`, leading whitespace is skipped and digits are read up to the
/// first non-digit. Values that do not fit a byte are treated as unknown.
pub(crate) fn parse_track_number(text: &str) -> (u8, Option<u8>) {
    let track = leading_number(text);
    let total = text.split_once('/').map(|(_, rest)| leading_number(rest));
    (track, total)
}

pub(crate) fn leading_number(text: &str) -> u8 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u8>().unwrap_or(0)
}

/// ISO-8859-1 text up to the first NUL; every byte maps to the same code point.
pub(crate) fn latin1_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| char::from(b))
        .collect()
}

/// UTF-8 text up to the first NUL, lossily decoded.
pub(crate) fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
