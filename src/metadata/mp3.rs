//! MP3: ID3v2 frames, ID3v1 trailer fallback, bitrate-based duration estimate.

use std::io::{Read, Seek};

use tracing::debug;

use super::reader::{Reader, syncsafe};
use super::{
    MAX_PARSE_ITERATIONS, ParseError, SongMetadata, c_string, latin1_string, parse_track_number,
};

const ID3V1_LEN: u64 = 128;
/// Frame content bytes kept after the encoding byte.
const FRAME_TEXT_CAP: u32 = 126;
/// Bytes searched for the first MPEG frame sync.
const SYNC_SEARCH_LIMIT: usize = 8192;
/// MPEG-1 Layer III bitrates in kbit/s, indexed by the header's bitrate field.
const BITRATES_KBPS: [u32; 16] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0,
];

pub(super) fn parse<R: Read + Seek + ?Sized>(file: &mut R) -> Result<SongMetadata, ParseError> {
    let mut r = Reader::new(file)?;
    let mut metadata = SongMetadata::default();

    let mut header = [0u8; 10];
    let id3v2_end = if r.read_up_to(&mut header)? == header.len() && header.starts_with(b"ID3") {
        let tag_end = 10 + u64::from(syncsafe([header[6], header[7], header[8], header[9]]));
        let limit = tag_end.min(r.len());
        if let Err(e) = read_id3v2(&mut r, header[3], limit, &mut metadata) {
            debug!(error = %e, "ID3v2 frames unreadable");
        }
        Some(tag_end)
    } else {
        None
    };

    let has_id3v1 = has_id3v1(&mut r)?;
    if metadata.title.is_empty() && metadata.artist.is_empty() && has_id3v1 {
        read_id3v1(&mut r, &mut metadata)?;
    }

    let audio_len = if has_id3v1 { r.len() - ID3V1_LEN } else { r.len() };
    metadata.duration = estimate_duration(&mut r, id3v2_end.unwrap_or(0), audio_len)?;
    Ok(metadata)
}

fn read_id3v2<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    major_version: u8,
    tag_end: u64,
    metadata: &mut SongMetadata,
) -> Result<(), ParseError> {
    for _ in 0..MAX_PARSE_ITERATIONS {
        if r.position()? + 10 > tag_end {
            break;
        }
        let id = r.bytes::<4>()?;
        if id[0] == 0 {
            // padding
            break;
        }
        let size_bytes = r.bytes::<4>()?;
        let size = if major_version >= 4 {
            syncsafe(size_bytes)
        } else {
            u32::from_be_bytes(size_bytes)
        };
        r.skip(2)?; // flags
        let content_start = r.position()?;
        let content_end = content_start + u64::from(size);
        if content_end > tag_end {
            return Err(ParseError::OutOfBounds {
                offset: content_end,
                limit: tag_end,
            });
        }

        if size > 1 && matches!(&id, b"TIT2" | b"TPE1" | b"TALB" | b"TRCK") {
            let encoding = r.u8()?;
            let take = (size - 1).min(FRAME_TEXT_CAP) as usize;
            let mut buf = [0u8; FRAME_TEXT_CAP as usize];
            r.read_exact(&mut buf[..take])?;
            let text = decode_text(encoding, &buf[..take]);
            match &id {
                b"TIT2" => metadata.title = text,
                b"TPE1" => metadata.artist = text,
                b"TALB" => metadata.album = text,
                _ => {
                    let (track, total) = parse_track_number(&text);
                    metadata.track_number = track;
                    if let Some(total) = total {
                        metadata.total_tracks = total;
                    }
                }
            }
        }
        r.seek_to(content_end)?;
    }
    Ok(())
}

/// ID3v2 text: ISO-8859-1/UTF-8 are read as-is, UTF-16 (encodings 1 and 2) is decoded.
fn decode_text(encoding: u8, bytes: &[u8]) -> String {
    match encoding {
        1 | 2 => {
            let (body, big_endian) = match bytes {
                [0xFF, 0xFE, rest @ ..] => (rest, false),
                [0xFE, 0xFF, rest @ ..] => (rest, true),
                _ => (bytes, encoding == 2),
            };
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| {
                    if big_endian {
                        u16::from_be_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_le_bytes([pair[0], pair[1]])
                    }
                })
                .take_while(|&unit| unit != 0)
                .collect();
            String::from_utf16_lossy(&units)
        }
        3 => c_string(bytes),
        _ => latin1_string(bytes),
    }
}

fn has_id3v1<R: Read + Seek + ?Sized>(r: &mut Reader<'_, R>) -> Result<bool, ParseError> {
    if r.len() <= ID3V1_LEN {
        return Ok(false);
    }
    r.seek_to(r.len() - ID3V1_LEN)?;
    Ok(r.bytes::<3>()? == *b"TAG")
}

fn read_id3v1<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    metadata: &mut SongMetadata,
) -> Result<(), ParseError> {
    r.seek_to(r.len() - ID3V1_LEN)?;
    let tag = r.bytes::<128>()?;

    let field = |range: std::ops::Range<usize>| {
        latin1_string(&tag[range])
            .trim_end_matches(' ')
            .to_string()
    };
    let title = field(3..33);
    let artist = field(33..63);
    let album = field(63..93);
    if !title.is_empty() {
        metadata.title = title;
    }
    if !artist.is_empty() {
        metadata.artist = artist;
    }
    if !album.is_empty() {
        metadata.album = album;
    }
    // ID3v1.1: a zero at byte 125 marks byte 126 as the track number.
    if tag[125] == 0 && tag[126] > 0 {
        metadata.track_number = tag[126];
    }
    Ok(())
}

/// Duration from the first frame's bitrate: `audio bytes * 8 / bitrate`.
fn estimate_duration<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    audio_start: u64,
    audio_len: u64,
) -> Result<u32, ParseError> {
    if audio_start >= r.len() {
        return Ok(0);
    }
    r.seek_to(audio_start)?;
    let mut window = vec![0u8; SYNC_SEARCH_LIMIT + 3];
    let filled = r.read_up_to(&mut window)?;
    window.truncate(filled);

    let Some(bitrate_index) = window
        .windows(3)
        .take(SYNC_SEARCH_LIMIT)
        .find(|w| w[0] == 0xFF && w[1] & 0xE0 == 0xE0)
        .map(|w| usize::from(w[2] >> 4))
    else {
        return Ok(0);
    };

    let kbps = BITRATES_KBPS[bitrate_index];
    if kbps == 0 {
        return Ok(0);
    }
    Ok((audio_len * 8 / (u64::from(kbps) * 1000)) as u32)
}
