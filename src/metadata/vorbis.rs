//! Vorbis comment block, shared by FLAC `VORBIS_COMMENT` and the Ogg comment packet.

use std::io::{Read, Seek};

use super::reader::Reader;
use super::{MAX_PARSE_ITERATIONS, ParseError, SongMetadata, leading_number, parse_track_number};

/// Comments at least this long are skipped rather than read.
const COMMENT_BUFFER: u32 = 128;

/// Read `vendor, count, [len, KEY=value]*` up to `end`, filling recognized keys.
///
/// Every length is checked against `end` before it is followed, so a lying
/// block can only cut parsing short. Fields read before the failure stay set.
pub(super) fn parse_comments<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    end: u64,
    metadata: &mut SongMetadata,
) -> Result<(), ParseError> {
    r.ensure_within(4, end)?;
    let vendor_len = r.u32_le()?;
    r.ensure_within(u64::from(vendor_len), end)?;
    r.skip(u64::from(vendor_len))?;

    r.ensure_within(4, end)?;
    let count = (r.u32_le()? as usize).min(MAX_PARSE_ITERATIONS);

    for _ in 0..count {
        r.ensure_within(4, end)?;
        let len = r.u32_le()?;
        r.ensure_within(u64::from(len), end)?;
        if len == 0 || len >= COMMENT_BUFFER - 1 {
            r.skip(u64::from(len))?;
            continue;
        }

        let mut buf = [0u8; COMMENT_BUFFER as usize];
        r.read_exact(&mut buf[..len as usize])?;
        let comment = String::from_utf8_lossy(&buf[..len as usize]);
        if let Some((key, value)) = comment.split_once('=') {
            apply(&key.to_ascii_uppercase(), value, metadata);
        }
    }
    Ok(())
}

fn apply(key: &str, value: &str, metadata: &mut SongMetadata) {
    match key {
        "TITLE" => metadata.title = value.to_string(),
        "ARTIST" => metadata.artist = value.to_string(),
        "ALBUM" => metadata.album = value.to_string(),
        "TRACKNUMBER" => {
            let (track, total) = parse_track_number(value);
            metadata.track_number = track;
            if let Some(total) = total {
                metadata.total_tracks = total;
            }
        }
        "TOTALTRACKS" | "TRACKTOTAL" => metadata.total_tracks = leading_number(value),
        _ => {}
    }
}
