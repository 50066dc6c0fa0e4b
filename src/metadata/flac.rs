//! FLAC: STREAMINFO for duration, VORBIS_COMMENT for tags.

use std::io::{Read, Seek};

use tracing::debug;

use super::reader::Reader;
use super::{MAX_PARSE_ITERATIONS, ParseError, SongMetadata, vorbis};

const STREAMINFO: u8 = 0;
const VORBIS_COMMENT: u8 = 4;
const STREAMINFO_LEN: u64 = 18;

pub(super) fn parse<R: Read + Seek + ?Sized>(file: &mut R) -> Result<SongMetadata, ParseError> {
    let mut r = Reader::new(file)?;
    let mut metadata = SongMetadata::default();

    if r.bytes::<4>()? != *b"fLaC" {
        return Err(ParseError::BadMagic { expected: "fLaC" });
    }

    let mut sample_rate: u32 = 0;
    let mut total_samples: u64 = 0;

    for _ in 0..MAX_PARSE_ITERATIONS {
        if r.remaining()? < 4 {
            break;
        }
        let header = r.u8()?;
        let last = header & 0x80 != 0;
        let block_type = header & 0x7F;
        let len = u64::from(r.u24_be()?);
        let start = r.position()?;
        let end = start + len;

        match block_type {
            STREAMINFO => {
                let (rate, samples) = read_streaminfo(&mut r, start, end)?;
                sample_rate = rate;
                total_samples = samples;
            }
            VORBIS_COMMENT => {
                if let Err(e) = vorbis::parse_comments(&mut r, end, &mut metadata) {
                    debug!(error = %e, "vorbis comment block cut short");
                }
            }
            _ => {}
        }

        if last || end >= r.len() {
            break;
        }
        r.seek_to(end)?;
    }

    if sample_rate > 0 {
        metadata.duration = (total_samples / u64::from(sample_rate)) as u32;
    }
    Ok(metadata)
}

/// 20-bit sample rate at byte 10, 36-bit sample count at byte 13 (low nibble onward).
fn read_streaminfo<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    start: u64,
    end: u64,
) -> Result<(u32, u64), ParseError> {
    if start + STREAMINFO_LEN > end {
        return Err(ParseError::OutOfBounds {
            offset: start + STREAMINFO_LEN,
            limit: end,
        });
    }
    r.seek_to(start + 10)?;
    let b = r.bytes::<8>()?;
    let sample_rate = (u32::from(b[0]) << 12) | (u32::from(b[1]) << 4) | (u32::from(b[2]) >> 4);
    let total_samples = (u64::from(b[3] & 0x0F) << 32)
        | (u64::from(b[4]) << 24)
        | (u64::from(b[5]) << 16)
        | (u64::from(b[6]) << 8)
        | u64::from(b[7]);
    Ok((sample_rate, total_samples))
}
