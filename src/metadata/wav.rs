//! RIFF/WAVE: `fmt ` and `data` chunks for duration, `LIST`/`INFO` for tags.

use std::io::{Read, Seek};

use tracing::debug;

use super::reader::{Reader, word_aligned};
use super::{MAX_PARSE_ITERATIONS, ParseError, SongMetadata, c_string, parse_track_number};

/// INFO values are cut to this many bytes.
const INFO_VALUE_CAP: u32 = 63;

#[derive(Default)]
struct Format {
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

pub(super) fn parse<R: Read + Seek + ?Sized>(file: &mut R) -> Result<SongMetadata, ParseError> {
    let mut r = Reader::new(file)?;
    let mut metadata = SongMetadata::default();

    if r.bytes::<4>()? != *b"RIFF" {
        return Err(ParseError::BadMagic { expected: "RIFF" });
    }
    r.skip(4)?;
    if r.bytes::<4>()? != *b"WAVE" {
        return Err(ParseError::BadMagic { expected: "WAVE" });
    }

    let mut format = Format::default();
    let mut data_size: u32 = 0;

    for _ in 0..MAX_PARSE_ITERATIONS {
        if r.remaining()? < 8 {
            break;
        }
        let id = r.bytes::<4>()?;
        let size = r.u32_le()?;
        let start = r.position()?;

        let walked = match &id {
            b"fmt " => read_format(&mut r, start, size).map(|f| format = f),
            b"data" => {
                data_size = size;
                Ok(())
            }
            b"LIST" => read_list(&mut r, start, size, &mut metadata),
            _ => Ok(()),
        };
        if let Err(e) = walked {
            debug!(chunk = %String::from_utf8_lossy(&id), error = %e, "stopping chunk walk");
            break;
        }

        let next = start + word_aligned(size);
        if next >= r.len() {
            break;
        }
        r.seek_to(next)?;
    }

    metadata.duration = duration_secs(&format, data_size);
    Ok(metadata)
}

fn read_format<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    start: u64,
    size: u32,
) -> Result<Format, ParseError> {
    let end = start + u64::from(size);
    r.ensure_within(16, end)?;
    r.skip(2)?; // audio format tag
    let channels = r.u16_le()?;
    let sample_rate = r.u32_le()?;
    r.seek_to(start + 14)?;
    let bits_per_sample = r.u16_le()?;
    Ok(Format {
        channels,
        sample_rate,
        bits_per_sample,
    })
}

fn read_list<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    start: u64,
    size: u32,
    metadata: &mut SongMetadata,
) -> Result<(), ParseError> {
    let list_end = (start + u64::from(size)).min(r.len());
    r.ensure_within(4, list_end)?;
    if r.bytes::<4>()? != *b"INFO" {
        return Ok(());
    }

    for _ in 0..MAX_PARSE_ITERATIONS {
        if r.position()? + 8 > list_end {
            break;
        }
        let id = r.bytes::<4>()?;
        let size = r.u32_le()?;
        let value_start = r.position()?;

        let take = size.min(INFO_VALUE_CAP) as usize;
        r.ensure_within(take as u64, list_end)?;
        let mut buf = [0u8; INFO_VALUE_CAP as usize];
        r.read_exact(&mut buf[..take])?;
        let value = c_string(&buf[..take]);

        match &id {
            b"INAM" => metadata.title = value,
            b"IART" => metadata.artist = value,
            b"IPRD" => metadata.album = value,
            b"ITRK" => {
                let (track, total) = parse_track_number(&value);
                metadata.track_number = track;
                if let Some(total) = total {
                    metadata.total_tracks = total;
                }
            }
            _ => {}
        }

        let next = value_start + word_aligned(size);
        if next > list_end {
            break;
        }
        r.seek_to(next)?;
    }
    Ok(())
}

/// `data bytes / (rate * channels * bytes per sample)`, 0 when any factor is missing.
fn duration_secs(format: &Format, data_size: u32) -> u32 {
    let bytes_per_frame = u64::from(format.bits_per_sample / 8) * u64::from(format.channels);
    let bytes_per_second = u64::from(format.sample_rate) * bytes_per_frame;
    if bytes_per_second == 0 {
        return 0;
    }
    (u64::from(data_size) / bytes_per_second) as u32
}
