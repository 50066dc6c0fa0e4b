//! Ogg Vorbis: identification and comment packets from the first pages,
//! duration from the granule position of the final page.

use std::io::{Read, Seek};

use tracing::debug;

use super::reader::Reader;
use super::{ParseError, SongMetadata, vorbis};

/// Leading pages inspected for the Vorbis headers.
const HEADER_PAGES: usize = 10;
/// Tail of the file searched backwards for the last page.
const TAIL_WINDOW: u64 = 64 * 1024;
const CAPTURE: &[u8; 4] = b"OggS";
/// Capture pattern, version, header type and granule position.
const GRANULE_END: usize = 14;
const NO_GRANULE: u64 = u64::MAX;

const IDENTIFICATION_PACKET: u8 = 1;
const COMMENT_PACKET: u8 = 3;

pub(super) fn parse<R: Read + Seek + ?Sized>(file: &mut R) -> Result<SongMetadata, ParseError> {
    let mut r = Reader::new(file)?;
    let mut metadata = SongMetadata::default();

    if r.bytes::<4>()? != *CAPTURE {
        return Err(ParseError::BadMagic { expected: "OggS" });
    }
    r.seek_to(0)?;

    let mut sample_rate: u32 = 0;
    let mut leading_granule: u64 = 0;

    for page in 0..HEADER_PAGES {
        if r.remaining()? < 27 {
            break;
        }
        let header = r.bytes::<27>()?;
        if header[..4] != *CAPTURE {
            break;
        }
        let granule = granule_at(&header);
        if granule != NO_GRANULE {
            leading_granule = leading_granule.max(granule);
        }

        let segments = usize::from(header[26]);
        let mut table = [0u8; 255];
        r.read_exact(&mut table[..segments])?;
        let payload_len: u64 = table[..segments].iter().map(|&s| u64::from(s)).sum();
        let payload_start = r.position()?;
        let payload_end = payload_start + payload_len;

        let inspected = match page {
            0 => read_identification(&mut r, payload_end).map(|rate| {
                if let Some(rate) = rate {
                    sample_rate = rate;
                }
            }),
            1 => read_comment_packet(&mut r, payload_end, &mut metadata),
            _ => Ok(()),
        };
        if let Err(e) = inspected {
            debug!(page, error = %e, "ogg header packet unreadable");
        }

        if payload_end >= r.len() {
            break;
        }
        r.seek_to(payload_end)?;
    }

    let granule = last_granule(&mut r)?.unwrap_or(leading_granule);
    if sample_rate > 0 {
        metadata.duration = (granule / u64::from(sample_rate)) as u32;
    }
    Ok(metadata)
}

fn granule_at(page: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&page[6..GRANULE_END]);
    u64::from_le_bytes(bytes)
}

/// Packet type byte followed by the `vorbis` signature.
fn packet_header<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    end: u64,
) -> Result<(u8, bool), ParseError> {
    r.ensure_within(7, end)?;
    let kind = r.u8()?;
    let signature = r.bytes::<6>()?;
    Ok((kind, signature == *b"vorbis"))
}

fn read_identification<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    end: u64,
) -> Result<Option<u32>, ParseError> {
    match packet_header(r, end)? {
        (IDENTIFICATION_PACKET, true) => {
            r.ensure_within(9, end)?;
            r.skip(5)?; // version, channels
            Ok(Some(r.u32_le()?))
        }
        _ => Ok(None),
    }
}

fn read_comment_packet<R: Read + Seek + ?Sized>(
    r: &mut Reader<'_, R>,
    end: u64,
    metadata: &mut SongMetadata,
) -> Result<(), ParseError> {
    match packet_header(r, end)? {
        (COMMENT_PACKET, true) => vorbis::parse_comments(r, end, metadata),
        _ => Ok(()),
    }
}

/// Granule of the last page in the file tail that carries one.
fn last_granule<R: Read + Seek + ?Sized>(r: &mut Reader<'_, R>) -> Result<Option<u64>, ParseError> {
    let start = r.len().saturating_sub(TAIL_WINDOW);
    r.seek_to(start)?;
    let mut tail = vec![0u8; (r.len() - start) as usize];
    let filled = r.read_up_to(&mut tail)?;
    tail.truncate(filled);

    let found = tail
        .windows(GRANULE_END)
        .rev()
        .filter(|w| w[..4] == *CAPTURE)
        .map(granule_at)
        .find(|&granule| granule != NO_GRANULE);
    Ok(found)
}
