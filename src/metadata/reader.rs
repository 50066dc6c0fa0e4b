//! Bounds-checked primitive reads over a seekable stream.

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use super::ParseError;

pub(super) struct Reader<'a, R: ?Sized> {
    inner: &'a mut R,
    len: u64,
}

impl<'a, R: Read + Seek + ?Sized> Reader<'a, R> {
    /// Wrap `inner`, measuring its length and rewinding to offset 0.
    pub fn new(inner: &'a mut R) -> Result<Self, ParseError> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn position(&mut self) -> Result<u64, ParseError> {
        Ok(self.inner.stream_position()?)
    }

    pub fn remaining(&mut self) -> Result<u64, ParseError> {
        Ok(self.len.saturating_sub(self.position()?))
    }

    /// Seek to an absolute offset; offsets past the end of the file fail.
    pub fn seek_to(&mut self, offset: u64) -> Result<(), ParseError> {
        if offset > self.len {
            return Err(ParseError::OutOfBounds {
                offset,
                limit: self.len,
            });
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn skip(&mut self, count: u64) -> Result<(), ParseError> {
        let here = self.position()?;
        self.seek_to(here.saturating_add(count))
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), ParseError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => ParseError::Truncated,
            _ => ParseError::Io(e),
        })
    }

    /// Read as many bytes as are available, up to `buf.len()`.
    pub fn read_up_to(&mut self, buf: &mut [u8]) -> Result<usize, ParseError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    pub fn bytes<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut buf = [0u8; N];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.bytes::<1>()?[0])
    }

    pub fn u16_le(&mut self) -> Result<u16, ParseError> {
        Ok(u16::from_le_bytes(self.bytes()?))
    }

    pub fn u32_le(&mut self) -> Result<u32, ParseError> {
        Ok(u32::from_le_bytes(self.bytes()?))
    }

    pub fn u24_be(&mut self) -> Result<u32, ParseError> {
        let [a, b, c] = self.bytes::<3>()?;
        Ok(u32::from_be_bytes([0, a, b, c]))
    }

    /// Fail unless `count` more bytes fit before `limit`.
    pub fn ensure_within(&mut self, count: u64, limit: u64) -> Result<(), ParseError> {
        let end = self.position()?.saturating_add(count);
        if end > limit || end > self.len {
            return Err(ParseError::OutOfBounds {
                offset: end,
                limit: limit.min(self.len),
            });
        }
        Ok(())
    }
}

/// Decode an ID3v2 sync-safe integer (7 usable bits per byte).
pub(super) fn syncsafe(bytes: [u8; 4]) -> u32 {
    (u32::from(bytes[0] & 0x7F) << 21)
        | (u32::from(bytes[1] & 0x7F) << 14)
        | (u32::from(bytes[2] & 0x7F) << 7)
        | u32::from(bytes[3] & 0x7F)
}

/// Round a RIFF chunk size up to the next even number.
pub(super) fn word_aligned(size: u32) -> u64 {
    (u64::from(size) + 1) & !1
}
