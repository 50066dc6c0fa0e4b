//! Opening and decoding files into `rodio` sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, Sink};

use super::types::AudioError;

pub(super) fn decode_file(path: &Path) -> Result<Decoder<BufReader<File>>, AudioError> {
    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Decoder::new(BufReader::new(file)).map_err(|source| AudioError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// A playing `Sink` for `path` at `volume` (0–100).
pub(super) fn create_sink(stream: &OutputStream, path: &Path, volume: u8) -> Result<Sink, AudioError> {
    let source = decode_file(path)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(gain(volume));
    sink.append(source);
    Ok(sink)
}

/// Linear 0–100 volume to a `rodio` gain factor.
pub(super) fn gain(volume: u8) -> f32 {
    f32::from(volume.min(100)) / 100.0
}
