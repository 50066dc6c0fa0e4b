use super::player::resolve_under;
use super::sink::{decode_file, gain};
use super::thread::sink_finished;
use super::types::{AudioError, TransportInfo};
use rodio::Sink;
use std::path::{Path, PathBuf};

#[test]
fn gain_is_linear_and_clamped() {
    assert_eq!(gain(0), 0.0);
    assert_eq!(gain(50), 0.5);
    assert_eq!(gain(100), 1.0);
    assert_eq!(gain(255), 1.0);
}

#[test]
fn catalog_paths_resolve_under_the_root() {
    let root = Path::new("/media/sd");
    assert_eq!(
        resolve_under(root, "/Artist/Album/01.mp3"),
        PathBuf::from("/media/sd/Artist/Album/01.mp3")
    );
    assert_eq!(resolve_under(root, ""), PathBuf::from("/media/sd"));
}

#[test]
fn nothing_started_counts_as_stopped() {
    let info = TransportInfo::default();
    assert!(info.stopped);
    assert!(!info.paused);
    assert!(info.path.is_none());
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.mp3");
    assert!(matches!(
        decode_file(&missing),
        Err(AudioError::Open { ref path, .. }) if path == &missing
    ));
}

#[test]
fn garbage_is_a_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();
    assert!(matches!(decode_file(&path), Err(AudioError::Decode { .. })));
}

#[test]
fn a_drained_sink_is_finished_unless_paused() {
    let (sink, _queue) = Sink::new();
    assert!(sink.empty());
    assert!(sink_finished(Some(&sink), false));
    assert!(!sink_finished(Some(&sink), true));
    assert!(!sink_finished(None, false));
}
