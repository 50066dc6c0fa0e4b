//! Host audio transport.
//!
//! The state machine only ever starts, pauses, stops and polls a song. This
//! module provides that through the [`Transport`] trait, implemented by
//! [`AudioPlayer`] on top of a dedicated `rodio` thread.

mod player;
mod sink;
mod thread;
mod types;

pub use player::AudioPlayer;
pub use types::{AudioError, Transport};

#[cfg(test)]
mod tests;
