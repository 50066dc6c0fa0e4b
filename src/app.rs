//! Playback state machine and the input model in front of it.
//!
//! `App` owns the catalog and the playback cursor. The runtime calls
//! [`App::tick`] once per loop iteration with the current time and the
//! debounced inputs; the machine talks to storage, transport and display
//! through the collaborators in [`Peripherals`].

mod clock;
mod input;
mod machine;
mod model;

pub use clock::{Clock, MonotonicClock};
pub use input::{Button, ButtonSet, Debouncer, Inputs, KNOB_MAX, volume_from_level};
pub use machine::Peripherals;
pub use model::*;

#[cfg(test)]
mod tests;
