//! Buttons, debounce and the volume knob.

/// Highest reading of the volume knob.
pub const KNOB_MAX: u16 = 1023;

const BUTTON_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Play,
    Stop,
    Up,
    Down,
    Next,
    Back,
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Play,
        Button::Stop,
        Button::Up,
        Button::Down,
        Button::Next,
        Button::Back,
    ];

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of pressed buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn only(button: Button) -> Self {
        Self(button.bit())
    }

    #[cfg(test)]
    pub fn with(mut self, button: Button) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    #[cfg(test)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Button> {
        Button::ALL.into_iter().filter(move |&b| self.contains(b))
    }
}

impl From<Button> for ButtonSet {
    fn from(button: Button) -> Self {
        Self::only(button)
    }
}

/// Everything the machine reads from the controls in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inputs {
    /// Debounced presses.
    pub buttons: ButtonSet,
    /// Volume knob, `0..=KNOB_MAX`.
    pub knob: u16,
    pub autoplay: bool,
}

impl Inputs {
    pub fn new(buttons: impl Into<ButtonSet>, knob: u16, autoplay: bool) -> Self {
        Self {
            buttons: buttons.into(),
            knob,
            autoplay,
        }
    }
}

/// Per-button minimum interval between accepted presses.
///
/// A button is ready again once `interval_ms` has passed since it last fired.
#[derive(Debug, Clone)]
pub struct Debouncer {
    interval_ms: u64,
    last_accepted: [Option<u64>; BUTTON_COUNT],
}

impl Debouncer {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_accepted: [None; BUTTON_COUNT],
        }
    }

    /// Filter raw presses down to the ones that may trigger an action now.
    pub fn accept(&mut self, raw: ButtonSet, now_ms: u64) -> ButtonSet {
        let mut accepted = ButtonSet::empty();
        for button in raw.iter() {
            let slot = &mut self.last_accepted[button as usize];
            let ready = match *slot {
                Some(last) => now_ms.saturating_sub(last) >= self.interval_ms,
                None => true,
            };
            if ready {
                *slot = Some(now_ms);
                accepted.insert(button);
            }
        }
        accepted
    }
}

/// Map a knob reading (`0..=KNOB_MAX`) linearly onto a 0–100 volume.
pub fn volume_from_level(level: u16) -> u8 {
    (u32::from(level.min(KNOB_MAX)) * 100 / u32::from(KNOB_MAX)) as u8
}
