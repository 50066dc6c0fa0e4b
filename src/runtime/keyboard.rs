//! Keyboard stand-in for the front panel.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{Button, ButtonSet, Debouncer, Inputs, KNOB_MAX};
use crate::config::ControlsSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Press(Button),
    VolumeUp,
    VolumeDown,
    ToggleAutoplay,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(KeyAction::Quit);
    }
    let action = match key.code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => KeyAction::Press(Button::Play),
        KeyCode::Char('s') => KeyAction::Press(Button::Stop),
        KeyCode::Char('k') | KeyCode::Up => KeyAction::Press(Button::Up),
        KeyCode::Char('j') | KeyCode::Down => KeyAction::Press(Button::Down),
        KeyCode::Char('l') | KeyCode::Right => KeyAction::Press(Button::Next),
        KeyCode::Char('h') | KeyCode::Left => KeyAction::Press(Button::Back),
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::VolumeUp,
        KeyCode::Char('-') => KeyAction::VolumeDown,
        KeyCode::Char('a') => KeyAction::ToggleAutoplay,
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Buttons pressed since the last tick, the knob and the autoplay switch.
#[derive(Debug)]
pub struct Panel {
    pressed: ButtonSet,
    knob: u16,
    step: u16,
    autoplay: bool,
    debouncer: Debouncer,
}

impl Panel {
    pub fn new(controls: &ControlsSettings, autoplay: bool) -> Self {
        Self {
            pressed: ButtonSet::empty(),
            knob: controls.initial_volume_level.min(KNOB_MAX),
            step: controls.volume_step,
            autoplay,
            debouncer: Debouncer::new(controls.debounce_ms),
        }
    }

    pub fn knob(&self) -> u16 {
        self.knob
    }

    #[cfg(test)]
    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Record a key action; `Quit` is left to the caller.
    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Press(button) => self.pressed.insert(button),
            KeyAction::VolumeUp => self.knob = self.knob.saturating_add(self.step).min(KNOB_MAX),
            KeyAction::VolumeDown => self.knob = self.knob.saturating_sub(self.step),
            KeyAction::ToggleAutoplay => self.autoplay = !self.autoplay,
            KeyAction::Quit => {}
        }
    }

    /// Debounced inputs for the tick at `now_ms`; pending presses are consumed.
    pub fn take_inputs(&mut self, now_ms: u64) -> Inputs {
        let raw = std::mem::take(&mut self.pressed);
        let buttons = self.debouncer.accept(raw, now_ms);
        Inputs::new(buttons, self.knob, self.autoplay)
    }
}
