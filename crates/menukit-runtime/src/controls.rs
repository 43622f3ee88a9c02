#![forbid(unsafe_code)]

//! Key and joystick bindings.
//!
//! [`Controls`] turns raw input into [`ControlAction`]s. Keys that are not
//! bound fall through to the focused widget.
//!
//! Joystick axes report raw `i16` readings. A move fires once when an axis
//! leaves the dead zone and re-arms when it returns, so a held stick does
//! not flood the menu with moves.

use std::collections::HashMap;

use menukit_core::event::{JoystickEvent, KeyCode, KeyEvent};

/// A menu-level control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    /// Next widget in focus order (tab).
    Next,
    /// Previous widget in focus order (back-tab).
    Prev,
    /// Activate the focused widget.
    Apply,
    Back,
    Close,
}

pub const JOY_AXIS_X: u8 = 0;
pub const JOY_AXIS_Y: u8 = 1;
pub const JOY_BUTTON_SELECT: u8 = 0;
pub const JOY_BUTTON_BACK: u8 = 1;
/// Dead zone as a fraction of the axis range.
pub const JOY_DEADZONE: f32 = 0.5;

/// Input bindings plus joystick axis state.
#[derive(Debug, Clone)]
pub struct Controls {
    keys: HashMap<KeyCode, ControlAction>,
    buttons: HashMap<u8, ControlAction>,
    pub joystick_enabled: bool,
    pub deadzone: f32,
    /// Last direction reported per axis: -1, 0 or 1.
    axis_state: [i8; 2],
}

impl Default for Controls {
    fn default() -> Self {
        let keys = HashMap::from([
            (KeyCode::Up, ControlAction::MoveUp),
            (KeyCode::Down, ControlAction::MoveDown),
            (KeyCode::Left, ControlAction::MoveLeft),
            (KeyCode::Right, ControlAction::MoveRight),
            (KeyCode::Tab, ControlAction::Next),
            (KeyCode::BackTab, ControlAction::Prev),
            (KeyCode::Enter, ControlAction::Apply),
            (KeyCode::Backspace, ControlAction::Back),
            (KeyCode::Escape, ControlAction::Close),
        ]);
        let buttons = HashMap::from([
            (JOY_BUTTON_SELECT, ControlAction::Apply),
            (JOY_BUTTON_BACK, ControlAction::Back),
        ]);
        Self {
            keys,
            buttons,
            joystick_enabled: true,
            deadzone: JOY_DEADZONE,
            axis_state: [0; 2],
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key`, replacing any previous binding.
    #[must_use]
    pub fn bind(mut self, key: KeyCode, action: ControlAction) -> Self {
        self.keys.insert(key, action);
        self
    }

    #[must_use]
    pub fn unbind(mut self, key: KeyCode) -> Self {
        self.keys.remove(&key);
        self
    }

    #[must_use]
    pub fn bind_button(mut self, button: u8, action: ControlAction) -> Self {
        self.buttons.insert(button, action);
        self
    }

    #[must_use]
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone.clamp(0.0, 1.0);
        self
    }

    /// Action bound to a key press. Releases never map.
    pub fn map_key(&self, key: &KeyEvent) -> Option<ControlAction> {
        if !key.is_press() {
            return None;
        }
        self.keys.get(&key.code).copied()
    }

    pub fn map_joystick(&mut self, event: &JoystickEvent) -> Option<ControlAction> {
        if !self.joystick_enabled {
            return None;
        }
        match *event {
            JoystickEvent::Button { button, pressed } => {
                if pressed {
                    self.buttons.get(&button).copied()
                } else {
                    None
                }
            }
            JoystickEvent::Hat { x, y } => match (x.signum(), y.signum()) {
                (0, 1) => Some(ControlAction::MoveUp),
                (0, -1) => Some(ControlAction::MoveDown),
                (-1, 0) => Some(ControlAction::MoveLeft),
                (1, 0) => Some(ControlAction::MoveRight),
                _ => None,
            },
            JoystickEvent::Axis { axis, value } => {
                let slot = match axis {
                    JOY_AXIS_X => 0,
                    JOY_AXIS_Y => 1,
                    _ => return None,
                };
                let fraction = f32::from(value) / f32::from(i16::MAX);
                let direction: i8 = if fraction > self.deadzone {
                    1
                } else if fraction < -self.deadzone {
                    -1
                } else {
                    0
                };
                if direction == self.axis_state[slot] {
                    return None;
                }
                self.axis_state[slot] = direction;
                match (slot, direction) {
                    (0, -1) => Some(ControlAction::MoveLeft),
                    (0, 1) => Some(ControlAction::MoveRight),
                    (1, -1) => Some(ControlAction::MoveUp),
                    (1, 1) => Some(ControlAction::MoveDown),
                    _ => None,
                }
            }
        }
    }
}
