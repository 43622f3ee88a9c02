#![forbid(unsafe_code)]

//! Input events consumed by menus.
//!
//! The host translates whatever its windowing or terminal layer delivers
//! into these events and hands them to the menu controller once per frame.
//! All events derive `Clone`, `PartialEq`, and `Eq` for use in tests and
//! pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are surface pixels, origin top-left.
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - Joystick axis values are raw signed 16-bit readings; the controls layer
//!   applies the dead zone.

use bitflags::bitflags;
#[cfg(feature = "crossterm")]
use crossterm::event as cte;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A mouse event.
    Mouse(MouseEvent),

    /// A joystick/gamepad event.
    Joystick(JoystickEvent),

    /// The drawing surface was resized.
    Resize {
        /// New surface width in pixels.
        width: i32,
        /// New surface height in pixels.
        height: i32,
    },

    /// The host window was asked to close.
    Quit,
}

impl Event {
    /// Convert a Crossterm event into a menukit [`Event`].
    ///
    /// Terminal cells are mapped 1:1 onto surface pixels.
    #[must_use]
    #[cfg(feature = "crossterm")]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        map_crossterm_event_internal(event)
    }

    /// Shorthand for a key press event.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Event::Key(KeyEvent::new(code))
    }

    /// Shorthand for a mouse event.
    #[must_use]
    pub const fn mouse(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Event::Mouse(MouseEvent::new(kind, x, y))
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key that produced the event.
    pub code: KeyCode,

    /// Held modifiers.
    pub modifiers: Modifiers,

    /// Press, repeat or release.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A press of `code` with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Replace the event kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this is the character `c`.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Press or auto-repeat; release events never drive navigation.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        matches!(self.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }

    /// Ctrl is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Alt is held.
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    /// Shift is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Keys menus react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Escape key.
    Escape,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Delete key.
    Delete,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Function key (F1-F24).
    F(u8),
}

/// Phase of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Pressed. Backends that cannot tell phases report this.
    #[default]
    Press,
    /// Auto-repeat while held.
    Repeat,
    /// Released.
    Release,
}

bitflags! {
    /// Modifier key set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// What the pointer did.
    pub kind: MouseEventKind,
    /// X coordinate in surface pixels.
    pub x: i32,
    /// Y coordinate in surface pixels.
    pub y: i32,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl MouseEvent {
    /// A mouse event at surface pixel `(x, y)`.
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// `(x, y)` in surface pixels.
    #[must_use]
    pub const fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Wheel direction as `(dx, dy)` steps, or `None` for non-wheel events.
    ///
    /// Positive `dy` scrolls content up (reveals content further down).
    #[must_use]
    pub const fn wheel_steps(&self) -> Option<(i32, i32)> {
        match self.kind {
            MouseEventKind::ScrollUp => Some((0, -1)),
            MouseEventKind::ScrollDown => Some((0, 1)),
            MouseEventKind::ScrollLeft => Some((-1, 0)),
            MouseEventKind::ScrollRight => Some((1, 0)),
            _ => None,
        }
    }
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Pointer moved with a button held.
    Drag(MouseButton),
    /// Pointer moved, no button held.
    Moved,
    /// Mouse wheel scrolled up.
    ScrollUp,
    /// Mouse wheel scrolled down.
    ScrollDown,
    /// Mouse wheel scrolled left (horizontal scroll).
    ScrollLeft,
    /// Mouse wheel scrolled right (horizontal scroll).
    ScrollRight,
}

/// Pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// A joystick/gamepad event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoystickEvent {
    /// Analog axis moved. `value` is the raw reading in `i16` range.
    Axis {
        /// Axis index (0 = horizontal, 1 = vertical on most pads).
        axis: u8,
        /// Raw axis value.
        value: i16,
    },
    /// Hat (d-pad) moved. Each component is -1, 0 or 1; `y = 1` is up.
    Hat {
        /// Horizontal component.
        x: i8,
        /// Vertical component.
        y: i8,
    },
    /// Button pressed or released.
    Button {
        /// Button index.
        button: u8,
        /// `true` on press.
        pressed: bool,
    },
}

#[cfg(feature = "crossterm")]
fn map_crossterm_event_internal(event: cte::Event) -> Option<Event> {
    match event {
        cte::Event::Key(key) => map_key_event(key).map(Event::Key),
        cte::Event::Mouse(mouse) => Some(Event::Mouse(map_mouse_event(mouse))),
        cte::Event::Resize(width, height) => Some(Event::Resize {
            width: i32::from(width),
            height: i32::from(height),
        }),
        cte::Event::Paste(_) | cte::Event::FocusGained | cte::Event::FocusLost => None,
    }
}

#[cfg(feature = "crossterm")]
fn map_key_event(event: cte::KeyEvent) -> Option<KeyEvent> {
    let code = map_key_code(event.code)?;
    let kind = match event.kind {
        cte::KeyEventKind::Press => KeyEventKind::Press,
        cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    };
    Some(KeyEvent {
        code,
        modifiers: map_modifiers(event.modifiers),
        kind,
    })
}

#[cfg(feature = "crossterm")]
fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    match code {
        cte::KeyCode::Backspace => Some(KeyCode::Backspace),
        cte::KeyCode::Enter => Some(KeyCode::Enter),
        cte::KeyCode::Left => Some(KeyCode::Left),
        cte::KeyCode::Right => Some(KeyCode::Right),
        cte::KeyCode::Up => Some(KeyCode::Up),
        cte::KeyCode::Down => Some(KeyCode::Down),
        cte::KeyCode::Home => Some(KeyCode::Home),
        cte::KeyCode::End => Some(KeyCode::End),
        cte::KeyCode::PageUp => Some(KeyCode::PageUp),
        cte::KeyCode::PageDown => Some(KeyCode::PageDown),
        cte::KeyCode::Tab => Some(KeyCode::Tab),
        cte::KeyCode::BackTab => Some(KeyCode::BackTab),
        cte::KeyCode::Delete => Some(KeyCode::Delete),
        cte::KeyCode::F(n) => Some(KeyCode::F(n)),
        cte::KeyCode::Char(c) => Some(KeyCode::Char(c)),
        cte::KeyCode::Esc => Some(KeyCode::Escape),
        _ => None,
    }
}

#[cfg(feature = "crossterm")]
fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    let mut mapped = Modifiers::NONE;
    if modifiers.contains(cte::KeyModifiers::SHIFT) {
        mapped |= Modifiers::SHIFT;
    }
    if modifiers.contains(cte::KeyModifiers::ALT) {
        mapped |= Modifiers::ALT;
    }
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        mapped |= Modifiers::CTRL;
    }
    if modifiers.contains(cte::KeyModifiers::SUPER)
        || modifiers.contains(cte::KeyModifiers::HYPER)
        || modifiers.contains(cte::KeyModifiers::META)
    {
        mapped |= Modifiers::SUPER;
    }
    mapped
}

#[cfg(feature = "crossterm")]
fn map_mouse_event(event: cte::MouseEvent) -> MouseEvent {
    let kind = match event.kind {
        cte::MouseEventKind::Down(button) => MouseEventKind::Down(map_mouse_button(button)),
        cte::MouseEventKind::Up(button) => MouseEventKind::Up(map_mouse_button(button)),
        cte::MouseEventKind::Drag(button) => MouseEventKind::Drag(map_mouse_button(button)),
        cte::MouseEventKind::Moved => MouseEventKind::Moved,
        cte::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        cte::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        cte::MouseEventKind::ScrollLeft => MouseEventKind::ScrollLeft,
        cte::MouseEventKind::ScrollRight => MouseEventKind::ScrollRight,
    };

    MouseEvent::new(kind, i32::from(event.column), i32::from(event.row))
        .with_modifiers(map_modifiers(event.modifiers))
}

#[cfg(feature = "crossterm")]
fn map_mouse_button(button: cte::MouseButton) -> MouseButton {
    match button {
        cte::MouseButton::Left => MouseButton::Left,
        cte::MouseButton::Right => MouseButton::Right,
        cte::MouseButton::Middle => MouseButton::Middle,
    }
}
