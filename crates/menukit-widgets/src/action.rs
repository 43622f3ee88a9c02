#![forbid(unsafe_code)]

//! Menu-level actions requested by widgets, callbacks and key bindings.

use std::fmt;

/// Handle to a menu owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(pub u32);

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

/// A request for the controller.
///
/// Requests raised while an `update` call runs are queued and applied in
/// order once the call finishes processing its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Push a menu onto the stack.
    Open(MenuId),
    /// Pop one level. No-op at the root.
    Back,
    /// Pop one level; at the root, close the controller.
    Close,
    /// Pop up to `n` levels, never the root.
    Reset(usize),
    /// Pop to the root.
    FullReset,
    /// Ask the host application to exit.
    Exit,
}
