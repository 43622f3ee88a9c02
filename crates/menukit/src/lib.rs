#![forbid(unsafe_code)]

//! menukit public facade crate.
//!
//! Re-exports the common types of the internal crates and offers a small
//! prelude. Hosts feed [`Event`]s to a [`MenuController`] once per frame
//! and draw it through a [`Renderer`].

// --- Core re-exports -------------------------------------------------------

pub use menukit_core::event::{
    Event, JoystickEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
pub use menukit_core::geometry::{Point, Rect, Sides, Size};

// --- Layout re-exports -----------------------------------------------------

pub use menukit_layout::{
    Alignment, GridLayout, GridSpec, LayoutError, Orientation, PackSpec, RowSpec, ScrollArea,
};

// --- Widget re-exports -----------------------------------------------------

pub use menukit_widgets::{
    Callback, CellMetrics, DrawCommand, MenuAction, MenuId, Renderer, Rgba, SelectCallback,
    SelectionEffect, TextMetrics, Theme, Widget, WidgetError, WidgetId, WidgetKind,
    WidgetResponse, WidgetValue,
};

// --- Runtime re-exports ----------------------------------------------------

pub use menukit_runtime::{
    ClickOutside, ControlAction, Controls, Direction, FocusChange, Menu, MenuConfig,
    MenuController, MenuError, MenuEvent, MenuHook, MenuPosition, ScrollTarget,
};

/// Standard result type for menukit APIs.
pub type Result<T> = std::result::Result<T, MenuError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Alignment, Event, GridSpec, KeyCode, Menu, MenuAction, MenuConfig, MenuController,
        MenuError, MenuEvent, PackSpec, Renderer, Result, RowSpec, Theme, Widget, WidgetValue,
    };

    pub use crate::{core, layout, runtime, widgets};
}

pub use menukit_core as core;
pub use menukit_layout as layout;
pub use menukit_runtime as runtime;
pub use menukit_widgets as widgets;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_builds_a_menu() -> Result<()> {
        let mut root = Menu::new("Main", MenuConfig::new(320, 240))?;
        root.add_with_id("play", Widget::button("Play"))?;
        root.add_with_id("quit", Widget::button("Quit").action(MenuAction::Exit))?;
        let mut controller = MenuController::new(root);
        controller.update(&[Event::key(KeyCode::Down), Event::key(KeyCode::Enter)]);
        assert!(controller.exit_requested());
        Ok(())
    }
}
