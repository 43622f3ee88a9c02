#![forbid(unsafe_code)]

//! Menus, focus navigation and the menu stack.
//!
//! A [`Menu`] owns its widgets, lays them out on a column/row grid (frames
//! pack their own children) and tracks the single focused widget. A
//! [`MenuController`] owns menus by [`MenuId`](menukit_widgets::MenuId),
//! keeps the open/back/close stack and routes input to the active menu.
//!
//! ```ignore
//! use menukit_runtime::{Menu, MenuConfig, MenuController};
//! use menukit_widgets::Widget;
//!
//! let mut root = Menu::new("Main", MenuConfig::new(600, 400))?;
//! root.add_with_id("play", Widget::button("Play"))?;
//! let mut controller = MenuController::new(root);
//! controller.update(&events);
//! controller.draw(&mut renderer);
//! ```

pub mod config;
pub mod controller;
pub mod controls;
pub mod error;
pub mod menu;
pub mod navigation;

pub use config::{ClickOutside, MenuConfig, MenuPosition};
pub use controller::{MenuController, MenuEvent};
pub use controls::{ControlAction, Controls};
pub use error::MenuError;
pub use menu::{FocusChange, Menu, MenuHook, ScrollTarget};
pub use navigation::Direction;
