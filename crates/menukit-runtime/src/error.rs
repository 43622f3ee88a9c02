#![forbid(unsafe_code)]

//! Configuration errors.
//!
//! Only calls that change a menu's structure or configuration return
//! errors. Runtime calls with stale ids are no-ops, and `update`/`draw`
//! never fail.

use std::fmt;

use menukit_layout::LayoutError;
use menukit_widgets::{MenuId, WidgetError, WidgetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    Layout(LayoutError),
    Value {
        widget: WidgetId,
        source: WidgetError,
    },
    DuplicateWidget(WidgetId),
    UnknownWidget(WidgetId),
    NotAFrame(WidgetId),
    AlreadyPacked {
        widget: WidgetId,
        frame: WidgetId,
    },
    NotPacked(WidgetId),
    PackIntoSelf(WidgetId),
    PackAncestor {
        frame: WidgetId,
        widget: WidgetId,
    },
    UnknownMenu(MenuId),
    /// Two menus reachable from the same root use the same value-bearing
    /// widget id.
    DuplicateInputId {
        widget: WidgetId,
        menu: MenuId,
    },
    InvalidSize {
        width: i32,
        height: i32,
    },
    InvalidSetting {
        name: &'static str,
        value: i32,
    },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layout(err) => write!(f, "invalid layout: {err}"),
            Self::Value { widget, source } => {
                write!(f, "invalid value for widget {widget}: {source}")
            }
            Self::DuplicateWidget(id) => write!(f, "widget id {id} is already used in this menu"),
            Self::UnknownWidget(id) => write!(f, "widget {id} not found in this menu"),
            Self::NotAFrame(id) => write!(f, "widget {id} is not a frame"),
            Self::AlreadyPacked { widget, frame } => {
                write!(f, "widget {widget} is already packed in frame {frame}")
            }
            Self::NotPacked(id) => write!(f, "widget {id} is not packed in a frame"),
            Self::PackIntoSelf(id) => write!(f, "frame {id} cannot be packed into itself"),
            Self::PackAncestor { frame, widget } => write!(
                f,
                "cannot pack {widget} into {frame}: {widget} contains {frame}"
            ),
            Self::UnknownMenu(id) => write!(f, "{id} is not registered with the controller"),
            Self::DuplicateInputId { widget, menu } => write!(
                f,
                "widget id {widget} in {menu} collides with a widget of another menu"
            ),
            Self::InvalidSize { width, height } => {
                write!(f, "menu size must be positive (got {width}x{height})")
            }
            Self::InvalidSetting { name, value } => {
                write!(f, "{name} must not be negative (got {value})")
            }
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            Self::Value { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LayoutError> for MenuError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}
