#![forbid(unsafe_code)]

//! Widgets for menukit.
//!
//! Every widget is a [`Widget`]: shared attributes (id-independent title,
//! flags, alignment, padding, selection effect, callbacks) around a closed
//! set of variants in [`WidgetKind`]. The runtime owns widgets in an arena
//! and drives them through one capability surface:
//!
//! - [`Widget::measure`] - natural size from [`TextMetrics`]
//! - [`Widget::update`] - apply an input event while focused
//! - [`Widget::value`] / [`Widget::set_value`] / [`Widget::reset_value`]
//! - [`Widget::draw`] - emit [`DrawCommand`]s for a rectangle and clip

pub mod action;
pub mod cursor;
pub mod draw;
pub mod metrics;
pub mod selection;
pub mod theme;
pub mod value;
pub mod widget;

pub use action::{MenuAction, MenuId};
pub use cursor::TextCursor;
pub use draw::{DrawCommand, Renderer};
pub use metrics::{CellMetrics, TextMetrics};
pub use selection::{SelectionEffect, SelectionStyle};
pub use theme::{Rgba, Theme};
pub use value::{Callback, SelectCallback, WidgetError, WidgetId, WidgetValue};
pub use widget::{Widget, WidgetFlags, WidgetKind, WidgetResponse};
