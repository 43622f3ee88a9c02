#![forbid(unsafe_code)]

//! Widget identity, values and value callbacks.

use std::borrow::Borrow;
use std::fmt;

use crate::MenuAction;

/// Stable widget identifier, unique within its menu.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WidgetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WidgetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for WidgetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Value carried by a widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum WidgetValue {
    /// Widgets without a value (labels, buttons, frames).
    #[default]
    None,
    /// Toggle state.
    Bool(bool),
    /// Text input contents.
    Text(String),
    /// Selector option index.
    Index(usize),
}

impl WidgetValue {
    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Text(_) => "text",
            Self::Index(_) => "index",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Self::Index(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Change/return callback.
///
/// Invoked synchronously inside `update` with the widget id and its new
/// value; the returned action (if any) is queued for the controller.
pub type Callback = Box<dyn FnMut(&WidgetId, &WidgetValue) -> Option<MenuAction>>;

/// Focus callback: the widget id and `true` on focus, `false` on blur.
pub type SelectCallback = Box<dyn FnMut(&WidgetId, bool) -> Option<MenuAction>>;

/// Rejected value assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    ValueMismatch {
        expected: &'static str,
        got: &'static str,
    },
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    TooLong {
        len: usize,
        max: usize,
    },
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValueMismatch { expected, got } => {
                write!(f, "expected a {expected} value, got {got}")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "option index {index} out of range for {len} options")
            }
            Self::TooLong { len, max } => {
                write!(f, "text of {len} graphemes exceeds the maximum of {max}")
            }
        }
    }
}

impl std::error::Error for WidgetError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_id_conversions() {
        let a = WidgetId::from("play");
        let b = WidgetId::from(String::from("play"));
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "play");
        assert_eq!(a.to_string(), "play");
    }

    #[test]
    fn value_accessors() {
        assert_eq!(WidgetValue::Bool(true).as_bool(), Some(true));
        assert_eq!(WidgetValue::Text("x".into()).as_text(), Some("x"));
        assert_eq!(WidgetValue::Index(2).as_index(), Some(2));
        assert_eq!(WidgetValue::Index(2).as_bool(), None);
        assert!(WidgetValue::default().is_none());
    }

    #[test]
    fn error_display() {
        let err = WidgetError::ValueMismatch {
            expected: "bool",
            got: "text",
        };
        assert_eq!(err.to_string(), "expected a bool value, got text");
    }
}
