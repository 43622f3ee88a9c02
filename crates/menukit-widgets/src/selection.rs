#![forbid(unsafe_code)]

//! Selection effects.
//!
//! A selection effect decorates the focused widget. Geometrically it is a
//! margin reserved around every selectable widget, so focusing a widget
//! never moves its neighbours; visually it is a few extra draw commands.

use menukit_core::geometry::{Point, Rect, Sides};

use crate::draw::emit;
use crate::{DrawCommand, Renderer, Rgba};

/// Shape of the decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionStyle {
    /// No decoration and no margin.
    None,
    /// Only the text color changes.
    Simple,
    /// Border box around the widget.
    Highlight {
        margin_x: i32,
        margin_y: i32,
        border_width: i32,
    },
    /// Arrow left of the widget, pointing right.
    LeftArrow { width: i32, height: i32, gap: i32 },
    /// Arrow right of the widget, pointing left.
    RightArrow { width: i32, height: i32, gap: i32 },
}

/// Decoration of the focused widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionEffect {
    pub style: SelectionStyle,
    pub color: Rgba,
}

impl Default for SelectionEffect {
    fn default() -> Self {
        Self::highlight()
    }
}

impl SelectionEffect {
    pub const fn new(style: SelectionStyle, color: Rgba) -> Self {
        Self { style, color }
    }

    pub const fn none() -> Self {
        Self::new(SelectionStyle::None, Rgba::TRANSPARENT)
    }

    pub const fn simple() -> Self {
        Self::new(SelectionStyle::Simple, Rgba::TRANSPARENT)
    }

    pub const fn highlight() -> Self {
        Self::new(
            SelectionStyle::Highlight {
                margin_x: 16,
                margin_y: 8,
                border_width: 1,
            },
            Rgba::WHITE,
        )
    }

    pub const fn left_arrow() -> Self {
        Self::new(
            SelectionStyle::LeftArrow {
                width: 10,
                height: 15,
                gap: 5,
            },
            Rgba::WHITE,
        )
    }

    pub const fn right_arrow() -> Self {
        Self::new(
            SelectionStyle::RightArrow {
                width: 10,
                height: 15,
                gap: 5,
            },
            Rgba::WHITE,
        )
    }

    #[must_use]
    pub const fn with_color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Space reserved around a selectable widget.
    pub const fn margin(&self) -> Sides {
        match self.style {
            SelectionStyle::None | SelectionStyle::Simple => Sides::ZERO,
            SelectionStyle::Highlight {
                margin_x, margin_y, ..
            } => Sides::new(margin_y / 2, margin_x / 2, margin_y / 2, margin_x / 2),
            SelectionStyle::LeftArrow { width, gap, .. } => Sides::new(0, 0, 0, width + gap),
            SelectionStyle::RightArrow { width, gap, .. } => Sides::new(0, width + gap, 0, 0),
        }
    }

    /// Whether focus also switches the text to the focused color.
    pub const fn recolors_text(&self) -> bool {
        !matches!(self.style, SelectionStyle::None)
    }

    /// Decorate a widget drawn at `rect` (margin excluded).
    pub fn draw(&self, rect: Rect, clip: Rect, out: &mut dyn Renderer) {
        let color = self.color;
        match self.style {
            SelectionStyle::None | SelectionStyle::Simple => {}
            SelectionStyle::Highlight { border_width, .. } => emit(
                out,
                DrawCommand::Outline {
                    rect: rect.outer(self.margin()),
                    clip,
                    color,
                    width: border_width,
                },
            ),
            SelectionStyle::LeftArrow { width, height, gap } => {
                let tip = Point::new(rect.x - gap, rect.center().y);
                let points = [
                    tip,
                    Point::new(tip.x - width, tip.y - height / 2),
                    Point::new(tip.x - width, tip.y + height / 2),
                ];
                emit(out, DrawCommand::Triangle { points, clip, color });
            }
            SelectionStyle::RightArrow { width, height, gap } => {
                let tip = Point::new(rect.right() + gap, rect.center().y);
                let points = [
                    tip,
                    Point::new(tip.x + width, tip.y - height / 2),
                    Point::new(tip.x + width, tip.y + height / 2),
                ];
                emit(out, DrawCommand::Triangle { points, clip, color });
            }
        }
    }
}
