#![forbid(unsafe_code)]

//! Frame packing.
//!
//! A frame stacks its children along one axis. With `n` visible children
//! and spacing `s`:
//!
//! ```text
//! main  = Σ child_outer.main + (n + 1) · s
//! cross = max(child_outer.cross) + 2 · s
//! ```
//!
//! where `child_outer` is the child's size (selection-effect margin already
//! included by the caller) plus its pack margin. An empty frame measures
//! `2s × 2s`. When the content exceeds the frame's maximum on an axis the
//! reported size is clamped to that maximum and the axis scrolls.

use crate::{Alignment, LayoutError, Orientation, Rect, Sides, Size};

/// Frame configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackSpec {
    pub orientation: Orientation,
    pub spacing: i32,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
}

impl PackSpec {
    pub const fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            spacing: 0,
            max_width: None,
            max_height: None,
        }
    }

    pub const fn vertical() -> Self {
        Self::new(Orientation::Vertical)
    }

    pub const fn horizontal() -> Self {
        Self::new(Orientation::Horizontal)
    }

    #[must_use]
    pub const fn spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Cap the frame size; content beyond it scrolls.
    #[must_use]
    pub const fn max_size(mut self, width: Option<i32>, height: Option<i32>) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.spacing < 0 {
            return Err(LayoutError::NegativeSpacing {
                spacing: self.spacing,
            });
        }
        if self.max_width.is_some_and(|w| w <= 0) || self.max_height.is_some_and(|h| h <= 0) {
            return Err(LayoutError::InvalidMaxSize {
                width: self.max_width.unwrap_or(0),
                height: self.max_height.unwrap_or(0),
            });
        }
        Ok(())
    }

    /// Lay out `children` in order.
    pub fn solve(&self, children: &[PackChild]) -> PackLayout {
        let axis = self.orientation;
        let spacing = self.spacing.max(0);

        let content = if children.is_empty() {
            Size::new(2 * spacing, 2 * spacing)
        } else {
            let main: i32 = children.iter().map(|c| axis.main(c.outer())).sum::<i32>()
                + (children.len() as i32 + 1) * spacing;
            let cross = children
                .iter()
                .map(|c| axis.cross(c.outer()))
                .max()
                .unwrap_or(0)
                + 2 * spacing;
            axis.size(main, cross)
        };

        let inner_cross = axis.cross(content) - 2 * spacing;
        let mut cursor = spacing;
        let rects = children
            .iter()
            .map(|child| {
                let outer = child.outer();
                let (lead_main, lead_cross) = match axis {
                    Orientation::Horizontal => (child.margin.left, child.margin.top),
                    Orientation::Vertical => (child.margin.top, child.margin.left),
                };
                let cross = spacing + child.align.offset(inner_cross, axis.cross(outer)) + lead_cross;
                let origin = axis.point(cursor + lead_main, cross);
                cursor += axis.main(outer) + spacing;
                Rect::from_origin_size(origin, child.size)
            })
            .collect();

        let size = Size::new(
            clamp_axis(content.width, self.max_width),
            clamp_axis(content.height, self.max_height),
        );

        PackLayout {
            children: rects,
            content,
            size,
        }
    }
}

fn clamp_axis(len: i32, max: Option<i32>) -> i32 {
    match max {
        Some(max) => len.min(max),
        None => len,
    }
}

/// One child to pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackChild {
    /// Child size, selection-effect margin included.
    pub size: Size,
    /// Extra space the frame reserves around the child.
    pub margin: Sides,
    /// Cross-axis alignment.
    pub align: Alignment,
}

impl PackChild {
    pub const fn new(size: Size) -> Self {
        Self {
            size,
            margin: Sides::ZERO,
            align: Alignment::Start,
        }
    }

    #[must_use]
    pub const fn margin(mut self, margin: Sides) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub const fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Size plus pack margin.
    pub const fn outer(&self) -> Size {
        self.size.expand(self.margin)
    }
}

/// Result of [`PackSpec::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackLayout {
    /// Child rectangles in content space, margin excluded.
    pub children: Vec<Rect>,
    /// Full content size.
    pub content: Size,
    /// Size the frame reports to its parent (content clamped to max).
    pub size: Size,
}

impl PackLayout {
    /// Whether the content overflows the frame on either axis.
    pub fn overflows(&self) -> bool {
        self.content.width > self.size.width || self.content.height > self.size.height
    }
}
