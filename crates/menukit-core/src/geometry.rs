#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are surface pixels. Positions are signed because scrolled
//! content legitimately sits above or left of its viewport; sizes are kept
//! non-negative by every constructor and operation in this module.

/// A point on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    /// Zero size.
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    /// Create a new size. Negative components are clamped to zero.
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grow by the given sides.
    #[inline]
    pub const fn expand(self, sides: Sides) -> Self {
        Self::new(
            self.width.saturating_add(sides.horizontal_sum()),
            self.height.saturating_add(sides.vertical_sum()),
        )
    }

    /// Component-wise minimum.
    #[inline]
    pub fn clamp_max(self, max: Size) -> Self {
        Self::new(self.width.min(max.width), self.height.min(max.height))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn clamp_min(self, min: Size) -> Self {
        Self::new(self.width.max(min.width), self.height.max(min.height))
    }
}

impl From<(i32, i32)> for Size {
    fn from((width, height): (i32, i32)) -> Self {
        Self::new(width, height)
    }
}

/// A rectangle for clip regions, layout bounds, and hit testing.
///
/// Origin at the top-left, `right`/`bottom` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: i32,
    /// Top edge (inclusive).
    pub y: i32,
    /// Width in pixels (never negative).
    pub width: i32,
    /// Height in pixels (never negative).
    pub height: i32,
}

impl Rect {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Create a rectangle at `origin` with `size`.
    #[inline]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Left edge (inclusive). Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> i32 {
        self.x
    }

    /// Top edge (inclusive). Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> i32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Center point (rounded toward the origin).
    #[inline]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Area in pixels.
    #[inline]
    pub const fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Translate by `(dx, dy)`.
    #[inline]
    pub const fn offset(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Rect) -> Rect {
        self.intersection_opt(other).unwrap_or_default()
    }

    /// Compute the intersection with another rectangle, returning `None` if no overlap.
    #[inline]
    pub fn intersection_opt(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Some(Rect::new(x, y, right - x, bottom - y))
        } else {
            None
        }
    }

    /// Create a new rectangle inside the current one with the given margin.
    pub fn inner(&self, margin: Sides) -> Rect {
        Rect::new(
            self.x.saturating_add(margin.left),
            self.y.saturating_add(margin.top),
            self.width
                .saturating_sub(margin.left)
                .saturating_sub(margin.right),
            self.height
                .saturating_sub(margin.top)
                .saturating_sub(margin.bottom),
        )
    }

    /// Create a new rectangle around the current one with the given margin.
    pub fn outer(&self, margin: Sides) -> Rect {
        Rect::new(
            self.x.saturating_sub(margin.left),
            self.y.saturating_sub(margin.top),
            self.width.saturating_add(margin.horizontal_sum()),
            self.height.saturating_add(margin.vertical_sum()),
        )
    }

    /// Create a new rectangle that is the union of this rectangle and another.
    ///
    /// The result is the smallest rectangle that contains both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sides {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Sides {
    /// No margin on any side.
    pub const ZERO: Self = Self::all(0);

    /// Create new sides with equal values.
    pub const fn all(val: i32) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new sides with horizontal values only.
    pub const fn horizontal(val: i32) -> Self {
        Self {
            top: 0,
            right: val,
            bottom: 0,
            left: val,
        }
    }

    /// Create new sides with vertical values only.
    pub const fn vertical(val: i32) -> Self {
        Self {
            top: val,
            right: 0,
            bottom: val,
            left: 0,
        }
    }

    /// Create new sides with specific values.
    pub const fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Sum of left and right.
    #[inline]
    pub const fn horizontal_sum(&self) -> i32 {
        self.left.saturating_add(self.right)
    }

    /// Sum of top and bottom.
    #[inline]
    pub const fn vertical_sum(&self) -> i32 {
        self.top.saturating_add(self.bottom)
    }

    /// Check that no side is negative.
    #[inline]
    pub const fn is_non_negative(&self) -> bool {
        self.top >= 0 && self.right >= 0 && self.bottom >= 0 && self.left >= 0
    }
}

impl From<i32> for Sides {
    fn from(val: i32) -> Self {
        Self::all(val)
    }
}

impl From<(i32, i32)> for Sides {
    fn from((vertical, horizontal): (i32, i32)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl From<(i32, i32, i32, i32)> for Sides {
    fn from((top, right, bottom, left): (i32, i32, i32, i32)) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}
