#![forbid(unsafe_code)]

//! Scroll areas.
//!
//! A [`ScrollArea`] presents `content` through a smaller `viewport`. The
//! offset is the content-space point shown at the viewport's top-left and
//! is re-clamped to `[0, content - viewport]` after every mutation, so no
//! sequence of calls can leave it out of range.
//!
//! # Coordinate spaces
//!
//! - *local*: relative to the viewport's top-left.
//! - *absolute* (content): relative to the content's top-left.
//!
//! `to_absolute(p) = p + offset`, `to_local(p) = p - offset`.

use crate::{Orientation, Point, Rect, Size};

/// Viewport/offset bookkeeping for a scrollable region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollArea {
    content: Size,
    viewport: Size,
    offset: Point,
}

impl ScrollArea {
    pub fn new(content: Size, viewport: Size) -> Self {
        Self {
            content,
            viewport,
            offset: Point::default(),
        }
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Replace the content size, re-clamping the offset.
    pub fn set_content_size(&mut self, width: i32, height: i32) {
        self.content = Size::new(width, height);
        self.clamp();
    }

    /// Replace the viewport size, re-clamping the offset.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = Size::new(width, height);
        self.clamp();
    }

    /// Largest valid offset on each axis.
    pub fn max_offset(&self) -> Point {
        Point::new(
            (self.content.width - self.viewport.width).max(0),
            (self.content.height - self.viewport.height).max(0),
        )
    }

    /// Whether either axis can scroll.
    pub fn is_scrollable(&self) -> bool {
        self.scrollable(Orientation::Horizontal) || self.scrollable(Orientation::Vertical)
    }

    /// Whether the given axis can scroll.
    pub fn scrollable(&self, axis: Orientation) -> bool {
        match axis {
            Orientation::Horizontal => self.max_offset().x > 0,
            Orientation::Vertical => self.max_offset().y > 0,
        }
    }

    /// Scroll by a delta. Returns `true` if the offset changed.
    pub fn scroll(&mut self, dx: i32, dy: i32) -> bool {
        let target = self.offset.offset(dx, dy);
        self.scroll_to(target.x, target.y)
    }

    /// Scroll to an absolute offset. Returns `true` if the offset changed.
    pub fn scroll_to(&mut self, x: i32, y: i32) -> bool {
        let before = self.offset;
        self.offset = Point::new(x, y);
        self.clamp();
        self.offset != before
    }

    /// Minimal scroll that brings `rect` (content space) into view.
    ///
    /// A rectangle larger than the viewport is aligned to its top-left.
    pub fn scroll_to_rect(&mut self, rect: Rect) -> bool {
        let x = reveal(self.offset.x, self.viewport.width, rect.x, rect.width);
        let y = reveal(self.offset.y, self.viewport.height, rect.y, rect.height);
        self.scroll_to(x, y)
    }

    /// Viewport point to content point.
    pub fn to_absolute(&self, point: Point) -> Point {
        point.offset(self.offset.x, self.offset.y)
    }

    /// Content point to viewport point.
    pub fn to_local(&self, point: Point) -> Point {
        point.offset(-self.offset.x, -self.offset.y)
    }

    /// The content-space window currently shown.
    pub fn visible_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset, self.viewport)
    }

    /// Scrollbar model for one axis.
    pub fn scrollbar_state(&self, axis: Orientation) -> ScrollbarState {
        let position = match axis {
            Orientation::Horizontal => self.offset.x,
            Orientation::Vertical => self.offset.y,
        };
        ScrollbarState::new(axis.main(self.content), position, axis.main(self.viewport))
    }

    /// Thumb rectangle inside `track`, or `None` when the axis cannot scroll.
    pub fn thumb(&self, axis: Orientation, track: Rect) -> Option<Rect> {
        if !self.scrollable(axis) {
            return None;
        }
        let track_len = axis.main(track.size());
        let (start, len) = self.scrollbar_state(axis).thumb(track_len)?;
        Some(match axis {
            Orientation::Horizontal => Rect::new(track.x + start, track.y, len, track.height),
            Orientation::Vertical => Rect::new(track.x, track.y + start, track.width, len),
        })
    }

    /// Apply a thumb drag of `delta` track pixels. Returns `true` on change.
    pub fn drag_thumb(&mut self, axis: Orientation, track_len: i32, delta: i32) -> bool {
        let state = self.scrollbar_state(axis);
        let Some((_, thumb_len)) = state.thumb(track_len) else {
            return false;
        };
        let free = track_len - thumb_len;
        if free <= 0 {
            return false;
        }
        let max = state.max_position();
        let moved = i32::try_from(i64::from(delta) * i64::from(max) / i64::from(free))
            .unwrap_or(if delta < 0 { i32::MIN } else { i32::MAX });
        match axis {
            Orientation::Horizontal => self.scroll(moved, 0),
            Orientation::Vertical => self.scroll(0, moved),
        }
    }

    fn clamp(&mut self) {
        let max = self.max_offset();
        self.offset = Point::new(self.offset.x.clamp(0, max.x), self.offset.y.clamp(0, max.y));
    }
}

fn reveal(offset: i32, viewport: i32, start: i32, len: i32) -> i32 {
    let end = start.saturating_add(len);
    if start < offset || len > viewport {
        start
    } else if end > offset.saturating_add(viewport) {
        end - viewport
    } else {
        offset
    }
}

/// One-axis scrollbar model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarState {
    /// Total scrollable length.
    pub content_length: i32,
    /// Current scroll position.
    pub position: i32,
    /// Visible length.
    pub viewport_length: i32,
}

impl ScrollbarState {
    pub fn new(content_length: i32, position: i32, viewport_length: i32) -> Self {
        Self {
            content_length,
            position,
            viewport_length,
        }
    }

    pub fn max_position(&self) -> i32 {
        (self.content_length - self.viewport_length).max(0)
    }

    /// Thumb `(start, length)` along a track of `track_len` pixels.
    ///
    /// The thumb is at least one pixel long and never longer than the track.
    pub fn thumb(&self, track_len: i32) -> Option<(i32, i32)> {
        if track_len <= 0 || self.content_length <= 0 {
            return None;
        }
        let track = f64::from(track_len);
        let ratio = f64::from(self.viewport_length) / f64::from(self.content_length);
        let len = ((track * ratio).max(1.0).round() as i32).min(track_len);

        let max = self.max_position();
        let pos_ratio = if max == 0 {
            0.0
        } else {
            f64::from(self.position.clamp(0, max)) / f64::from(max)
        };
        let start = (f64::from(track_len - len) * pos_ratio).round() as i32;
        Some((start, len))
    }
}
