#![forbid(unsafe_code)]

//! Layout primitives and solvers.
//!
//! This crate provides the geometry side of menukit:
//!
//! - [`grid`] - column-major placement of top-level cells into columns/rows
//! - [`pack`] - frame packing (sum along the packing axis, max across it)
//! - [`scroll`] - viewport/offset bookkeeping and scrollbar thumb geometry
//!
//! Every solver here is a pure function of its inputs: the runtime measures
//! widgets, hands sizes in, and receives rectangles back.
//!
//! ```
//! use menukit_layout::grid::{GridCell, GridSpec, RowSpec};
//! use menukit_layout::{Alignment, Size};
//!
//! let spec = GridSpec::new(2).rows(RowSpec::Uniform(3));
//! spec.validate().unwrap();
//!
//! let cells: Vec<_> = (0..6)
//!     .map(|_| GridCell::new(Size::new(40, 20), Alignment::Center))
//!     .collect();
//! let layout = spec.solve(&cells);
//! assert_eq!(layout.cells[3].column, 1);
//! assert_eq!(layout.cells[3].row, 0);
//! ```

use std::fmt;

pub mod grid;
pub mod pack;
pub mod scroll;

pub use grid::{CellPlacement, GridCell, GridLayout, GridSpec, RowSpec};
pub use menukit_core::geometry::{Point, Rect, Sides, Size};
pub use pack::{PackChild, PackLayout, PackSpec};
pub use scroll::{ScrollArea, ScrollbarState};

/// Placement of an item inside the space it was given.
///
/// For vertical stacks and grid columns this is left/center/right; for
/// horizontal frames it is top/center/bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Left (or top) edge.
    Start,
    /// Centered. Odd leftover pixels go after the item.
    #[default]
    Center,
    /// Right (or bottom) edge.
    End,
}

impl Alignment {
    /// Offset of an item of length `extent` inside `available` pixels.
    ///
    /// Never negative: an item larger than its slot sits at the slot start.
    #[inline]
    pub fn offset(self, available: i32, extent: i32) -> i32 {
        let slack = available.saturating_sub(extent).max(0);
        match self {
            Self::Start => 0,
            Self::Center => slack / 2,
            Self::End => slack,
        }
    }
}

/// Packing axis of a frame or scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Children left to right.
    Horizontal,
    /// Children top to bottom.
    #[default]
    Vertical,
}

impl Orientation {
    /// Length of `size` along this axis.
    #[inline]
    pub const fn main(self, size: Size) -> i32 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Length of `size` across this axis.
    #[inline]
    pub const fn cross(self, size: Size) -> i32 {
        match self {
            Self::Horizontal => size.height,
            Self::Vertical => size.width,
        }
    }

    /// Build a size from main/cross lengths.
    #[inline]
    pub const fn size(self, main: i32, cross: i32) -> Size {
        match self {
            Self::Horizontal => Size::new(main, cross),
            Self::Vertical => Size::new(cross, main),
        }
    }

    /// Build a point from main/cross coordinates.
    #[inline]
    pub const fn point(self, main: i32, cross: i32) -> Point {
        match self {
            Self::Horizontal => Point::new(main, cross),
            Self::Vertical => Point::new(cross, main),
        }
    }

    /// The other axis.
    #[inline]
    pub const fn flip(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Invalid layout configuration.
///
/// Raised by the call that introduces the problem, never by a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    ZeroColumns,
    ZeroRows {
        column: usize,
    },
    RowCountMismatch {
        columns: usize,
        rows: usize,
    },
    UnboundedRows {
        columns: usize,
    },
    BoundCountMismatch {
        bound: &'static str,
        columns: usize,
        len: usize,
    },
    NegativeBound {
        bound: &'static str,
        column: usize,
        value: i32,
    },
    MinExceedsMax {
        column: usize,
        min: i32,
        max: i32,
    },
    NegativeSpacing {
        spacing: i32,
    },
    CapacityExceeded {
        capacity: usize,
        cells: usize,
    },
    CellTooWide {
        cell: usize,
        column: usize,
        width: i32,
        max: i32,
    },
    InvalidMaxSize {
        width: i32,
        height: i32,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroColumns => write!(f, "column count must be at least 1"),
            Self::ZeroRows { column } => {
                write!(f, "column {column} must hold at least 1 row")
            }
            Self::RowCountMismatch { columns, rows } => write!(
                f,
                "per-column row counts ({rows}) must match the column count ({columns})"
            ),
            Self::UnboundedRows { columns } => write!(
                f,
                "rows must be set when using {columns} columns"
            ),
            Self::BoundCountMismatch {
                bound,
                columns,
                len,
            } => write!(
                f,
                "{bound} has {len} entries but the grid has {columns} columns"
            ),
            Self::NegativeBound {
                bound,
                column,
                value,
            } => write!(f, "{bound} of column {column} is negative ({value})"),
            Self::MinExceedsMax { column, min, max } => write!(
                f,
                "column {column} minimum width ({min}) exceeds its maximum ({max})"
            ),
            Self::NegativeSpacing { spacing } => {
                write!(f, "spacing must not be negative (got {spacing})")
            }
            Self::CapacityExceeded { capacity, cells } => write!(
                f,
                "{cells} cells do not fit in a grid of capacity {capacity}"
            ),
            Self::CellTooWide {
                cell,
                column,
                width,
                max,
            } => write!(
                f,
                "cell {cell} width ({width}) exceeds column {column} max width ({max})"
            ),
            Self::InvalidMaxSize { width, height } => write!(
                f,
                "frame max size must be positive (got {width}x{height})"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_offsets() {
        assert_eq!(Alignment::Start.offset(100, 40), 0);
        assert_eq!(Alignment::Center.offset(100, 40), 30);
        assert_eq!(Alignment::Center.offset(101, 40), 30);
        assert_eq!(Alignment::End.offset(100, 40), 60);
    }

    #[test]
    fn alignment_oversized_item_sits_at_start() {
        assert_eq!(Alignment::End.offset(10, 40), 0);
        assert_eq!(Alignment::Center.offset(10, 40), 0);
    }

    #[test]
    fn orientation_axes() {
        let s = Size::new(30, 10);
        assert_eq!(Orientation::Horizontal.main(s), 30);
        assert_eq!(Orientation::Horizontal.cross(s), 10);
        assert_eq!(Orientation::Vertical.main(s), 10);
        assert_eq!(Orientation::Vertical.size(10, 30), s);
        assert_eq!(Orientation::Horizontal.point(1, 2), Point::new(1, 2));
        assert_eq!(Orientation::Vertical.point(1, 2), Point::new(2, 1));
        assert_eq!(Orientation::Vertical.flip(), Orientation::Horizontal);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            LayoutError::ZeroColumns.to_string(),
            "column count must be at least 1"
        );
        let err = LayoutError::CellTooWide {
            cell: 2,
            column: 1,
            width: 300,
            max: 200,
        };
        assert_eq!(
            err.to_string(),
            "cell 2 width (300) exceeds column 1 max width (200)"
        );
    }
}
