#![forbid(unsafe_code)]

//! Text measurement.
//!
//! Widgets never load fonts. They ask a [`TextMetrics`] for the pixel size
//! of a string; the host can plug in real font metrics, and
//! [`CellMetrics`] provides a fixed-cell approximation for terminals and
//! tests.

use std::fmt;

use menukit_core::geometry::Size;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Measures rendered text.
pub trait TextMetrics: fmt::Debug {
    /// Pixel size of `text`. Lines are separated by `\n`.
    fn measure(&self, text: &str) -> Size;

    /// Height of one line of text.
    fn line_height(&self) -> i32;
}

/// Fixed-size cell metrics: every display column is `cell_width` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl CellMetrics {
    pub const fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell_width,
            cell_height,
        }
    }

    /// Display columns of one line, grapheme by grapheme.
    pub fn columns(line: &str) -> usize {
        line.graphemes(true).map(UnicodeWidthStr::width).sum()
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(8, 16)
    }
}

impl TextMetrics for CellMetrics {
    fn measure(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::new(0, self.cell_height);
        }
        let mut lines = 0;
        let mut widest = 0;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(Self::columns(line));
        }
        Size::new(
            (widest as i32).saturating_mul(self.cell_width),
            lines * self.cell_height,
        )
    }

    fn line_height(&self) -> i32 {
        self.cell_height
    }
}
