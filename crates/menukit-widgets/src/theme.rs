#![forbid(unsafe_code)]

//! Colors and shared visual defaults.

use std::sync::Arc;

use menukit_core::geometry::Sides;

use crate::{CellMetrics, SelectionEffect, TextMetrics};

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Visual defaults shared by every widget of a menu.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Rgba,
    pub frame_background: Rgba,
    pub text: Rgba,
    pub focused_text: Rgba,
    pub disabled_text: Rgba,
    pub scrollbar_track: Rgba,
    pub scrollbar_thumb: Rgba,
    /// Padding around every widget's text.
    pub widget_padding: Sides,
    /// Effect applied to widgets that do not set their own.
    pub selection: SelectionEffect,
    pub metrics: Arc<dyn TextMetrics + Send + Sync>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Rgba::rgb(220, 220, 220),
            frame_background: Rgba::TRANSPARENT,
            text: Rgba::rgb(70, 70, 70),
            focused_text: Rgba::rgb(255, 255, 255),
            disabled_text: Rgba::rgb(160, 160, 160),
            scrollbar_track: Rgba::rgb(235, 235, 235),
            scrollbar_thumb: Rgba::rgb(200, 200, 200),
            widget_padding: Sides::from((4, 8)),
            selection: SelectionEffect::default(),
            metrics: Arc::new(CellMetrics::default()),
        }
    }
}

impl Theme {
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl TextMetrics + Send + Sync + 'static) -> Self {
        self.metrics = Arc::new(metrics);
        self
    }

    #[must_use]
    pub fn with_selection(mut self, selection: SelectionEffect) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_widget_padding(mut self, padding: Sides) -> Self {
        self.widget_padding = padding;
        self
    }
}
