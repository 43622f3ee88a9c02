#![forbid(unsafe_code)]

//! Menu configuration.
//!
//! Everything a menu needs is passed in explicitly; there is no global
//! default theme or controller state.

use menukit_core::geometry::{Point, Size};
use menukit_layout::grid::GridSpec;
use menukit_widgets::Theme;

use crate::MenuError;

/// Where the menu sits on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuPosition {
    /// Centered on the surface, re-centered on resize.
    #[default]
    Centered,
    /// Fixed top-left corner.
    At(Point),
}

/// What a click outside the active menu does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickOutside {
    #[default]
    Ignore,
    /// Treated as a close request.
    Close,
}

/// Configuration for one menu.
#[derive(Debug, Clone)]
pub struct MenuConfig {
    /// Menu viewport size. Clamped to the surface when the surface is smaller.
    pub size: Size,
    pub position: MenuPosition,
    /// Column/row grid, row spacing included.
    pub grid: GridSpec,
    /// Center the grid when it is smaller than the viewport.
    pub center_content: bool,
    pub theme: Theme,
    /// Focus the first selectable widget when the menu opens.
    pub focus_first_on_open: bool,
    /// Keep the previous focus when the menu is opened again.
    pub remember_selection: bool,
    /// Pointer hover moves focus.
    pub mouse_motion_selection: bool,
    pub click_outside: ClickOutside,
    /// Pixels scrolled per wheel notch.
    pub wheel_step: i32,
    pub scrollbar_thickness: i32,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            size: Size::new(600, 400),
            position: MenuPosition::Centered,
            grid: GridSpec::default(),
            center_content: true,
            theme: Theme::default(),
            focus_first_on_open: true,
            remember_selection: false,
            mouse_motion_selection: false,
            click_outside: ClickOutside::Ignore,
            wheel_step: 20,
            scrollbar_thickness: 8,
        }
    }
}

impl MenuConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: MenuPosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    #[must_use]
    pub fn with_center_content(mut self, center: bool) -> Self {
        self.center_content = center;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn with_focus_first_on_open(mut self, enabled: bool) -> Self {
        self.focus_first_on_open = enabled;
        self
    }

    #[must_use]
    pub fn with_remember_selection(mut self, enabled: bool) -> Self {
        self.remember_selection = enabled;
        self
    }

    #[must_use]
    pub fn with_mouse_motion_selection(mut self, enabled: bool) -> Self {
        self.mouse_motion_selection = enabled;
        self
    }

    #[must_use]
    pub fn with_click_outside(mut self, policy: ClickOutside) -> Self {
        self.click_outside = policy;
        self
    }

    #[must_use]
    pub fn with_wheel_step(mut self, step: i32) -> Self {
        self.wheel_step = step;
        self
    }

    #[must_use]
    pub fn with_scrollbar_thickness(mut self, thickness: i32) -> Self {
        self.scrollbar_thickness = thickness;
        self
    }

    pub fn validate(&self) -> Result<(), MenuError> {
        if self.size.width <= 0 || self.size.height <= 0 {
            return Err(MenuError::InvalidSize {
                width: self.size.width,
                height: self.size.height,
            });
        }
        if self.wheel_step < 0 {
            return Err(MenuError::InvalidSetting {
                name: "wheel_step",
                value: self.wheel_step,
            });
        }
        if self.scrollbar_thickness < 0 {
            return Err(MenuError::InvalidSetting {
                name: "scrollbar_thickness",
                value: self.scrollbar_thickness,
            });
        }
        self.grid.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use menukit_layout::LayoutError;
    use menukit_layout::grid::RowSpec;

    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(MenuConfig::default().validate().is_ok());
        assert_eq!(MenuConfig::default().wheel_step, 20);
    }

    #[test]
    fn builder_sets_fields() {
        let config = MenuConfig::new(320, 240)
            .with_grid(GridSpec::new(2).rows(RowSpec::Uniform(3)))
            .with_remember_selection(true)
            .with_click_outside(ClickOutside::Close);
        assert_eq!(config.size, Size::new(320, 240));
        assert_eq!(config.grid.columns, 2);
        assert!(config.remember_selection);
        assert_eq!(config.click_outside, ClickOutside::Close);
    }

    #[test]
    fn validate_rejects_bad_settings() {
        assert!(matches!(
            MenuConfig::new(0, 10).validate(),
            Err(MenuError::InvalidSize { .. })
        ));
        assert!(matches!(
            MenuConfig::default().with_wheel_step(-1).validate(),
            Err(MenuError::InvalidSetting { name: "wheel_step", .. })
        ));
        assert_eq!(
            MenuConfig::default().with_grid(GridSpec::new(3)).validate(),
            Err(MenuError::Layout(LayoutError::UnboundedRows { columns: 3 }))
        );
    }
}
