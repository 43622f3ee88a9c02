#![forbid(unsafe_code)]

//! Focus navigation.
//!
//! Vertical moves stay inside the focused widget's grid column. Horizontal
//! moves step between siblings of a horizontal frame first and only then
//! jump columns. Column jumps remember the row they started from, so moving
//! right and back left through a short column lands on the original row.

use menukit_layout::Orientation;
use menukit_widgets::WidgetId;

use crate::Menu;

/// A navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// Next widget in focus order (tab).
    Next,
    /// Previous widget in focus order (back-tab).
    Prev,
}

impl Direction {
    fn step(self) -> isize {
        match self {
            Self::Up | Self::Left | Self::Prev => -1,
            Self::Down | Self::Right | Self::Next => 1,
        }
    }
}

impl Menu {
    /// Move focus. Returns `true` if the focused widget changed.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        self.ensure_layout();
        let focusable = self.focusable();
        let Some(current) = self.focused.clone() else {
            let target = if direction.step() < 0 {
                focusable.last()
            } else {
                focusable.first()
            };
            return match target.cloned() {
                Some(target) => self.set_focus(&target, false),
                None => false,
            };
        };

        let target = match direction {
            Direction::Up | Direction::Down => {
                let column = self.position(current.as_str()).map(|(column, _)| column);
                let same_column: Vec<WidgetId> = focusable
                    .iter()
                    .filter(|id| self.position(id.as_str()).map(|(c, _)| c) == column)
                    .cloned()
                    .collect();
                cycle(&same_column, &current, direction.step())
            }
            Direction::Next | Direction::Prev => cycle(&focusable, &current, direction.step()),
            Direction::Left | Direction::Right => {
                return self.navigate_horizontal(&current, &focusable, direction.step());
            }
        };

        match target {
            Some(target) if target != current => {
                menukit_core::trace!(from = %current, to = %target, ?direction, "navigate");
                self.set_focus(&target, false)
            }
            _ => false,
        }
    }

    fn navigate_horizontal(
        &mut self,
        current: &WidgetId,
        focusable: &[WidgetId],
        step: isize,
    ) -> bool {
        let siblings = self.horizontal_siblings(current, focusable);
        if let Some(index) = siblings.iter().position(|id| id == current) {
            let neighbour = if step < 0 {
                index.checked_sub(1)
            } else {
                Some(index + 1).filter(|&next| next < siblings.len())
            };
            if let Some(next) = neighbour {
                return self.set_focus(&siblings[next], true);
            }
        }

        if self.grid.used_columns > 1 {
            return self.jump_column(current, focusable, step);
        }

        // Single column: wrap around the edge of a horizontal frame.
        if siblings.len() > 1 {
            let wrapped = if step < 0 {
                siblings.last()
            } else {
                siblings.first()
            };
            if let Some(target) = wrapped.cloned() {
                return self.set_focus(&target, true);
            }
        }
        false
    }

    /// Focusable direct children of `id`'s frame when it packs horizontally.
    fn horizontal_siblings(&self, id: &WidgetId, focusable: &[WidgetId]) -> Vec<WidgetId> {
        let Some(frame) = self.container(id.as_str()) else {
            return Vec::new();
        };
        let horizontal = self
            .widget(frame.as_str())
            .and_then(|widget| widget.pack_spec())
            .is_some_and(|spec| spec.orientation == Orientation::Horizontal);
        if !horizontal {
            return Vec::new();
        }
        self.children(frame.as_str())
            .iter()
            .filter(|child| focusable.contains(child))
            .cloned()
            .collect()
    }

    /// Move to the adjacent column holding a focusable widget, at the
    /// remembered row or the nearest one.
    fn jump_column(&mut self, current: &WidgetId, focusable: &[WidgetId], step: isize) -> bool {
        let Some((column, row)) = self.position(current.as_str()) else {
            return false;
        };
        let hint = *self.row_hint.get_or_insert(row);
        let columns = self.grid.columns.len().max(1);

        for distance in 1..columns {
            let target_column =
                (column as isize + step * distance as isize).rem_euclid(columns as isize) as usize;
            let candidates: Vec<(usize, &WidgetId)> = focusable
                .iter()
                .filter_map(|id| match self.position(id.as_str()) {
                    Some((c, r)) if c == target_column => Some((r, id)),
                    _ => None,
                })
                .collect();
            let Some(best_row) = candidates
                .iter()
                .map(|&(r, _)| r)
                .min_by_key(|&r| (r.abs_diff(hint), r))
            else {
                continue;
            };
            let mut in_row = candidates.iter().filter(|&&(r, _)| r == best_row);
            let target = if step < 0 {
                in_row.next_back()
            } else {
                in_row.next()
            };
            if let Some(&(_, target)) = target {
                let target = target.clone();
                menukit_core::trace!(
                    from = %current,
                    to = %target,
                    column = target_column,
                    row = best_row,
                    "column jump"
                );
                return self.set_focus(&target, true);
            }
        }
        false
    }
}

/// Neighbour of `current` in `ids`, wrapping. Starts at the ends when
/// `current` is not listed.
fn cycle(ids: &[WidgetId], current: &WidgetId, step: isize) -> Option<WidgetId> {
    if ids.is_empty() {
        return None;
    }
    let len = ids.len() as isize;
    let next = match ids.iter().position(|id| id == current) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None if step < 0 => len - 1,
        None => 0,
    };
    ids.get(next as usize).cloned()
}

#[cfg(test)]
mod tests {
    use menukit_core::geometry::Sides;
    use menukit_layout::grid::{GridSpec, RowSpec};
    use menukit_layout::{Alignment, PackSpec};
    use menukit_widgets::{CellMetrics, SelectionEffect, Theme, Widget};

    use super::*;
    use crate::MenuConfig;

    fn menu(grid: GridSpec) -> Menu {
        let theme = Theme::default()
            .with_metrics(CellMetrics::new(8, 16))
            .with_selection(SelectionEffect::none());
        Menu::new("nav", MenuConfig::new(640, 480).with_grid(grid).with_theme(theme))
            .expect("valid config")
    }

    fn focused(menu: &Menu) -> &str {
        menu.focused().map_or("", WidgetId::as_str)
    }

    fn six_buttons() -> Menu {
        let mut menu = menu(GridSpec::new(2).rows(RowSpec::Uniform(3)));
        for id in ["A", "B", "C", "D", "E", "F"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
        }
        menu
    }

    #[test]
    fn right_from_a_lands_on_d() {
        let mut menu = six_buttons();
        assert_eq!(focused(&menu), "A");
        assert!(menu.navigate(Direction::Right));
        assert_eq!(focused(&menu), "D");
        assert!(menu.navigate(Direction::Right));
        assert_eq!(focused(&menu), "A");
    }

    #[test]
    fn down_wraps_within_column() {
        let mut menu = six_buttons();
        menu.focus("C");
        assert!(menu.navigate(Direction::Down));
        assert_eq!(focused(&menu), "A");
        assert!(menu.navigate(Direction::Up));
        assert_eq!(focused(&menu), "C");
    }

    #[test]
    fn tab_walks_whole_order() {
        let mut menu = six_buttons();
        menu.focus("F");
        assert!(menu.navigate(Direction::Next));
        assert_eq!(focused(&menu), "A");
        assert!(menu.navigate(Direction::Prev));
        assert_eq!(focused(&menu), "F");
    }

    #[test]
    fn sticky_row_survives_a_short_column() {
        let mut menu = menu(GridSpec::new(3).rows(RowSpec::PerColumn(vec![3, 1, 3])));
        for id in ["a0", "a1", "a2", "b0", "c0", "c1", "c2"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
        }
        menu.focus("a2");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "b0");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "c2");
        menu.navigate(Direction::Down);
        assert_eq!(focused(&menu), "c0");
        // A vertical move resets the remembered row.
        menu.navigate(Direction::Left);
        assert_eq!(focused(&menu), "b0");
        menu.navigate(Direction::Left);
        assert_eq!(focused(&menu), "a0");
    }

    #[test]
    fn columns_without_focusable_widgets_are_skipped() {
        let mut menu = menu(GridSpec::new(3).rows(RowSpec::Uniform(1)));
        menu.add_with_id("a", Widget::button("a")).unwrap();
        menu.add_with_id("label", Widget::label("-")).unwrap();
        menu.add_with_id("c", Widget::button("c")).unwrap();
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "c");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "a");
    }

    #[test]
    fn horizontal_frame_siblings_then_wrap() {
        let mut menu = menu(GridSpec::default());
        menu.add_with_id("row", Widget::frame(PackSpec::horizontal()))
            .unwrap();
        for id in ["x", "y", "z"] {
            menu.add_with_id(id, Widget::button(id)).unwrap();
            menu.pack("row", id, Alignment::Center, Sides::ZERO).unwrap();
        }
        menu.focus("x");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "y");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "z");
        menu.navigate(Direction::Right);
        assert_eq!(focused(&menu), "x");
        menu.navigate(Direction::Left);
        assert_eq!(focused(&menu), "z");
    }

    #[test]
    fn vertical_moves_skip_unfocusable_widgets() {
        let mut menu = menu(GridSpec::default());
        menu.add_with_id("a", Widget::button("a")).unwrap();
        menu.add_with_id("b", Widget::button("b").readonly()).unwrap();
        menu.add_with_id("c", Widget::button("c")).unwrap();
        menu.navigate(Direction::Down);
        assert_eq!(focused(&menu), "c");
    }

    #[test]
    fn navigating_without_focus_picks_an_end() {
        let mut menu = menu(GridSpec::default());
        menu.add_with_id("a", Widget::button("a")).unwrap();
        menu.add_with_id("b", Widget::button("b")).unwrap();
        menu.clear_focus();
        assert!(menu.navigate(Direction::Up));
        assert_eq!(focused(&menu), "b");
    }

    #[test]
    fn single_focusable_widget_does_not_move() {
        let mut menu = menu(GridSpec::default());
        menu.add_with_id("a", Widget::button("a")).unwrap();
        assert!(!menu.navigate(Direction::Down));
        assert!(!menu.navigate(Direction::Right));
        assert_eq!(focused(&menu), "a");
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let ids: Vec<WidgetId> = ["a", "b", "c"].into_iter().map(WidgetId::from).collect();
        assert_eq!(cycle(&ids, &ids[2], 1), Some(ids[0].clone()));
        assert_eq!(cycle(&ids, &ids[0], -1), Some(ids[2].clone()));
        assert_eq!(cycle(&[], &ids[0], 1), None);
    }
}
