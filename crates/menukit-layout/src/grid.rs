#![forbid(unsafe_code)]

//! Column/row grid placement.
//!
//! Top-level cells are placed column-major: column 0 is filled top to
//! bottom before column 1 receives its first cell. Each column has its own
//! row capacity ([`RowSpec`]); with [`RowSpec::Unbounded`] a single column
//! holds every cell.
//!
//! Column width is the widest cell in the column raised to the configured
//! minimum and capped at the configured maximum. Row height is the tallest
//! cell in that row across all columns; `row_spacing` separates rows but is
//! not added below the last one.

use crate::{Alignment, LayoutError, Point, Rect, Size};

/// Row capacity per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowSpec {
    /// No row limit. Only valid for a single column.
    #[default]
    Unbounded,
    /// Same row count for every column.
    Uniform(usize),
    /// Explicit row count for each column.
    PerColumn(Vec<usize>),
}

/// Grid configuration.
///
/// Width bounds hold either a single entry (applied to every column) or
/// one entry per column. An empty list means "no bound".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSpec {
    pub columns: usize,
    pub rows: RowSpec,
    pub min_widths: Vec<i32>,
    pub max_widths: Vec<Option<i32>>,
    pub row_spacing: i32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(1)
    }
}

impl GridSpec {
    /// A grid with `columns` columns and no row limit.
    pub fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: RowSpec::Unbounded,
            min_widths: Vec::new(),
            max_widths: Vec::new(),
            row_spacing: 0,
        }
    }

    #[must_use]
    pub fn rows(mut self, rows: RowSpec) -> Self {
        self.rows = rows;
        self
    }

    /// Same minimum width for every column.
    #[must_use]
    pub fn column_min_width(mut self, width: i32) -> Self {
        self.min_widths = vec![width];
        self
    }

    #[must_use]
    pub fn column_min_widths(mut self, widths: Vec<i32>) -> Self {
        self.min_widths = widths;
        self
    }

    /// Same maximum width for every column.
    #[must_use]
    pub fn column_max_width(mut self, width: i32) -> Self {
        self.max_widths = vec![Some(width)];
        self
    }

    #[must_use]
    pub fn column_max_widths(mut self, widths: Vec<Option<i32>>) -> Self {
        self.max_widths = widths;
        self
    }

    #[must_use]
    pub fn row_spacing(mut self, spacing: i32) -> Self {
        self.row_spacing = spacing;
        self
    }

    /// Minimum width of `column` (0 when unset).
    pub fn min_width(&self, column: usize) -> i32 {
        broadcast(&self.min_widths, column).unwrap_or(0)
    }

    /// Maximum width of `column`, if capped.
    pub fn max_width(&self, column: usize) -> Option<i32> {
        broadcast(&self.max_widths, column).flatten()
    }

    /// Row capacity of `column`, `None` when unbounded.
    pub fn rows_in(&self, column: usize) -> Option<usize> {
        match &self.rows {
            RowSpec::Unbounded => None,
            RowSpec::Uniform(n) => Some(*n),
            RowSpec::PerColumn(rows) => rows.get(column).copied(),
        }
    }

    /// Total number of cells the grid can hold, `None` when unbounded.
    pub fn capacity(&self) -> Option<usize> {
        match &self.rows {
            RowSpec::Unbounded => None,
            RowSpec::Uniform(n) => Some(n.saturating_mul(self.columns)),
            RowSpec::PerColumn(rows) => Some(rows.iter().sum()),
        }
    }

    /// Check the configuration itself.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 {
            return Err(LayoutError::ZeroColumns);
        }
        match &self.rows {
            RowSpec::Unbounded if self.columns > 1 => {
                return Err(LayoutError::UnboundedRows {
                    columns: self.columns,
                });
            }
            RowSpec::Unbounded => {}
            RowSpec::Uniform(0) => return Err(LayoutError::ZeroRows { column: 0 }),
            RowSpec::Uniform(_) => {}
            RowSpec::PerColumn(rows) => {
                if rows.len() != self.columns {
                    return Err(LayoutError::RowCountMismatch {
                        columns: self.columns,
                        rows: rows.len(),
                    });
                }
                if let Some(column) = rows.iter().position(|&n| n == 0) {
                    return Err(LayoutError::ZeroRows { column });
                }
            }
        }
        if self.row_spacing < 0 {
            return Err(LayoutError::NegativeSpacing {
                spacing: self.row_spacing,
            });
        }
        check_bound_len("column_min_width", self.columns, self.min_widths.len())?;
        check_bound_len("column_max_width", self.columns, self.max_widths.len())?;

        for column in 0..self.columns {
            let min = self.min_width(column);
            if min < 0 {
                return Err(LayoutError::NegativeBound {
                    bound: "column_min_width",
                    column,
                    value: min,
                });
            }
            if let Some(max) = self.max_width(column) {
                if max < 0 {
                    return Err(LayoutError::NegativeBound {
                        bound: "column_max_width",
                        column,
                        value: max,
                    });
                }
                if min > max {
                    return Err(LayoutError::MinExceedsMax { column, min, max });
                }
            }
        }
        Ok(())
    }

    /// Check that `cells` top-level cells fit.
    pub fn check_capacity(&self, cells: usize) -> Result<(), LayoutError> {
        match self.capacity() {
            Some(capacity) if cells > capacity => {
                Err(LayoutError::CapacityExceeded { capacity, cells })
            }
            _ => Ok(()),
        }
    }

    /// Check that cell `index` of outer width `width` fits its column maximum.
    pub fn check_cell_width(&self, index: usize, width: i32) -> Result<(), LayoutError> {
        let (column, _) = self.position_of(index);
        match self.max_width(column) {
            Some(max) if width > max => Err(LayoutError::CellTooWide {
                cell: index,
                column,
                width,
                max,
            }),
            _ => Ok(()),
        }
    }

    /// `(column, row)` of the cell at `index` in column-major order.
    ///
    /// Cells beyond the grid capacity continue down the last column.
    pub fn position_of(&self, index: usize) -> (usize, usize) {
        let columns = self.columns.max(1);
        let mut start = 0usize;
        for column in 0..columns {
            let Some(rows) = self.rows_in(column) else {
                return (column, index - start);
            };
            if index < start + rows || column + 1 == columns {
                return (column, index - start);
            }
            start += rows;
        }
        (0, index)
    }

    /// Place `cells` into the grid.
    ///
    /// Never fails: an invalid configuration is rejected by [`validate`]
    /// before it reaches a layout pass.
    ///
    /// [`validate`]: GridSpec::validate
    pub fn solve(&self, cells: &[GridCell]) -> GridLayout {
        let columns = self.columns.max(1);
        let mut column_cells: Vec<Vec<usize>> = vec![Vec::new(); columns];
        let mut positions = Vec::with_capacity(cells.len());
        for index in 0..cells.len() {
            let (column, row) = self.position_of(index);
            column_cells[column].push(index);
            positions.push((column, row));
        }

        let used_columns = column_cells.iter().filter(|c| !c.is_empty()).count();
        let column_widths: Vec<i32> = column_cells
            .iter()
            .enumerate()
            .map(|(column, members)| {
                if members.is_empty() {
                    return 0;
                }
                let widest = members
                    .iter()
                    .map(|&i| cells[i].size.width)
                    .max()
                    .unwrap_or(0);
                let width = widest.max(self.min_width(column));
                match self.max_width(column) {
                    Some(max) => width.min(max),
                    None => width,
                }
            })
            .collect();
        let column_x = prefix_offsets(&column_widths, 0);

        let row_count = column_cells.iter().map(Vec::len).max().unwrap_or(0);
        let mut row_heights = vec![0; row_count];
        for (index, &(_, row)) in positions.iter().enumerate() {
            row_heights[row] = row_heights[row].max(cells[index].size.height);
        }
        let spacing = self.row_spacing.max(0);
        let row_y = prefix_offsets(&row_heights, spacing);

        let placements = positions
            .iter()
            .zip(cells)
            .map(|(&(column, row), cell)| {
                let width = cell.size.width.min(column_widths[column]);
                let x = column_x[column] + cell.align.offset(column_widths[column], width);
                CellPlacement {
                    column,
                    row,
                    rect: Rect::new(x, row_y[row], width, cell.size.height),
                }
            })
            .collect();

        let content = if cells.is_empty() {
            Size::ZERO
        } else {
            let width = column_widths.iter().sum();
            let height = row_heights.iter().sum::<i32>() + spacing * (row_count as i32 - 1);
            Size::new(width, height)
        };

        GridLayout {
            cells: placements,
            columns: column_cells,
            column_widths,
            column_x,
            row_heights,
            row_y,
            content,
            used_columns,
        }
    }
}

fn broadcast<T: Copy>(values: &[T], column: usize) -> Option<T> {
    match values {
        [single] => Some(*single),
        _ => values.get(column).copied(),
    }
}

fn check_bound_len(bound: &'static str, columns: usize, len: usize) -> Result<(), LayoutError> {
    if len > 1 && len != columns {
        return Err(LayoutError::BoundCountMismatch {
            bound,
            columns,
            len,
        });
    }
    Ok(())
}

fn prefix_offsets(lengths: &[i32], gap: i32) -> Vec<i32> {
    let mut offsets = Vec::with_capacity(lengths.len());
    let mut cursor = 0;
    for &len in lengths {
        offsets.push(cursor);
        cursor += len + gap;
    }
    offsets
}

/// One top-level item to place: its outer size and alignment in the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCell {
    pub size: Size,
    pub align: Alignment,
}

impl GridCell {
    pub const fn new(size: Size, align: Alignment) -> Self {
        Self { size, align }
    }
}

/// Where a cell landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub column: usize,
    pub row: usize,
    /// Outer rectangle relative to the grid origin.
    pub rect: Rect,
}

/// Result of [`GridSpec::solve`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridLayout {
    /// Placement of each input cell, in input order.
    pub cells: Vec<CellPlacement>,
    /// Cell indices per column, top to bottom.
    pub columns: Vec<Vec<usize>>,
    pub column_widths: Vec<i32>,
    pub column_x: Vec<i32>,
    pub row_heights: Vec<i32>,
    pub row_y: Vec<i32>,
    /// Total size of the placed content.
    pub content: Size,
    /// Columns holding at least one cell.
    pub used_columns: usize,
}

impl GridLayout {
    /// Index of the cell at `(column, row)`.
    pub fn cell_at(&self, column: usize, row: usize) -> Option<usize> {
        self.columns.get(column)?.get(row).copied()
    }

    /// Cell indices of `column`, top to bottom.
    pub fn column_cells(&self, column: usize) -> &[usize] {
        self.columns.get(column).map_or(&[], Vec::as_slice)
    }

    /// Origin that places the content inside `viewport`.
    ///
    /// With `center` set, content smaller than the viewport is centered on
    /// that axis; otherwise the content sits at the top-left.
    pub fn origin_in(&self, viewport: Size, center: bool) -> Point {
        if !center {
            return Point::default();
        }
        Point::new(
            Alignment::Center.offset(viewport.width, self.content.width),
            Alignment::Center.offset(viewport.height, self.content.height),
        )
    }
}
