use crate::CollageError;

/// The uniform rectangle every cover is padded into before placement.
///
/// # Example
/// ```
/// use collager::CellSize;
///
/// let cell = CellSize::new(100, 150);
/// assert_eq!(cell.width, 100);
/// assert_eq!(cell.height, 150);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Grows the cell so that a `width` x `height` image fits inside it.
    pub fn include(self, width: u32, height: u32) -> Self {
        Self {
            width: self.width.max(width),
            height: self.height.max(height),
        }
    }
}

/// A `(cols, rows)` partition of the canvas into cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GridSpec {
    pub cols: u32,
    pub rows: u32,
}

impl GridSpec {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self { cols, rows }
    }

    /// Builds the grid with `cols` columns and just enough rows for `count` cells.
    ///
    /// # Example
    /// ```
    /// use collager::GridSpec;
    ///
    /// assert_eq!(GridSpec::for_columns(6, 4), GridSpec::new(4, 2));
    /// assert_eq!(GridSpec::for_columns(6, 3), GridSpec::new(3, 2));
    /// ```
    pub fn for_columns(count: usize, cols: u32) -> Self {
        let rows = (count as u32).div_ceil(cols.max(1));
        Self { cols, rows }
    }

    /// Number of cells in the grid.
    pub fn capacity(&self) -> u64 {
        self.cols as u64 * self.rows as u64
    }
}

/// Spacing around cells plus the fixed outer border.
///
/// Each cell is surrounded by `col_gap` on its left and right and by `row_gap`
/// above and below, so two neighbouring cells are `2 * gap` apart. The outermost
/// cells sit exactly `border` pixels from the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GapGeometry {
    pub col_gap: u32,
    pub row_gap: u32,
    pub border: u32,
}

impl GapGeometry {
    pub fn new(col_gap: u32, row_gap: u32, border: u32) -> Self {
        Self {
            col_gap,
            row_gap,
            border,
        }
    }

    /// Seeds both gaps from the cell width.
    ///
    /// # Example
    /// ```
    /// use collager::{CellSize, GapGeometry};
    ///
    /// let gaps = GapGeometry::initial(CellSize::new(100, 150), 150, 0.04);
    /// assert_eq!(gaps, GapGeometry::new(4, 4, 150));
    /// ```
    pub fn initial(cell: CellSize, border: u32, gap_ratio: f64) -> Self {
        let gap = (cell.width as f64 * gap_ratio.max(0.0)) as u32;
        Self::new(gap, gap, border)
    }
}

/// Pixel size of the composed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Canvas implied by a grid, its cell size and the gaps around cells.
    ///
    /// Fails with [`CollageError::CanvasTooLarge`] when either side does not fit in `u32`.
    ///
    /// # Example
    /// ```
    /// use collager::{CanvasSize, CellSize, GapGeometry, GridSpec};
    ///
    /// let canvas = CanvasSize::of(
    ///     GridSpec::new(5, 2),
    ///     CellSize::new(100, 150),
    ///     GapGeometry::new(4, 4, 150),
    /// )
    /// .unwrap();
    /// assert_eq!(canvas, CanvasSize { width: 832, height: 608 });
    /// ```
    pub fn of(grid: GridSpec, cell: CellSize, gaps: GapGeometry) -> Result<Self, CollageError> {
        match (
            Axis::Columns.span(grid, cell, gaps),
            Axis::Rows.span(grid, cell, gaps),
        ) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(CollageError::CanvasTooLarge {
                cols: grid.cols,
                rows: grid.rows,
            }),
        }
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// One of the two layout axes. Columns run along the width, rows along the height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Axis {
    Columns,
    Rows,
}

impl Axis {
    /// Number of cells along this axis.
    pub fn count(self, grid: GridSpec) -> u32 {
        match self {
            Axis::Columns => grid.cols,
            Axis::Rows => grid.rows,
        }
    }

    pub fn cell(self, cell: CellSize) -> u32 {
        match self {
            Axis::Columns => cell.width,
            Axis::Rows => cell.height,
        }
    }

    pub fn gap(self, gaps: GapGeometry) -> u32 {
        match self {
            Axis::Columns => gaps.col_gap,
            Axis::Rows => gaps.row_gap,
        }
    }

    pub fn gap_mut(self, gaps: &mut GapGeometry) -> &mut u32 {
        match self {
            Axis::Columns => &mut gaps.col_gap,
            Axis::Rows => &mut gaps.row_gap,
        }
    }

    /// Seams between neighbouring cells; the border does not count.
    pub fn internal_gaps(self, grid: GridSpec) -> u32 {
        self.count(grid).saturating_sub(1)
    }

    /// Canvas length along this axis: `count * (cell + 2 * gap) + 2 * border - 2 * gap`.
    ///
    /// `None` when the length does not fit in `u32`.
    pub fn span(self, grid: GridSpec, cell: CellSize, gaps: GapGeometry) -> Option<u32> {
        let gap = self.gap(gaps) as u64;
        let step = self.cell(cell) as u64 + 2 * gap;
        let span = (self.count(grid) as u64)
            .checked_mul(step)?
            .checked_add(2 * gaps.border as u64)?
            .saturating_sub(2 * gap);
        u32::try_from(span).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(6, 1 => GridSpec::new(1, 6))]
    #[test_case(6, 4 => GridSpec::new(4, 2))]
    #[test_case(7, 3 => GridSpec::new(3, 3))]
    #[test_case(1, 1 => GridSpec::new(1, 1))]
    fn test_for_columns(count: usize, cols: u32) -> GridSpec {
        GridSpec::for_columns(count, cols)
    }

    #[test]
    fn test_span_single_cell_is_cell_plus_border() {
        let grid = GridSpec::new(1, 1);
        let cell = CellSize::new(100, 150);
        let gaps = GapGeometry::new(7, 9, 20);
        assert_eq!(Axis::Columns.span(grid, cell, gaps), Some(140));
        assert_eq!(Axis::Rows.span(grid, cell, gaps), Some(190));
    }

    #[test_case(100, 0.04 => 4; "four percent of a hundred")]
    #[test_case(300, 0.04 => 12)]
    #[test_case(49, 0.04 => 1)]
    #[test_case(100, 0.0 => 0)]
    #[test_case(100, -1.0 => 0; "negative ratio clamps to zero")]
    fn test_initial_gap_truncates(width: u32, gap_ratio: f64) -> u32 {
        let gaps = GapGeometry::initial(CellSize::new(width, 10), 150, gap_ratio);
        assert_eq!(gaps.col_gap, gaps.row_gap);
        gaps.col_gap
    }

    #[test]
    fn test_canvas_too_large_for_u32() {
        let cell = CellSize::new(100, 150);
        let huge_border = GapGeometry::new(4, 4, u32::MAX / 2 + 1);
        assert_eq!(Axis::Columns.span(GridSpec::new(5, 2), cell, huge_border), None);
        assert!(matches!(
            CanvasSize::of(GridSpec::new(5, 2), cell, huge_border),
            Err(CollageError::CanvasTooLarge { cols: 5, rows: 2 })
        ));

        let huge_gap = GapGeometry::new(u32::MAX, 4, 150);
        assert!(CanvasSize::of(GridSpec::new(5, 2), cell, huge_gap).is_err());

        let fits = GapGeometry::new(0, 0, u32::MAX / 2 - 100);
        assert_eq!(
            CanvasSize::of(GridSpec::new(1, 1), cell, fits).unwrap().width,
            u32::MAX - 1 - 200 + 100
        );
    }

    #[test]
    fn test_gap_mut_targets_axis() {
        let mut gaps = GapGeometry::new(1, 2, 3);
        *Axis::Rows.gap_mut(&mut gaps) += 10;
        *Axis::Columns.gap_mut(&mut gaps) += 20;
        assert_eq!(gaps, GapGeometry::new(21, 12, 3));
    }

    #[test]
    fn test_cell_include() {
        let cell = CellSize::default().include(100, 150).include(120, 90);
        assert_eq!(cell, CellSize::new(120, 150));
    }
}
