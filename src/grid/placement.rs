use super::*;

/// Top-left corner of one cell on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

/// Row-major cell positions.
///
/// A cursor starts one gap before the border and moves a full cell step at a
/// time; once it reaches `canvas.width - border` it returns to the left edge
/// and moves down a row. Each cell is placed one gap past the cursor.
///
/// # Example
/// ```
/// use collager::{CanvasSize, CellSize, GapGeometry, Placement, PlacementStream};
///
/// let cell = CellSize::new(100, 150);
/// let gaps = GapGeometry::new(35, 4, 150);
/// let canvas = CanvasSize { width: 1080, height: 608 };
/// let placements: Vec<Placement> = PlacementStream::new(canvas, cell, gaps, 6).collect();
/// assert_eq!(placements[0], Placement { x: 150, y: 150 });
/// assert_eq!(placements[4], Placement { x: 830, y: 150 });
/// assert_eq!(placements[5], Placement { x: 150, y: 308 });
/// ```
#[derive(Debug, Clone)]
pub struct PlacementStream {
    cursor_x: i64,
    cursor_y: i64,
    origin_x: i64,
    step_x: i64,
    step_y: i64,
    wrap_at: i64,
    col_gap: i64,
    row_gap: i64,
    remaining: usize,
}

impl PlacementStream {
    pub fn new(canvas: CanvasSize, cell: CellSize, gaps: GapGeometry, count: usize) -> Self {
        let col_gap = gaps.col_gap as i64;
        let row_gap = gaps.row_gap as i64;
        let border = gaps.border as i64;
        Self {
            cursor_x: border - col_gap,
            cursor_y: border - row_gap,
            origin_x: border - col_gap,
            step_x: cell.width as i64 + 2 * col_gap,
            step_y: cell.height as i64 + 2 * row_gap,
            wrap_at: canvas.width as i64 - border,
            col_gap,
            row_gap,
            remaining: count,
        }
    }
}

impl Iterator for PlacementStream {
    type Item = Placement;

    fn next(&mut self) -> Option<Placement> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let placement = Placement {
            x: (self.cursor_x + self.col_gap).max(0) as u32,
            y: (self.cursor_y + self.row_gap).max(0) as u32,
        };
        self.cursor_x += self.step_x;
        if self.cursor_x >= self.wrap_at {
            self.cursor_x = self.origin_x;
            self.cursor_y += self.step_y;
        }
        Some(placement)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for PlacementStream {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_book_scenario_placements() {
        let placements: SmallVecLine<Placement> = PlacementStream::new(
            CanvasSize {
                width: 1080,
                height: 608,
            },
            CellSize::new(100, 150),
            GapGeometry::new(35, 4, 150),
            6,
        )
        .collect();
        insta::assert_yaml_snapshot!(placements, @r###"
        - x: 150
          y: 150
        - x: 320
          y: 150
        - x: 490
          y: 150
        - x: 660
          y: 150
        - x: 830
          y: 150
        - x: 150
          y: 308
        "###);
    }

    #[test]
    fn test_zero_border_starts_at_origin() {
        let cell = CellSize::new(10, 10);
        let gaps = GapGeometry::new(3, 3, 0);
        let grid = GridSpec::new(2, 2);
        let canvas = CanvasSize::of(grid, cell, gaps).unwrap();
        let placements: Vec<Placement> = PlacementStream::new(canvas, cell, gaps, 4).collect();
        assert_eq!(
            placements,
            vec![
                Placement { x: 0, y: 0 },
                Placement { x: 16, y: 0 },
                Placement { x: 0, y: 16 },
                Placement { x: 16, y: 16 },
            ]
        );
    }

    proptest! {
        #[test]
        fn test_cells_stay_inside_border_proptest(
            count in 1..60usize,
            cols in 1..10u32,
            width in 1..200u32,
            height in 1..200u32,
            col_gap in 0..40u32,
            row_gap in 0..40u32,
            border in 0..100u32,
        ) {
            let grid = GridSpec::for_columns(count, cols);
            let cell = CellSize::new(width, height);
            let gaps = GapGeometry::new(col_gap, row_gap, border);
            let canvas = CanvasSize::of(grid, cell, gaps).unwrap();
            let stream = PlacementStream::new(canvas, cell, gaps, count);
            prop_assert_eq!(stream.len(), count);
            for (index, placement) in stream.enumerate() {
                let col = index as u32 % cols;
                let row = index as u32 / cols;
                prop_assert_eq!(placement.x, border + col * (width + 2 * col_gap));
                prop_assert_eq!(placement.y, border + row * (height + 2 * row_gap));
                prop_assert!(placement.x + width + border <= canvas.width);
                prop_assert!(placement.y + height + border <= canvas.height);
            }
        }
    }
}
