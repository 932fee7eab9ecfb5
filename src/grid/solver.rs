use super::*;

/// A grid together with the unadjusted canvas it implies and how well that
/// canvas matches the target ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Candidate {
    pub grid: GridSpec,
    pub canvas: CanvasSize,
    /// `min(target / ratio, ratio / target)`, in `(0, 1]` where 1 is an exact match.
    pub score: f64,
}

impl Candidate {
    pub fn new(
        grid: GridSpec,
        cell: CellSize,
        gaps: GapGeometry,
        target: f64,
    ) -> Result<Self, CollageError> {
        let canvas = CanvasSize::of(grid, cell, gaps)?;
        Ok(Self {
            grid,
            canvas,
            score: score(canvas.aspect_ratio(), target),
        })
    }
}

/// Symmetric closeness of two aspect ratios.
///
/// # Example
/// ```
/// use collager::grid::score;
///
/// assert_eq!(score(2.0, 2.0), 1.0);
/// assert_eq!(score(1.0, 2.0), score(4.0, 2.0));
/// ```
pub fn score(ratio: f64, target: f64) -> f64 {
    (target / ratio).min(ratio / target)
}

/// Every searched grid for `count` covers: `cols` in `1..count`, rows just large enough.
pub fn candidates(
    count: usize,
    cell: CellSize,
    gaps: GapGeometry,
    target: f64,
) -> impl Iterator<Item = Result<Candidate, CollageError>> {
    (1..count as u32).map(move |cols| {
        Candidate::new(GridSpec::for_columns(count, cols), cell, gaps, target)
    })
}

/// Picks the grid for `count` covers whose canvas best matches `target`.
///
/// A forced grid is returned as is once it is known to hold every cover.
/// Otherwise the candidate with the strictly greatest score wins, so ties keep
/// the smallest column count.
///
/// # Example
/// ```
/// use collager::{grid::solve, CellSize, GapGeometry, GridSpec};
///
/// let best = solve(6, CellSize::new(100, 150), GapGeometry::new(4, 4, 150), 16.0 / 9.0, None).unwrap();
/// assert_eq!(best.grid, GridSpec::new(5, 2));
/// ```
pub fn solve(
    count: usize,
    cell: CellSize,
    gaps: GapGeometry,
    target: f64,
    forced: Option<GridSpec>,
) -> Result<Candidate, CollageError> {
    if let Some(grid) = forced {
        if count == 0 {
            return Err(CollageError::DegenerateInput { count });
        }
        if grid.capacity() < count as u64 {
            return Err(CollageError::ForcedGridTooSmall {
                cols: grid.cols,
                rows: grid.rows,
                count,
            });
        }
        debug!("Using forced grid {}x{}", grid.cols, grid.rows);
        return Candidate::new(grid, cell, gaps, target);
    }
    if count < 2 {
        error!("Cannot search a grid for {} covers", count);
        return Err(CollageError::DegenerateInput { count });
    }

    let mut best: Option<Candidate> = None;
    for candidate in candidates(count, cell, gaps, target) {
        let candidate = candidate?;
        trace!(
            "cols={} rows={} canvas={}x{} score={:.4}",
            candidate.grid.cols,
            candidate.grid.rows,
            candidate.canvas.width,
            candidate.canvas.height,
            candidate.score
        );
        if best.map_or(true, |b| candidate.score > b.score) {
            best = Some(candidate);
        }
    }
    // count >= 2 guarantees at least the single-column candidate
    let best = best.ok_or(CollageError::DegenerateInput { count })?;
    debug!(
        "Best grid {}x{} with score {:.4}",
        best.grid.cols, best.grid.rows, best.score
    );
    Ok(best)
}
