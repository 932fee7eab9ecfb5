//! Grid layout: choosing rows and columns, correcting gaps, and walking cell positions.
use crate::CollageError;
#[cfg(feature = "drawing")]
use imageproc::rect::Rect;
use smallvec::SmallVec;
use tracing::*;

mod color;
mod components;
mod config;
mod gaps;
mod placement;
mod solver;

pub use color::*;
pub use components::*;
pub use config::*;
pub use gaps::*;
pub use placement::*;
pub use solver::*;

// Covers per collage are usually a year's shelf
const DEFAULT_SMALLVEC_SIZE: usize = 32;

/// A type alias for SmallVec with an optimized stack-allocated buffer size.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

/// The solved geometry of a collage.
///
/// # Example
/// ```
/// use collager::{CellSize, CollageConfig, GridSpec, Layout, TargetShape};
///
/// let config = CollageConfig::new(TargetShape::AspectRatio { width: 16.0, height: 9.0 });
/// let layout = Layout::plan(6, CellSize::new(100, 150), &config).unwrap();
/// assert_eq!(layout.grid, GridSpec::new(5, 2));
/// assert_eq!((layout.canvas.width, layout.canvas.height), (1080, 608));
/// assert_eq!(layout.placements().count(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layout {
    /// Number of covers placed
    pub count: usize,
    pub grid: GridSpec,
    pub cell: CellSize,
    pub gaps: GapGeometry,
    pub canvas: CanvasSize,
    /// Score of the chosen grid before gap correction
    pub score: f64,
    /// Set when the target ratio could not be reached
    pub warning: Option<RatioWarning>,
}

impl Layout {
    /// Solves the grid for `count` covers padded to `cell`, then corrects its gaps.
    pub fn plan(count: usize, cell: CellSize, config: &CollageConfig) -> Result<Self, CollageError> {
        config.target.validate()?;
        let forced = config.forced_grid()?;
        if count > 0 && (cell.width == 0 || cell.height == 0) {
            error!(
                "Invalid cell dimensions: width={}, height={}",
                cell.width, cell.height
            );
            return Err(CollageError::InvalidDimensions {
                width: cell.width,
                height: cell.height,
            });
        }
        let target = config.target.aspect_ratio();
        let initial = GapGeometry::initial(cell, config.border, config.gap_ratio);
        trace!(
            "Planning {} covers in {}x{} cells, initial gaps {:?}",
            count,
            cell.width,
            cell.height,
            initial
        );

        let chosen = solve(count, cell, initial, target, forced)?;
        let adjusted = adjust(chosen.grid, cell, initial, target)?;
        if let Some(warning) = adjusted.warning {
            if config.strict_ratio {
                return Err(warning.into());
            }
        }
        info!(
            "Layout {}x{} grid, canvas {}x{}",
            chosen.grid.cols, chosen.grid.rows, adjusted.canvas.width, adjusted.canvas.height
        );
        Ok(Self {
            count,
            grid: chosen.grid,
            cell,
            gaps: adjusted.gaps,
            canvas: adjusted.canvas,
            score: chosen.score,
            warning: adjusted.warning,
        })
    }

    /// Positions of every cover, in input order.
    pub fn placements(&self) -> PlacementStream {
        PlacementStream::new(self.canvas, self.cell, self.gaps, self.count)
    }

    /// Rectangles of every placed cell.
    #[cfg(feature = "drawing")]
    pub fn cell_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.placements().map(move |p| {
            Rect::at(p.x as i32, p.y as i32).of_size(self.cell.width, self.cell.height)
        })
    }
}
