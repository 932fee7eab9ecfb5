use super::*;

/// Reported when the axis that needs widening has no seam to widen.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RatioWarning {
    pub axis: Axis,
    pub target: f64,
    pub achieved: f64,
}

impl From<RatioWarning> for CollageError {
    fn from(warning: RatioWarning) -> Self {
        CollageError::UnattainableRatio {
            axis: warning.axis,
            target: warning.target,
            achieved: warning.achieved,
        }
    }
}

/// Outcome of the gap correction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GapAdjustment {
    pub gaps: GapGeometry,
    pub canvas: CanvasSize,
    pub warning: Option<RatioWarning>,
}

/// Enlarges the gaps of the short axis so the canvas reaches `target`.
///
/// A canvas narrower than the target gets wider column gaps, anything else gets
/// taller row gaps. The missing length is spread over the `count - 1` seams
/// between cells, half on each side of a seam, and rounded down. The border is
/// never touched.
///
/// # Example
/// ```
/// use collager::{grid::adjust, CanvasSize, CellSize, GapGeometry, GridSpec};
///
/// let adjusted = adjust(
///     GridSpec::new(5, 2),
///     CellSize::new(100, 150),
///     GapGeometry::new(4, 4, 150),
///     16.0 / 9.0,
/// )
/// .unwrap();
/// assert_eq!(adjusted.gaps, GapGeometry::new(35, 4, 150));
/// assert_eq!(adjusted.canvas, CanvasSize { width: 1080, height: 608 });
/// assert!(adjusted.warning.is_none());
/// ```
pub fn adjust(
    grid: GridSpec,
    cell: CellSize,
    gaps: GapGeometry,
    target: f64,
) -> Result<GapAdjustment, CollageError> {
    let canvas = CanvasSize::of(grid, cell, gaps)?;
    let ratio = canvas.aspect_ratio();
    let (axis, extra) = if ratio < target {
        (Axis::Columns, canvas.height as f64 * target - canvas.width as f64)
    } else {
        (Axis::Rows, canvas.width as f64 / target - canvas.height as f64)
    };
    trace!(
        "Canvas {}x{} ratio {:.4}, target {:.4}, {:?} short by {:.2}px",
        canvas.width,
        canvas.height,
        ratio,
        target,
        axis,
        extra
    );

    let seams = axis.internal_gaps(grid);
    if seams == 0 {
        let warning = (extra >= 1.0).then(|| {
            warn!(
                "Cannot reach aspect ratio {:.4}: {:?} axis has a single cell, staying at {:.4}",
                target, axis, ratio
            );
            RatioWarning {
                axis,
                target,
                achieved: ratio,
            }
        });
        return Ok(GapAdjustment {
            gaps,
            canvas,
            warning,
        });
    }

    let mut adjusted = gaps;
    let increment = (extra / seams as f64 / 2.0) as u64;
    let widened = (axis.gap(gaps) as u64).saturating_add(increment);
    *axis.gap_mut(&mut adjusted) =
        u32::try_from(widened).map_err(|_| CollageError::CanvasTooLarge {
            cols: grid.cols,
            rows: grid.rows,
        })?;
    let canvas = CanvasSize::of(grid, cell, adjusted)?;
    debug!(
        "{:?} gap {} -> {}, canvas {}x{} ratio {:.4}",
        axis,
        axis.gap(gaps),
        axis.gap(adjusted),
        canvas.width,
        canvas.height,
        canvas.aspect_ratio()
    );
    Ok(GapAdjustment {
        gaps: adjusted,
        canvas,
        warning: None,
    })
}
