use super::*;
use image::Rgba;
use std::str::FromStr;

const DEFAULT_WIDTH: u32 = 1920;
const DEFAULT_HEIGHT: u32 = 1080;
const DEFAULT_BORDER: u32 = 150;
const DEFAULT_GAP_RATIO: f64 = 0.04;
const DEFAULT_TITLE_SCALE: f32 = 65.0;

/// Requested shape of the finished collage.
///
/// An aspect ratio only steers the layout; an exact size also resizes the
/// composed canvas to those pixels at the end.
///
/// # Example
/// ```
/// use collager::TargetShape;
///
/// let size: TargetShape = "1920x1080".parse().unwrap();
/// assert_eq!(size, TargetShape::Size { width: 1920, height: 1080 });
/// assert_eq!(size.output_size(), Some((1920, 1080)));
///
/// let ratio: TargetShape = "8.5:11".parse().unwrap();
/// assert!((ratio.aspect_ratio() - 8.5 / 11.0).abs() < 1e-12);
/// assert_eq!(ratio.output_size(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TargetShape {
    AspectRatio { width: f64, height: f64 },
    Size { width: u32, height: u32 },
}

impl TargetShape {
    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        match *self {
            TargetShape::AspectRatio { width, height } => width / height,
            TargetShape::Size { width, height } => width as f64 / height as f64,
        }
    }

    /// Pixel size the canvas must be resized to, if one was requested.
    pub fn output_size(&self) -> Option<(u32, u32)> {
        match *self {
            TargetShape::Size { width, height } => Some((width, height)),
            TargetShape::AspectRatio { .. } => None,
        }
    }

    pub fn validate(&self) -> Result<(), CollageError> {
        let valid = match *self {
            TargetShape::AspectRatio { width, height } => {
                width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
            }
            TargetShape::Size { width, height } => width > 0 && height > 0,
        };
        if valid {
            Ok(())
        } else {
            Err(CollageError::InvalidTarget(format!("{self:?}")))
        }
    }
}

impl Default for TargetShape {
    fn default() -> Self {
        TargetShape::Size {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl FromStr for TargetShape {
    type Err = CollageError;

    /// Parses `WxH` as a pixel size and `W:H` as an aspect ratio.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CollageError::InvalidTarget(s.to_string());
        let shape = if let Some((w, h)) = s.split_once(':') {
            TargetShape::AspectRatio {
                width: w.trim().parse().map_err(|_| invalid())?,
                height: h.trim().parse().map_err(|_| invalid())?,
            }
        } else if let Some((w, h)) = s.split_once(['x', 'X']) {
            TargetShape::Size {
                width: w.trim().parse().map_err(|_| invalid())?,
                height: h.trim().parse().map_err(|_| invalid())?,
            }
        } else {
            return Err(invalid());
        };
        shape.validate().map_err(|_| invalid())?;
        Ok(shape)
    }
}

/// Random per-cover rotation, in degrees counter-clockwise.
///
/// Each cover is turned by an angle drawn uniformly from
/// `[center - spread, center + spread]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Rotation {
    pub center: f32,
    pub spread: f32,
}

impl Rotation {
    pub fn new(center: f32, spread: f32) -> Self {
        Self {
            center,
            spread: spread.abs(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.center != 0.0 || self.spread > 0.0
    }
}

/// How a cover is fitted into its cell before padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CellFit {
    /// Center the cover at its own size.
    #[default]
    Pad,
    /// Scale the cover to the largest size that fits the cell, then center it.
    Contain,
}

/// Every option of a collage build.
///
/// # Example
/// ```
/// use collager::{CollageConfig, TargetShape};
///
/// let config = CollageConfig::default();
/// assert_eq!(config.border, 150);
/// assert_eq!(config.gap_ratio, 0.04);
/// assert_eq!(config.target, TargetShape::Size { width: 1920, height: 1080 });
/// assert!(config.forced_grid().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct CollageConfig {
    /// Aspect ratio or exact size of the result (default: 1920x1080)
    pub target: TargetShape,
    /// Forced number of columns; must be paired with `forced_rows`
    pub forced_cols: Option<u32>,
    /// Forced number of rows; must be paired with `forced_cols`
    pub forced_rows: Option<u32>,
    /// Fixed outer margin in pixels (default: 150)
    pub border: u32,
    /// Initial gap as a fraction of the cell width (default: 0.04)
    pub gap_ratio: f64,
    /// Per-cover rotation (default: none)
    pub rotation: Rotation,
    /// Canvas and letterbox color (default: white)
    pub background: Rgba<u8>,
    /// Caption color (default: black)
    pub title_color: Rgba<u8>,
    /// Caption size in pixels (default: 65)
    pub title_scale: f32,
    pub cell_fit: CellFit,
    /// Fail instead of warning when the target ratio cannot be reached
    pub strict_ratio: bool,
    /// Decode covers on the rayon pool (default: true)
    pub parallel_decode: bool,
}

impl CollageConfig {
    /// Creates a config for `target` with every other option at its default.
    pub fn new(target: TargetShape) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn with_forced_grid(mut self, cols: u32, rows: u32) -> Self {
        self.forced_cols = Some(cols);
        self.forced_rows = Some(rows);
        self
    }

    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_background(mut self, background: Rgba<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn with_title_color(mut self, color: Rgba<u8>) -> Self {
        self.title_color = color;
        self
    }

    pub fn with_cell_fit(mut self, fit: CellFit) -> Self {
        self.cell_fit = fit;
        self
    }

    pub fn with_strict_ratio(mut self, strict: bool) -> Self {
        self.strict_ratio = strict;
        self
    }

    /// The forced grid, if both halves were given.
    ///
    /// # Example
    /// ```
    /// use collager::{CollageConfig, CollageError, GridSpec};
    ///
    /// let config = CollageConfig::default().with_forced_grid(4, 3);
    /// assert_eq!(config.forced_grid().unwrap(), Some(GridSpec::new(4, 3)));
    ///
    /// let mut partial = CollageConfig::default();
    /// partial.forced_cols = Some(4);
    /// assert!(matches!(
    ///     partial.forced_grid(),
    ///     Err(CollageError::PartialForcedGrid { .. })
    /// ));
    /// ```
    pub fn forced_grid(&self) -> Result<Option<GridSpec>, CollageError> {
        match (self.forced_cols, self.forced_rows) {
            (None, None) => Ok(None),
            (Some(cols), Some(rows)) if cols > 0 && rows > 0 => Ok(Some(GridSpec::new(cols, rows))),
            (Some(cols), Some(rows)) => Err(CollageError::EmptyForcedGrid { cols, rows }),
            (cols, rows) => Err(CollageError::PartialForcedGrid { cols, rows }),
        }
    }
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            target: TargetShape::default(),
            forced_cols: None,
            forced_rows: None,
            border: DEFAULT_BORDER,
            gap_ratio: DEFAULT_GAP_RATIO,
            rotation: Rotation::default(),
            background: Rgba([255, 255, 255, 255]),
            title_color: Rgba([0, 0, 0, 255]),
            title_scale: DEFAULT_TITLE_SCALE,
            cell_fit: CellFit::default(),
            strict_ratio: false,
            parallel_decode: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("1920x1080", TargetShape::Size { width: 1920, height: 1080 })]
    #[test_case("800X600", TargetShape::Size { width: 800, height: 600 })]
    #[test_case("16:9", TargetShape::AspectRatio { width: 16.0, height: 9.0 })]
    #[test_case(" 8.5 : 11 ", TargetShape::AspectRatio { width: 8.5, height: 11.0 })]
    fn test_parse_target(input: &str, expected: TargetShape) {
        assert_eq!(input.parse::<TargetShape>().unwrap(), expected);
    }

    #[test_case("")]
    #[test_case("1920")]
    #[test_case("0x1080")]
    #[test_case("16:0")]
    #[test_case("-4:3")]
    #[test_case("axb")]
    #[test_case("inf:1")]
    fn test_parse_target_rejects(input: &str) {
        assert!(matches!(
            input.parse::<TargetShape>(),
            Err(CollageError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_forced_grid_validation() {
        let mut config = CollageConfig::default();
        config.forced_rows = Some(2);
        assert!(matches!(
            config.forced_grid(),
            Err(CollageError::PartialForcedGrid {
                cols: None,
                rows: Some(2)
            })
        ));

        let config = CollageConfig::default().with_forced_grid(0, 3);
        assert!(matches!(
            config.forced_grid(),
            Err(CollageError::EmptyForcedGrid { cols: 0, rows: 3 })
        ));
    }

    #[test]
    fn test_rotation_enabled() {
        assert!(!Rotation::default().is_enabled());
        assert!(Rotation::new(0.0, 5.0).is_enabled());
        assert!(Rotation::new(-3.0, 0.0).is_enabled());
        assert_eq!(Rotation::new(1.0, -5.0).spread, 5.0);
    }
}
