//! This crate arranges book covers into a single collage whose shape matches a requested aspect ratio.
//! It uses the `image` and `imageproc` crates for image manipulation and `ab_glyph` for the caption.
//!
//! The pipeline runs in a fixed order:
//! [`grid::solve`] picks the grid, [`grid::adjust`] corrects the gaps,
//! [`compose::Compositor`] pastes the covers, [`drawing::Title`] draws the caption
//! and [`output::resize_to`] scales to an exact size when one was requested.
//!
//! # Example
//! ```
//! use collager::*;
//! use image::{Rgba, RgbaImage};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let covers: Vec<Cover> = (0..6)
//!     .map(|_| Cover::from_rgba(RgbaImage::from_pixel(100, 150, Rgba([200, 30, 30, 255]))).unwrap())
//!     .collect();
//! let config = CollageConfig::new(TargetShape::AspectRatio { width: 16.0, height: 9.0 });
//! let collage = CollageBuilder::new(config)
//!     .build(&covers, &mut StdRng::seed_from_u64(7))
//!     .unwrap();
//! assert_eq!(collage.image.dimensions(), (1080, 608));
//! ```

/// Cover decoding and the cell size shared by all covers.
pub mod cover;
/// Grid solver, gap correction and placement of cells.
pub mod grid;
/// Letterboxing, rotation and pasting of covers onto the canvas.
pub mod compose;
/// Caption measurement and rendering.
pub mod drawing;
/// The full build from covers to finished image.
pub mod collage;
/// Resizing, file naming and saving of finished collages.
pub mod output;
/// Debug module for visualizing the layout on the collage.
///
/// # Example
/// ```
/// use collager::*;
/// use image::{Rgba, RgbaImage};
///
/// let config = CollageConfig::new(TargetShape::AspectRatio { width: 4.0, height: 3.0 });
/// let layout = Layout::plan(4, CellSize::new(40, 60), &config).unwrap();
/// let mut canvas = RgbaImage::new(layout.canvas.width, layout.canvas.height);
/// debug::draw_layout_outline(&mut canvas, &layout, Rgba([255, 0, 0, 255]));
/// ```
#[cfg(feature = "drawing")]
pub mod debug;

pub use collage::{Collage, CollageBuilder};
pub use cover::Cover;
pub use grid::{
    parse_color, Axis, CanvasSize, CellFit, CellSize, CollageConfig, GapGeometry, GridSpec,
    Layout, Placement, PlacementStream, RatioWarning, Rotation, TargetShape,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CollageError {
    #[error("Forced grid needs both columns and rows: cols={cols:?}, rows={rows:?}")]
    PartialForcedGrid {
        cols: Option<u32>,
        rows: Option<u32>,
    },

    #[error("Forced grid must have at least one cell: cols={cols}, rows={rows}")]
    EmptyForcedGrid { cols: u32, rows: u32 },

    #[error("Forced grid {cols}x{rows} cannot hold {count} covers")]
    ForcedGridTooSmall { cols: u32, rows: u32, count: usize },

    #[error("At least 2 covers are needed to search for a grid, got {count}")]
    DegenerateInput { count: usize },

    #[error("Aspect ratio {target:.4} is unattainable along {axis:?}, got {achieved:.4}")]
    UnattainableRatio {
        axis: Axis,
        target: f64,
        achieved: f64,
    },

    #[error("Invalid target shape: {0}")]
    InvalidTarget(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Canvas for a {cols}x{rows} grid is larger than {} pixels on a side", u32::MAX)]
    CanvasTooLarge { cols: u32, rows: u32 },

    #[error("Layout has room for {expected} covers, got {actual}")]
    CoverCountMismatch { expected: usize, actual: usize },

    #[error("Failed to decode cover {}: {source}", path.display())]
    CoverDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Failed to save image {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
