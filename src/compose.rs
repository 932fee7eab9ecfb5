use crate::grid::{CellFit, CellSize, CollageConfig, Layout, Rotation, SmallVecLine};
use crate::{CollageError, Cover};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::borrow::Cow;
use tracing::*;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Source of per-cover rotation angles, in degrees.
#[derive(Debug, Clone)]
pub enum AngleSampler {
    Fixed(f32),
    Uniform(Uniform<f32>),
}

impl AngleSampler {
    /// `None` when covers are pasted upright.
    pub fn new(rotation: Rotation) -> Result<Option<Self>, CollageError> {
        if !rotation.is_enabled() {
            return Ok(None);
        }
        if rotation.spread == 0.0 {
            return Ok(Some(AngleSampler::Fixed(rotation.center)));
        }
        let low = rotation.center - rotation.spread;
        let high = rotation.center + rotation.spread;
        Uniform::new_inclusive(low, high)
            .map(|uniform| Some(AngleSampler::Uniform(uniform)))
            .map_err(|e| CollageError::InvalidRotation(format!("[{low}, {high}]: {e}")))
    }

    pub fn sample(&self, rng: &mut StdRng) -> f32 {
        match self {
            AngleSampler::Fixed(angle) => *angle,
            AngleSampler::Uniform(uniform) => uniform.sample(rng),
        }
    }
}

/// Pastes covers onto a fresh canvas following a solved [`Layout`].
///
/// # Example
/// ```
/// use collager::{compose::Compositor, CellSize, CollageConfig, Cover, Layout, TargetShape};
/// use image::{Rgba, RgbaImage};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let covers: Vec<Cover> = (0..4)
///     .map(|_| Cover::from_rgba(RgbaImage::from_pixel(30, 40, Rgba([0, 0, 255, 255]))).unwrap())
///     .collect();
/// let config = CollageConfig::new(TargetShape::AspectRatio { width: 1.0, height: 1.0 }).with_border(10);
/// let layout = Layout::plan(covers.len(), CellSize::covering(&covers), &config).unwrap();
/// let canvas = Compositor::new(&layout, &config)
///     .compose(&covers, &mut StdRng::seed_from_u64(0))
///     .unwrap();
/// assert_eq!(canvas.dimensions(), (layout.canvas.width, layout.canvas.height));
/// assert_eq!(*canvas.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
/// ```
#[derive(Debug, Clone)]
pub struct Compositor<'a> {
    layout: &'a Layout,
    background: Rgba<u8>,
    rotation: Rotation,
    fit: CellFit,
}

impl<'a> Compositor<'a> {
    pub fn new(layout: &'a Layout, config: &CollageConfig) -> Self {
        Self {
            layout,
            background: config.background,
            rotation: config.rotation,
            fit: config.cell_fit,
        }
    }

    /// Allocates the canvas and pastes every cover in input order.
    ///
    /// Angles are drawn from `rng` one cover at a time, so the same seed always
    /// yields the same pixels.
    pub fn compose(&self, covers: &[Cover], rng: &mut StdRng) -> Result<RgbaImage, CollageError> {
        if covers.len() != self.layout.count {
            return Err(CollageError::CoverCountMismatch {
                expected: self.layout.count,
                actual: covers.len(),
            });
        }
        let sampler = AngleSampler::new(self.rotation)?;
        let cell = self.layout.cell;
        let mut canvas = RgbaImage::from_pixel(
            self.layout.canvas.width,
            self.layout.canvas.height,
            self.background,
        );
        debug!(
            "Composing {} covers on a {}x{} canvas",
            covers.len(),
            canvas.width(),
            canvas.height()
        );

        // Angles are drawn in input order before tiles render in parallel
        let angles: SmallVecLine<Option<f32>> = covers
            .iter()
            .map(|_| sampler.as_ref().map(|sampler| sampler.sample(rng)))
            .collect();
        let tiles: Vec<RgbaImage> = covers
            .par_iter()
            .zip(angles.as_slice().par_iter())
            .map(|(cover, angle)| {
                let padded = letterbox(&cover.pixels, cell, self.background, self.fit);
                match angle {
                    Some(angle) => rotate_expanded(&padded, *angle),
                    None => padded,
                }
            })
            .collect();

        let placements = tiles.iter().zip(angles.iter()).zip(self.layout.placements());
        for (index, ((tile, angle), placement)) in placements.enumerate() {
            let (x, y) = (placement.x as i64, placement.y as i64);
            match angle {
                None => imageops::replace(&mut canvas, tile, x, y),
                Some(angle) => {
                    trace!("Cover {} at ({}, {}) rotated {:.2} degrees", index, x, y, angle);
                    // The grown frame hangs past the cell to the right and below
                    imageops::overlay(&mut canvas, tile, x, y);
                }
            }
        }
        Ok(canvas)
    }
}

/// Centers `image` in a `cell`-sized frame filled with `background`.
///
/// With [`CellFit::Contain`] the image is first scaled, keeping its aspect
/// ratio, to the largest size that fits the cell.
///
/// # Example
/// ```
/// use collager::{compose::letterbox, CellFit, CellSize};
/// use image::{Rgba, RgbaImage};
///
/// let cover = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
/// let white = Rgba([255, 255, 255, 255]);
/// let cell = letterbox(&cover, CellSize::new(4, 6), white, CellFit::Pad);
/// assert_eq!(cell.dimensions(), (4, 6));
/// assert_eq!(*cell.get_pixel(0, 0), white);
/// assert_eq!(*cell.get_pixel(1, 2), Rgba([255, 0, 0, 255]));
/// ```
pub fn letterbox(
    image: &RgbaImage,
    cell: CellSize,
    background: Rgba<u8>,
    fit: CellFit,
) -> RgbaImage {
    let source = match fit {
        CellFit::Pad => Cow::Borrowed(image),
        CellFit::Contain => contain(image, cell),
    };
    let mut frame = RgbaImage::from_pixel(cell.width, cell.height, background);
    let x = (cell.width as i64 - source.width() as i64) / 2;
    let y = (cell.height as i64 - source.height() as i64) / 2;
    imageops::overlay(&mut frame, source.as_ref(), x, y);
    frame
}

fn contain(image: &RgbaImage, cell: CellSize) -> Cow<'_, RgbaImage> {
    let (width, height) = image.dimensions();
    let scale = (cell.width as f64 / width as f64).min(cell.height as f64 / height as f64);
    let fitted_width = ((width as f64 * scale).round() as u32).clamp(1, cell.width.max(1));
    let fitted_height = ((height as f64 * scale).round() as u32).clamp(1, cell.height.max(1));
    if (fitted_width, fitted_height) == (width, height) {
        return Cow::Borrowed(image);
    }
    Cow::Owned(imageops::resize(
        image,
        fitted_width,
        fitted_height,
        FilterType::Lanczos3,
    ))
}

/// Rotates `image` counter-clockwise by `degrees`, growing the frame so no corner is cut.
///
/// Pixels outside the rotated image are fully transparent.
///
/// # Example
/// ```
/// use collager::compose::rotate_expanded;
/// use image::{Rgba, RgbaImage};
///
/// let rotated = rotate_expanded(&RgbaImage::from_pixel(100, 40, Rgba([9, 9, 9, 255])), 90.0);
/// assert!(rotated.width() >= 100 && rotated.height() >= 100);
/// assert_eq!(rotated.get_pixel(0, 0)[3], 0);
/// ```
pub fn rotate_expanded(image: &RgbaImage, degrees: f32) -> RgbaImage {
    if degrees % 360.0 == 0.0 {
        return image.clone();
    }
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let (width, height) = (image.width() as f32, image.height() as f32);
    let bound_width = (width * cos.abs() + height * sin.abs()).ceil() as u32;
    let bound_height = (width * sin.abs() + height * cos.abs()).ceil() as u32;

    // The frame must hold the image both before and after rotation, plus a
    // transparent margin for the bilinear edge samples.
    let frame_width = bound_width.max(image.width()) + 2;
    let frame_height = bound_height.max(image.height()) + 2;
    let mut frame = RgbaImage::from_pixel(frame_width, frame_height, TRANSPARENT);
    imageops::replace(
        &mut frame,
        image,
        ((frame_width - image.width()) / 2) as i64,
        ((frame_height - image.height()) / 2) as i64,
    );
    // imageproc turns clockwise in image coordinates
    rotate_about_center(&frame, -radians, Interpolation::Bilinear, TRANSPARENT)
}
