use crate::compose::Compositor;
use crate::drawing::{Drawable, Title};
use crate::grid::{CellSize, CollageConfig, Layout};
use crate::output::resize_to;
use crate::{CollageError, Cover};
use ab_glyph::FontArc;
use image::{DynamicImage, RgbImage, RgbaImage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::*;

/// A finished collage and the geometry it was built from.
#[derive(Debug, Clone)]
pub struct Collage {
    pub image: RgbaImage,
    pub layout: Layout,
    /// The captioned canvas before the final resize, kept only when a resize happened
    pub canvas: Option<RgbaImage>,
}

impl Collage {
    /// The image at the solved layout size, before any final resize.
    pub fn unresized(&self) -> &RgbaImage {
        self.canvas.as_ref().unwrap_or(&self.image)
    }

    /// Drops the alpha channel, for formats such as JPEG.
    pub fn into_rgb(self) -> RgbImage {
        DynamicImage::ImageRgba8(self.image).into_rgb8()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[derive(Clone)]
struct Caption {
    text: String,
    font: FontArc,
}

/// Runs layout, compositing, captioning and the final resize in order.
///
/// # Example
/// ```
/// use collager::{CollageBuilder, CollageConfig, Cover, TargetShape};
/// use image::{Rgba, RgbaImage};
///
/// let covers: Vec<Cover> = (0..9)
///     .map(|_| Cover::from_rgba(RgbaImage::from_pixel(60, 90, Rgba([0, 90, 0, 255]))).unwrap())
///     .collect();
/// let config = CollageConfig::new(TargetShape::Size { width: 640, height: 480 }).with_border(20);
/// let collage = CollageBuilder::new(config).build_seeded(&covers, 1).unwrap();
/// assert_eq!(collage.dimensions(), (640, 480));
/// ```
#[derive(Clone)]
pub struct CollageBuilder {
    config: CollageConfig,
    caption: Option<Caption>,
}

impl CollageBuilder {
    pub fn new(config: CollageConfig) -> Self {
        Self {
            config,
            caption: None,
        }
    }

    /// Adds a caption drawn with `font` at the configured title size and color.
    pub fn title(mut self, text: impl Into<String>, font: FontArc) -> Self {
        self.caption = Some(Caption {
            text: text.into(),
            font,
        });
        self
    }

    /// Builds the collage, drawing rotation angles from `rng`.
    pub fn build(&self, covers: &[Cover], rng: &mut StdRng) -> Result<Collage, CollageError> {
        info!("Creating collage from {} covers", covers.len());
        let cell = CellSize::covering(covers);
        let layout = Layout::plan(covers.len(), cell, &self.config)?;

        let mut image = Compositor::new(&layout, &self.config).compose(covers, rng)?;

        if let Some(caption) = &self.caption {
            Title {
                text: &caption.text,
                font: &caption.font,
                scale: self.config.title_scale,
                color: self.config.title_color,
                border: layout.gaps.border,
            }
            .draw(&mut image)?;
        }

        let canvas = match self.config.target.output_size() {
            Some((width, height)) => {
                let resized = resize_to(&image, width, height)?;
                Some(std::mem::replace(&mut image, resized))
            }
            None => None,
        };
        Ok(Collage {
            image,
            layout,
            canvas,
        })
    }

    /// Builds the collage with a generator seeded from `seed`.
    pub fn build_seeded(&self, covers: &[Cover], seed: u64) -> Result<Collage, CollageError> {
        self.build(covers, &mut StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Rotation, TargetShape};
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn covers(count: usize) -> Vec<Cover> {
        (0..count)
            .map(|i| {
                let shade = (i * 20) as u8;
                Cover::from_rgba(RgbaImage::from_pixel(100, 150, Rgba([shade, 0, 0, 255]))).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_build_aspect_ratio_keeps_solved_size() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 16.0,
            height: 9.0,
        });
        let collage = CollageBuilder::new(config).build_seeded(&covers(6), 0).unwrap();
        assert_eq!(collage.dimensions(), (1080, 608));
        assert_eq!(collage.layout.count, 6);
    }

    #[test]
    fn test_build_exact_size_resizes_last() {
        let config = CollageConfig::new(TargetShape::Size {
            width: 1920,
            height: 1080,
        });
        let collage = CollageBuilder::new(config).build_seeded(&covers(6), 0).unwrap();
        assert_eq!(collage.dimensions(), (1920, 1080));
        assert_eq!(
            (collage.layout.canvas.width, collage.layout.canvas.height),
            (1080, 608)
        );
        assert_eq!(collage.unresized().dimensions(), (1080, 608));
        // First cover is untouched on the unresized canvas
        assert_eq!(*collage.unresized().get_pixel(150, 150), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_unresized_is_the_image_without_exact_size() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 16.0,
            height: 9.0,
        });
        let collage = CollageBuilder::new(config).build_seeded(&covers(6), 0).unwrap();
        assert!(collage.canvas.is_none());
        assert_eq!(collage.unresized(), &collage.image);
    }

    #[test]
    fn test_build_is_idempotent_with_seed() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 4.0,
            height: 3.0,
        })
        .with_rotation(Rotation::new(2.0, 8.0));
        let builder = CollageBuilder::new(config);
        let first = builder.build_seeded(&covers(7), 99).unwrap();
        let second = builder.build_seeded(&covers(7), 99).unwrap();
        assert!(first.image.as_raw() == second.image.as_raw());
    }

    #[test]
    fn test_build_rejects_single_cover() {
        let builder = CollageBuilder::new(CollageConfig::default());
        assert!(matches!(
            builder.build_seeded(&covers(1), 0),
            Err(CollageError::DegenerateInput { count: 1 })
        ));
        assert!(matches!(
            builder.build_seeded(&[], 0),
            Err(CollageError::DegenerateInput { count: 0 })
        ));
    }

    #[test]
    fn test_build_single_cover_with_forced_grid() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 1.0,
            height: 1.0,
        })
        .with_forced_grid(1, 1)
        .with_border(10);
        let collage = CollageBuilder::new(config).build_seeded(&covers(1), 0).unwrap();
        assert_eq!(collage.dimensions(), (120, 170));
        assert!(collage.layout.warning.is_some());
    }

    #[test]
    fn test_into_rgb_drops_alpha() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 16.0,
            height: 9.0,
        })
        .with_background(Rgba([1, 2, 3, 255]));
        let rgb = CollageBuilder::new(config)
            .build_seeded(&covers(6), 0)
            .unwrap()
            .into_rgb();
        assert_eq!(rgb.get_pixel(0, 0).0, [1, 2, 3]);
    }
}
