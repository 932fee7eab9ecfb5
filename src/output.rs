use crate::CollageError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::*;

/// Scales the finished canvas to exactly `width` x `height`.
///
/// The aspect ratio is not preserved; a size that disagrees with the solved
/// layout stretches the collage.
pub fn resize_to(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, CollageError> {
    if width == 0 || height == 0 {
        error!("Invalid output dimensions: width={}, height={}", width, height);
        return Err(CollageError::InvalidDimensions { width, height });
    }
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }
    debug!(
        "Resizing {}x{} to {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    Ok(imageops::resize(image, width, height, FilterType::Lanczos3))
}

/// Lowercase ASCII slug with runs of other characters collapsed to `-`.
///
/// # Example
/// ```
/// use collager::output::slugify;
///
/// assert_eq!(slugify("Read in 2023, Vol. 2!"), "read-in-2023-vol-2");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `collage-<slug>-<width>x<height>.jpg` in `dir`, suffixed `_1`, `_2`, ... until no file is in the way.
pub fn default_output_path(title: &str, width: u32, height: u32, dir: impl AsRef<Path>) -> PathBuf {
    let slug = slugify(title);
    let base = if slug.is_empty() {
        format!("collage-{width}x{height}")
    } else {
        format!("collage-{slug}-{width}x{height}")
    };
    let dir = dir.as_ref();
    let mut path = dir.join(format!("{base}.jpg"));
    let mut count = 1;
    while path.exists() {
        path = dir.join(format!("{base}_{count}.jpg"));
        count += 1;
    }
    path
}

/// Writes the collage, dropping the alpha channel for formats without one.
pub fn save_collage(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), CollageError> {
    let path = path.as_ref();
    let keeps_alpha = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_ascii_lowercase().as_str(), "png" | "webp" | "tiff" | "tif"))
        .unwrap_or(false);
    info!("Saving collage: {}", path.display());
    let result = if keeps_alpha {
        image.save(path)
    } else {
        DynamicImage::ImageRgba8(image.clone()).into_rgb8().save(path)
    };
    result.map_err(|source| CollageError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}
