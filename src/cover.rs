use crate::{CellSize, CollageError};
use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::*;

/// One decoded source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub pixels: RgbaImage,
    pub width: u32,
    pub height: u32,
}

impl Cover {
    /// Wraps an already decoded image.
    ///
    /// # Example
    /// ```
    /// use collager::Cover;
    /// use image::RgbaImage;
    ///
    /// let cover = Cover::from_rgba(RgbaImage::new(120, 180)).unwrap();
    /// assert_eq!((cover.width, cover.height), (120, 180));
    /// assert!(Cover::from_rgba(RgbaImage::new(0, 180)).is_err());
    /// ```
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, CollageError> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            error!(
                "Invalid image dimensions: width={}, height={}",
                width, height
            );
            return Err(CollageError::InvalidDimensions { width, height });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Decodes the image at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CollageError> {
        let path = path.as_ref();
        trace!("Decoding cover {}", path.display());
        let image = image::open(path).map_err(|source| match source {
            image::ImageError::IoError(source) => CollageError::Io {
                path: path.to_path_buf(),
                source,
            },
            source => CollageError::CoverDecode {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Self::try_from(image)
    }

    /// Decodes every path, keeping input order. The first failure aborts the load.
    pub fn load_all<P>(paths: &[P], parallel: bool) -> Result<Vec<Self>, CollageError>
    where
        P: AsRef<Path> + Sync,
    {
        debug!("Loading {} covers (parallel={})", paths.len(), parallel);
        if parallel {
            paths.par_iter().map(Self::open).collect()
        } else {
            paths.iter().map(Self::open).collect()
        }
    }
}

impl TryFrom<DynamicImage> for Cover {
    type Error = CollageError;

    fn try_from(image: DynamicImage) -> Result<Self, Self::Error> {
        Self::from_rgba(image.into_rgba8())
    }
}

impl CellSize {
    /// The smallest cell every cover fits in: the widest width and the tallest height.
    ///
    /// # Example
    /// ```
    /// use collager::{CellSize, Cover};
    /// use image::RgbaImage;
    ///
    /// let covers = [
    ///     Cover::from_rgba(RgbaImage::new(100, 150)).unwrap(),
    ///     Cover::from_rgba(RgbaImage::new(120, 140)).unwrap(),
    /// ];
    /// assert_eq!(CellSize::covering(&covers), CellSize::new(120, 150));
    /// ```
    pub fn covering(covers: &[Cover]) -> Self {
        covers.iter().fold(CellSize::default(), |cell, cover| {
            cell.include(cover.width, cover.height)
        })
    }
}

/// Reads a list of cover paths, one per line. Blank lines and `#` comments are skipped
/// and relative paths resolve against the list's directory.
pub fn read_cover_list(path: impl AsRef<Path>) -> Result<Vec<PathBuf>, CollageError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| CollageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(parse_cover_list(&contents, base))
}

fn parse_cover_list(contents: &str, base: &Path) -> Vec<PathBuf> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| base.join(line))
        .collect()
}
