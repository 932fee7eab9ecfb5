//! This module measures and draws the collage caption.
//!
//! The caption sits in the bottom-right corner, `border` pixels in from both
//! edges. It is never wrapped, scaled or truncated: text longer than the
//! canvas simply runs past the left margin.
//!
//! # Examples
//!
//! ```rust
//! use collager::drawing::title_anchor;
//!
//! // A 300x60 caption on a 1080x608 canvas with a 150 pixel border
//! assert_eq!(title_anchor((1080, 608), 150, (300, 60)), (630, 398));
//! ```

use crate::CollageError;
use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;
use tracing::*;

/// Trait for things that paint themselves onto a finished canvas.
pub trait Drawable {
    /// Draws the object on the provided image.
    ///
    /// # Errors
    /// Returns [`CollageError`] if drawing fails.
    fn draw(&self, image: &mut RgbaImage) -> Result<(), CollageError>;
}

/// A caption anchored to the bottom-right corner of the canvas.
#[derive(Clone)]
pub struct Title<'a> {
    pub text: &'a str,
    pub font: &'a FontArc,
    /// Glyph height in pixels.
    pub scale: f32,
    pub color: Rgba<u8>,
    pub border: u32,
}

// FontArc has no Debug
impl std::fmt::Debug for Title<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Title")
            .field("text", &self.text)
            .field("font", &"<font>")
            .field("scale", &self.scale)
            .field("color", &self.color)
            .field("border", &self.border)
            .finish()
    }
}

impl Title<'_> {
    /// Width and height of the rendered text.
    pub fn measure(&self) -> (u32, u32) {
        text_size(self.scale, self.font, self.text)
    }

    /// Top-left corner of the text on a `width` x `height` canvas.
    pub fn position(&self, width: u32, height: u32) -> (i32, i32) {
        title_anchor((width, height), self.border, self.measure())
    }
}

impl Drawable for Title<'_> {
    fn draw(&self, image: &mut RgbaImage) -> Result<(), CollageError> {
        if self.text.is_empty() {
            return Ok(());
        }
        let (x, y) = self.position(image.width(), image.height());
        debug!("Drawing title {:?} at ({}, {})", self.text, x, y);
        draw_text_mut(image, self.color, x, y, self.scale, self.font, self.text);
        Ok(())
    }
}

/// Places a `text` sized box `border` pixels in from the bottom-right corner of `canvas`.
///
/// The result goes negative when the text is wider or taller than the space
/// left by the border.
pub fn title_anchor(canvas: (u32, u32), border: u32, text: (u32, u32)) -> (i32, i32) {
    let x = canvas.0 as i64 - (border as i64 + text.0 as i64);
    let y = canvas.1 as i64 - (border as i64 + text.1 as i64);
    (x as i32, y as i32)
}

/// Parses TrueType or OpenType font data.
pub fn load_font(bytes: Vec<u8>) -> Result<FontArc, CollageError> {
    FontArc::try_from_vec(bytes).map_err(|e| CollageError::FontLoad(e.to_string()))
}

/// Reads and parses a font file.
pub fn load_font_file(path: impl AsRef<Path>) -> Result<FontArc, CollageError> {
    let path = path.as_ref();
    trace!("Loading font {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| CollageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_font(bytes).map_err(|e| match e {
        CollageError::FontLoad(reason) => {
            CollageError::FontLoad(format!("{}: {}", path.display(), reason))
        }
        other => other,
    })
}
