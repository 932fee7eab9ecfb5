use crate::{CollageError, Layout};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;

/// Outlines every cell and the border of `layout` on `image`.
///
/// `image` is expected to be the unresized canvas the layout was solved for.
pub fn draw_layout_outline(image: &mut RgbaImage, layout: &Layout, color: Rgba<u8>) {
    for rect in layout.cell_rects() {
        draw_hollow_rect_mut(image, rect, color);
    }
    let border = layout.gaps.border;
    let inner_width = layout.canvas.width.saturating_sub(2 * border);
    let inner_height = layout.canvas.height.saturating_sub(2 * border);
    if inner_width > 0 && inner_height > 0 {
        let inner = Rect::at(border as i32, border as i32).of_size(inner_width, inner_height);
        draw_hollow_rect_mut(image, inner, color);
    }
}

/// Saves a copy of `image` with the layout outlined on it.
///
/// # Errors
/// Returns [`CollageError`] if saving fails.
pub fn save_image_with_layout(
    image: &RgbaImage,
    layout: &Layout,
    output_path: impl AsRef<Path>,
    color: Rgba<u8>,
) -> Result<(), CollageError> {
    let mut outlined = image.clone();
    draw_layout_outline(&mut outlined, layout, color);
    let path = output_path.as_ref();
    outlined.save(path).map_err(|source| CollageError::ImageSave {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CellSize, CollageConfig, TargetShape};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline_marks_cell_corners() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 16.0,
            height: 9.0,
        });
        let layout = Layout::plan(6, CellSize::new(100, 150), &config).unwrap();
        let mut image = RgbaImage::from_pixel(
            layout.canvas.width,
            layout.canvas.height,
            Rgba([255, 255, 255, 255]),
        );
        let red = Rgba([255, 0, 0, 255]);
        draw_layout_outline(&mut image, &layout, red);

        for placement in layout.placements() {
            assert_eq!(*image.get_pixel(placement.x, placement.y), red);
            assert_eq!(*image.get_pixel(placement.x + 99, placement.y + 149), red);
        }
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_save_image_with_layout() {
        let config = CollageConfig::new(TargetShape::AspectRatio {
            width: 1.0,
            height: 1.0,
        })
        .with_border(5);
        let layout = Layout::plan(4, CellSize::new(10, 10), &config).unwrap();
        let image = RgbaImage::new(layout.canvas.width, layout.canvas.height);

        let output_path = std::env::temp_dir().join(format!(
            "collager-outline-{}.png",
            std::process::id()
        ));
        save_image_with_layout(&image, &layout, &output_path, Rgba([0, 0, 255, 255])).unwrap();

        // Check that the file was created
        assert!(output_path.exists());

        // Clean up the test file
        std::fs::remove_file(output_path).unwrap();
    }
}
