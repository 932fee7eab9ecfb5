use anyhow::{bail, Context, Result};
use clap::Parser;
use collager::{
    cover::read_cover_list, drawing::load_font_file, output, parse_color, CellFit, CollageBuilder,
    CollageConfig, Cover, Rotation, TargetShape,
};
use image::Rgba;
use rand::{rngs::StdRng, SeedableRng};
use std::path::PathBuf;
use tracing::*;
use tracing_subscriber::EnvFilter;

/// Arrange book covers into a single collage of a given size or aspect ratio.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Cover images, in the order they should appear.
    images: Vec<PathBuf>,

    /// File listing cover images, one per line. Appended after IMAGES.
    #[arg(long)]
    list: Option<PathBuf>,

    /// Size of collage in pixels WxH, e.g.: 1920x1080
    #[arg(long, value_parser = parse_size)]
    size: Option<TargetShape>,

    /// Aspect ratio of collage W:H, e.g.: 16:9, 8.5:11. Actual size follows from the covers.
    #[arg(long, value_parser = parse_aspect)]
    aspect: Option<TargetShape>,

    /// Force the collage to have this many rows. Requires --cols.
    #[arg(long)]
    rows: Option<u32>,

    /// Force the collage to have this many columns. Requires --rows.
    #[arg(long)]
    cols: Option<u32>,

    /// Rotation of each cover in degrees, e.g.: 10
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    rotation: f32,

    /// Random variation added to the rotation, in degrees either way.
    #[arg(long, default_value_t = 0.0)]
    rotation_spread: f32,

    /// Seed for the rotation angles.
    #[arg(long)]
    seed: Option<u64>,

    /// Background color, e.g.: black, #1e90ff
    #[arg(long, value_parser = parse_color)]
    background_color: Option<Rgba<u8>>,

    /// Title color, e.g.: white
    #[arg(long, value_parser = parse_color)]
    title_color: Option<Rgba<u8>>,

    /// Title of collage, drawn in the bottom-right corner.
    #[arg(long, requires = "font")]
    title: Option<String>,

    /// TrueType or OpenType font for the title.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Title size in pixels.
    #[arg(long, default_value_t = 65.0)]
    font_size: f32,

    /// Size of border in pixels.
    #[arg(long, default_value_t = 150)]
    border: u32,

    /// Scale covers up to fill their cell before padding.
    #[arg(long)]
    contain: bool,

    /// Fail when the requested ratio cannot be reached.
    #[arg(long)]
    strict_ratio: bool,

    /// Decode covers one at a time.
    #[arg(long)]
    sequential: bool,

    /// Filename of output image.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the unresized collage with its cells outlined here.
    #[cfg(feature = "drawing")]
    #[arg(long)]
    debug_overlay: Option<PathBuf>,
}

fn parse_size(s: &str) -> Result<TargetShape, String> {
    match s.parse::<TargetShape>() {
        Ok(shape @ TargetShape::Size { .. }) => Ok(shape),
        _ => Err(format!("expected WxH, e.g. 1920x1080, got {s:?}")),
    }
}

fn parse_aspect(s: &str) -> Result<TargetShape, String> {
    match s.parse::<TargetShape>() {
        Ok(shape @ TargetShape::AspectRatio { .. }) => Ok(shape),
        _ => Err(format!("expected W:H, e.g. 16:9, got {s:?}")),
    }
}

impl Args {
    fn config(&self) -> CollageConfig {
        let target = self.aspect.or(self.size).unwrap_or_default();
        let mut config = CollageConfig::new(target)
            .with_border(self.border)
            .with_rotation(Rotation::new(self.rotation, self.rotation_spread))
            .with_strict_ratio(self.strict_ratio)
            .with_cell_fit(if self.contain {
                CellFit::Contain
            } else {
                CellFit::Pad
            });
        config.forced_cols = self.cols;
        config.forced_rows = self.rows;
        config.title_scale = self.font_size;
        config.parallel_decode = !self.sequential;
        if let Some(color) = self.background_color {
            config.background = color;
        }
        if let Some(color) = self.title_color {
            config.title_color = color;
        }
        config
    }

    fn cover_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = self.images.clone();
        if let Some(list) = &self.list {
            paths.extend(read_cover_list(list)?);
        }
        if paths.is_empty() {
            bail!("At least one cover image must be given");
        }
        Ok(paths)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.config();
    // Check the forced grid before decoding anything
    config.forced_grid()?;

    let paths = args.cover_paths()?;
    info!("Getting {} covers", paths.len());
    let covers = Cover::load_all(&paths, config.parallel_decode).context("Failed to load covers")?;

    let mut builder = CollageBuilder::new(config);
    if let (Some(title), Some(font)) = (&args.title, &args.font) {
        let font = load_font_file(font).context("Failed to load title font")?;
        builder = builder.title(title.clone(), font);
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    debug!("Rotation seed {}", seed);
    let collage = builder
        .build(&covers, &mut StdRng::seed_from_u64(seed))
        .context("Failed to create collage")?;

    #[cfg(feature = "drawing")]
    if let Some(path) = &args.debug_overlay {
        collager::debug::save_image_with_layout(
            collage.unresized(),
            &collage.layout,
            path,
            Rgba([255, 0, 0, 255]),
        )?;
    }

    let (width, height) = collage.dimensions();
    let path = match &args.output {
        Some(path) => path.clone(),
        None => output::default_output_path(args.title.as_deref().unwrap_or(""), width, height, "."),
    };
    output::save_collage(&collage.image, &path)?;
    Ok(())
}

/// Unit tests for the command line surface.
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("collager").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["a.jpg", "b.jpg"]);
        let config = args.config();
        assert_eq!(
            config.target,
            TargetShape::Size {
                width: 1920,
                height: 1080
            }
        );
        assert_eq!(config.border, 150);
        assert_eq!(config.rotation, Rotation::default());
        assert_eq!(config.cell_fit, CellFit::Pad);
        assert!(config.parallel_decode);
        assert_eq!(
            args.cover_paths().unwrap(),
            vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]
        );
    }

    #[test]
    fn test_aspect_overrides_size() {
        let args = parse(&["--size", "800x600", "--aspect", "16:9", "a.jpg"]);
        let config = args.config();
        assert_eq!(
            config.target,
            TargetShape::AspectRatio {
                width: 16.0,
                height: 9.0
            }
        );
        assert_eq!(config.target.output_size(), None);
    }

    #[test]
    fn test_shape_flags_reject_the_other_syntax() {
        let cli = |args: &[&str]| {
            Args::try_parse_from(std::iter::once("collager").chain(args.iter().copied()))
        };
        assert!(cli(&["--size", "16:9", "a.jpg"]).is_err());
        assert!(cli(&["--aspect", "1920x1080", "a.jpg"]).is_err());
        assert!(cli(&["--background-color", "blurple", "a.jpg"]).is_err());
        assert!(cli(&["--title", "2023", "a.jpg"]).is_err());
    }

    #[test]
    fn test_partial_forced_grid_reaches_config() {
        let args = parse(&["--rows", "3", "a.jpg"]);
        assert!(args.config().forced_grid().is_err());
    }

    #[test]
    fn test_colors_rotation_and_fit() {
        let args = parse(&[
            "--background-color",
            "black",
            "--title-color",
            "#fff",
            "--rotation",
            "-5",
            "--rotation-spread",
            "3",
            "--contain",
            "--sequential",
            "a.jpg",
        ]);
        let config = args.config();
        assert_eq!(config.background, Rgba([0, 0, 0, 255]));
        assert_eq!(config.title_color, Rgba([255, 255, 255, 255]));
        assert_eq!(config.rotation, Rotation::new(-5.0, 3.0));
        assert_eq!(config.cell_fit, CellFit::Contain);
        assert!(!config.parallel_decode);
    }

    #[test]
    fn test_css_color_names() {
        let args = parse(&[
            "--background-color",
            "dodgerblue",
            "--title-color",
            "DarkGreen",
            "a.jpg",
        ]);
        let config = args.config();
        assert_eq!(config.background, Rgba([30, 144, 255, 255]));
        assert_eq!(config.title_color, Rgba([0, 100, 0, 255]));
    }

    #[test]
    fn test_no_covers_is_an_error() {
        let args = parse(&[]);
        assert!(args.cover_paths().is_err());
    }
}
