use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use strum_macros::{Display, EnumString};

/// Target output format.
///
/// `svg` runs the full vector tracer; everything else is a plain raster
/// conversion handed to the matching codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// Layered SVG vector trace
    #[value(name = "svg")]
    Svg,
    /// PNG (lossless, keeps transparency)
    #[value(name = "png")]
    Png,
    /// JPEG (opaque; transparency is flattened onto white)
    #[value(name = "jpeg")]
    Jpeg,
    /// Lossless WebP (keeps transparency)
    #[value(name = "webp")]
    Webp,
    /// BMP (opaque; transparency is flattened onto white)
    #[value(name = "bmp")]
    Bmp,
}

impl OutputFormat {
    /// Plain filename extension token. The vector format maps to the bare
    /// "svg" token, never a MIME-style fragment.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
            OutputFormat::Bmp => "bmp",
        }
    }

    /// Media type passed to the annotation collaborator.
    pub fn media_type(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Bmp => "image/bmp",
        }
    }

    /// Whether the encoded output can carry an alpha channel.
    pub fn supports_alpha(&self) -> bool {
        matches!(
            self,
            OutputFormat::Svg | OutputFormat::Png | OutputFormat::Webp
        )
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, OutputFormat::Svg)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "rastervec",
    about = "Batch image converter producing optimized raster or layered SVG output",
    long_about = "
rastervec - Batch Image Converter

Converts raster images into either optimized raster output (PNG, JPEG,
WebP, BMP) or a layered SVG vector trace. The vector path quantizes the
image to a small fixed palette, classifies every pixel, walks each color's
region boundaries, and smooths them into quadratic curves stacked in
palette order.

Items in a batch are processed strictly one at a time, in order; a failed
item is reported and the queue keeps going.

Example Usage:
  # Vectorize a folder of images with a 16-color palette
  rastervec -i ~/Pictures -o ~/converted -f svg -c 16

  # Convert a single file to JPEG at 80% quality, half size
  rastervec -i photo.png -o . -f jpeg -q 0.8 --scale 0.5

  # Lossless WebP for every PNG in two folders, with JSON progress lines
  rastervec -i ./icons -i ./shots -o ./out -f webp --extensions png --json

  # Load defaults from a config file; explicit flags still win
  rastervec --config batch.json -f svg"
)]
pub struct Args {
    /// Input directories or single image files (can be specified multiple times)
    #[arg(
        short = 'i',
        long = "input",
        required_unless_present = "config_file",
        value_name = "DIR|FILE"
    )]
    pub input_paths: Vec<PathBuf>,

    /// Output directory for converted images
    #[arg(short = 'o', long = "output", default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "svg")]
    pub format: OutputFormat,

    /// Palette size for vector output (2-64 colors)
    #[arg(short = 'c', long = "colors", default_value = "16", value_name = "N")]
    pub colors: usize,

    /// Uniform scale factor applied to both dimensions
    #[arg(long = "scale", default_value = "1.0", value_name = "FACTOR")]
    pub scale: f32,

    /// Codec quality for lossy raster output, in [0.1, 1.0]
    #[arg(short = 'q', long = "quality", default_value = "0.92", value_name = "Q")]
    pub quality: f32,

    /// Comma-separated list of image extensions to process
    #[arg(long = "extensions", default_value = "jpg,jpeg,png,webp,bmp")]
    pub extensions_str: String,

    /// JSON configuration file merged underneath the command line
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Emit machine-readable JSON lines instead of styled output
    #[arg(long = "json")]
    pub json: bool,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    /// Parsed, normalized extension list.
    pub fn extensions(&self) -> Vec<String> {
        self.extensions_str
            .split(',')
            .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_format_extension_tokens() {
        assert_eq!(OutputFormat::Svg.extension(), "svg");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_format_round_trips_through_strings() {
        for format in [
            OutputFormat::Svg,
            OutputFormat::Png,
            OutputFormat::Jpeg,
            OutputFormat::Webp,
            OutputFormat::Bmp,
        ] {
            let token = format.to_string();
            assert_eq!(<OutputFormat as FromStr>::from_str(&token).unwrap(), format);
        }
    }

    #[test]
    fn test_alpha_support_per_format() {
        assert!(OutputFormat::Png.supports_alpha());
        assert!(OutputFormat::Webp.supports_alpha());
        assert!(!OutputFormat::Jpeg.supports_alpha());
        assert!(!OutputFormat::Bmp.supports_alpha());
    }

    #[test]
    fn test_extensions_are_normalized() {
        let args = Args::try_parse_from([
            "rastervec",
            "-i",
            "in",
            "--extensions",
            " JPG, .png ,,webp ",
        ])
        .unwrap();

        assert_eq!(args.extensions(), vec!["jpg", "png", "webp"]);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["rastervec", "-i", "in"]).unwrap();

        assert_eq!(args.format, OutputFormat::Svg);
        assert_eq!(args.colors, 16);
        assert_eq!(args.scale, 1.0);
        assert_eq!(args.quality, 0.92);
        assert!(!args.json);
    }

    #[test]
    fn test_input_required_without_config() {
        assert!(Args::try_parse_from(["rastervec"]).is_err());
        assert!(Args::try_parse_from(["rastervec", "--config", "batch.json"]).is_ok());
    }
}
