use anyhow::Result;
use fast_image_resize::{images::Image, ResizeOptions, Resizer};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

use crate::cli::OutputFormat;

/// Longest axis allowed into the tracer. Larger sources are rescaled
/// proportionally before vectorization to bound tracer runtime; plain
/// raster conversion is never clamped.
pub const MAX_TRACE_DIMENSION: u32 = 1024;

/// Accepted encoder quality range; values outside are clamped.
pub const MIN_QUALITY: f32 = 0.1;
pub const MAX_QUALITY: f32 = 1.0;

/// Apply a uniform scale factor to both dimensions.
///
/// Dimensions never drop below 1 pixel. A no-op scale returns a plain copy
/// without resampling.
pub fn resize_scaled(img: &RgbaImage, scale: f32) -> Result<RgbaImage> {
    let width = ((img.width() as f32 * scale).round() as u32).max(1);
    let height = ((img.height() as f32 * scale).round() as u32).max(1);
    resize_exact(img, width, height)
}

/// Clamp an image to the tracer's maximum working dimension, preserving
/// aspect ratio. Returns a copy when no clamp is needed.
pub fn clamp_for_tracing(img: &RgbaImage) -> Result<RgbaImage> {
    let longest = img.width().max(img.height());
    if longest <= MAX_TRACE_DIMENSION {
        return Ok(img.clone());
    }

    let ratio = MAX_TRACE_DIMENSION as f64 / longest as f64;
    let width = ((img.width() as f64 * ratio).round() as u32).max(1);
    let height = ((img.height() as f64 * ratio).round() as u32).max(1);
    resize_exact(img, width, height)
}

/// Resize to exact dimensions using the high-quality resampler defaults.
fn resize_exact(img: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }
    if src_width == 0 || src_height == 0 {
        return Err(anyhow::anyhow!("Cannot resize an empty image"));
    }

    let src_image = Image::from_vec_u8(
        src_width,
        src_height,
        img.as_raw().clone(),
        fast_image_resize::PixelType::U8x4,
    )?;

    let mut dst_image = Image::new(width, height, fast_image_resize::PixelType::U8x4);

    let mut resizer = Resizer::new();
    resizer.resize(&src_image, &mut dst_image, Some(&ResizeOptions::default()))?;

    let output = ImageBuffer::from_raw(width, height, dst_image.buffer().to_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer has unexpected length"))?;

    Ok(output)
}

/// Composite every pixel over an opaque white canvas.
///
/// Required before encoding to formats without alpha support; the result
/// carries no transparency at all.
pub fn flatten_onto_white(img: &RgbaImage) -> RgbImage {
    let mut output = RgbImage::new(img.width(), img.height());

    for (x, y, &Rgba([r, g, b, a])) in img.enumerate_pixels() {
        let alpha = a as f32 / 255.0;
        let blend = |c: u8| -> u8 { (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8 };
        output.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }

    output
}

/// Hand prepared pixel data to the external raster codec.
///
/// Quality is a scalar in [0.1, 1.0], mapped to the codec's own scale where
/// it accepts one. Formats without alpha support receive pixels flattened
/// onto white; the rest get the buffer unchanged. Compression itself is
/// entirely the codec's concern.
pub fn encode(img: &RgbaImage, format: OutputFormat, quality: f32) -> Result<Vec<u8>> {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
    let mut buffer = Cursor::new(Vec::new());

    match format {
        OutputFormat::Jpeg => {
            let flat = flatten_onto_white(img);
            let encoder =
                JpegEncoder::new_with_quality(&mut buffer, (quality * 100.0).round() as u8);
            encoder.write_image(
                flat.as_raw(),
                flat.width(),
                flat.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Bmp => {
            let flat = flatten_onto_white(img);
            let encoder = BmpEncoder::new(&mut buffer);
            encoder.write_image(
                flat.as_raw(),
                flat.width(),
                flat.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new(&mut buffer);
            encoder.write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Webp => {
            let encoder = WebPEncoder::new_lossless(&mut buffer);
            encoder.write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                ExtendedColorType::Rgba8,
            )?;
        }
        OutputFormat::Svg => {
            return Err(anyhow::anyhow!(
                "SVG is a vector format and has no raster codec"
            ));
        }
    }

    let bytes = buffer.into_inner();
    if bytes.is_empty() {
        return Err(anyhow::anyhow!("Codec produced no output"));
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    #[test]
    fn test_resize_scaled_dimensions() {
        let img = gradient_image(100, 60);

        assert_eq!(resize_scaled(&img, 0.5).unwrap().dimensions(), (50, 30));
        assert_eq!(resize_scaled(&img, 2.0).unwrap().dimensions(), (200, 120));
        assert_eq!(resize_scaled(&img, 1.0).unwrap().dimensions(), (100, 60));
    }

    #[test]
    fn test_resize_never_collapses_to_zero() {
        let img = gradient_image(10, 10);
        assert_eq!(resize_scaled(&img, 0.01).unwrap().dimensions(), (1, 1));
    }

    #[test]
    fn test_clamp_only_applies_above_limit() {
        let small = gradient_image(640, 480);
        assert_eq!(clamp_for_tracing(&small).unwrap().dimensions(), (640, 480));

        let wide = gradient_image(2048, 512);
        let clamped = clamp_for_tracing(&wide).unwrap();
        assert_eq!(clamped.dimensions(), (1024, 256));
    }

    #[test]
    fn test_flatten_removes_all_transparency() {
        let img = ImageBuffer::from_fn(4, 4, |x, _| {
            if x == 0 {
                Rgba([200, 100, 50, 0]) // fully transparent
            } else {
                Rgba([200, 100, 50, 128])
            }
        });

        let flat = flatten_onto_white(&img);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([255, 255, 255]));

        // 50% alpha blends halfway toward white.
        let Rgb([r, g, b]) = *flat.get_pixel(1, 0);
        assert!((r as i32 - 227).abs() <= 1);
        assert!((g as i32 - 178).abs() <= 1);
        assert!((b as i32 - 153).abs() <= 1);
    }

    #[test]
    fn test_opaque_pixels_pass_through_flatten() {
        let img = ImageBuffer::from_pixel(2, 2, Rgba([12, 34, 56, 255]));
        let flat = flatten_onto_white(&img);
        assert_eq!(*flat.get_pixel(0, 0), Rgb([12, 34, 56]));
    }

    #[test]
    fn test_encode_alpha_image_to_jpeg_succeeds() {
        let img = ImageBuffer::from_pixel(8, 8, Rgba([10, 20, 30, 0]));
        let bytes = encode(&img, OutputFormat::Jpeg, 0.9).unwrap();

        assert!(!bytes.is_empty());
        // JPEG SOI marker.
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_encode_png_keeps_alpha_channel() {
        let img = ImageBuffer::from_pixel(4, 4, Rgba([10, 20, 30, 77]));
        let bytes = encode(&img, OutputFormat::Png, 1.0).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0)[3], 77);
    }

    #[test]
    fn test_encode_quality_is_clamped() {
        let img = gradient_image(16, 16);

        // Out-of-range qualities still produce output rather than panic.
        assert!(encode(&img, OutputFormat::Jpeg, -3.0).is_ok());
        assert!(encode(&img, OutputFormat::Jpeg, 9.0).is_ok());
    }

    #[test]
    fn test_encode_rejects_vector_format() {
        let img = gradient_image(4, 4);
        assert!(encode(&img, OutputFormat::Svg, 0.9).is_err());
    }
}
