//! The raster-to-vector pipeline.
//!
//! Quantize to a fixed palette, classify every pixel, trace each color's
//! region boundaries, smooth them into quadratic curves, and compose the
//! layered document. Every stage is deterministic, so the whole pipeline is
//! a pure function of the pixel buffer and the color count.

use image::RgbaImage;

use super::classify::classify_pixels;
use super::palette::extract_palette;
use super::smooth::smooth_contour;
use super::svg::compose_svg;
use super::trace::trace_color;

/// Run the full vector pipeline on an already-sized pixel buffer.
///
/// The caller is responsible for clamping oversized inputs (see
/// [`super::raster::clamp_for_tracing`]); this function traces whatever it
/// is given. Palette, label map, and contours live only for the duration of
/// the call.
pub fn vectorize(img: &RgbaImage, color_count: usize) -> String {
    let palette = extract_palette(img, color_count);
    let labels = classify_pixels(img, &palette);

    let paths_per_color: Vec<Vec<String>> = (0..palette.len())
        .map(|index| {
            trace_color(&labels, index as u8)
                .iter()
                .filter_map(smooth_contour)
                .collect()
        })
        .collect();

    compose_svg(img.width(), img.height(), &palette, &paths_per_color)
}
