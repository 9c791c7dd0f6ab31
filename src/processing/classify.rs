use image::RgbaImage;

use super::palette::nearest_color_index;

/// Per-pixel assignment of nearest palette indices.
///
/// Row-major, one entry per pixel, values in `[0, palette_len)`. Derived
/// from a pixel buffer and a palette; recomputed whenever either changes.
#[derive(Debug, Clone)]
pub struct LabelMap {
    pub width: u32,
    pub height: u32,
    labels: Vec<u8>,
}

impl LabelMap {
    /// Label at pixel (x, y). Out-of-bounds coordinates return `None`.
    pub fn get(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.labels[(y as usize) * (self.width as usize) + x as usize])
    }

    /// All labels in row-major order.
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }
}

/// Map every pixel to the index of its nearest palette color.
///
/// Full resolution: every pixel is classified, not a sample. Full
/// Euclidean RGB distance with ties to the lowest palette index; alpha is
/// ignored. Pure function of its inputs.
pub fn classify_pixels(img: &RgbaImage, palette: &[(u8, u8, u8)]) -> LabelMap {
    let raw = img.as_raw();
    let pixel_count = (img.width() as usize) * (img.height() as usize);
    let mut labels = Vec::with_capacity(pixel_count);

    for i in 0..pixel_count {
        let base = i * 4;
        let label = nearest_color_index(raw[base], raw[base + 1], raw[base + 2], palette);
        labels.push(label as u8);
    }

    LabelMap {
        width: img.width(),
        height: img.height(),
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_label_map_dimensions_match_image() {
        let img = ImageBuffer::from_pixel(7, 5, Rgba([10, 20, 30, 255]));
        let labels = classify_pixels(&img, &[(0, 0, 0), (255, 255, 255)]);

        assert_eq!(labels.width, 7);
        assert_eq!(labels.height, 5);
        assert_eq!(labels.labels().len(), 35);
    }

    #[test]
    fn test_every_label_minimizes_distance() {
        // Brute-force cross-check on a synthetic image.
        let img = ImageBuffer::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, (y * 16) as u8, ((x * y) % 256) as u8, 255])
        });
        let palette = [(0, 0, 0), (255, 255, 255), (255, 0, 0), (0, 128, 255)];
        let labels = classify_pixels(&img, &palette);

        for (x, y, pixel) in img.enumerate_pixels() {
            let label = labels.get(x as i64, y as i64).unwrap() as usize;
            let dist = |&(pr, pg, pb): &(u8, u8, u8)| -> i64 {
                let dr = pixel[0] as i64 - pr as i64;
                let dg = pixel[1] as i64 - pg as i64;
                let db = pixel[2] as i64 - pb as i64;
                dr * dr + dg * dg + db * db
            };
            let chosen = dist(&palette[label]);
            for entry in &palette {
                assert!(chosen <= dist(entry));
            }
        }
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = ImageBuffer::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        let transparent = ImageBuffer::from_pixel(2, 2, Rgba([200, 10, 10, 0]));
        let palette = [(0, 0, 0), (255, 0, 0)];

        assert_eq!(
            classify_pixels(&opaque, &palette).labels(),
            classify_pixels(&transparent, &palette).labels()
        );
    }

    #[test]
    fn test_out_of_bounds_lookup_is_none() {
        let img = ImageBuffer::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        let labels = classify_pixels(&img, &[(0, 0, 0), (255, 255, 255)]);

        assert!(labels.get(-1, 0).is_none());
        assert!(labels.get(0, -1).is_none());
        assert!(labels.get(3, 0).is_none());
        assert!(labels.get(0, 3).is_none());
        assert_eq!(labels.get(2, 2), Some(0));
    }
}
