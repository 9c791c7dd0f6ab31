use image::RgbaImage;

/// Number of clustering refinement passes.
///
/// Fixed rather than configurable so worst-case latency stays bounded on
/// large images.
const CLUSTER_ITERATIONS: usize = 5;

/// Only every 4th pixel participates in centroid refinement (a 16-byte
/// stride in the 4-channel layout).
const SAMPLE_STRIDE: usize = 4;

/// Smallest allowed palette size.
pub const MIN_COLORS: usize = 2;

/// Largest allowed palette size.
pub const MAX_COLORS: usize = 64;

/// Derive a fixed-size ordered palette from an image via iterative
/// clustering.
///
/// Centroids are seeded from evenly spaced pixel positions, so identical
/// input and parameters always yield a bit-identical palette; there is no
/// randomness anywhere in the pipeline. Entry order is cluster-index order
/// and determines paint order downstream.
///
/// The alpha channel is ignored. A cluster that attracts no samples in an
/// iteration keeps its previous centroid, so the result always contains
/// exactly `color_count` entries (possibly with duplicates on images with
/// fewer distinct colors).
pub fn extract_palette(img: &RgbaImage, color_count: usize) -> Vec<(u8, u8, u8)> {
    let k = color_count.clamp(MIN_COLORS, MAX_COLORS);
    let raw = img.as_raw();
    let pixel_count = (img.width() as usize) * (img.height() as usize);

    if pixel_count == 0 {
        return vec![(0, 0, 0); k];
    }

    // Evenly spaced seeding: centroid i starts at pixel i * (n / k).
    let step = (pixel_count / k).max(1);
    let mut centroids: Vec<(u8, u8, u8)> = (0..k)
        .map(|i| {
            let base = (i * step).min(pixel_count - 1) * 4;
            (raw[base], raw[base + 1], raw[base + 2])
        })
        .collect();

    let mut sums = vec![[0u64; 3]; k];
    let mut counts = vec![0u64; k];

    for _ in 0..CLUSTER_ITERATIONS {
        sums.iter_mut().for_each(|s| *s = [0; 3]);
        counts.iter_mut().for_each(|c| *c = 0);

        for i in (0..pixel_count).step_by(SAMPLE_STRIDE) {
            let base = i * 4;
            let (r, g, b) = (raw[base], raw[base + 1], raw[base + 2]);
            let nearest = nearest_color_index(r, g, b, &centroids);
            sums[nearest][0] += r as u64;
            sums[nearest][1] += g as u64;
            sums[nearest][2] += b as u64;
            counts[nearest] += 1;
        }

        for (i, centroid) in centroids.iter_mut().enumerate() {
            // Empty bucket: centroid keeps its previous value, no reseeding.
            if counts[i] > 0 {
                *centroid = (
                    (sums[i][0] as f64 / counts[i] as f64).round() as u8,
                    (sums[i][1] as f64 / counts[i] as f64).round() as u8,
                    (sums[i][2] as f64 / counts[i] as f64).round() as u8,
                );
            }
        }
    }

    centroids
}

/// Index of the palette entry nearest to the given color.
///
/// Squared Euclidean distance in RGB space; ties break to the lowest index
/// (strict `<` comparison, first match wins).
pub fn nearest_color_index(r: u8, g: u8, b: u8, palette: &[(u8, u8, u8)]) -> usize {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;

    for (i, &(pr, pg, pb)) in palette.iter().enumerate() {
        let dr = r as i32 - pr as i32;
        let dg = g as i32 - pg as i32;
        let db = b as i32 - pb as i32;
        let dist = (dr * dr + dg * dg + db * db) as u32;

        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }

    best
}
