use std::fmt::Write;

use super::trace::Contour;

/// Convert a traced contour into a closed quadratic path description.
///
/// Corner-cutting smoothing: each contour point acts as a control point and
/// the midpoint to the following point is the segment endpoint. The path
/// starts at the midpoint between the last and first corner so the closure
/// point is seamless. The result contains exactly one `M`, one `Q` per
/// corner, and one `Z`.
///
/// Contours with fewer than 3 points are degenerate noise and produce no
/// output.
pub fn smooth_contour(contour: &Contour) -> Option<String> {
    if contour.len() < 3 {
        return None;
    }

    let n = contour.len();
    let start = midpoint(contour[n - 1], contour[0]);

    let mut path = String::new();
    let _ = write!(path, "M {:.2} {:.2}", start.0, start.1);

    for i in 0..n {
        let corner = contour[i];
        let end = midpoint(corner, contour[(i + 1) % n]);
        let _ = write!(
            path,
            " Q {:.2} {:.2} {:.2} {:.2}",
            corner.0, corner.1, end.0, end.1
        );
    }

    path.push_str(" Z");
    Some(path)
}

fn midpoint(a: (f32, f32), b: (f32, f32)) -> (f32, f32) {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}
