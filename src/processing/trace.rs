//! Region boundary extraction from a label map.
//!
//! For one palette index at a time, every 2x2 pixel neighborhood is
//! classified into one of 16 corner cases and the resulting boundary
//! segments are chained into closed contours (marching squares).

use super::classify::LabelMap;

/// One closed boundary polyline. Points are edge midpoints in document
/// coordinates (pixel (x, y) occupies the unit square [x, x+1] x [y, y+1]),
/// so every coordinate is a multiple of 0.5.
pub type Contour = Vec<(f32, f32)>;

/// The four edges of a 2x2 cell neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    const fn opposite(self) -> Edge {
        match self {
            Edge::Top => Edge::Bottom,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Left => Edge::Right,
        }
    }
}

/// Boundary segments per 4-bit corner case, each an (entry, exit) edge pair
/// oriented so the region lies on the left of the direction of travel.
///
/// Bit weights: top-left = 8, top-right = 4, bottom-right = 2,
/// bottom-left = 1. Cases 0 and 15 carry no boundary. The two saddle cases
/// (5 and 10) use one fixed split; no local disambiguation is attempted.
const SEGMENTS: [&[(Edge, Edge)]; 16] = [
    &[],                                                    // 0
    &[(Edge::Bottom, Edge::Left)],                          // 1: BL
    &[(Edge::Right, Edge::Bottom)],                         // 2: BR
    &[(Edge::Right, Edge::Left)],                           // 3: BL+BR
    &[(Edge::Top, Edge::Right)],                            // 4: TR
    &[(Edge::Top, Edge::Right), (Edge::Bottom, Edge::Left)], // 5: TR+BL (saddle)
    &[(Edge::Top, Edge::Bottom)],                           // 6: TR+BR
    &[(Edge::Top, Edge::Left)],                             // 7: all but TL
    &[(Edge::Left, Edge::Top)],                             // 8: TL
    &[(Edge::Bottom, Edge::Top)],                           // 9: TL+BL
    &[(Edge::Left, Edge::Top), (Edge::Right, Edge::Bottom)], // 10: TL+BR (saddle)
    &[(Edge::Right, Edge::Top)],                            // 11: all but TR
    &[(Edge::Left, Edge::Right)],                           // 12: TL+TR
    &[(Edge::Bottom, Edge::Right)],                         // 13: all but BR
    &[(Edge::Left, Edge::Bottom)],                          // 14: all but BL
    &[],                                                    // 15
];

/// Corner case of the cell at (cx, cy) covering pixels (cx, cy) through
/// (cx+1, cy+1). Out-of-bounds pixels never belong, so cells outside the
/// seed range still classify cleanly during a walk.
fn case_at(labels: &LabelMap, cx: i64, cy: i64, color_index: u8) -> usize {
    let belongs = |x: i64, y: i64| -> usize {
        (labels.get(x, y) == Some(color_index)) as usize
    };

    belongs(cx, cy) * 8
        + belongs(cx + 1, cy) * 4
        + belongs(cx + 1, cy + 1) * 2
        + belongs(cx, cy + 1)
}

/// Midpoint of a cell edge in document coordinates.
fn edge_midpoint(cx: i64, cy: i64, edge: Edge) -> (f32, f32) {
    let (x, y) = (cx as f32, cy as f32);
    match edge {
        Edge::Top => (x + 1.0, y + 0.5),
        Edge::Right => (x + 1.5, y + 1.0),
        Edge::Bottom => (x + 1.0, y + 1.5),
        Edge::Left => (x + 0.5, y + 1.0),
    }
}

/// Trace every closed boundary of the region labelled `color_index`.
///
/// Seed cells span the interior grid [0, width-1) x [0, height-1) in
/// row-major order; a uniform image therefore yields no contours at all
/// (cases 0 and 15 everywhere) and renders through the background fill
/// alone. Walks may wander one cell beyond the seed range, where
/// out-of-bounds pixels count as not belonging, so regions touching the
/// image border still close.
pub fn trace_color(labels: &LabelMap, color_index: u8) -> Vec<Contour> {
    let gw = labels.width as i64 - 1;
    let gh = labels.height as i64 - 1;
    if gw < 1 || gh < 1 {
        return Vec::new();
    }

    // Step budget per contour: the walk can touch at most every cell in
    // the grid including the one-cell border ring.
    let step_budget = ((labels.width as usize + 1) * (labels.height as usize + 1)).max(4);

    let mut visited = vec![false; (gw * gh) as usize];
    let mut contours = Vec::new();

    for sy in 0..gh {
        for sx in 0..gw {
            if visited[(sy * gw + sx) as usize] {
                continue;
            }
            let segments = SEGMENTS[case_at(labels, sx, sy, color_index)];
            if segments.is_empty() {
                continue;
            }
            contours.push(walk(
                labels,
                color_index,
                (sx, sy),
                segments[0],
                &mut visited,
                (gw, gh),
                step_budget,
            ));
        }
    }

    contours
}

/// Follow one boundary from a seed cell until the loop closes, the step
/// budget runs out, or no matching segment exists at the next cell (in
/// which case the contour is finalized with the points gathered so far).
fn walk(
    labels: &LabelMap,
    color_index: u8,
    start: (i64, i64),
    first_segment: (Edge, Edge),
    visited: &mut [bool],
    grid: (i64, i64),
    step_budget: usize,
) -> Contour {
    let (start_entry, mut exit) = first_segment;
    let (mut cx, mut cy) = start;

    let mut points: Contour = Vec::new();
    points.push(edge_midpoint(cx, cy, start_entry));
    mark_visited(visited, grid, cx, cy);

    for _ in 0..step_budget {
        points.push(edge_midpoint(cx, cy, exit));

        let (nx, ny) = match exit {
            Edge::Top => (cx, cy - 1),
            Edge::Right => (cx + 1, cy),
            Edge::Bottom => (cx, cy + 1),
            Edge::Left => (cx - 1, cy),
        };
        let entry = exit.opposite();

        if (nx, ny) == start && entry == start_entry {
            break; // loop closed
        }

        let case = case_at(labels, nx, ny, color_index);
        match SEGMENTS[case].iter().find(|(e, _)| *e == entry) {
            Some(&(_, next_exit)) => {
                mark_visited(visited, grid, nx, ny);
                cx = nx;
                cy = ny;
                exit = next_exit;
            }
            // Degenerate topology: close the contour as-is.
            None => break,
        }
    }

    points
}

/// Mark a cell so it is never restarted as the origin of another contour.
/// Cells outside the seed grid (the virtual border ring) are not tracked.
fn mark_visited(visited: &mut [bool], (gw, gh): (i64, i64), cx: i64, cy: i64) {
    if cx >= 0 && cy >= 0 && cx < gw && cy < gh {
        visited[(cy * gw + cx) as usize] = true;
    }
}
