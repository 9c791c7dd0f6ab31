//! Vector document assembly.
//!
//! Builds the final SVG string from the palette and the per-color smoothed
//! path data. Pure string construction, no I/O.

use std::fmt::Write;

/// Assemble the layered vector document.
///
/// The document declares the SVG namespace and a `viewBox` spanning the
/// full canvas, paints one background rectangle with palette index 0, then
/// one filled `<path>` per palette color in ascending index order. Painting
/// in index order means a later color overlays an earlier one wherever
/// their regions coincide; z-order is palette-determined, not
/// area-determined.
///
/// `paths_per_color[i]` holds the smoothed path fragments for palette index
/// i. A color whose combined path data is empty is omitted entirely rather
/// than emitted as an empty shape.
pub fn compose_svg(
    width: u32,
    height: u32,
    palette: &[(u8, u8, u8)],
    paths_per_color: &[Vec<String>],
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height,
    );

    // Background: palette index 0 covers the whole canvas.
    if let Some(&background) = palette.first() {
        let _ = writeln!(
            out,
            r#"  <rect width="{}" height="{}" fill="{}"/>"#,
            width,
            height,
            hex_color(background),
        );
    }

    for (color, paths) in palette.iter().zip(paths_per_color) {
        if paths.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="{}"/>"#,
            paths.join(" "),
            hex_color(*color),
        );
    }

    let _ = writeln!(out, "</svg>");
    out
}

/// CSS hex form of an RGB triple, e.g. `#1a2b3c`.
pub fn hex_color((r, g, b): (u8, u8, u8)) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PALETTE: [(u8, u8, u8); 3] = [(255, 255, 255), (0, 0, 0), (255, 0, 0)];

    #[test]
    fn test_document_structure() {
        let paths = vec![vec![], vec!["M 1.00 1.00 Z".to_string()], vec![]];
        let svg = compose_svg(32, 24, &PALETTE, &paths);

        assert!(svg.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.contains(r#"viewBox="0 0 32 24""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_exactly_one_background_rect() {
        let paths = vec![vec![]; 3];
        let svg = compose_svg(10, 10, &PALETTE, &paths);

        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(r##"<rect width="10" height="10" fill="#ffffff"/>"##));
    }

    #[test]
    fn test_empty_colors_are_omitted() {
        let paths = vec![
            vec!["M 0.50 0.50 Z".to_string()],
            vec![],
            vec!["M 2.00 2.00 Z".to_string()],
        ];
        let svg = compose_svg(10, 10, &PALETTE, &paths);

        assert_eq!(svg.matches("<path").count(), 2);
        assert!(!svg.contains("#000000"));
    }

    #[test]
    fn test_paths_emitted_in_palette_order() {
        let paths = vec![
            vec!["M 0.50 0.50 Z".to_string()],
            vec!["M 1.00 1.00 Z".to_string()],
            vec!["M 2.00 2.00 Z".to_string()],
        ];
        let svg = compose_svg(10, 10, &PALETTE, &paths);

        let white = svg.find(r##"fill="#ffffff""##).unwrap();
        let black = svg.find(r##"fill="#000000""##).unwrap();
        let red = svg.find(r##"fill="#ff0000""##).unwrap();
        assert!(white < black && black < red);
    }

    #[test]
    fn test_color_contours_are_merged_into_one_path() {
        let paths = vec![
            vec![],
            vec!["M 0.50 0.50 Z".to_string(), "M 3.00 3.00 Z".to_string()],
            vec![],
        ];
        let svg = compose_svg(10, 10, &PALETTE, &paths);

        assert_eq!(svg.matches("<path").count(), 1);
        assert!(svg.contains(r#"d="M 0.50 0.50 Z M 3.00 3.00 Z""#));
    }

    #[test]
    fn test_hex_color_formatting() {
        assert_eq!(hex_color((0, 0, 0)), "#000000");
        assert_eq!(hex_color((255, 255, 255)), "#ffffff");
        assert_eq!(hex_color((26, 43, 60)), "#1a2b3c");
    }
}
