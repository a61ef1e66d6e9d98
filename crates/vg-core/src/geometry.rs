//! Path construction helpers shared by the importer and the drawing tools.

use kurbo::{BezPath, Point};

/// Straight segments through `points`.
pub fn polyline(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    path
}

/// Smooth cubic curve through `points` (uniform Catmull-Rom converted to
/// Bézier segments). Endpoints are kept; fewer than three points yield a
/// polyline.
pub fn smooth_points(points: &[Point]) -> BezPath {
    if points.len() < 3 {
        return polyline(points, false);
    }

    let mut path = BezPath::new();
    path.move_to(points[0]);
    let last = points.len() - 1;
    for i in 0..last {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(last)];
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        path.curve_to(c1, c2, p2);
    }
    path
}

/// Parse an SVG `points` attribute (`"x1,y1 x2,y2 ..."`). Returns `None` on a
/// malformed number; a trailing odd coordinate is ignored.
pub fn parse_points(src: &str) -> Option<Vec<Point>> {
    let coords = src
        .split(|c: char| c == ',' || c.is_ascii_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()?;
    Some(
        coords
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect(),
    )
}
