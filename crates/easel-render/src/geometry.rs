//! Path geometry helpers built on `kurbo`.

use easel_core::model::PathPoint;
use kurbo::{BezPath, Line, ParamCurveNearest, Point, Rect, Shape};

/// Accuracy for kurbo nearest-point queries. The canvas works in whole-ish
/// pixels, so 0.1 is plenty.
const NEAREST_ACCURACY: f64 = 0.1;

/// Build a `BezPath` polyline from sampled points.
pub fn polyline(points: &[PathPoint], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(Point::new(first.x as f64, first.y as f64));
    for p in &points[1..] {
        path.line_to(Point::new(p.x as f64, p.y as f64));
    }
    if closed && points.len() >= 2 {
        path.close_path();
    }
    path
}

/// Bounding box of a point run. `None` for fewer than 2 points — such a
/// path has no extent and is never rendered.
pub fn path_bounds(points: &[PathPoint]) -> Option<Rect> {
    if points.len() < 2 {
        return None;
    }
    Some(polyline(points, false).bounding_box())
}

/// Rebase points so their bounding box starts at the origin.
///
/// Returns `(origin_x, origin_y, width, height)` for the owning layer's
/// geometry, mutating `points` in place. Degenerate extents (a perfectly
/// straight horizontal/vertical stroke) keep a 1px minimum so the layer
/// stays clickable.
pub fn normalize_points(points: &mut [PathPoint]) -> Option<(f32, f32, f32, f32)> {
    let bounds = path_bounds(points)?;
    let (ox, oy) = (bounds.x0 as f32, bounds.y0 as f32);
    for p in points.iter_mut() {
        p.x -= ox;
        p.y -= oy;
    }
    let w = (bounds.width() as f32).max(1.0);
    let h = (bounds.height() as f32).max(1.0);
    Some((ox, oy, w, h))
}

/// Nearest distance from `(px, py)` to the polyline's segments.
/// Returns `f32::INFINITY` for fewer than 2 points.
pub fn distance_to_polyline(points: &[PathPoint], closed: bool, px: f32, py: f32) -> f32 {
    if points.len() < 2 {
        return f32::INFINITY;
    }
    let target = Point::new(px as f64, py as f64);
    let mut best = f64::INFINITY;

    let segment_ends = points.windows(2).map(|w| (w[0], w[1]));
    let closing = if closed {
        Some((points[points.len() - 1], points[0]))
    } else {
        None
    };
    for (a, b) in segment_ends.chain(closing) {
        let line = Line::new(
            Point::new(a.x as f64, a.y as f64),
            Point::new(b.x as f64, b.y as f64),
        );
        let nearest = line.nearest(target, NEAREST_ACCURACY);
        best = best.min(nearest.distance_sq);
    }
    best.sqrt() as f32
}
