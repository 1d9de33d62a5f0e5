//! Segment intersection in frame-pixel space.
//!
//! A crossing is detected by intersecting the segment travelled between two
//! consecutive position samples with a checkpoint segment. Both segments are
//! first treated as infinite lines; the resulting intersection point is only
//! accepted when it lies inside the axis-aligned bounding box of both
//! segments.
//!
//! Collinear overlapping segments have a zero determinant and therefore
//! report no crossing.

use serde::{Deserialize, Serialize};

/// A position in frame-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

/// A finite line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Whether `point` lies within this segment's bounding box (inclusive).
    pub fn contains_in_bounds(&self, point: Point) -> bool {
        let (min_x, max_x) = min_max(self.start.x, self.end.x);
        let (min_y, max_y) = min_max(self.start.y, self.end.y);
        (min_x..=max_x).contains(&point.x) && (min_y..=max_y).contains(&point.y)
    }

    /// True when both endpoints coincide.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

fn min_max(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[inline]
fn det(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.1 - a.1 * b.0
}

/// Intersection of the infinite lines through `a` and `b`.
///
/// Returns `None` when the determinant is exactly zero (parallel or
/// coincident lines).
pub fn line_intersection(a: Segment, b: Segment) -> Option<Point> {
    let xdiff = (a.start.x - a.end.x, b.start.x - b.end.x);
    let ydiff = (a.start.y - a.end.y, b.start.y - b.end.y);

    let div = det(xdiff, ydiff);
    if div == 0.0 {
        return None;
    }

    let d = (
        det((a.start.x, a.start.y), (a.end.x, a.end.y)),
        det((b.start.x, b.start.y), (b.end.x, b.end.y)),
    );

    Some(Point::new(det(d, xdiff) / div, det(d, ydiff) / div))
}

/// Intersection of two finite segments, recovered from the infinite-line
/// solution by bounding-box containment on both segments.
pub fn segment_intersection(a: Segment, b: Segment) -> Option<Point> {
    line_intersection(a, b).filter(|p| a.contains_in_bounds(*p) && b.contains_in_bounds(*p))
}

/// Whether the travelled `movement` segment crosses `checkpoint`.
pub fn intersects(movement: Segment, checkpoint: Segment) -> bool {
    segment_intersection(checkpoint, movement).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_perpendicular_crossing_at_interior_point() {
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(5.0, -5.0, 5.0, 5.0);

        let hit = segment_intersection(checkpoint, movement);
        assert!(hit.is_some_and(|p| close(p, Point::new(5.0, 0.0))));
        assert!(intersects(movement, checkpoint));
    }

    #[test]
    fn test_parallel_segments_do_not_cross() {
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(0.0, 1.0, 10.0, 1.0);

        assert!(line_intersection(checkpoint, movement).is_none());
        assert!(!intersects(movement, checkpoint));
    }

    #[test]
    fn test_collinear_overlap_reports_no_crossing() {
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(2.0, 0.0, 8.0, 0.0);

        assert!(!intersects(movement, checkpoint));
    }

    #[test]
    fn test_lines_cross_outside_movement_segment() {
        // Lines meet at (5, 0) but the movement stops short at y = -1.
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(5.0, -5.0, 5.0, -1.0);

        assert!(line_intersection(checkpoint, movement).is_some());
        assert!(!intersects(movement, checkpoint));
    }

    #[test]
    fn test_lines_cross_outside_checkpoint_segment() {
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(12.0, -5.0, 12.0, 5.0);

        assert!(!intersects(movement, checkpoint));
    }

    #[test]
    fn test_touching_endpoint_counts_as_crossing() {
        let checkpoint = seg(5.0, 5.0, 6.0, 5.0);
        let movement = seg(5.0, 4.0, 5.0, 6.0);

        assert!(intersects(movement, checkpoint));
    }

    #[test]
    fn test_diagonal_crossing() {
        let checkpoint = seg(0.0, 2.0, 2.0, 0.0);
        let movement = seg(0.0, 0.0, 2.0, 2.0);

        let hit = segment_intersection(checkpoint, movement);
        assert!(hit.is_some_and(|p| close(p, Point::new(1.0, 1.0))));
    }

    #[test]
    fn test_degenerate_movement_never_crosses() {
        let checkpoint = seg(0.0, 0.0, 10.0, 0.0);
        let movement = seg(5.0, 0.0, 5.0, 0.0);

        assert!(movement.is_degenerate());
        assert!(!intersects(movement, checkpoint));
    }

    #[test]
    fn test_point_conversions() {
        assert_eq!(Point::from((1.5, 2.0)), Point::new(1.5, 2.0));
        assert_eq!(Point::from([3.0, 4.0]), Point::new(3.0, 4.0));
    }
}
