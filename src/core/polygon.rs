use crate::core::geo::Point;
use crate::core::interval::{Interval, Interval2D};
use serde::{Deserialize, Serialize};

/// A simple planar polygon over projected coordinates, with its cached
/// bounding interval.
///
/// Viewport parts are built from axis-aligned rectangles, optionally rotated
/// by the bearing and clipped against the map's west/east boundary lines,
/// so the polygons stay convex and non-self-intersecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
    interval: Interval2D,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        let mut interval = Interval2D::empty();
        for point in &points {
            interval.extend(*point);
        }
        Self { points, interval }
    }

    pub fn from_interval(interval: &Interval2D) -> Self {
        Self::new(interval.corners().to_vec())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The axis-aligned bounding interval
    pub fn interval(&self) -> &Interval2D {
        &self.interval
    }

    /// A polygon degenerates when fewer than three vertices survive clipping
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    /// Even-odd point containment; points on an edge count as inside the
    /// bounding interval check and may fall either way on the crossing test.
    pub fn contains(&self, point: Point) -> bool {
        if self.is_empty() || !self.interval.contains(point) {
            return false;
        }

        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > point.y) != (pj.y > point.y) {
                let x_cross = pj.x + (point.y - pj.y) / (pi.y - pj.y) * (pi.x - pj.x);
                if point.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    pub fn translated(&self, delta: Point) -> Polygon {
        Polygon::new(self.points.iter().map(|p| *p + delta).collect())
    }

    /// Rotates every vertex about `center` by the given angle in degrees
    pub fn rotated_about(&self, center: Point, angle_deg: f64) -> Polygon {
        Polygon::new(
            self.points
                .iter()
                .map(|p| center + (*p - center).rotated_deg(angle_deg))
                .collect(),
        )
    }

    /// Clips the polygon against the vertical strip `strip.inf <= x <= strip.sup`
    /// (Sutherland-Hodgman against the two vertical half-planes).
    pub fn clip_x(&self, strip: &Interval) -> Polygon {
        let left = clip_half_plane(&self.points, strip.inf, true, Axis::X);
        let right = clip_half_plane(&left, strip.sup, false, Axis::X);
        Polygon::new(right)
    }

    /// Clips the polygon against the horizontal band `strip.inf <= y <= strip.sup`
    pub fn clip_y(&self, strip: &Interval) -> Polygon {
        let top = clip_half_plane(&self.points, strip.inf, true, Axis::Y);
        let bottom = clip_half_plane(&top, strip.sup, false, Axis::Y);
        Polygon::new(bottom)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
}

/// Clips a vertex ring against the half-plane `coord >= line` (`keep_greater`)
/// or `coord <= line`, where `coord` selects the axis component.
fn clip_half_plane(points: &[Point], line: f64, keep_greater: bool, axis: Axis) -> Vec<Point> {
    let coord = |p: &Point| match axis {
        Axis::X => p.x,
        Axis::Y => p.y,
    };
    let inside = |p: &Point| {
        if keep_greater {
            coord(p) >= line
        } else {
            coord(p) <= line
        }
    };

    let mut output = Vec::with_capacity(points.len() + 1);
    let n = points.len();
    if n == 0 {
        return output;
    }

    for i in 0..n {
        let current = points[i];
        let previous = points[(i + n - 1) % n];
        let current_in = inside(&current);
        let previous_in = inside(&previous);

        if current_in != previous_in {
            // the edge crosses the clip line; the denominator cannot be zero here
            let t = (line - coord(&previous)) / (coord(&current) - coord(&previous));
            let crossing = match axis {
                Axis::X => Point::new(line, previous.y + t * (current.y - previous.y)),
                Axis::Y => Point::new(previous.x + t * (current.x - previous.x), line),
            };
            output.push(crossing);
        }
        if current_in {
            output.push(current);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::from_interval(&Interval2D::new(
            Interval::new(0.0, 10.0),
            Interval::new(0.0, 10.0),
        ))
    }

    #[test]
    fn test_polygon_interval() {
        let polygon = unit_square();
        assert_eq!(polygon.interval().size(), Point::new(10.0, 10.0));
        assert!(!polygon.is_empty());
    }

    #[test]
    fn test_polygon_contains() {
        let polygon = unit_square();
        assert!(polygon.contains(Point::new(5.0, 5.0)));
        assert!(polygon.contains(Point::new(0.1, 9.9)));
        assert!(!polygon.contains(Point::new(-1.0, 5.0)));
        assert!(!polygon.contains(Point::new(5.0, 11.0)));
    }

    #[test]
    fn test_polygon_contains_rotated() {
        let polygon = unit_square().rotated_about(Point::new(5.0, 5.0), 45.0);
        assert!(polygon.contains(Point::new(5.0, 5.0)));
        // the square's corner rotates out of the original footprint
        assert!(!polygon.contains(Point::new(0.5, 0.5)));
        // the rotated diamond reaches further along the axes
        assert!(polygon.contains(Point::new(5.0, -1.0)));
    }

    #[test]
    fn test_clip_x_inside() {
        let polygon = unit_square();
        let clipped = polygon.clip_x(&Interval::new(-5.0, 15.0));
        assert_eq!(clipped.interval(), polygon.interval());
    }

    #[test]
    fn test_clip_x_partial() {
        let polygon = unit_square();
        let clipped = polygon.clip_x(&Interval::new(4.0, 20.0));
        assert_eq!(clipped.interval().x, Interval::new(4.0, 10.0));
        assert_eq!(clipped.interval().y, Interval::new(0.0, 10.0));
        assert!(clipped.contains(Point::new(5.0, 5.0)));
        assert!(!clipped.contains(Point::new(3.0, 5.0)));
    }

    #[test]
    fn test_clip_x_disjoint() {
        let polygon = unit_square();
        let clipped = polygon.clip_x(&Interval::new(20.0, 30.0));
        assert!(clipped.is_empty());
    }

    #[test]
    fn test_clip_x_rotated() {
        let polygon = unit_square().rotated_about(Point::new(5.0, 5.0), 30.0);
        let clipped = polygon.clip_x(&Interval::new(0.0, 5.0));
        assert!(!clipped.is_empty());
        assert!(clipped.interval().x.sup <= 5.0 + 1e-9);
    }

    #[test]
    fn test_clip_y_partial() {
        let polygon = unit_square();
        let clipped = polygon.clip_y(&Interval::new(-5.0, 4.0));
        assert_eq!(clipped.interval().y, Interval::new(0.0, 4.0));
        assert_eq!(clipped.interval().x, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_translated() {
        let polygon = unit_square().translated(Point::new(100.0, -10.0));
        assert_eq!(polygon.interval().x, Interval::new(100.0, 110.0));
        assert_eq!(polygon.interval().y, Interval::new(-10.0, 0.0));
    }
}
