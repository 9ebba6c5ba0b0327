use std::f64::consts::PI;

use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Line;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// Tolerance applied in containment tests.
const EPSILON: f64 = 1e-3;

/// Geometric primitive representing a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "invalid circle radius: {radius}"
        );
        Circle { center, radius }
    }

    /// `true` iff `‖p − center‖ ≤ radius + ε`.
    pub fn contains_point(&self, p: Point) -> bool {
        self.center.distance_to(&p) - self.radius < EPSILON
    }

    /// `true` iff every vertex of the polygon is contained.
    pub fn contains_polygon(&self, polygon: &SPolygon) -> bool {
        polygon.vertices.iter().all(|&v| self.contains_point(v))
    }

    pub fn area(&self) -> f64 {
        self.radius * self.radius * PI
    }

    /// The circle with the segment `p1`–`p2` as diameter.
    pub fn from_diametral_points(p1: Point, p2: Point) -> Circle {
        let center = Point::midpoint(p1, p2);
        Circle::new(center, center.distance_to(&p1))
    }

    /// The circumscribed circle of three points, `None` when the points are
    /// collinear and the perpendicular bisectors never meet.
    pub fn from_three_points(a: Point, b: Point, c: Point) -> Option<Circle> {
        let chord_1 = Line::through(a, b);
        let chord_2 = Line::through(b, c);
        let bisector_1 = Line::through(
            Point::midpoint(a, b),
            Point::midpoint(a, b) + Point(chord_1.a, chord_1.b),
        );
        let bisector_2 = Line::through(
            Point::midpoint(b, c),
            Point::midpoint(b, c) + Point(chord_2.a, chord_2.b),
        );
        let center = Line::intersection(bisector_1, bisector_2)?;
        Some(Circle::new(center, center.distance_to(&a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn circumscribed_circle_of_right_triangle() {
        // right angle at the origin, so the hypotenuse is a diameter
        let c = Circle::from_three_points(Point(0.0, 0.0), Point(4.0, 0.0), Point(0.0, 3.0)).unwrap();
        assert!(approx_eq!(f64, c.center.0, 2.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, c.center.1, 1.5, epsilon = 1e-9));
        assert!(approx_eq!(f64, c.radius, 2.5, epsilon = 1e-9));
    }

    #[test]
    fn collinear_points_have_no_circumscribed_circle() {
        assert!(Circle::from_three_points(Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)).is_none());
    }

    #[test]
    fn containment_tolerates_the_boundary() {
        let c = Circle::new(Point(0.0, 0.0), 1.0);
        assert!(c.contains_point(Point(1.0, 0.0)));
        assert!(c.contains_point(Point(0.5, 0.5)));
        assert!(!c.contains_point(Point(1.1, 0.0)));
    }
}
