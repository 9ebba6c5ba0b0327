use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Point;

/// The arc of a circle between two distinct points on its circumference,
/// running counter-clockwise from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularArc {
    pub center: Point,
    pub a: Point,
    pub b: Point,
}

impl CircularArc {
    pub fn new(center: Point, a: Point, b: Point) -> Self {
        CircularArc { center, a, b }
    }

    /// Angle of the ray from the center through `a`, in `[0, 2π)`.
    pub fn angle_a(&self) -> f64 {
        (self.a - self.center).angle()
    }

    /// Angle of the ray from the center through `b`, in `[0, 2π)`.
    pub fn angle_b(&self) -> f64 {
        (self.b - self.center).angle()
    }

    /// Central angle covered by the arc, in `[0, 2π)`.
    pub fn central_angle(&self) -> f64 {
        Point::angle_between(self.a - self.center, self.b - self.center)
    }

    pub fn radius(&self) -> f64 {
        self.center.distance_to(&self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn quarter_arc() {
        let arc = CircularArc::new(Point(0.0, 0.0), Point(2.0, 0.0), Point(0.0, 2.0));
        assert!(approx_eq!(f64, arc.central_angle(), FRAC_PI_2));
        assert!(approx_eq!(f64, arc.radius(), 2.0));
        assert!(approx_eq!(f64, arc.angle_a(), 0.0));
        assert!(approx_eq!(f64, arc.angle_b(), FRAC_PI_2));
    }
}
