use std::f64::consts::PI;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Neg, Sub};

use crate::geometry::geo_traits::DistanceTo;

/// Point(x, y)
#[derive(Debug, Clone, PartialEq, Copy)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub const ORIGIN: Point = Point(0.0, 0.0);

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }

    pub fn midpoint(a: Point, b: Point) -> Point {
        Point((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
    }

    /// Rotates `self` counter-clockwise around `origin` by `angle` radians.
    pub fn rotate(&self, origin: Point, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        let (dx, dy) = (self.0 - origin.0, self.1 - origin.1);
        Point(
            origin.0 + dx * cos - dy * sin,
            origin.1 + dx * sin + dy * cos,
        )
    }

    /// Angle between the positive x-axis and the position vector of `self`, in `[0, 2π)`.
    pub fn angle(&self) -> f64 {
        Point::angle_between(Point(1.0, 0.0), *self)
    }

    /// Counter-clockwise angle from `v1` to `v2`, in `[0, 2π)`.
    pub fn angle_between(v1: Point, v2: Point) -> f64 {
        let angle = v2.1.atan2(v2.0) - v1.1.atan2(v1.0);
        if angle < 0.0 { angle + 2.0 * PI } else { angle }
    }

    /// Length of `self` interpreted as a vector.
    pub fn length(&self) -> f64 {
        self.0.hypot(self.1)
    }
}

impl DistanceTo<Point> for Point {
    #[inline(always)]
    fn distance_to(&self, other: &Point) -> f64 {
        ((self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)).sqrt()
    }

    #[inline(always)]
    fn sq_distance_to(&self, other: &Point) -> f64 {
        (self.0 - other.0).powi(2) + (self.1 - other.1).powi(2)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point(self.0 + rhs.0, self.1 + rhs.1)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point(self.0 - rhs.0, self.1 - rhs.1)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point(-self.0, -self.1)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
        self.1.to_bits().hash(state);
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.0, p.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point(x, y)
    }
}
