use crate::geometry::primitives::Point;

/// A line held in coordinate form: all points satisfying `ax + by = c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// The line through two points.
    pub fn through(p: Point, q: Point) -> Line {
        Line {
            a: p.1 - q.1,
            b: q.0 - p.0,
            c: q.0 * p.1 - p.0 * q.1,
        }
    }

    /// The line through `p` at the given angle to the positive x-axis.
    pub fn through_at_angle(p: Point, angle: f64) -> Line {
        Line::through(p, Point(p.0 + angle.cos(), p.1 + angle.sin()))
    }

    /// Intersection point of two lines, `None` when they are parallel.
    pub fn intersection(l1: Line, l2: Line) -> Option<Point> {
        let denominator = l1.a * l2.b - l2.a * l1.b;
        if denominator == 0.0 {
            return None;
        }
        Some(Point(
            (l1.c * l2.b - l2.c * l1.b) / denominator,
            (l1.a * l2.c - l2.a * l1.c) / denominator,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn intersection_of_crossing_lines() {
        let l1 = Line::through(Point(0.0, 0.0), Point(2.0, 2.0));
        let l2 = Line::through(Point(0.0, 2.0), Point(2.0, 0.0));
        let p = Line::intersection(l1, l2).unwrap();
        assert!(approx_eq!(f64, p.0, 1.0));
        assert!(approx_eq!(f64, p.1, 1.0));
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let l1 = Line::through(Point(0.0, 0.0), Point(1.0, 1.0));
        let l2 = Line::through(Point(0.0, 1.0), Point(1.0, 2.0));
        assert_eq!(Line::intersection(l1, l2), None);
    }
}
