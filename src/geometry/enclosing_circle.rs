use anyhow::{Result, bail, ensure};
use rand::prelude::SliceRandom;
use rand::rngs::SmallRng;

use crate::geometry::primitives::Circle;
use crate::geometry::primitives::Point;

/// How often the construction re-shuffles before giving up on a degenerate input.
const MAX_ATTEMPTS: usize = 8;

/// Smallest enclosing circle of a set of points by randomized incremental
/// construction, expected `O(n)`.
///
/// The points are shuffled and a circle over the first two is grown point by
/// point; each point found outside restarts an inner loop that pins it to the
/// boundary, with the circumscribed circle of three points as the innermost
/// step. A degenerate shuffle (collinear boundary candidates) triggers an
/// internal re-shuffle, invisible to the caller.
pub fn smallest_enclosing_circle(points: &[Point], rng: &mut SmallRng) -> Result<Circle> {
    ensure!(!points.is_empty(), "smallest enclosing circle of no points");
    if points.len() == 1 {
        return Ok(Circle::new(points[0], 0.0));
    }

    for _ in 0..MAX_ATTEMPTS {
        let mut shuffled = points.to_vec();
        shuffled.shuffle(rng);
        if let Some(circle) = construct(&shuffled) {
            return Ok(circle);
        }
    }
    bail!("smallest enclosing circle degenerated after {MAX_ATTEMPTS} shuffles");
}

fn construct(points: &[Point]) -> Option<Circle> {
    let mut circle = Circle::from_diametral_points(points[0], points[1]);
    for i in 2..points.len() {
        if !circle.contains_point(points[i]) {
            circle = construct_with_boundary_point(&points[..i], points[i])?;
        }
    }
    Some(circle)
}

fn construct_with_boundary_point(points: &[Point], q: Point) -> Option<Circle> {
    let mut circle = Circle::from_diametral_points(points[0], q);
    for j in 1..points.len() {
        if !circle.contains_point(points[j]) {
            circle = construct_with_boundary_points(&points[..j], points[j], q)?;
        }
    }
    Some(circle)
}

fn construct_with_boundary_points(points: &[Point], q1: Point, q2: Point) -> Option<Circle> {
    let mut circle = Circle::from_diametral_points(q1, q2);
    for &p in points {
        if !circle.contains_point(p) {
            circle = Circle::from_three_points(q1, q2, p)?;
        }
    }
    Some(circle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use rand::SeedableRng;

    fn rng(seed: u64) -> SmallRng {
        SmallRng::seed_from_u64(seed)
    }

    #[test]
    fn sec_of_unit_square_is_its_circumcircle() {
        let points = [
            Point(0.0, 0.0),
            Point(1.0, 0.0),
            Point(1.0, 1.0),
            Point(0.0, 1.0),
        ];
        let sec = smallest_enclosing_circle(&points, &mut rng(42)).unwrap();
        assert!(approx_eq!(f64, sec.center.0, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f64, sec.center.1, 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f64, sec.radius, 0.5_f64.sqrt(), epsilon = 1e-6));
    }

    #[test]
    fn sec_contains_every_input_point() {
        let points: Vec<Point> = (0..40)
            .map(|i| {
                let a = i as f64 * 0.37;
                Point(a.sin() * (i % 7) as f64, a.cos() * (i % 5) as f64)
            })
            .collect();
        let sec = smallest_enclosing_circle(&points, &mut rng(7)).unwrap();
        assert!(points.iter().all(|&p| sec.contains_point(p)));
    }

    #[test]
    fn sec_of_collinear_points_spans_the_extremes() {
        let points = [Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)];
        let sec = smallest_enclosing_circle(&points, &mut rng(3)).unwrap();
        assert!(approx_eq!(f64, sec.radius, 2.0_f64.sqrt(), epsilon = 1e-6));
    }

    #[test]
    fn identical_seed_gives_identical_circle() {
        let points: Vec<Point> = (0..25)
            .map(|i| Point((i * i % 13) as f64, (i * 7 % 11) as f64))
            .collect();
        let a = smallest_enclosing_circle(&points, &mut rng(42)).unwrap();
        let b = smallest_enclosing_circle(&points, &mut rng(42)).unwrap();
        assert_eq!(a, b);
    }
}
