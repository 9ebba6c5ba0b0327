use std::f64::consts::{FRAC_PI_2, PI};

use anyhow::{Context, Result};
use ordered_float::OrderedFloat;

use crate::geometry::geo_traits::DistanceTo;
use crate::geometry::primitives::Line;
use crate::geometry::primitives::OrientedRect;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// Angles below this are treated as zero when testing edge/caliper collinearity.
const EPSILON: f64 = 1e-3;

const BASE_ANGLES: [f64; 4] = [0.0, FRAC_PI_2, PI, 1.5 * PI];

/// Minimum-area bounding box of a convex polygon by rotating calipers, `O(n)`.
///
/// Four calipers start axis-aligned at the extremal vertices and rotate
/// together by the smallest edge/caliper angle until a quarter turn is
/// complete; every caliper position flush with an edge emits a candidate box.
pub struct RotatingCalipers {
    boxes: Vec<OrientedRect>,
    minimum: OrientedRect,
}

impl RotatingCalipers {
    pub fn new(polygon: &SPolygon) -> Result<Self> {
        let mut antipodes = initial_antipodes(polygon);
        let mut rotation: f64 = 0.0;
        let mut angles = angles_at_antipodes(polygon, rotation, &antipodes);

        let mut boxes = Vec::new();
        if angles.iter().cloned().fold(f64::MAX, f64::min).abs() < EPSILON {
            boxes.push(caliper_box(polygon, rotation, &antipodes)?);
        }

        while rotation <= FRAC_PI_2 {
            // Advance any antipode whose edge lies flush with its caliper
            for i in 0..4 {
                while angles[i].abs() < EPSILON {
                    antipodes[i] = (antipodes[i] + 1) % polygon.n_vertices();
                    angles[i] = angle_at_antipode(polygon, rotation, antipodes[i], i);
                }
            }

            let min_angle = angles.iter().cloned().fold(f64::MAX, f64::min);
            rotation += min_angle;
            angles = angles_at_antipodes(polygon, rotation, &antipodes);

            boxes.push(caliper_box(polygon, rotation, &antipodes)?);
        }

        let minimum = *boxes
            .iter()
            .min_by_key(|b| OrderedFloat(b.area()))
            .context("rotating calipers produced no boxes")?;

        Ok(RotatingCalipers { boxes, minimum })
    }

    /// The minimum-area bounding box.
    pub fn minimum(&self) -> OrientedRect {
        self.minimum
    }

    /// Every bounding box emitted during the rotation, each collinear with one
    /// edge of the polygon.
    pub fn boxes(&self) -> &[OrientedRect] {
        &self.boxes
    }
}

/// Minimum-area bounding box of a convex polygon.
pub fn minimum_bounding_box(polygon: &SPolygon) -> Result<OrientedRect> {
    Ok(RotatingCalipers::new(polygon)?.minimum())
}

fn initial_antipodes(polygon: &SPolygon) -> [usize; 4] {
    let v = &polygon.vertices;
    let index_of = |p: Point| v.iter().position(|&q| q == p).expect("vertex of own polygon");

    let min_y = *v
        .iter()
        .min_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
        .expect("polygon has vertices");
    let max_x = *v
        .iter()
        .max_by_key(|p| (OrderedFloat(p.0), std::cmp::Reverse(OrderedFloat(p.1))))
        .expect("polygon has vertices");
    let max_y = *v
        .iter()
        .max_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
        .expect("polygon has vertices");
    let min_x = *v
        .iter()
        .min_by_key(|p| (OrderedFloat(p.0), std::cmp::Reverse(OrderedFloat(p.1))))
        .expect("polygon has vertices");

    [index_of(min_y), index_of(max_x), index_of(max_y), index_of(min_x)]
}

fn angles_at_antipodes(polygon: &SPolygon, rotation: f64, antipodes: &[usize; 4]) -> [f64; 4] {
    let mut angles = [0.0; 4];
    for i in 0..4 {
        angles[i] = angle_at_antipode(polygon, rotation, antipodes[i], i);
    }
    angles
}

fn angle_at_antipode(polygon: &SPolygon, rotation: f64, antipode: usize, caliper: usize) -> f64 {
    let edge_angle = polygon.edge(antipode).direction().angle();
    let caliper_angle = rotation + BASE_ANGLES[caliper];
    let angle = edge_angle - caliper_angle;
    if angle < 0.0 && angle.abs() >= EPSILON {
        2.0 * PI + angle
    } else {
        angle
    }
}

fn caliper_box(polygon: &SPolygon, rotation: f64, antipodes: &[usize; 4]) -> Result<OrientedRect> {
    let lines: Vec<Line> = (0..4)
        .map(|i| {
            Line::through_at_angle(polygon.vertex(antipodes[i]), BASE_ANGLES[i] + rotation)
        })
        .collect();

    let bottom_left =
        Line::intersection(lines[3], lines[0]).context("degenerate caliper lines")?;
    let bottom_right =
        Line::intersection(lines[0], lines[1]).context("degenerate caliper lines")?;
    let top_left = Line::intersection(lines[2], lines[3]).context("degenerate caliper lines")?;

    Ok(OrientedRect::new(
        bottom_left,
        bottom_left.distance_to(&bottom_right),
        bottom_left.distance_to(&top_left),
        rotation,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::convex_hull::convex_hull_polygon;
    use float_cmp::approx_eq;

    #[test]
    fn mbb_of_axis_aligned_square() {
        let sq = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(10.0, 10.0),
            Point(0.0, 10.0),
        ])
        .unwrap();
        let mbb = minimum_bounding_box(&sq).unwrap();
        assert!(approx_eq!(f64, mbb.area(), 100.0, epsilon = 1e-6));
    }

    #[test]
    fn mbb_of_tilted_square_matches_its_area() {
        let diamond = SPolygon::new(vec![
            Point(2.0, 0.0),
            Point(4.0, 2.0),
            Point(2.0, 4.0),
            Point(0.0, 2.0),
        ])
        .unwrap();
        let mbb = minimum_bounding_box(&diamond).unwrap();
        assert!(approx_eq!(f64, mbb.area(), 8.0, epsilon = 1e-6));
    }

    #[test]
    fn mbb_never_undercuts_the_polygon_area() {
        let hull = convex_hull_polygon(
            &SPolygon::new(vec![
                Point(0.0, 0.0),
                Point(6.0, 1.0),
                Point(7.0, 4.0),
                Point(3.0, 6.0),
                Point(-1.0, 3.0),
            ])
            .unwrap(),
        )
        .unwrap();
        let rc = RotatingCalipers::new(&hull).unwrap();
        assert!(!rc.boxes().is_empty());
        for b in rc.boxes() {
            assert!(b.area() >= hull.area - 1e-9);
        }
        assert!(rc.minimum().area() >= hull.area - 1e-9);
    }
}
