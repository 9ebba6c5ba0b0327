use anyhow::{Result, bail};
use itertools::Itertools;

use crate::geometry::geo_traits::{CollidesWith, DistanceTo};
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::Rect;

/// A simple polygon: a closed shape with a finite number of vertices and edges
/// that does not intersect itself and contains no holes.
/// [read more](https://en.wikipedia.org/wiki/Simple_polygon)
///
/// Vertices are held in counter-clockwise order; edge `i` runs from vertex `i`
/// to vertex `(i + 1) % n`.
#[derive(Debug, Clone)]
pub struct SPolygon {
    /// Set of points that form the polygon
    pub vertices: Vec<Point>,
    /// Bounding box
    pub bbox: Rect,
    /// Area of its interior
    pub area: f64,
}

impl SPolygon {
    /// Create a new simple polygon from a set of points. A clockwise input is
    /// reversed so that edges are always ordered counter-clockwise.
    pub fn new(mut points: Vec<Point>) -> Result<Self> {
        if points.len() < 3 {
            bail!("simple polygon must have at least 3 points: {points:?}");
        }
        if points.iter().unique().count() != points.len() {
            bail!("simple polygon should not contain duplicate points: {points:?}");
        }

        let area = match SPolygon::calculate_area(&points) {
            0.0 => bail!("simple polygon has no area: {points:?}"),
            area if area < 0.0 => {
                points.reverse();
                -area
            }
            area => area,
        };

        let bbox = Rect::from_points(&points);
        Ok(SPolygon {
            vertices: points,
            bbox,
            area,
        })
    }

    //https://en.wikipedia.org/wiki/Shoelace_formula
    //counterclockwise = positive area, clockwise = negative area
    pub fn calculate_area(points: &[Point]) -> f64 {
        let mut sigma: f64 = 0.0;
        for i in 0..points.len() {
            let j = (i + 1) % points.len();
            let (x_i, y_i) = points[i].into();
            let (x_j, y_j) = points[j].into();
            sigma += (y_i + y_j) * (x_i - x_j)
        }
        0.5 * sigma
    }

    pub fn vertex(&self, i: usize) -> Point {
        self.vertices[i]
    }

    /// Edge `i`, from vertex `i` to vertex `(i + 1) % n`.
    pub fn edge(&self, i: usize) -> Edge {
        let j = (i + 1) % self.n_vertices();
        Edge::new(self.vertices[i], self.vertices[j])
    }

    pub fn edge_iter(&self) -> impl Iterator<Item = Edge> + Clone + '_ {
        (0..self.n_vertices()).map(move |i| self.edge(i))
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Inside angle at vertex `i`, in `[0, 2π)`: the counter-clockwise angle
    /// from the outgoing edge to the reversed incoming edge. Angles above π
    /// mark reflex vertices.
    pub fn inside_angle(&self, i: usize) -> f64 {
        let n = self.n_vertices();
        let outgoing = self.edge(i);
        let incoming = self.edge((i + n - 1) % n);
        Point::angle_between(outgoing.direction(), incoming.reverse().direction())
    }

    /// `true` iff `point` lies strictly left of every edge. Only meaningful
    /// for convex polygons.
    pub fn contains(&self, point: Point) -> bool {
        self.edge_iter().all(|e| e.is_left_of(point))
    }

    /// The polygon translated by `shift`.
    pub fn translate(&self, shift: Point) -> SPolygon {
        self.map_vertices(|p| p + shift)
    }

    /// The polygon translated by an integer lattice vector.
    pub fn translate_ivec(&self, v: IVec) -> SPolygon {
        self.translate(v.to_point())
    }

    /// The polygon rotated counter-clockwise around `origin` by `angle`.
    pub fn rotate(&self, origin: Point, angle: f64) -> SPolygon {
        self.map_vertices(|p| p.rotate(origin, angle))
    }

    /// The polygon rotated by 180° around the center of its bounding box.
    pub fn rotate_180(&self) -> SPolygon {
        self.point_reflect(self.bbox.center())
    }

    /// The polygon rotated by 180° around `origin` (an exact point reflection).
    pub fn point_reflect(&self, origin: Point) -> SPolygon {
        self.map_vertices(|p| Point(2.0 * origin.0 - p.0, 2.0 * origin.1 - p.1))
    }

    /// The polygon translated so that the center of its bounding box lands on
    /// the origin.
    pub fn normalize(&self) -> SPolygon {
        self.translate(-self.bbox.center())
    }

    /// The intrinsic reference point: the bottom-left corner of the bounding box.
    pub fn reference_point(&self) -> Point {
        self.bbox.bottom_left()
    }

    /// Largest distance from any vertex to `p`.
    pub fn max_vertex_distance_to(&self, p: Point) -> f64 {
        self.vertices
            .iter()
            .map(|v| v.distance_to(&p))
            .fold(0.0, f64::max)
    }

    fn map_vertices(&self, f: impl Fn(Point) -> Point) -> SPolygon {
        let vertices: Vec<Point> = self.vertices.iter().map(|&p| f(p)).collect();
        let bbox = Rect::from_points(&vertices);
        SPolygon {
            vertices,
            bbox,
            area: self.area,
        }
    }
}

impl CollidesWith<SPolygon> for SPolygon {
    /// Brute-force pairwise edge test, `O(nm)`.
    fn collides_with(&self, other: &SPolygon) -> bool {
        self.edge_iter()
            .any(|e1| other.edge_iter().any(|e2| e1.collides_with(&e2)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f64::consts::FRAC_PI_2;

    fn square(side: f64) -> SPolygon {
        SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(side, 0.0),
            Point(side, side),
            Point(0.0, side),
        ])
        .unwrap()
    }

    #[test]
    fn clockwise_input_is_reversed() {
        let cw = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(0.0, 1.0),
            Point(1.0, 1.0),
            Point(1.0, 0.0),
        ])
        .unwrap();
        assert!(approx_eq!(f64, cw.area, 1.0));
        assert!(approx_eq!(f64, SPolygon::calculate_area(&cw.vertices), 1.0));
    }

    #[test]
    fn degenerate_input_is_rejected() {
        assert!(SPolygon::new(vec![Point(0.0, 0.0), Point(1.0, 0.0)]).is_err());
        assert!(
            SPolygon::new(vec![Point(0.0, 0.0), Point(1.0, 1.0), Point(2.0, 2.0)]).is_err(),
            "collinear points have no area"
        );
    }

    #[test]
    fn inside_angles_of_a_square() {
        let sq = square(1.0);
        for i in 0..4 {
            assert!(approx_eq!(f64, sq.inside_angle(i), FRAC_PI_2, epsilon = 1e-12));
        }
    }

    #[test]
    fn convex_containment() {
        let sq = square(2.0);
        assert!(sq.contains(Point(1.0, 1.0)));
        assert!(!sq.contains(Point(3.0, 1.0)));
        assert!(!sq.contains(Point(2.0, 1.0)), "boundary is excluded");
    }

    #[test]
    fn rotate_180_is_an_involution() {
        let sq = square(2.0).translate(Point(5.0, 1.0));
        let back = sq.rotate_180().rotate_180();
        for (a, b) in back.vertices.iter().zip(&sq.vertices) {
            assert!(approx_eq!(f64, a.0, b.0, epsilon = 1e-12));
            assert!(approx_eq!(f64, a.1, b.1, epsilon = 1e-12));
        }
    }

    #[test]
    fn normalize_centers_the_bounding_box() {
        let sq = square(2.0).translate(Point(10.0, -3.0));
        let n = sq.normalize();
        assert!(approx_eq!(f64, n.bbox.center().0, 0.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, n.bbox.center().1, 0.0, epsilon = 1e-12));
    }

    #[test]
    fn overlapping_polygons_collide() {
        let a = square(2.0);
        let b = square(2.0).translate(Point(1.0, 1.0));
        let c = square(2.0).translate(Point(5.0, 5.0));
        assert!(a.collides_with(&b));
        assert!(!a.collides_with(&c));
    }
}
