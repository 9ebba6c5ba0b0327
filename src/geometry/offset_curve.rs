use anyhow::Result;

use crate::geometry::convex_hull::convex_hull;
use crate::geometry::parallel_curve::parallel_curve;
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// The offset curve of a polygon: the polygonized parallel curve at distance
/// `r`, with the self-intersections introduced at reflex vertices removed, so
/// that every point of the result is at distance >= `r` from the polygon.
///
/// Self-intersections are removed one at a time: starting from a convex-hull
/// vertex (guaranteed to lie on the outer loop), every pair of non-consecutive
/// edges is tested; on an intersection, the first edge's endpoint is replaced
/// by the intersection point, the vertices strictly between the edges are
/// dropped, and the scan restarts. `O(n³)` worst case, negligible in practice.
pub fn offset_curve(polygon: &SPolygon, r: f64, max_normal_error: f64) -> Result<SPolygon> {
    let mut curve = parallel_curve(polygon, r, max_normal_error);
    loop {
        let start = convex_hull(curve.clone())[0];
        if !remove_one_self_intersection(&mut curve, start) {
            break;
        }
    }
    SPolygon::new(curve)
}

fn remove_one_self_intersection(curve: &mut Vec<Point>, start: Point) -> bool {
    let n = curve.len();
    let i_start = curve.iter().position(|&p| p == start).unwrap_or(0);

    for i in 0..n {
        for j in i..n {
            if consecutive(i, j, n) {
                continue;
            }
            let e_i = cyclic_edge(curve, i_start + i);
            let e_j = cyclic_edge(curve, i_start + j);
            if let Some(intersection) = e_i.intersection(&e_j) {
                curve[(i_start + i + 1) % n] = intersection;
                remove_range_cyclic(curve, i_start + i + 2, i_start + j + 1);
                return true;
            }
        }
    }
    false
}

fn cyclic_edge(curve: &[Point], i: usize) -> Edge {
    let n = curve.len();
    Edge::new(curve[i % n], curve[(i + 1) % n])
}

fn consecutive(i: usize, j: usize, n: usize) -> bool {
    (i + 1) % n == j || (j + 1) % n == i
}

/// Removes `[from, to)` with indices taken modulo the length; a wrapping range
/// removes from the end first, then from the beginning.
fn remove_range_cyclic(v: &mut Vec<Point>, from: usize, to: usize) {
    let n = v.len();
    let (from, to) = (from % n, to % n);
    if from == to {
        return;
    }
    if to > from {
        v.drain(from..to);
    } else {
        v.drain(from..);
        v.drain(..to);
    }
}

/// An offset curve together with the original outline it was derived from, so
/// that transformations keep the two in lockstep.
#[derive(Debug, Clone)]
pub struct OffsetPolygon {
    /// The offset curve itself
    pub curve: SPolygon,
    /// The polygon the curve was derived from
    pub original: SPolygon,
}

impl OffsetPolygon {
    pub fn new(part: &SPolygon, clearance: f64, max_normal_error: f64) -> Result<Self> {
        let curve = offset_curve(part, clearance, max_normal_error)?;
        Ok(OffsetPolygon {
            curve,
            original: part.clone(),
        })
    }

    pub fn translate(&self, shift: Point) -> OffsetPolygon {
        OffsetPolygon {
            curve: self.curve.translate(shift),
            original: self.original.translate(shift),
        }
    }

    pub fn translate_ivec(&self, v: IVec) -> OffsetPolygon {
        self.translate(v.to_point())
    }

    /// Both halves rotated by 180° around the center of the curve's bounding box.
    pub fn rotate_180(&self) -> OffsetPolygon {
        let center = self.curve.bbox.center();
        OffsetPolygon {
            curve: self.curve.point_reflect(center),
            original: self.original.point_reflect(center),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geo_traits::{CollidesWith, DistanceTo};

    fn l_shape() -> SPolygon {
        // 80 x 80 L with 30-wide arms; reflex vertex at (30, 30)
        SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(80.0, 0.0),
            Point(80.0, 30.0),
            Point(30.0, 30.0),
            Point(30.0, 80.0),
            Point(0.0, 80.0),
        ])
        .unwrap()
    }

    #[test]
    fn offset_square_area_is_close_to_the_exact_value() {
        let sq = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(100.0, 0.0),
            Point(100.0, 100.0),
            Point(0.0, 100.0),
        ])
        .unwrap();
        let (r, err) = (10.0, 1.0);
        let oc = offset_curve(&sq, r, err).unwrap();
        let exact = 100.0 * 100.0 + 4.0 * 100.0 * r + std::f64::consts::PI * r * r;
        let upper = 100.0 * 100.0 + 4.0 * 100.0 * r + std::f64::consts::PI * (r + err) * (r + err);
        assert!(oc.area >= exact - 1e-6);
        assert!(oc.area <= upper + 1e-6);
    }

    #[test]
    fn offset_curve_of_l_shape_is_simple() {
        let oc = offset_curve(&l_shape(), 5.0, 1.0).unwrap();
        let n = oc.n_vertices();
        for i in 0..n {
            for j in i + 1..n {
                if (i + 1) % n == j || (j + 1) % n == i {
                    continue;
                }
                assert!(
                    oc.edge(i).intersection(&oc.edge(j)).is_none(),
                    "edges {i} and {j} intersect"
                );
            }
        }
    }

    #[test]
    fn offset_curve_keeps_the_clearance_distance() {
        let part = l_shape();
        let (r, err) = (5.0, 1.0);
        let oc = offset_curve(&part, r, err).unwrap();
        for v in &part.vertices {
            let d = oc
                .edge_iter()
                .map(|e| e.sq_distance_to(v))
                .fold(f64::MAX, f64::min)
                .sqrt();
            assert!(d >= r - err - 1e-6, "offset curve dips to {d} near {v:?}");
        }
        assert!(!oc.collides_with(&part));
    }
}
