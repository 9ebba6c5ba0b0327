use std::f64::consts::PI;

use crate::geometry::primitives::CircularArc;
use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// Tangent polygonization of the parallel curve at normal distance `r` on the
/// outside of a counter-clockwise polygon.
///
/// Each edge contributes the segment parallel to it at distance `r`; the gap
/// between consecutive parallel segments is bridged by a circular arc around
/// the shared vertex. Rather than sampling points *on* the arc, vertices are
/// placed slightly outside it so that the chords between them are tangent to
/// the arc, keeping the whole polygonization at distance >= `r`. The chord
/// count per arc is chosen so the normal error stays below `max_normal_error`.
///
/// At reflex vertices the arc is emitted in reverse, producing a local
/// self-intersection that the offset curve construction removes afterwards.
pub fn parallel_curve(polygon: &SPolygon, r: f64, max_normal_error: f64) -> Vec<Point> {
    let n = polygon.n_vertices();
    let parallel: Vec<Edge> = (0..n).map(|i| polygon.edge(i).parallel_offset(r)).collect();

    // Central angle one tangent chord may cover without exceeding the error
    let delta = max_normal_error;
    let alpha = 2.0 * (((r + delta).powi(2) - r.powi(2)).sqrt() / (r + delta)).asin();

    let mut vertices: Vec<Point> = Vec::new();
    for i in 0..n {
        // The vertex shared by edge i and edge i+1
        let inside_angle = polygon.inside_angle((i + 1) % n);
        let corner = polygon.edge(i).end;
        let arc = if inside_angle <= PI {
            CircularArc::new(corner, parallel[i].end, parallel[(i + 1) % n].start)
        } else {
            CircularArc::new(corner, parallel[(i + 1) % n].start, parallel[i].end)
        };

        let n_chords = (arc.central_angle() / alpha).ceil() as usize;
        if n_chords == 0 {
            continue;
        }
        let alpha_step = arc.central_angle() / n_chords as f64;
        // Radial excess that makes the chords tangent to the true arc
        let lift = (r * (1.0 - (alpha_step / 2.0).cos())) / (alpha_step / 2.0).cos();

        for j in 0..n_chords {
            let vertex_angle = if inside_angle <= PI {
                arc.angle_a() + (2 * j + 1) as f64 * (alpha_step / 2.0)
            } else {
                arc.angle_b() - (2 * j + 1) as f64 * (alpha_step / 2.0)
            };
            vertices.push(Point(
                vertex_angle.cos() * (r + lift) + arc.center.0,
                vertex_angle.sin() * (r + lift) + arc.center.1,
            ));
        }
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::geo_traits::DistanceTo;

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
    fn curve_of_a_square_stays_between_r_and_r_plus_error() {
        let sq = square(100.0);
        let (r, err) = (10.0, 1.0);
        let curve = parallel_curve(&sq, r, err);
        assert!(curve.len() >= 8, "at least two chords per corner arc");
        for v in &curve {
            let d = sq
                .edge_iter()
                .map(|e| e.distance_to(v))
                .fold(f64::MAX, f64::min);
            assert!(d >= r - 1e-9, "vertex closer than the offset: {d}");
            assert!(d <= r + err + 1e-9, "vertex beyond the allowed error: {d}");
        }
    }

    #[test]
    fn finer_error_bound_means_more_vertices() {
        let sq = square(50.0);
        let coarse = parallel_curve(&sq, 10.0, 2.0);
        let fine = parallel_curve(&sq, 10.0, 0.1);
        assert!(fine.len() > coarse.len());
    }
}
