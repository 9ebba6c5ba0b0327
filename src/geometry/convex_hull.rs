use std::collections::BTreeSet;
use std::collections::VecDeque;

use anyhow::Result;
use ordered_float::OrderedFloat;

use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// Lexicographic sort key for a point, usable in ordered collections.
pub type PointKey = (OrderedFloat<f64>, OrderedFloat<f64>);

pub fn point_key(p: Point) -> PointKey {
    (OrderedFloat(p.0), OrderedFloat(p.1))
}

pub fn key_point(k: PointKey) -> Point {
    Point(k.0.into_inner(), k.1.into_inner())
}

/// Convex hull of a set of points in `O(n log n)`: the points are sorted
/// lexicographically, their contour polygon is swept out, and concave angles
/// are eliminated from the contour.
pub fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by_key(|p| point_key(*p));
    convex_hull_presorted(points)
}

/// `O(n)` variant of [convex_hull] for input already sorted lexicographically.
pub fn convex_hull_presorted(points: Vec<Point>) -> Vec<Point> {
    let mut hull = contour_polygon(points);
    monotone_correction(&mut hull);
    hull
}

/// Streaming variant over an ordered key set, whose iteration order is the
/// required presorting.
pub fn convex_hull_of_set(points: &BTreeSet<PointKey>) -> Vec<Point> {
    convex_hull_presorted(points.iter().map(|&k| key_point(k)).collect())
}

/// Convex hull of a polygon's vertices as a polygon.
pub fn convex_hull_polygon(shape: &SPolygon) -> Result<SPolygon> {
    SPolygon::new(convex_hull(shape.vertices.clone()))
}

/// First phase of the hull computation: a double plane sweep records points
/// that push the running y-extremes outward, yielding the left and right
/// contours, which are concatenated into a counter-clockwise contour polygon.
/// Input must be sorted lexicographically.
pub fn contour_polygon(points: Vec<Point>) -> Vec<Point> {
    if points.len() <= 2 {
        return points;
    }

    // Left contour, sweeping left to right
    let mut left: VecDeque<Point> = VecDeque::new();
    left.push_back(points[0]);
    let (mut max_y, mut min_y) = (points[0].1, points[0].1);
    for &p in &points[1..] {
        if p.1 > max_y {
            left.push_front(p);
            max_y = p.1;
        }
        if p.1 < min_y {
            left.push_back(p);
            min_y = p.1;
        }
    }

    // Right contour, sweeping right to left
    let last = points[points.len() - 1];
    let mut right: VecDeque<Point> = VecDeque::new();
    right.push_back(last);
    let (mut max_y, mut min_y) = (last.1, last.1);
    for &p in points[1..points.len() - 1].iter().rev() {
        if p.1 > max_y {
            right.push_back(p);
            max_y = p.1;
        }
        if p.1 < min_y {
            right.push_front(p);
            min_y = p.1;
        }
    }

    // Eliminate the duplicated extrema where the contours meet
    if left.front() == right.back() {
        right.pop_back();
    }
    if right.front() == left.back() {
        left.pop_back();
    }

    left.into_iter().chain(right).collect()
}

/// Second phase: walk the contour and delete every vertex that breaks the
/// strict left-turn property, retracing backwards when a deletion exposes an
/// earlier violation.
fn monotone_correction(hull: &mut Vec<Point>) {
    let mut i: usize = 0;
    while (i as isize) < hull.len() as isize - 2 {
        if !Edge::new(hull[i], hull[i + 1]).is_left_of(hull[i + 2]) {
            // Retrace to the last vertex from which the new point is still left
            let mut j = i as isize;
            while j > -1
                && !Edge::new(hull[j as usize], hull[j as usize + 1]).is_left_of(hull[i + 2])
            {
                j -= 1;
            }
            hull.drain((j + 2) as usize..i + 2);
            i = (j + 1) as usize;
        } else {
            i += 1;
        }
    }
}
