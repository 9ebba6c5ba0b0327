use anyhow::Result;
use ordered_float::OrderedFloat;

use crate::geometry::primitives::Edge;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;

/// No-fit polygon of two convex polygons: the locus of reference-point
/// positions of the orbiting polygon at which it touches, but does not
/// overlap, the fixed polygon.
///
/// Built by concatenating the edges of the fixed polygon with the reversed
/// edges of the orbiting polygon, sorted by direction angle, starting the walk
/// at the fixed polygon's reference vertex.
#[derive(Debug, Clone)]
pub struct NoFitPolygon {
    fixed: SPolygon,
    orbiting: SPolygon,
    fixed_ref: Point,
    orbiting_ref: Point,
    polygon: SPolygon,
}

impl NoFitPolygon {
    pub fn new(fixed: SPolygon, orbiting: SPolygon) -> Result<Self> {
        // Reference of the fixed polygon: lowest, then leftmost vertex.
        // Reference of the orbiting polygon: highest, then rightmost vertex.
        let fixed_ref = *fixed
            .vertices
            .iter()
            .min_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
            .expect("polygon has vertices");
        let orbiting_ref = *orbiting
            .vertices
            .iter()
            .max_by_key(|p| (OrderedFloat(p.1), OrderedFloat(p.0)))
            .expect("polygon has vertices");

        let mut edges: Vec<Edge> = fixed
            .edge_iter()
            .chain(orbiting.edge_iter().map(|e| e.reverse()))
            .collect();
        edges.sort_by_key(|e| OrderedFloat(e.direction().angle()));

        let mut vertices = vec![fixed_ref];
        for edge in &edges[..edges.len() - 1] {
            let last = *vertices.last().expect("walk starts non-empty");
            vertices.push(last + edge.direction());
        }
        let polygon = SPolygon::new(vertices)?;

        Ok(NoFitPolygon {
            fixed,
            orbiting,
            fixed_ref,
            orbiting_ref,
            polygon,
        })
    }

    pub fn fixed(&self) -> &SPolygon {
        &self.fixed
    }

    pub fn orbiting(&self) -> &SPolygon {
        &self.orbiting
    }

    /// The lowest-then-leftmost vertex of the fixed polygon. Not to be
    /// confused with the polygon's intrinsic reference point (the bottom-left
    /// corner of its bounding box).
    pub fn fixed_ref(&self) -> Point {
        self.fixed_ref
    }

    /// The highest-then-rightmost vertex of the orbiting polygon.
    pub fn orbiting_ref(&self) -> Point {
        self.orbiting_ref
    }

    pub fn polygon(&self) -> &SPolygon {
        &self.polygon
    }
}
