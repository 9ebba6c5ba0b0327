use crate::geometry::offset_curve::OffsetPolygon;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::Point;

/// A group of offset polygons forming one unit for the purposes of nesting.
#[derive(Debug, Clone, Default)]
pub struct PolygonSet {
    polygons: Vec<OffsetPolygon>,
}

impl PolygonSet {
    pub fn single(polygon: OffsetPolygon) -> PolygonSet {
        PolygonSet {
            polygons: vec![polygon],
        }
    }

    pub fn pair(first: OffsetPolygon, second: OffsetPolygon) -> PolygonSet {
        PolygonSet {
            polygons: vec![first, second],
        }
    }

    /// The union of two sets.
    pub fn union(a: &PolygonSet, b: &PolygonSet) -> PolygonSet {
        let mut polygons = a.polygons.clone();
        polygons.extend(b.polygons.iter().cloned());
        PolygonSet { polygons }
    }

    pub fn translate_ivec(&self, v: IVec) -> PolygonSet {
        PolygonSet {
            polygons: self.polygons.iter().map(|p| p.translate_ivec(v)).collect(),
        }
    }

    pub fn polygons(&self) -> &[OffsetPolygon] {
        &self.polygons
    }

    /// All vertices of all offset curves in the set.
    pub fn curve_vertices(&self) -> Vec<Point> {
        self.polygons
            .iter()
            .flat_map(|p| p.curve.vertices.iter().copied())
            .collect()
    }
}
