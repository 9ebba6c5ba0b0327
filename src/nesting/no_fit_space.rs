use std::f64::consts::SQRT_2;

use anyhow::Result;
use itertools::Itertools;
use log::debug;

use crate::config::NestConfig;
use crate::geometry::convex_hull::convex_hull_polygon;
use crate::geometry::geo_traits::CollidesWith;
use crate::geometry::no_fit_polygon::NoFitPolygon;
use crate::geometry::parallel_curve::parallel_curve;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::SPolygon;

/// The four ways of placing a normal/rotated part next to a normal/rotated part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementCase {
    NormalNormal = 0,
    RotatedRotated = 1,
    NormalRotated = 2,
    RotatedNormal = 3,
}

/// Fit and no-fit rasters of an offset polygon: for each [PlacementCase], the
/// integer-lattice offsets at which a second copy does not / does overlap a
/// copy at the origin.
///
/// Only the normal-normal and normal-rotated cases are computed from scratch;
/// their counterparts follow by point reflection. Per case, a raster around
/// the bounding box is first cut down with the no-fit polygon of the convex
/// hulls (inflated by `√2·R` so it safely bounds the rasterized region), and
/// the survivors are classified by an exact brute-force intersection test.
#[derive(Debug, Clone)]
pub struct NoFitSpace {
    fit: [Vec<IVec>; 4],
    no_fit: [Vec<IVec>; 4],
}

impl NoFitSpace {
    pub fn new(offset: &SPolygon, config: &NestConfig) -> Result<Self> {
        let raster = config.raster_step;
        let hull = convex_hull_polygon(offset)?;
        let rotated = offset.rotate_180();
        let hull_rotated = convex_hull_polygon(&rotated)?;

        let mut fit: Vec<Vec<IVec>> = Vec::with_capacity(4);
        let mut no_fit: Vec<Vec<IVec>> = Vec::with_capacity(4);

        for orbit_rotated in [false, true] {
            let orbiting_hull = if orbit_rotated { &hull_rotated } else { &hull };
            let nfp = NoFitPolygon::new(hull.clone(), orbiting_hull.clone())?;

            // Raster candidates around the fixed polygon
            let n_x = (offset.bbox.width() / raster as f64) as i64 + 2;
            let n_y = (offset.bbox.height() / raster as f64) as i64 + 2;
            let candidates = (-n_x..=n_x)
                .cartesian_product(-n_y..=n_y)
                .map(|(ix, iy)| IVec(ix * raster, iy * raster));

            // Inflate the no-fit polygon so it upper-bounds the raster cells
            let inflated = SPolygon::new(parallel_curve(
                nfp.polygon(),
                SQRT_2 * raster as f64,
                config.max_polygonization_error,
            ))?;
            let probe_base = nfp.fixed().reference_point()
                + (nfp.orbiting_ref() - nfp.orbiting().reference_point());
            let near: Vec<IVec> = candidates
                .filter(|v| inflated.contains(probe_base + v.to_point()))
                .collect();

            // Exact classification of the remaining offsets
            let orbiting_shape = if orbit_rotated { &rotated } else { offset };
            let mut fits = Vec::new();
            let mut no_fits = Vec::new();
            for v in near {
                if orbiting_shape.translate_ivec(v).collides_with(offset) {
                    no_fits.push(v);
                } else {
                    fits.push(v);
                }
            }
            debug!(
                "[NFS] case {}: {} fit / {} no-fit points",
                if orbit_rotated { "NR" } else { "NN" },
                fits.len(),
                no_fits.len()
            );

            // The mirrored case comes for free by point reflection
            fit.push(fits.clone());
            fit.push(fits.iter().map(|v| v.reflect()).collect());
            no_fit.push(no_fits.clone());
            no_fit.push(no_fits.iter().map(|v| v.reflect()).collect());
        }

        Ok(NoFitSpace {
            fit: fit.try_into().expect("four placement cases"),
            no_fit: no_fit.try_into().expect("four placement cases"),
        })
    }

    pub fn fit_points(&self, case: PlacementCase) -> &[IVec] {
        &self.fit[case as usize]
    }

    pub fn no_fit_points(&self, case: PlacementCase) -> &[IVec] {
        &self.no_fit[case as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::offset_curve::offset_curve;
    use crate::geometry::primitives::Point;
    use std::collections::BTreeSet;

    fn offset_square() -> SPolygon {
        let sq = SPolygon::new(vec![
            Point(-50.0, -50.0),
            Point(50.0, -50.0),
            Point(50.0, 50.0),
            Point(-50.0, 50.0),
        ])
        .unwrap();
        offset_curve(&sq, 10.0, 1.0).unwrap()
    }

    fn config() -> NestConfig {
        NestConfig::default()
    }

    #[test]
    fn origin_is_a_no_fit_point() {
        let nfs = NoFitSpace::new(&offset_square(), &config()).unwrap();
        for case in [
            PlacementCase::NormalNormal,
            PlacementCase::RotatedRotated,
            PlacementCase::NormalRotated,
            PlacementCase::RotatedNormal,
        ] {
            assert!(nfs.no_fit_points(case).contains(&IVec::ORIGIN));
            assert!(!nfs.fit_points(case).is_empty());
        }
    }

    #[test]
    fn fit_and_no_fit_are_disjoint() {
        let nfs = NoFitSpace::new(&offset_square(), &config()).unwrap();
        for case in [PlacementCase::NormalNormal, PlacementCase::NormalRotated] {
            let fit: BTreeSet<IVec> = nfs.fit_points(case).iter().copied().collect();
            let no_fit: BTreeSet<IVec> = nfs.no_fit_points(case).iter().copied().collect();
            assert!(fit.is_disjoint(&no_fit));
        }
    }

    #[test]
    fn mirrored_cases_are_point_reflections() {
        let nfs = NoFitSpace::new(&offset_square(), &config()).unwrap();
        let nn: BTreeSet<IVec> = nfs
            .fit_points(PlacementCase::NormalNormal)
            .iter()
            .copied()
            .collect();
        let rr: BTreeSet<IVec> = nfs
            .fit_points(PlacementCase::RotatedRotated)
            .iter()
            .map(|v| v.reflect())
            .collect();
        assert_eq!(nn, rr);

        let nr: BTreeSet<IVec> = nfs
            .no_fit_points(PlacementCase::NormalRotated)
            .iter()
            .copied()
            .collect();
        let rn: BTreeSet<IVec> = nfs
            .no_fit_points(PlacementCase::RotatedNormal)
            .iter()
            .map(|v| v.reflect())
            .collect();
        assert_eq!(nr, rn);
    }

    #[test]
    fn fit_points_do_not_overlap_the_fixed_polygon() {
        let offset = offset_square();
        let nfs = NoFitSpace::new(&offset, &config()).unwrap();
        for &v in nfs.fit_points(PlacementCase::NormalNormal).iter().take(20) {
            assert!(!offset.translate_ivec(v).collides_with(&offset));
        }
    }
}
