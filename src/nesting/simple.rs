use anyhow::Result;
use log::info;

use crate::config::NestConfig;
use crate::geometry::offset_curve::offset_curve;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;
use crate::nesting::criterion::{NestingCriterion, build_criterion};
use crate::nesting::no_fit_space::{NoFitSpace, PlacementCase};
use crate::nesting::search_space::SearchSpace;
use crate::nesting::{Orientation, Placement};

/// Places copies of a polygon one by one on the circular table, starting at
/// the center. Each copy goes in normally or rotated by 180°; the position is
/// chosen by evaluating two search spaces (one per orientation) with the
/// configured criterion and taking the smaller score, normal winning ties.
pub struct SimpleNesting {
    part_normal: SPolygon,
    part_rotated: SPolygon,
    offset_normal: SPolygon,
    offset_rotated: SPolygon,
    no_fit_space: NoFitSpace,
    search_normal: SearchSpace,
    search_rotated: SearchSpace,
    criterion: Box<dyn NestingCriterion>,
    placements: Vec<Placement>,
    placements_normal: Vec<IVec>,
    placements_rotated: Vec<IVec>,
    table_radius: f64,
    done: bool,
}

impl SimpleNesting {
    /// Prepares a nesting run: normalizes the part so that a placement at
    /// `(0, 0)` sits at the center of the table, derives the offset curves and
    /// the fit/no-fit rasters.
    pub fn new(part: &SPolygon, config: &NestConfig) -> Result<Self> {
        config.validate()?;

        let part_normal = part.normalize();
        let part_rotated = part_normal.rotate_180();

        let offset_normal = offset_curve(
            &part_normal,
            config.part_clearance,
            config.max_polygonization_error,
        )?;
        let offset_rotated = offset_normal.rotate_180();

        let no_fit_space = NoFitSpace::new(&offset_normal, config)?;
        let criterion = build_criterion(config.criterion, config.rng_seed);

        Ok(SimpleNesting {
            part_normal,
            part_rotated,
            offset_normal,
            offset_rotated,
            no_fit_space,
            search_normal: SearchSpace::new(),
            search_rotated: SearchSpace::new(),
            criterion,
            placements: Vec::new(),
            placements_normal: Vec::new(),
            placements_rotated: Vec::new(),
            table_radius: config.table_radius,
            done: false,
        })
    }

    /// Runs the placement loop until no feasible position remains and returns
    /// the placements in the order they were made. An empty slice means the
    /// part does not fit on the table at all.
    pub fn solve(&mut self) -> Result<&[Placement]> {
        while !self.done {
            if !self.nest_one()? {
                self.done = true;
            }
        }
        info!(
            "[NEST] placed {} copies ({} normal, {} rotated)",
            self.placements.len(),
            self.placements_normal.len(),
            self.placements_rotated.len()
        );
        Ok(&self.placements)
    }

    fn nest_one(&mut self) -> Result<bool> {
        if self.placements.is_empty() {
            if !on_table(&self.offset_normal, IVec::ORIGIN, self.table_radius) {
                return Ok(false);
            }
            self.add_normal_placement(IVec::ORIGIN);
            return Ok(true);
        }

        let normal = self
            .criterion
            .evaluate(self.search_normal.fit_total(), &self.offset_normal)?;
        let rotated = self
            .criterion
            .evaluate(self.search_rotated.fit_total(), &self.offset_rotated)?;

        match (normal, rotated) {
            (None, None) => Ok(false),
            (Some(n), None) => {
                self.add_normal_placement(n.position);
                Ok(true)
            }
            (None, Some(r)) => {
                self.add_rotated_placement(r.position);
                Ok(true)
            }
            (Some(n), Some(r)) => {
                if n.score <= r.score {
                    self.add_normal_placement(n.position);
                } else {
                    self.add_rotated_placement(r.position);
                }
                Ok(true)
            }
        }
    }

    fn add_normal_placement(&mut self, position: IVec) {
        self.placements_normal.push(position);
        self.placements.push(Placement {
            position,
            orientation: Orientation::Normal,
        });

        let radius = self.table_radius;
        let offset_normal = &self.offset_normal;
        let offset_rotated = &self.offset_rotated;
        self.search_normal.add_placement(
            position,
            self.no_fit_space.fit_points(PlacementCase::NormalNormal),
            self.no_fit_space.no_fit_points(PlacementCase::NormalNormal),
            |v| on_table(offset_normal, v, radius),
        );
        self.search_rotated.add_placement(
            position,
            self.no_fit_space.fit_points(PlacementCase::NormalRotated),
            self.no_fit_space.no_fit_points(PlacementCase::NormalRotated),
            |v| on_table(offset_rotated, v, radius),
        );
        self.criterion.add_polygon(position, &self.offset_normal);
        info!("[NEST] placement {}: N at {position}", self.placements.len());
    }

    fn add_rotated_placement(&mut self, position: IVec) {
        self.placements_rotated.push(position);
        self.placements.push(Placement {
            position,
            orientation: Orientation::Rotated,
        });

        let radius = self.table_radius;
        let offset_normal = &self.offset_normal;
        let offset_rotated = &self.offset_rotated;
        self.search_normal.add_placement(
            position,
            self.no_fit_space.fit_points(PlacementCase::RotatedNormal),
            self.no_fit_space.no_fit_points(PlacementCase::RotatedNormal),
            |v| on_table(offset_normal, v, radius),
        );
        self.search_rotated.add_placement(
            position,
            self.no_fit_space.fit_points(PlacementCase::RotatedRotated),
            self.no_fit_space.no_fit_points(PlacementCase::RotatedRotated),
            |v| on_table(offset_rotated, v, radius),
        );
        self.criterion.add_polygon(position, &self.offset_rotated);
        info!("[NEST] placement {}: R at {position}", self.placements.len());
    }

    /// Number of copies placed so far.
    pub fn n_placed(&self) -> usize {
        self.placements.len()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placements_normal(&self) -> &[IVec] {
        &self.placements_normal
    }

    pub fn placements_rotated(&self) -> &[IVec] {
        &self.placements_rotated
    }

    /// The placed copies of the original part, in table coordinates.
    pub fn placed_parts(&self) -> Vec<SPolygon> {
        self.placements
            .iter()
            .map(|p| match p.orientation {
                Orientation::Normal => self.part_normal.translate_ivec(p.position),
                Orientation::Rotated => self.part_rotated.translate_ivec(p.position),
            })
            .collect()
    }

    /// The placed offset curves, in table coordinates.
    pub fn placed_offset_curves(&self) -> Vec<SPolygon> {
        self.placements
            .iter()
            .map(|p| match p.orientation {
                Orientation::Normal => self.offset_normal.translate_ivec(p.position),
                Orientation::Rotated => self.offset_rotated.translate_ivec(p.position),
            })
            .collect()
    }
}

/// Every vertex of `polygon` translated by `v` lies strictly inside the table
/// disk. Strict on purpose: a vertex exactly on the rim would void the
/// clearance the offset curve stands for.
fn on_table(polygon: &SPolygon, v: IVec, table_radius: f64) -> bool {
    let shift = v.to_point();
    polygon.vertices.iter().all(|&p| {
        let Point(x, y) = p + shift;
        x * x + y * y < table_radius * table_radius
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_table_is_strict_at_the_rim() {
        let tri = SPolygon::new(vec![
            Point(0.0, 0.0),
            Point(10.0, 0.0),
            Point(0.0, 10.0),
        ])
        .unwrap();
        assert!(on_table(&tri, IVec::ORIGIN, 20.0));
        assert!(!on_table(&tri, IVec::ORIGIN, 10.0), "vertex exactly on the rim");
        assert!(!on_table(&tri, IVec(100, 0), 20.0));
    }
}
