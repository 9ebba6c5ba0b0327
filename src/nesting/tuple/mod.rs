//! Hybrid tuple nesting: the relative position of two parts is fixed first,
//! pairs are joined into quadruples, quadruples are laid out into a large
//! planar arrangement, and a final grid search slides the table disk over the
//! arrangement to keep as many parts as possible.

mod polygon_set;
mod space;

pub use polygon_set::PolygonSet;
pub use space::Space;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;
use ordered_float::OrderedFloat;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::NestConfig;
use crate::geometry::convex_hull::convex_hull;
use crate::geometry::enclosing_circle::smallest_enclosing_circle;
use crate::geometry::offset_curve::OffsetPolygon;
use crate::geometry::primitives::Circle;
use crate::geometry::primitives::IVec;
use crate::geometry::primitives::Point;
use crate::geometry::primitives::SPolygon;
use crate::nesting::criterion::build_criterion;
use crate::nesting::no_fit_space::{NoFitSpace, PlacementCase};
use crate::nesting::search_space::SearchSpace;

/// Anchor/probe orientation signature of a space: `NN_R` is the space of a
/// normal pair as anchor with one rotated part as probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum SpaceKey {
    N_N,
    R_R,
    N_R,
    R_N,
    NN_N,
    NN_R,
    NR_N,
    NR_R,
    N_NN,
    R_NN,
    N_NR,
    R_NR,
    RR_R,
    RR_N,
    R_RR,
    N_RR,
    NN_NN,
    NR_NR,
    NN_RR,
    RR_RR,
    RR_NN,
    NNNN_NN,
    NRNR_NR,
    NNRR_NN,
    NNRR_RR,
    NN_NNNN,
    NR_NRNR,
    NN_NNRR,
    RR_NNRR,
    NNNN_NNNN,
    NRNR_NRNR,
    NNRR_NNRR,
}

/// Relative positions fixed during the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum PositionKey {
    N_N,
    N_R,
    R_R,
    NN_NN,
    NR_NR,
    NN_RR,
}

/// Polygon sets assembled during the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
pub enum SetKey {
    SINGLE_N,
    SINGLE_R,
    PAIR_N_N,
    PAIR_N_R,
    PAIR_R_R,
    QUAD_NN_NN,
    QUAD_NR_NR,
    QUAD_NN_RR,
}

/// The three quadruple arrangements competing in the final search.
const NESTING_KINDS: [(SetKey, SpaceKey); 3] = [
    (SetKey::QUAD_NN_NN, SpaceKey::NNNN_NNNN),
    (SetKey::QUAD_NR_NR, SpaceKey::NRNR_NRNR),
    (SetKey::QUAD_NN_RR, SpaceKey::NNRR_NNRR),
];

/// A planar arrangement of one quadruple kind, before the table search.
struct Arrangement {
    polygons: Vec<OffsetPolygon>,
    /// Smallest enclosing circle of the quadruple, sizing the search area
    sec: Circle,
}

/// The hybrid nesting driver. See the module documentation for the pipeline.
pub struct TupleNesting {
    offset: OffsetPolygon,
    hull: SPolygon,
    no_fit_space: NoFitSpace,
    spaces: BTreeMap<SpaceKey, Space>,
    positions: BTreeMap<PositionKey, IVec>,
    sets: BTreeMap<SetKey, PolygonSet>,
    result: Vec<OffsetPolygon>,
    config: NestConfig,
}

impl TupleNesting {
    pub fn new(part: &SPolygon, config: &NestConfig) -> Result<Self> {
        config.validate()?;
        let part = part.normalize();
        let offset = OffsetPolygon::new(
            &part,
            config.part_clearance,
            config.max_polygonization_error,
        )?;
        let hull = SPolygon::new(convex_hull(offset.curve.vertices.clone()))?;
        let no_fit_space = NoFitSpace::new(&offset.curve, config)?;

        Ok(TupleNesting {
            offset,
            hull,
            no_fit_space,
            spaces: BTreeMap::new(),
            positions: BTreeMap::new(),
            sets: BTreeMap::new(),
            result: Vec::new(),
            config: *config,
        })
    }

    /// Runs the full pipeline and returns the placed offset polygons in table
    /// coordinates. An empty result means no feasible pairing existed.
    pub fn solve(&mut self) -> Result<&[OffsetPolygon]> {
        self.construct_singles();
        self.construct_1_to_1_spaces();

        if !self.calculate_pairs()? {
            info!("[TUPLE] no feasible pair position, stopping");
            return Ok(&self.result);
        }

        self.construct_2_to_1_spaces();
        self.convert_to_1_to_2_spaces();
        self.construct_2_to_2_spaces();

        if !self.calculate_quadruples()? {
            info!("[TUPLE] no feasible quadruple position, stopping");
            return Ok(&self.result);
        }

        self.construct_4_to_2_spaces();
        self.convert_to_2_to_4_spaces();
        self.construct_4_to_4_spaces();

        let arrangements = NESTING_KINDS
            .iter()
            .map(|&(set_key, space_key)| self.nest_arrangement(set_key, space_key))
            .collect::<Result<Vec<_>>>()?;

        self.result = self.search(arrangements)?;
        info!("[TUPLE] best arrangement keeps {} parts", self.result.len());
        Ok(&self.result)
    }

    /// Number of parts in the best arrangement.
    pub fn n_placed(&self) -> usize {
        self.result.len()
    }

    pub fn placed_polygons(&self) -> &[OffsetPolygon] {
        &self.result
    }

    pub fn spaces(&self) -> &BTreeMap<SpaceKey, Space> {
        &self.spaces
    }

    pub fn positions(&self) -> &BTreeMap<PositionKey, IVec> {
        &self.positions
    }

    pub fn polygon_sets(&self) -> &BTreeMap<SetKey, PolygonSet> {
        &self.sets
    }

    fn construct_singles(&mut self) {
        self.sets
            .insert(SetKey::SINGLE_N, PolygonSet::single(self.offset.clone()));
        self.sets.insert(
            SetKey::SINGLE_R,
            PolygonSet::single(self.offset.rotate_180()),
        );
    }

    fn construct_1_to_1_spaces(&mut self) {
        for (key, case) in [
            (SpaceKey::N_N, PlacementCase::NormalNormal),
            (SpaceKey::R_R, PlacementCase::RotatedRotated),
            (SpaceKey::N_R, PlacementCase::NormalRotated),
            (SpaceKey::R_N, PlacementCase::RotatedNormal),
        ] {
            self.spaces.insert(
                key,
                Space::from_points(
                    self.no_fit_space.fit_points(case),
                    self.no_fit_space.no_fit_points(case),
                ),
            );
        }
    }

    /// Fixes the best relative positions of two parts and assembles the pairs.
    fn calculate_pairs(&mut self) -> Result<bool> {
        let mut criterion =
            build_criterion(self.config.pair_criterion, self.config.rng_seed);
        criterion.add_polygon(IVec::ORIGIN, &self.offset.curve);

        let Some(n_n) = criterion.evaluate(self.space(SpaceKey::N_N).fit_points(), &self.hull)?
        else {
            return Ok(false);
        };
        let Some(n_r) = criterion.evaluate(self.space(SpaceKey::N_R).fit_points(), &self.hull)?
        else {
            return Ok(false);
        };
        let r_r = n_n.position.reflect();

        self.positions.insert(PositionKey::N_N, n_n.position);
        self.positions.insert(PositionKey::N_R, n_r.position);
        self.positions.insert(PositionKey::R_R, r_r);

        let offset = &self.offset;
        self.sets.insert(
            SetKey::PAIR_N_N,
            PolygonSet::pair(offset.clone(), offset.translate_ivec(n_n.position)),
        );
        self.sets.insert(
            SetKey::PAIR_N_R,
            PolygonSet::pair(
                offset.clone(),
                offset.rotate_180().translate_ivec(n_r.position),
            ),
        );
        self.sets.insert(
            SetKey::PAIR_R_R,
            PolygonSet::pair(
                offset.rotate_180(),
                offset.rotate_180().translate_ivec(r_r),
            ),
        );
        Ok(true)
    }

    fn construct_2_to_1_spaces(&mut self) {
        let pos_n_n = self.position(PositionKey::N_N);
        let pos_n_r = self.position(PositionKey::N_R);

        self.insert_composed(SpaceKey::NN_N, SpaceKey::N_N, SpaceKey::N_N, pos_n_n);
        self.insert_composed(SpaceKey::NN_R, SpaceKey::N_R, SpaceKey::N_R, pos_n_n);
        self.insert_composed(SpaceKey::NR_N, SpaceKey::N_N, SpaceKey::R_N, pos_n_r);
        self.insert_composed(SpaceKey::NR_R, SpaceKey::N_R, SpaceKey::R_R, pos_n_r);

        // Point symmetry gives the probe-pair spaces for free
        self.insert_copy(SpaceKey::R_RR, SpaceKey::NN_N);
        self.insert_copy(SpaceKey::N_RR, SpaceKey::NN_R);
    }

    fn convert_to_1_to_2_spaces(&mut self) {
        self.insert_reflected(SpaceKey::N_NN, SpaceKey::NN_N);
        self.insert_reflected(SpaceKey::R_NN, SpaceKey::NN_R);
        self.insert_reflected(SpaceKey::N_NR, SpaceKey::NR_N);
        self.insert_reflected(SpaceKey::R_NR, SpaceKey::NR_R);

        self.insert_copy(SpaceKey::RR_R, SpaceKey::N_NN);
        self.insert_copy(SpaceKey::RR_N, SpaceKey::R_NN);
    }

    fn construct_2_to_2_spaces(&mut self) {
        let pos_n_n = self.position(PositionKey::N_N);
        let pos_n_r = self.position(PositionKey::N_R);

        self.insert_composed(SpaceKey::NN_NN, SpaceKey::N_NN, SpaceKey::N_NN, pos_n_n);
        self.insert_composed(SpaceKey::NR_NR, SpaceKey::N_NR, SpaceKey::R_NR, pos_n_r);
        self.insert_composed(SpaceKey::NN_RR, SpaceKey::N_RR, SpaceKey::N_RR, pos_n_n);

        self.insert_reflected(SpaceKey::RR_RR, SpaceKey::NN_NN);
        self.insert_reflected(SpaceKey::RR_NN, SpaceKey::NN_RR);
    }

    /// Fixes the best relative positions of two pairs and assembles the
    /// quadruples.
    fn calculate_quadruples(&mut self) -> Result<bool> {
        let hull_nn = self.set_hull(SetKey::PAIR_N_N)?;
        let hull_nr = self.set_hull(SetKey::PAIR_N_R)?;
        let hull_rr = self.set_hull(SetKey::PAIR_R_R)?;

        let seed = self.config.rng_seed;
        let kind = self.config.quad_criterion;

        let mut criterion = build_criterion(kind, seed);
        criterion.add_polygon(IVec::ORIGIN, &hull_nn);
        let Some(nn_nn) =
            criterion.evaluate(self.space(SpaceKey::NN_NN).fit_points(), &hull_nn)?
        else {
            return Ok(false);
        };

        let mut criterion = build_criterion(kind, seed);
        criterion.add_polygon(IVec::ORIGIN, &hull_nr);
        let Some(nr_nr) =
            criterion.evaluate(self.space(SpaceKey::NR_NR).fit_points(), &hull_nr)?
        else {
            return Ok(false);
        };

        let mut criterion = build_criterion(kind, seed);
        criterion.add_polygon(IVec::ORIGIN, &hull_nn);
        let Some(nn_rr) =
            criterion.evaluate(self.space(SpaceKey::NN_RR).fit_points(), &hull_rr)?
        else {
            return Ok(false);
        };

        self.positions.insert(PositionKey::NN_NN, nn_nn.position);
        self.positions.insert(PositionKey::NR_NR, nr_nr.position);
        self.positions.insert(PositionKey::NN_RR, nn_rr.position);

        let pair_nn = self.set(SetKey::PAIR_N_N).clone();
        let pair_nr = self.set(SetKey::PAIR_N_R).clone();
        let pair_rr = self.set(SetKey::PAIR_R_R).clone();
        self.sets.insert(
            SetKey::QUAD_NN_NN,
            PolygonSet::union(&pair_nn, &pair_nn.translate_ivec(nn_nn.position)),
        );
        self.sets.insert(
            SetKey::QUAD_NR_NR,
            PolygonSet::union(&pair_nr, &pair_nr.translate_ivec(nr_nr.position)),
        );
        self.sets.insert(
            SetKey::QUAD_NN_RR,
            PolygonSet::union(&pair_nn, &pair_rr.translate_ivec(nn_rr.position)),
        );
        Ok(true)
    }

    fn construct_4_to_2_spaces(&mut self) {
        let pos_nn_nn = self.position(PositionKey::NN_NN);
        let pos_nr_nr = self.position(PositionKey::NR_NR);
        let pos_nn_rr = self.position(PositionKey::NN_RR);

        self.insert_composed(SpaceKey::NNNN_NN, SpaceKey::NN_NN, SpaceKey::NN_NN, pos_nn_nn);
        self.insert_composed(SpaceKey::NRNR_NR, SpaceKey::NR_NR, SpaceKey::NR_NR, pos_nr_nr);
        self.insert_composed(SpaceKey::NNRR_NN, SpaceKey::NN_NN, SpaceKey::RR_NN, pos_nn_rr);
        self.insert_composed(SpaceKey::NNRR_RR, SpaceKey::NN_RR, SpaceKey::RR_RR, pos_nn_rr);
    }

    fn convert_to_2_to_4_spaces(&mut self) {
        self.insert_reflected(SpaceKey::NN_NNNN, SpaceKey::NNNN_NN);
        self.insert_reflected(SpaceKey::NR_NRNR, SpaceKey::NRNR_NR);
        self.insert_reflected(SpaceKey::NN_NNRR, SpaceKey::NNRR_NN);
        self.insert_reflected(SpaceKey::RR_NNRR, SpaceKey::NNRR_RR);
    }

    fn construct_4_to_4_spaces(&mut self) {
        let pos_nn_nn = self.position(PositionKey::NN_NN);
        let pos_nr_nr = self.position(PositionKey::NR_NR);
        let pos_nn_rr = self.position(PositionKey::NN_RR);

        self.insert_composed(
            SpaceKey::NNNN_NNNN,
            SpaceKey::NN_NNNN,
            SpaceKey::NN_NNNN,
            pos_nn_nn,
        );
        self.insert_composed(
            SpaceKey::NRNR_NRNR,
            SpaceKey::NR_NRNR,
            SpaceKey::NR_NRNR,
            pos_nr_nr,
        );
        self.insert_composed(
            SpaceKey::NNRR_NNRR,
            SpaceKey::NN_NNRR,
            SpaceKey::RR_NNRR,
            pos_nn_rr,
        );
    }

    /// Greedy placement of one quadruple kind, analogous to the one-by-one
    /// driver but with the compound polygon set and its 4:4 space. The
    /// acceptance filter keeps placements within one enclosing-circle radius
    /// beyond the table, so the arrangement generously covers every position
    /// the final search may slide the table to.
    fn nest_arrangement(&self, set_key: SetKey, space_key: SpaceKey) -> Result<Arrangement> {
        let polygon_set = self.set(set_key);
        let space = self.space(space_key);
        let set_hull = self.set_hull(set_key)?;

        let mut rng = SmallRng::seed_from_u64(self.config.rng_seed);
        let sec = smallest_enclosing_circle(&set_hull.vertices, &mut rng)?;

        // Center the quadruple's enclosing circle on the origin
        let initial = IVec(-(sec.center.0 as i64), -(sec.center.1 as i64));
        let nesting_radius = self.config.table_radius + sec.radius;
        let filter = |v: IVec| {
            ((v.0 - initial.0) as f64).hypot((v.1 - initial.1) as f64) < nesting_radius
        };

        let mut search_space = SearchSpace::new();
        let mut criterion =
            build_criterion(self.config.arrangement_criterion, self.config.rng_seed);

        let mut placements = vec![initial];
        search_space.add_placement(initial, space.fit_points(), space.no_fit_points(), filter);
        criterion.add_polygon(initial, &set_hull);

        while let Some(eval) = criterion.evaluate(search_space.fit_total(), &set_hull)? {
            placements.push(eval.position);
            search_space.add_placement(
                eval.position,
                space.fit_points(),
                space.no_fit_points(),
                filter,
            );
            criterion.add_polygon(eval.position, &set_hull);
        }
        info!(
            "[TUPLE] arrangement {set_key:?}: {} quadruples",
            placements.len()
        );

        let polygons = placements
            .iter()
            .flat_map(|&p| polygon_set.translate_ivec(p).polygons().to_vec())
            .collect();
        Ok(Arrangement { polygons, sec })
    }

    /// Grid search over candidate table centers: per arrangement, keep the
    /// center containing the most parts (most centered on ties); then the same
    /// rule across arrangements. The winner is translated so the chosen center
    /// becomes the origin.
    fn search(&self, arrangements: Vec<Arrangement>) -> Result<Vec<OffsetPolygon>> {
        let raster = self.config.raster_step;

        let mut winners: Vec<(IVec, Vec<OffsetPolygon>)> = Vec::new();
        for arrangement in &arrangements {
            let search_area = Circle::new(Point::ORIGIN, arrangement.sec.radius / 2.0);
            let n = (search_area.radius / raster as f64) as i64 + 1;
            let centers = (-n..=n)
                .cartesian_product(-n..=n)
                .map(|(ix, iy)| IVec(ix * raster, iy * raster))
                .filter(|c| search_area.contains_point(c.to_point()));

            let results: Vec<(IVec, Vec<OffsetPolygon>)> = centers
                .map(|center| {
                    let table = Circle::new(center.to_point(), self.config.table_radius);
                    let inside = arrangement
                        .polygons
                        .iter()
                        .filter(|p| table.contains_polygon(&p.curve))
                        .cloned()
                        .collect();
                    (center, inside)
                })
                .collect();

            let max_count = results
                .iter()
                .map(|(_, polygons)| polygons.len())
                .max()
                .context("search area contains no candidate centers")?;
            let best = results
                .into_iter()
                .filter(|(_, polygons)| polygons.len() == max_count)
                .min_by_key(|(center, polygons)| {
                    OrderedFloat(max_vertex_distance(polygons, *center))
                })
                .expect("at least one maximal result");
            winners.push(best);
        }

        let max_overall = winners
            .iter()
            .map(|(_, polygons)| polygons.len())
            .max()
            .context("no arrangements to search")?;
        let (center, polygons) = winners
            .into_iter()
            .filter(|(_, polygons)| polygons.len() == max_overall)
            .min_by_key(|(center, polygons)| OrderedFloat(max_vertex_distance(polygons, *center)))
            .expect("at least one maximal arrangement");

        // Emit in table coordinates: the winning center becomes the origin
        let to_origin = -center.to_point();
        Ok(polygons.iter().map(|p| p.translate(to_origin)).collect())
    }

    fn space(&self, key: SpaceKey) -> &Space {
        self.spaces.get(&key).expect("space constructed earlier in the pipeline")
    }

    fn position(&self, key: PositionKey) -> IVec {
        *self
            .positions
            .get(&key)
            .expect("position fixed earlier in the pipeline")
    }

    fn set(&self, key: SetKey) -> &PolygonSet {
        self.sets.get(&key).expect("polygon set assembled earlier in the pipeline")
    }

    fn set_hull(&self, key: SetKey) -> Result<SPolygon> {
        SPolygon::new(convex_hull(self.set(key).curve_vertices()))
    }

    fn insert_composed(
        &mut self,
        key: SpaceKey,
        anchor: SpaceKey,
        attached: SpaceKey,
        position: IVec,
    ) {
        let composed = Space::compose(self.space(anchor), self.space(attached), position);
        self.spaces.insert(key, composed);
    }

    fn insert_reflected(&mut self, key: SpaceKey, source: SpaceKey) {
        let reflected = self.space(source).reflect();
        self.spaces.insert(key, reflected);
    }

    fn insert_copy(&mut self, key: SpaceKey, source: SpaceKey) {
        let copy = self.space(source).clone();
        self.spaces.insert(key, copy);
    }
}

fn max_vertex_distance(polygons: &[OffsetPolygon], center: IVec) -> f64 {
    let center = center.to_point();
    polygons
        .iter()
        .map(|p| p.curve.max_vertex_distance_to(center))
        .fold(0.0, f64::max)
}
