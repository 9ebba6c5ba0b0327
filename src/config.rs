use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// Which scalar score drives a placement search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriterionKind {
    /// Area of the convex hull of all placed vertices
    ConvexHullArea,
    /// Area of the smallest enclosing circle of all placed vertices
    SecArea,
}

/// Parameters of a nesting run. All lengths share the unit of the input polygon.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NestConfig {
    /// Radius of the circular table
    pub table_radius: f64,
    /// Minimum distance between any two parts, and between a part and the table edge
    pub part_clearance: f64,
    /// Maximum normal distance between an arc of a parallel curve and the
    /// tangent chords of its polygonization
    pub max_polygonization_error: f64,
    /// Step of the integer lattice on which fit/no-fit points live
    pub raster_step: i64,
    /// Scoring function of the one-by-one driver
    pub criterion: CriterionKind,
    /// Scoring function for fixing the relative position of pairs
    pub pair_criterion: CriterionKind,
    /// Scoring function for fixing the relative position of quadruples
    pub quad_criterion: CriterionKind,
    /// Scoring function for laying out quadruples into the large arrangement
    pub arrangement_criterion: CriterionKind,
    /// Seed of the PRNG behind the enclosing-circle construction; identical
    /// seeds reproduce identical placements
    pub rng_seed: u64,
}

impl Default for NestConfig {
    fn default() -> Self {
        NestConfig {
            table_radius: 1320.0,
            part_clearance: 22.0,
            max_polygonization_error: 1.0,
            raster_step: 10,
            criterion: CriterionKind::ConvexHullArea,
            pair_criterion: CriterionKind::SecArea,
            quad_criterion: CriterionKind::SecArea,
            arrangement_criterion: CriterionKind::ConvexHullArea,
            rng_seed: 0,
        }
    }
}

impl NestConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.table_radius > 0.0,
            "table radius must be positive, got {}",
            self.table_radius
        );
        ensure!(
            self.part_clearance > 0.0,
            "part clearance must be positive, got {}",
            self.part_clearance
        );
        ensure!(
            self.max_polygonization_error > 0.0,
            "polygonization error bound must be positive, got {}",
            self.max_polygonization_error
        );
        ensure!(
            self.raster_step > 0,
            "raster step must be positive, got {}",
            self.raster_step
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NestConfig::default().validate().is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut cfg = NestConfig::default();
        cfg.raster_step = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = NestConfig::default();
        cfg.table_radius = -1.0;
        assert!(cfg.validate().is_err());

        let mut cfg = NestConfig::default();
        cfg.part_clearance = 0.0;
        assert!(cfg.validate().is_err());
    }
}
