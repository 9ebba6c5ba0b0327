pub mod criterion;
pub mod no_fit_space;
pub mod search_space;
pub mod simple;
pub mod tuple;

use crate::geometry::primitives::IVec;

/// Orientation of a placed part: as-is, or rotated by 180° around the center
/// of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Normal,
    Rotated,
}

/// One placed copy of the part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub position: IVec,
    pub orientation: Orientation,
}
