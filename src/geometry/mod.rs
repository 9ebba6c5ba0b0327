pub mod convex_hull;
pub mod enclosing_circle;
pub mod geo_traits;
pub mod min_bbox;
pub mod no_fit_polygon;
pub mod offset_curve;
pub mod parallel_curve;
pub mod primitives;
