//! Polygon boolean clipping (intersection, union, difference, xor) and polygon offsetting on 64
//! bit integer coordinates, using a scan-line sweep with exact integer predicates.
//!
//! The main entry points:
//! - [Clipper] for boolean operations between subject and clip path sets, with
//!   [Clipper::execute_tree] preserving hole nesting and open path results.
//! - [PolygonOffset] / [inflate_paths] for mitered polygon inflation and deflation.
//! - [simplify_polygon] / [clean_polygon] for removing self intersections and noise vertices.
//! - [minkowski_sum] / [minkowski_diff].
//!
//! Coordinates are plain `i64` pairs ([Point64]) with y increasing downward (screen
//! orientation), so [orientation] returns true for counter clockwise winding in that frame.
//! Callers working in floating point scale up into the integer space (see
//! [path::scaled_path_from_points]) and pick the precision via the scale factor.

mod macros;

pub mod clip;
pub mod core;
pub mod offset;
pub mod path;
pub mod polytree;

pub use crate::clip::{
    minkowski_diff, minkowski_sum, simplify_polygon, simplify_polygons, ClipError, ClipType,
    Clipper, ClipperOptions, FillRule, PathType,
};
pub use crate::core::math::{point64, Point64};
pub use crate::offset::{inflate_paths, PolygonOffset, DEFAULT_MITER_LIMIT};
pub use crate::path::{
    area, bounds, clean_polygon, clean_polygons, orientation, point_in_polygon, reverse_paths,
    Path64, Paths64, PointInPolygonResult, Rect64, DEFAULT_CLEAN_DISTANCE,
};
pub use crate::polytree::{
    closed_paths_from_polytree, open_paths_from_polytree, polytree_to_paths, PolyNode, PolyTree,
};
